//! HTML标记树模块
//!
//! 提供与解析器解耦的不可变标记树、从RcDom的转换，以及基于html5ever序列化器的HTML输出。
//! 提取器在这棵树上做纯函数变换，不修改解析得到的DOM。

// 标准库导入
use std::io;

// 第三方crate导入
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{Attribute, QualName};
use markup5ever_rcdom::{Handle, NodeData};

// 本地模块导入
use crate::error::Result;
use crate::extractor::ExtractionKey;
use crate::localize_error;

/// 标记树节点
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    /// 文档根节点
    Document { children: Vec<MarkupNode> },
    /// `<!DOCTYPE ...>`
    Doctype { name: String },
    /// 元素节点
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        children: Vec<MarkupNode>,
    },
    /// 文本节点
    Text(String),
    /// 已提取文本的占位符引用
    Placeholder(ExtractionKey),
    /// 注释
    Comment(String),
}

impl MarkupNode {
    /// 从RcDom节点递归构建标记树
    ///
    /// 处理指令在HTML中没有意义，直接丢弃。`<template>`元素的内容位于
    /// `template_contents`而不是子节点中，这里将其展开为普通子节点。
    pub fn from_handle(handle: &Handle) -> Option<MarkupNode> {
        match handle.data {
            NodeData::Document => Some(MarkupNode::Document {
                children: children_of(handle),
            }),
            NodeData::Doctype { ref name, .. } => Some(MarkupNode::Doctype {
                name: name.to_string(),
            }),
            NodeData::Text { ref contents } => Some(MarkupNode::Text(contents.borrow().to_string())),
            NodeData::Comment { ref contents } => Some(MarkupNode::Comment(contents.to_string())),
            NodeData::Element {
                ref name,
                ref attrs,
                ref template_contents,
                ..
            } => {
                let children = match template_contents.borrow().as_ref() {
                    Some(contents) => children_of(contents),
                    None => children_of(handle),
                };
                Some(MarkupNode::Element {
                    name: name.clone(),
                    attrs: attrs.borrow().clone(),
                    children,
                })
            }
            NodeData::ProcessingInstruction { .. } => None,
        }
    }

    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Document { children } | MarkupNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// 按先序遍历收集所有非空白文本（去除首尾空白）
    pub fn visible_text(&self) -> Vec<String> {
        let mut texts = Vec::new();
        self.collect_text(&mut texts);
        texts
    }

    fn collect_text(&self, texts: &mut Vec<String>) {
        if let MarkupNode::Text(text) = self {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                texts.push(trimmed.to_string());
            }
        }
        for child in self.children() {
            child.collect_text(texts);
        }
    }

    /// 按先序遍历收集所有占位符键
    pub fn placeholders(&self) -> Vec<&ExtractionKey> {
        let mut keys = Vec::new();
        self.collect_placeholders(&mut keys);
        keys
    }

    fn collect_placeholders<'a>(&'a self, keys: &mut Vec<&'a ExtractionKey>) {
        if let MarkupNode::Placeholder(key) = self {
            keys.push(key);
        }
        for child in self.children() {
            child.collect_placeholders(keys);
        }
    }

    /// 序列化为HTML字符串
    pub fn to_html(&self) -> Result<String> {
        let mut buffer = Vec::new();
        serialize(&mut buffer, self, SerializeOpts::default())
            .map_err(|e| localize_error!(markup_parse, "template", format!("HTML序列化失败: {}", e)))?;

        String::from_utf8(buffer)
            .map_err(|e| localize_error!(markup_parse, "template", format!("UTF-8转换失败: {}", e)))
    }
}

fn children_of(handle: &Handle) -> Vec<MarkupNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(MarkupNode::from_handle)
        .collect()
}

fn serialize_children<S: Serializer>(children: &[MarkupNode], serializer: &mut S) -> io::Result<()> {
    for child in children {
        child.serialize(serializer, TraversalScope::IncludeNode)?;
    }
    Ok(())
}

impl Serialize for MarkupNode {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match (&traversal_scope, self) {
            // 文档节点本身没有标签，总是只输出子节点
            (_, MarkupNode::Document { children }) => serialize_children(children, serializer),
            (TraversalScope::ChildrenOnly(_), MarkupNode::Element { children, .. }) => {
                serialize_children(children, serializer)
            }
            (TraversalScope::ChildrenOnly(_), _) => Ok(()),
            (TraversalScope::IncludeNode, MarkupNode::Element { name, attrs, children }) => {
                serializer.start_elem(
                    name.clone(),
                    attrs.iter().map(|attr| (&attr.name, &attr.value[..])),
                )?;
                serialize_children(children, serializer)?;
                serializer.end_elem(name.clone())
            }
            (TraversalScope::IncludeNode, MarkupNode::Doctype { name }) => serializer.write_doctype(name),
            (TraversalScope::IncludeNode, MarkupNode::Text(text)) => serializer.write_text(text),
            (TraversalScope::IncludeNode, MarkupNode::Placeholder(key)) => {
                serializer.write_text(&key.placeholder())
            }
            (TraversalScope::IncludeNode, MarkupNode::Comment(text)) => serializer.write_comment(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_html;

    #[test]
    fn test_roundtrip_serialization_keeps_structure() {
        let tree = parse_html("<p class=\"lead\">Hello <b>world</b></p>", "doc").unwrap();
        let html = tree.to_html().unwrap();

        assert!(html.contains("<p class=\"lead\">Hello <b>world</b></p>"));
        assert!(html.starts_with("<html><head></head><body>"));
    }

    #[test]
    fn test_text_is_escaped_on_output() {
        let tree = parse_html("<p>a &lt; b &amp; c</p>", "doc").unwrap();
        assert_eq!(tree.visible_text(), vec!["a < b & c"]);
        assert!(tree.to_html().unwrap().contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_placeholder_serializes_as_token() {
        let node = MarkupNode::Element {
            name: QualName::new(
                None,
                html5ever::Namespace::from("http://www.w3.org/1999/xhtml"),
                html5ever::LocalName::from("p"),
            ),
            attrs: Vec::new(),
            children: vec![MarkupNode::Placeholder(ExtractionKey::from_sequence(3))],
        };
        let doc = MarkupNode::Document { children: vec![node] };

        assert_eq!(doc.to_html().unwrap(), "<p>{{ .key_03 }}</p>");
    }

    #[test]
    fn test_comments_and_doctype_survive() {
        let tree = parse_html("<!DOCTYPE html><html><body><!-- note --><p>x</p></body></html>", "doc")
            .unwrap();
        let html = tree.to_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<!-- note -->"));
    }
}
