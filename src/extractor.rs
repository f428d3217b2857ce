//! 文本提取模块
//!
//! 对标记树做先序深度优先遍历，提取可读文本并为其分配稳定的键，
//! 同时构建一棵以占位符替代文本的新模板树。输入树保持不变。

// 标准库导入
use std::collections::BTreeMap;
use std::fmt;

// 第三方crate导入
use tracing::debug;

// 本地模块导入
use crate::markup::MarkupNode;

/// 键到字符串的映射，每个（文档，语言）一份
pub type StringTable = BTreeMap<String, String>;

/// 内容按原始文本解析、序列化时不转义的元素
///
/// 这些元素中的文本不是可读内容，提取后再转义写回会改变文档。
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// 提取键，形如 `key_01`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtractionKey(String);

impl ExtractionKey {
    /// 按从1开始的序号生成键，至少补零到两位
    pub fn from_sequence(sequence: usize) -> Self {
        Self(format!("key_{:02}", sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 模板中的占位符写法
    pub fn placeholder(&self) -> String {
        format!("{{{{ .{} }}}}", self.0)
    }
}

impl fmt::Display for ExtractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一次提取的结果
#[derive(Debug, Clone)]
pub struct Extraction {
    /// 以占位符替代文本后的模板树
    pub template: MarkupNode,
    /// 基础语言字符串表
    pub strings: StringTable,
    /// 按遍历顺序排列的键
    pub keys: Vec<ExtractionKey>,
}

/// 键集相同、值全为空的表，用于新建目标语言
pub fn empty_table(strings: &StringTable) -> StringTable {
    strings.keys().map(|key| (key.clone(), String::new())).collect()
}

/// 提取文档中的可翻译文本
pub fn extract(tree: &MarkupNode) -> Extraction {
    let mut extractor = Extractor::default();
    let template = extractor.transform(tree, false);

    for key in &extractor.keys {
        debug!("提取: {} = {:?}", key, extractor.strings.get(key.as_str()));
    }

    Extraction {
        template,
        strings: extractor.strings,
        keys: extractor.keys,
    }
}

#[derive(Default)]
struct Extractor {
    counter: usize,
    strings: StringTable,
    keys: Vec<ExtractionKey>,
}

impl Extractor {
    fn transform(&mut self, node: &MarkupNode, in_raw_text: bool) -> MarkupNode {
        match node {
            MarkupNode::Text(text) if !in_raw_text && !text.trim().is_empty() => {
                self.counter += 1;
                let key = ExtractionKey::from_sequence(self.counter);
                self.strings.insert(key.as_str().to_string(), text.clone());
                self.keys.push(key.clone());
                MarkupNode::Placeholder(key)
            }
            MarkupNode::Element { name, attrs, children } => {
                let raw = in_raw_text || RAW_TEXT_ELEMENTS.contains(&name.local.as_ref());
                MarkupNode::Element {
                    name: name.clone(),
                    attrs: attrs.clone(),
                    children: children.iter().map(|child| self.transform(child, raw)).collect(),
                }
            }
            MarkupNode::Document { children } => MarkupNode::Document {
                children: children
                    .iter()
                    .map(|child| self.transform(child, in_raw_text))
                    .collect(),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{parse_html, parse_markdown};

    #[test]
    fn test_key_format() {
        assert_eq!(ExtractionKey::from_sequence(1).as_str(), "key_01");
        assert_eq!(ExtractionKey::from_sequence(42).as_str(), "key_42");
        assert_eq!(ExtractionKey::from_sequence(123).as_str(), "key_123");
        assert_eq!(ExtractionKey::from_sequence(7).placeholder(), "{{ .key_07 }}");
    }

    #[test]
    fn test_extract_title_and_paragraph() {
        let tree = parse_markdown("# Title\n\nHello world.\n", "guide").unwrap();
        let extraction = extract(&tree);

        assert_eq!(extraction.strings.len(), 2);
        assert_eq!(extraction.strings["key_01"], "Title");
        assert_eq!(extraction.strings["key_02"], "Hello world.");

        let html = extraction.template.to_html().unwrap();
        assert!(html.contains("<h1>{{ .key_01 }}</h1>"));
        assert!(html.contains("<p>{{ .key_02 }}</p>"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let markdown = "# A\n\n* one\n* two\n\n> quote *em* tail\n";
        let first = extract(&parse_markdown(markdown, "doc").unwrap());
        let second = extract(&parse_markdown(markdown, "doc").unwrap());

        assert_eq!(first.strings, second.strings);
        assert_eq!(first.keys, second.keys);
        assert_eq!(first.template.to_html().unwrap(), second.template.to_html().unwrap());
    }

    #[test]
    fn test_preorder_ordering_across_inline_elements() {
        let tree = parse_html("<p>before <em>inside</em> after</p>", "doc").unwrap();
        let extraction = extract(&tree);

        let values: Vec<&str> = extraction
            .keys
            .iter()
            .map(|key| extraction.strings[key.as_str()].as_str())
            .collect();
        assert_eq!(values, vec!["before ", "inside", " after"]);
    }

    #[test]
    fn test_whitespace_nodes_are_preserved() {
        let tree = parse_html("<ul>\n  <li>x</li>\n</ul>", "doc").unwrap();
        let extraction = extract(&tree);

        assert_eq!(extraction.strings.len(), 1);
        assert!(extraction.template.to_html().unwrap().contains("<ul>\n  <li>{{ .key_01 }}</li>\n</ul>"));
    }

    #[test]
    fn test_script_and_style_are_not_extracted() {
        let tree = parse_html("<style>p { color: red }</style><p>text</p><script>var a = 1;</script>", "doc")
            .unwrap();
        let extraction = extract(&tree);

        assert_eq!(extraction.strings.len(), 1);
        assert_eq!(extraction.strings["key_01"], "text");
    }

    #[test]
    fn test_raw_text_elements_are_not_extracted() {
        let tree = parse_html(
            "<p>Intro</p><noscript><b>a &amp; b</b></noscript><xmp>x < y</xmp><iframe>fallback</iframe>",
            "doc",
        )
        .unwrap();
        let extraction = extract(&tree);

        assert_eq!(extraction.strings.len(), 1);
        assert_eq!(extraction.strings["key_01"], "Intro");
        assert_eq!(extraction.template.to_html().unwrap(), tree.to_html().unwrap().replace("Intro", "{{ .key_01 }}"));
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let tree = parse_html("<p>keep me</p>", "doc").unwrap();
        let before = tree.clone();
        let extraction = extract(&tree);

        assert_eq!(tree, before);
        assert_eq!(tree.visible_text(), vec!["keep me"]);
        assert_eq!(extraction.template.placeholders().len(), 1);
    }

    #[test]
    fn test_empty_table_has_same_keys() {
        let extraction = extract(&parse_markdown("# A\n\nB\n", "doc").unwrap());
        let empty = empty_table(&extraction.strings);

        assert_eq!(
            empty.keys().collect::<Vec<_>>(),
            extraction.strings.keys().collect::<Vec<_>>()
        );
        assert!(empty.values().all(|v| v.is_empty()));
    }
}
