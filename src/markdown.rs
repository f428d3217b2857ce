//! Markdown解析模块
//!
//! 将Markdown文档渲染为HTML，再解析为标记树

// 标准库导入
use std::fs;
use std::path::Path;

// 第三方crate导入
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;
use pulldown_cmark::{html, Options, Parser};
use tracing::debug;

// 本地模块导入
use crate::error::{file_error, Result};
use crate::localize_error;
use crate::markup::MarkupNode;

/// Markdown渲染选项
fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

/// 将Markdown文本渲染为HTML片段
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// 解析HTML为标记树
pub fn parse_html(html_content: &str, document: &str) -> Result<MarkupNode> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html_content.as_bytes())
        .map_err(|e| localize_error!(markup_parse, document, format!("HTML解析失败: {}", e)))?;

    MarkupNode::from_handle(&dom.document)
        .ok_or_else(|| localize_error!(markup_parse, document, "HTML文档根节点缺失"))
}

/// 解析Markdown文本为标记树
///
/// Markdown渲染结果为空时返回解析错误。
pub fn parse_markdown(markdown: &str, document: &str) -> Result<MarkupNode> {
    let rendered = markdown_to_html(markdown);
    if rendered.trim().is_empty() {
        return Err(localize_error!(markup_parse, document, "Markdown渲染结果为空"));
    }
    parse_html(&rendered, document)
}

/// 读取并解析Markdown文件
pub fn parse_markdown_file(path: &Path) -> Result<MarkupNode> {
    let document = document_name(path)?;
    let bytes = fs::read(path).map_err(file_error(path, "读取"))?;
    let markdown = String::from_utf8(bytes)
        .map_err(|e| localize_error!(markup_parse, &document, format!("文件不是有效的UTF-8: {}", e)))?;

    debug!("解析Markdown文件: {} ({} 字节)", path.display(), markdown.len());
    parse_markdown(&markdown, &document)
}

/// 将Markdown文件渲染为独立的HTML页面
pub fn write_standalone_html(input: &Path, output: &Path) -> Result<()> {
    let markdown = fs::read_to_string(input).map_err(file_error(input, "读取"))?;
    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n</head>\n<body>\n{}\n</body>\n</html>",
        markdown_to_html(&markdown)
    );
    fs::write(output, page).map_err(file_error(output, "写入"))?;

    debug!("HTML页面已生成: {} -> {}", input.display(), output.display());
    Ok(())
}

/// 文档名：不含扩展名的文件名
pub fn document_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| localize_error!(input_validation, path.display(), "无法确定文档名"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("# Hello World");
        assert!(html.contains("<h1>Hello World</h1>"));
    }

    #[test]
    fn test_parse_markdown_visible_text() {
        let tree = parse_markdown("# Title\n\nHello world.\n", "guide").unwrap();
        assert_eq!(tree.visible_text(), vec!["Title", "Hello world."]);
    }

    #[test]
    fn test_empty_markdown_is_parse_error() {
        let err = parse_markdown("   \n\n", "empty").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_tables_enabled() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_write_standalone_html() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("test.md");
        let output = dir.path().join("test.html");
        fs::write(&input, "# Hello World").unwrap();

        write_standalone_html(&input, &output).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("<meta charset=\"UTF-8\">"));
        assert!(content.contains("<h1>Hello World</h1>"));
    }

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("staging/Getting-Started.md")).unwrap(), "Getting-Started");
        assert_eq!(document_name(Path::new("a/release.notes.md")).unwrap(), "release.notes");
    }
}
