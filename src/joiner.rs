//! 文档合并模块
//!
//! 将同一语言的多个单文档HTML输出合并为一个文档，并删除已合并的源文件。

// 标准库导入
use std::fs;
use std::path::{Path, PathBuf};

// 第三方crate导入
use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

// 本地模块导入
use crate::error::{file_error, Result};

/// 打开的body标签
const BODY_OPEN_PATTERN: &str = r"<body[^>]*>";
/// 闭合的body标签
const BODY_CLOSE: &str = "</body>";

/// 合并结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 合并后的文件
    pub output: PathBuf,
    /// 已合并并删除的源文件
    pub consumed: Vec<PathBuf>,
    /// 因找不到body边界而跳过的文件
    pub skipped: Vec<PathBuf>,
}

/// 提取第一个`<body ...>`与第一个`</body>`之间的内容
pub fn body_content<'a>(html: &'a str, body_open: &Regex) -> Option<&'a str> {
    let open = body_open.find(html)?;
    let close = html[open.end()..].find(BODY_CLOSE)?;
    Some(&html[open.end()..open.end() + close])
}

/// 合并输出文件名：`<lang>.<name>.html`
pub fn joined_file_name(language: &str, name: &str) -> String {
    format!("{}.{}.html", language, name)
}

/// 合并 `output_dir` 中所有 `<language>.*.html` 文件
///
/// 文件按文件名排序后依次处理，每个文件内容追加后立即删除。
/// 合并结果本身不会被当作输入。
pub fn join_html(language: &str, output_dir: &Path, name: &str) -> Result<JoinOutcome> {
    let body_open = Regex::new(BODY_OPEN_PATTERN)
        .map_err(|e| anyhow::anyhow!("body正则表达式编译失败: {}", e))?;
    let output_name = joined_file_name(language, name);
    let prefix = format!("{}.", language);

    let mut buffer = String::new();
    let mut consumed = Vec::new();
    let mut skipped = Vec::new();

    let walker = WalkDir::new(output_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("目录遍历失败"));
            file_error(output_dir, "读取目录")(source)
        })?;

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !file_name.starts_with(&prefix) || !file_name.ends_with(".html") || file_name == output_name {
            continue;
        }

        let path = entry.path();
        if entry.file_type().is_dir() {
            warn!("⚠️  跳过目录: {}", path.display());
            continue;
        }

        let html = fs::read_to_string(path).map_err(file_error(path, "读取"))?;
        match body_content(&html, &body_open) {
            Some(body) => {
                buffer.push_str(body);
                buffer.push('\n');
                fs::remove_file(path).map_err(file_error(path, "删除"))?;
                debug!("已合并并删除: {}", path.display());
                consumed.push(path.to_path_buf());
            }
            None => {
                warn!("⚠️  未找到body标签，跳过: {}", path.display());
                skipped.push(path.to_path_buf());
            }
        }
    }

    let output = output_dir.join(&output_name);
    let combined = format!("<html><body>\n{}</body></html>", buffer);
    fs::write(&output, combined).map_err(file_error(&output, "写入"))?;

    info!(
        "🔗 已合并 {} 个文件 (语言 {}) -> {}",
        consumed.len(),
        language,
        output.display()
    );
    Ok(JoinOutcome {
        output,
        consumed,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn page(body: &str) -> String {
        format!("<html><head></head><body class=\"doc\">{}</body></html>", body)
    }

    #[test]
    fn test_body_content() {
        let regex = Regex::new(BODY_OPEN_PATTERN).unwrap();
        assert_eq!(body_content(&page("<p>A</p>"), &regex), Some("<p>A</p>"));
        assert_eq!(body_content("<p>no body</p>", &regex), None);
        assert_eq!(body_content("<body><p>unterminated", &regex), None);
    }

    #[test]
    fn test_join_in_file_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("es.c.html"), page("<p>C</p>")).unwrap();
        fs::write(dir.path().join("es.a.html"), page("<p>A</p>")).unwrap();
        fs::write(dir.path().join("es.b.html"), page("<p>B</p>")).unwrap();
        fs::write(dir.path().join("fa.a.html"), page("<p>other</p>")).unwrap();

        let outcome = join_html("es", dir.path(), "book").unwrap();
        let combined = fs::read_to_string(&outcome.output).unwrap();

        assert_eq!(combined, "<html><body>\n<p>A</p>\n<p>B</p>\n<p>C</p>\n</body></html>");
        assert_eq!(outcome.consumed.len(), 3);
        assert!(!dir.path().join("es.a.html").exists());
        assert!(!dir.path().join("es.b.html").exists());
        assert!(!dir.path().join("es.c.html").exists());
        assert!(dir.path().join("fa.a.html").exists());
    }

    #[test]
    fn test_file_without_body_is_kept() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("es.a.html"), page("<p>A</p>")).unwrap();
        fs::write(dir.path().join("es.broken.html"), "<p>fragment</p>").unwrap();

        let outcome = join_html("es", dir.path(), "book").unwrap();

        assert_eq!(outcome.skipped, vec![dir.path().join("es.broken.html")]);
        assert!(dir.path().join("es.broken.html").exists());
        assert_eq!(
            fs::read_to_string(outcome.output).unwrap(),
            "<html><body>\n<p>A</p>\n</body></html>"
        );
    }

    #[test]
    fn test_previous_output_is_not_consumed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("es.a.html"), page("<p>A</p>")).unwrap();
        join_html("es", dir.path(), "book").unwrap();

        fs::write(dir.path().join("es.b.html"), page("<p>B</p>")).unwrap();
        let outcome = join_html("es", dir.path(), "book").unwrap();

        assert_eq!(outcome.consumed, vec![dir.path().join("es.b.html")]);
        assert_eq!(
            fs::read_to_string(outcome.output).unwrap(),
            "<html><body>\n<p>B</p>\n</body></html>"
        );
    }

    #[test]
    fn test_empty_directory_writes_empty_shell() {
        let dir = TempDir::new().unwrap();
        let outcome = join_html("es", dir.path(), "book").unwrap();

        assert!(outcome.consumed.is_empty());
        assert_eq!(fs::read_to_string(outcome.output).unwrap(), "<html><body>\n</body></html>");
    }
}
