//! PDF输出模块
//!
//! 调用外部 `pandoc` 将HTML转换为PDF，字体与文字方向按语言选择。

// 标准库导入
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

// 第三方crate导入
use chrono::Local;
use tracing::{debug, info};

// 本地模块导入
use crate::constants::pdf_config::{CHAPTER_BREAK, PANDOC_BINARY, PDF_ENGINE};
use crate::constants::pdf_font_for_language;
use crate::error::{file_error, Result};
use crate::localize_error;

/// 在每个 `<h1>` 前插入换行作为章节分隔
pub fn format_breaks(html: &str) -> String {
    html.replace("<h1>", CHAPTER_BREAK)
}

/// 从 `<lang>.<name>.html` 形式的文件名取出（语言，标题）
pub fn language_and_title(source: &Path) -> Result<(String, String)> {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = file_name.strip_suffix(".html").unwrap_or(&file_name).to_string();

    match title.split_once('.') {
        Some((lang, _)) if !lang.is_empty() => Ok((lang.to_string(), title.clone())),
        _ => Err(localize_error!(input_validation, source.display(), "文件名缺少语言前缀")),
    }
}

/// pandoc PDF渲染器
#[derive(Debug, Clone)]
pub struct PandocRenderer {
    binary: String,
    engine: String,
    resource_path: PathBuf,
}

impl Default for PandocRenderer {
    fn default() -> Self {
        Self {
            binary: PANDOC_BINARY.to_string(),
            engine: PDF_ENGINE.to_string(),
            resource_path: PathBuf::from("."),
        }
    }
}

impl PandocRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 本地资源（图片等）的查找路径
    pub fn with_resource_path(mut self, resource_path: Option<PathBuf>) -> Self {
        if let Some(path) = resource_path {
            self.resource_path = path;
        }
        self
    }

    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }

    /// 构造pandoc命令行参数
    pub fn arguments(&self, source: &Path, output: &Path) -> Result<Vec<String>> {
        let (lang, title) = language_and_title(source)?;
        let (font, direction) = pdf_font_for_language(&lang).ok_or_else(|| {
            localize_error!(tool, &self.binary, format!("不支持的语言前缀 {} ({})", lang, source.display()))
        })?;

        Ok(vec![
            "--metadata".to_string(),
            format!("title={}", title),
            "--metadata".to_string(),
            format!("date={}", Local::now().format("%Y-%m-%d")),
            "--toc".to_string(),
            "--resource-path".to_string(),
            self.resource_path.display().to_string(),
            "--pdf-engine".to_string(),
            self.engine.clone(),
            "--variable".to_string(),
            format!("mainfont={}", font),
            "--variable".to_string(),
            format!("lang={}", lang),
            "--variable".to_string(),
            format!("dir={}", direction),
            source.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ])
    }

    /// 将HTML文件渲染为PDF，源文件会先插入章节分隔
    pub fn render(&self, source: &Path, output: &Path) -> Result<()> {
        let args = self.arguments(source, output)?;

        let html = fs::read_to_string(source).map_err(file_error(source, "读取"))?;
        fs::write(source, format_breaks(&html)).map_err(file_error(source, "写入"))?;

        debug!("pandoc参数: {:?}", args);
        let result = Command::new(&self.binary).args(&args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                localize_error!(tool, &self.binary, "未在PATH中找到，请安装后重试")
            } else {
                localize_error!(tool, &self.binary, e)
            }
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let details = if result.status.code() == Some(47) {
                format!("PDF引擎不存在或无效: {}", stderr.trim())
            } else {
                stderr.trim().to_string()
            };
            return Err(localize_error!(tool, &self.binary, details));
        }

        info!("📄 PDF已生成: {}", output.display());
        Ok(())
    }
}
