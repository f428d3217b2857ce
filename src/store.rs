//! 存储模块
//!
//! 按文档名与语言代码持久化模板和字符串表：
//! - `<translations>/<lang>.<doc>.json` 字符串表
//! - `<templates>/<doc>.html.tmpl` 模板
//! - `<output>/<lang>.<doc>.html` 渲染结果
//!
//! 写入总是完整替换已有文件，不做任何合并。

// 标准库导入
use std::fs;
use std::path::{Path, PathBuf};

// 第三方crate导入
use tracing::{debug, warn};
use walkdir::WalkDir;

// 本地模块导入
use crate::config::{ProjectConfig, ProjectLayout};
use crate::constants::project_defaults::TEMPLATE_SUFFIX;
use crate::error::{file_error, LocalizeError, Result};
use crate::extractor::{empty_table, StringTable};
use crate::localize_error;
use crate::markup::MarkupNode;

/// 字符串表文件扩展名
const TABLE_EXTENSION: &str = "json";

/// 翻译目录中发现的一个字符串表
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableEntry {
    pub language: String,
    pub document: String,
    pub path: PathBuf,
}

/// 从 `<lang>.<doc>.json` 形式的文件名解析出（语言，文档名）
///
/// 文档名取第一个`.`与`.json`之间的全部内容，允许文档名本身含`.`。
pub fn parse_table_filename(file_name: &str) -> Option<(String, String)> {
    let stem = file_name.strip_suffix(&format!(".{}", TABLE_EXTENSION))?;
    let (language, document) = stem.split_once('.')?;
    if language.is_empty() || document.is_empty() {
        return None;
    }
    Some((language.to_string(), document.to_string()))
}

/// 模板与字符串表存储
#[derive(Debug, Clone)]
pub struct TranslationStore {
    layout: ProjectLayout,
}

impl TranslationStore {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn table_path(&self, language: &str, document: &str) -> PathBuf {
        self.layout
            .translations_dir()
            .join(format!("{}.{}.{}", language, document, TABLE_EXTENSION))
    }

    pub fn template_path(&self, document: &str) -> PathBuf {
        self.layout
            .templates_dir()
            .join(format!("{}.{}", document, TEMPLATE_SUFFIX))
    }

    pub fn output_path(&self, language: &str, document: &str) -> PathBuf {
        self.layout
            .output_dir()
            .join(format!("{}.{}.html", language, document))
    }

    /// 写入一份字符串表，完整替换已有文件
    pub fn write_table(&self, language: &str, document: &str, table: &StringTable) -> Result<PathBuf> {
        self.layout.ensure_dir(&self.layout.translations_dir())?;
        let path = self.table_path(language, document);
        let json = serde_json::to_string_pretty(table)?;
        fs::write(&path, json).map_err(file_error(&path, "写入"))?;

        debug!("字符串表已写入: {} ({} 项)", path.display(), table.len());
        Ok(path)
    }

    /// 写入基础语言字符串表
    pub fn write_base_table(&self, config: &ProjectConfig, document: &str, base: &StringTable) -> Result<PathBuf> {
        self.write_table(&config.base, document, base)
    }

    /// 为每个目标语言写入字符串表
    ///
    /// 目标语言等于基础语言时原样写入基础表，否则写入键相同、值全为空的表。
    pub fn write_target_tables(
        &self,
        config: &ProjectConfig,
        document: &str,
        base: &StringTable,
    ) -> Result<Vec<PathBuf>> {
        let empty = empty_table(base);

        config
            .targets
            .iter()
            .map(|target| {
                let table = if *target == config.base { base } else { &empty };
                self.write_table(target, document, table)
            })
            .collect()
    }

    /// 写入模板
    pub fn write_template(&self, document: &str, template: &MarkupNode) -> Result<PathBuf> {
        self.layout.ensure_dir(&self.layout.templates_dir())?;
        let path = self.template_path(document);
        let html = template.to_html()?;
        fs::write(&path, html).map_err(file_error(&path, "写入"))?;

        debug!("HTML模板已写入: {}", path.display());
        Ok(path)
    }

    /// 读取字符串表
    ///
    /// 文件不存在时返回文件错误；JSON结构无效或为空时返回解析错误。
    pub fn read_table(&self, language: &str, document: &str) -> Result<StringTable> {
        read_table_file(&self.table_path(language, document))
    }

    /// 读取模板文本
    pub fn read_template(&self, document: &str) -> Result<String> {
        let path = self.template_path(document);
        fs::read_to_string(&path).map_err(file_error(&path, "读取"))
    }

    /// 列出翻译目录中的全部字符串表，按（语言，文档名）排序
    pub fn discover_tables(&self) -> Result<Vec<TableEntry>> {
        let dir = self.layout.translations_dir();
        let mut entries = Vec::new();

        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("目录遍历失败"));
                file_error(&dir, "读取目录")(source)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            match parse_table_filename(&file_name) {
                Some((language, document)) => entries.push(TableEntry {
                    language,
                    document,
                    path: entry.path().to_path_buf(),
                }),
                None => warn!("⚠️  忽略无法识别的翻译文件: {}", file_name),
            }
        }

        entries.sort();
        Ok(entries)
    }
}

/// 读取并校验一个字符串表文件
pub fn read_table_file(path: &Path) -> Result<StringTable> {
    let content = fs::read_to_string(path).map_err(file_error(path, "读取"))?;
    let table: StringTable = serde_json::from_str(&content).map_err(|e| -> LocalizeError {
        localize_error!(table_parse, path.display(), e)
    })?;

    if table.is_empty() {
        return Err(localize_error!(table_parse, path.display(), "字符串表为空"));
    }
    debug!("字符串表已读取: {} ({} 项)", path.display(), table.len());
    Ok(table)
}
