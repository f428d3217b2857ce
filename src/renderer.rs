//! 模板渲染模块
//!
//! 将一个（文档，语言）组合解析为最终HTML：
//! 1. 读取模板和目标语言字符串表
//! 2. 对空值按回退策略处理（严格模式直接失败，否则使用基础语言的值）
//! 3. 应用该语言的覆盖规则
//! 4. 用解析后的值替换模板中的全部占位符
//!
//! 批量生成先在内存中完成全部组合的校验与渲染，之后才写入任何文件。

// 标准库导入
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

// 第三方crate导入
use regex::Regex;
use tracing::{debug, info, warn};

// 本地模块导入
use crate::config::ProjectConfig;
use crate::error::{file_error, Result};
use crate::extractor::StringTable;
use crate::localize_error;
use crate::overrides::{apply_overrides, Override};
use crate::stats::GenerationStats;
use crate::store::TranslationStore;

/// 模板占位符：`{{ .key_01 }}`
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*\.(\w+)\s*\}\}";

/// 解析后的字符串及其来源统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStrings {
    pub values: StringTable,
    pub fallbacks: usize,
    pub overrides_applied: usize,
}

/// 一个已渲染但尚未写入的文档
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub document: String,
    pub language: String,
    pub html: String,
    pub placeholders: usize,
    pub fallbacks: usize,
    pub overrides_applied: usize,
}

/// 解析字符串表中的空值
///
/// 去除首尾空白后为空的值视为缺失。严格模式下第一个缺失的键（按键排序）
/// 立即返回错误；否则使用基础语言表中同一键的值。
pub fn resolve_strings(
    table: &StringTable,
    base: &StringTable,
    document: &str,
    language: &str,
    strict: bool,
) -> Result<ResolvedStrings> {
    let mut resolved = ResolvedStrings::default();

    for (key, value) in table {
        if !value.trim().is_empty() {
            resolved.values.insert(key.clone(), value.clone());
            continue;
        }
        if strict {
            return Err(localize_error!(missing, key, document, language));
        }

        let fallback = base
            .get(key)
            .ok_or_else(|| localize_error!(unresolved, key, document, language))?;
        debug!("回退到基础语言: {} (文档 {}, 语言 {})", key, document, language);
        resolved.values.insert(key.clone(), fallback.clone());
        resolved.fallbacks += 1;
    }

    Ok(resolved)
}

/// 对解析后的每个值应用该语言的覆盖规则，返回被修改的值数量
pub fn apply_overrides_to_strings(values: &mut StringTable, language: &str, overrides: &[Override]) -> usize {
    let mut changed = 0;
    for value in values.values_mut() {
        let replaced = apply_overrides(value, language, overrides);
        if replaced != *value {
            *value = replaced;
            changed += 1;
        }
    }
    changed
}

/// 转义插入到HTML文本节点中的值
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 用字符串表替换模板中的全部占位符，返回（HTML，替换数量）
///
/// 模板引用了表中不存在的键时返回解析错误。
pub fn render_template(
    template: &str,
    values: &StringTable,
    document: &str,
    language: &str,
) -> Result<(String, usize)> {
    let pattern = Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| anyhow::anyhow!("占位符正则表达式编译失败: {}", e))?;

    let mut output = String::with_capacity(template.len() * 2);
    let mut last = 0;
    let mut count = 0;

    for caps in pattern.captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = values
            .get(key.as_str())
            .ok_or_else(|| localize_error!(unresolved, key.as_str(), document, language))?;

        output.push_str(&template[last..whole.start()]);
        output.push_str(&escape_text(value));
        last = whole.end();
        count += 1;
    }
    output.push_str(&template[last..]);

    Ok((output, count))
}

/// 渲染器
pub struct Renderer<'a> {
    store: &'a TranslationStore,
    config: &'a ProjectConfig,
    overrides: &'a [Override],
    strict: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a TranslationStore, config: &'a ProjectConfig) -> Self {
        Self {
            store,
            config,
            overrides: &[],
            strict: false,
        }
    }

    /// 设置覆盖规则
    pub fn with_overrides(mut self, overrides: &'a [Override]) -> Self {
        self.overrides = overrides;
        self
    }

    /// 设置严格模式
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 在内存中渲染一个（文档，语言）组合，不写入文件
    pub fn render(&self, document: &str, language: &str) -> Result<RenderedDocument> {
        let template = self.store.read_template(document)?;
        let table = self.store.read_table(language, document)?;

        let mut resolved = if language == self.config.base {
            resolve_strings(&table, &table, document, language, self.strict)?
        } else {
            let base = self.store.read_table(&self.config.base, document)?;
            resolve_strings(&table, &base, document, language, self.strict)?
        };
        resolved.overrides_applied =
            apply_overrides_to_strings(&mut resolved.values, language, self.overrides);

        let (html, placeholders) = render_template(&template, &resolved.values, document, language)?;
        if resolved.fallbacks > 0 {
            info!(
                "文档 {} ({}) 有 {} 项使用基础语言回退",
                document, language, resolved.fallbacks
            );
        }

        Ok(RenderedDocument {
            document: document.to_string(),
            language: language.to_string(),
            html,
            placeholders,
            fallbacks: resolved.fallbacks,
            overrides_applied: resolved.overrides_applied,
        })
    }

    /// 渲染并写入 `<lang>.<doc>.html`
    pub fn generate(&self, document: &str, language: &str) -> Result<PathBuf> {
        let rendered = self.render(document, language)?;
        self.write(&rendered)
    }

    fn write(&self, rendered: &RenderedDocument) -> Result<PathBuf> {
        let layout = self.store.layout();
        layout.ensure_dir(&layout.output_dir())?;

        let path = self.store.output_path(&rendered.language, &rendered.document);
        fs::write(&path, &rendered.html).map_err(file_error(&path, "写入"))?;
        debug!("已生成: {}", path.display());
        Ok(path)
    }

    /// 为翻译目录中发现的全部（文档，语言）组合生成输出
    ///
    /// 语言不在配置中的字符串表会被跳过并记录警告。任一组合失败时不写入任何文件。
    pub fn generate_all(&self, stats: &mut GenerationStats) -> Result<Vec<PathBuf>> {
        let validate_start = Instant::now();
        let mut rendered = Vec::new();
        let mut documents = BTreeSet::new();

        for entry in self.store.discover_tables()? {
            if !self.config.is_configured(&entry.language) {
                warn!(
                    "⚠️  跳过未配置语言的字符串表: {} (语言 {})",
                    entry.path.display(),
                    entry.language
                );
                stats.pairs_skipped += 1;
                continue;
            }

            let document = self.render(&entry.document, &entry.language)?;
            stats.placeholders_resolved += document.placeholders;
            stats.fallbacks += document.fallbacks;
            stats.overrides_applied += document.overrides_applied;
            documents.insert(entry.document);
            rendered.push(document);
        }
        stats.validate_time += validate_start.elapsed();

        let render_start = Instant::now();
        let mut paths = Vec::with_capacity(rendered.len());
        for document in &rendered {
            paths.push(self.write(document)?);
            stats.output_size += document.html.len();
        }
        stats.render_time += render_start.elapsed();
        stats.documents += documents.len();
        stats.pairs_rendered += paths.len();

        info!("✅ 已生成 {} 个文件，共 {} 个文档", paths.len(), documents.len());
        Ok(paths)
    }
}
