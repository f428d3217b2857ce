//! 翻译流程
//!
//! 对每个非基础语言的目标语言，读取各文档的字符串表，翻译其中的空值
//! （或在 `overwrite` 时翻译全部值）后写回。表中保存机器翻译原文，
//! 覆盖规则只在渲染时应用。

// 标准库导入
use std::time::Instant;

// 第三方crate导入
use tracing::{debug, info};

// 本地模块导入
use super::Translator;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::extractor::StringTable;
use crate::localize_error;
use crate::stats::format_duration;
use crate::store::TranslationStore;

/// 翻译流程汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationReport {
    pub languages: usize,
    pub documents: usize,
    pub tables_written: usize,
    pub strings_translated: usize,
}

/// 需要翻译的目标语言：去重并排除基础语言
fn translation_targets(config: &ProjectConfig) -> Vec<&str> {
    let mut targets: Vec<&str> = Vec::new();
    for target in &config.targets {
        if *target != config.base && !targets.contains(&target.as_str()) {
            targets.push(target);
        }
    }
    targets
}

/// 以基础表的键集重建目标表，并返回需要翻译的键
fn pending_keys(base: &StringTable, existing: &StringTable, overwrite: bool) -> (StringTable, Vec<String>) {
    let mut table = StringTable::new();
    let mut pending = Vec::new();

    for key in base.keys() {
        let current = existing.get(key).cloned().unwrap_or_default();
        if overwrite || current.trim().is_empty() {
            pending.push(key.clone());
        }
        table.insert(key.clone(), current);
    }
    (table, pending)
}

/// 执行翻译流程
pub async fn translate_project<T>(
    translator: &T,
    store: &TranslationStore,
    config: &ProjectConfig,
    overwrite: bool,
) -> Result<TranslationReport>
where
    T: Translator + ?Sized,
{
    let start = Instant::now();
    let targets = translation_targets(config);
    let supported = translator.supported_languages(&config.base).await?;

    for target in &targets {
        if !supported.iter().any(|lang| lang == target) {
            return Err(localize_error!(
                translator,
                translator.name(),
                format!("不支持目标语言 {} (源语言 {})", target, config.base)
            ));
        }
    }

    let documents: Vec<String> = store
        .discover_tables()?
        .into_iter()
        .filter(|entry| entry.language == config.base)
        .map(|entry| entry.document)
        .collect();

    let mut report = TranslationReport {
        languages: targets.len(),
        documents: documents.len(),
        ..Default::default()
    };

    for target in &targets {
        info!("🔤 翻译目标语言: {} ({} 个文档)", target, documents.len());

        for document in &documents {
            let base = store.read_table(&config.base, document)?;
            let existing = if store.table_path(target, document).exists() {
                store.read_table(target, document)?
            } else {
                debug!("字符串表不存在，将新建: {} ({})", document, target);
                StringTable::new()
            };

            let (mut table, pending) = pending_keys(&base, &existing, overwrite);
            if pending.is_empty() {
                debug!("文档 {} ({}) 无需翻译", document, target);
                continue;
            }

            let texts: Vec<String> = pending
                .iter()
                .map(|key| base.get(key).cloned().unwrap_or_default())
                .collect();
            let translated = translator.translate(target, &texts).await?;
            if translated.len() != texts.len() {
                return Err(localize_error!(
                    translator,
                    translator.name(),
                    format!("译文数量不匹配: 期望 {}，实际 {}", texts.len(), translated.len())
                ));
            }

            for (key, text) in pending.iter().zip(translated) {
                table.insert(key.clone(), text);
            }
            store.write_table(target, document, &table)?;

            report.tables_written += 1;
            report.strings_translated += pending.len();
            debug!("文档 {} ({}) 已翻译 {} 项", document, target, pending.len());
        }
    }

    translator.close().await?;
    info!(
        "✅ 翻译完成: {} 种语言, {} 项, 耗时 {}",
        report.languages,
        report.strings_translated,
        format_duration(start.elapsed())
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectLayout;
    use crate::error::LocalizeError;
    use crate::translator::MockTranslator;
    use tempfile::TempDir;

    fn table(pairs: &[(&str, &str)]) -> StringTable {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn setup(dir: &TempDir, targets: &[&str]) -> (TranslationStore, ProjectConfig) {
        let store = TranslationStore::new(ProjectLayout::new(dir.path()));
        let config = ProjectConfig::new("en", targets);
        let base = table(&[("key_01", "Title"), ("key_02", "Hello")]);
        store.write_base_table(&config, "guide", &base).unwrap();
        store.write_target_tables(&config, "guide", &base).unwrap();
        (store, config)
    }

    #[tokio::test]
    async fn test_translates_empty_values_only() {
        let dir = TempDir::new().unwrap();
        let (store, config) = setup(&dir, &["en", "es"]);
        store
            .write_table("es", "guide", &table(&[("key_01", "Título"), ("key_02", "")]))
            .unwrap();

        let report = translate_project(&MockTranslator::new(), &store, &config, false)
            .await
            .unwrap();

        let es = store.read_table("es", "guide").unwrap();
        assert_eq!(es["key_01"], "Título");
        assert_eq!(es["key_02"], "<mock:es>Hello</mock:es>");
        assert_eq!(report.strings_translated, 1);
        assert_eq!(report.languages, 1);
        assert_eq!(store.read_table("en", "guide").unwrap()["key_01"], "Title");
    }

    #[tokio::test]
    async fn test_overwrite_translates_everything() {
        let dir = TempDir::new().unwrap();
        let (store, config) = setup(&dir, &["es"]);
        store
            .write_table("es", "guide", &table(&[("key_01", "Título"), ("key_02", "Hola")]))
            .unwrap();

        translate_project(&MockTranslator::new(), &store, &config, true)
            .await
            .unwrap();

        let es = store.read_table("es", "guide").unwrap();
        assert_eq!(es["key_01"], "<mock:es>Title</mock:es>");
    }

    #[tokio::test]
    async fn test_tables_keep_raw_translations() {
        let dir = TempDir::new().unwrap();
        let (store, config) = setup(&dir, &["fa"]);

        translate_project(&MockTranslator::new(), &store, &config, false)
            .await
            .unwrap();

        let fa = store.read_table("fa", "guide").unwrap();
        assert_eq!(fa["key_01"], "<mock:fa>Title</mock:fa>");
        assert_eq!(fa["key_02"], "<mock:fa>Hello</mock:fa>");
    }

    #[tokio::test]
    async fn test_unsupported_language_is_error() {
        let dir = TempDir::new().unwrap();
        let (store, config) = setup(&dir, &["de"]);

        let err = translate_project(&MockTranslator::new(), &store, &config, false)
            .await
            .unwrap_err();

        assert!(matches!(err, LocalizeError::Translator { .. }));
        assert!(store.read_table("de", "guide").unwrap().values().all(|v| v.is_empty()));
    }

    #[test]
    fn test_pending_keys_follow_base_key_set() {
        let base = table(&[("key_01", "A"), ("key_02", "B")]);
        let existing = table(&[("key_01", "a"), ("key_99", "stale")]);

        let (rebuilt, pending) = pending_keys(&base, &existing, false);
        assert_eq!(rebuilt.keys().collect::<Vec<_>>(), vec!["key_01", "key_02"]);
        assert_eq!(pending, vec!["key_02"]);
    }
}
