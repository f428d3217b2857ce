//! 处理流程模块
//!
//! 串联各阶段：
//! - 准备：暂存源文档，解析并提取每个文档，写入模板、基础表和目标语言空表
//! - 发布：批量渲染，可选合并与PDF输出

// 标准库导入
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

// 第三方crate导入
use tracing::{debug, info};

// 本地模块导入
use crate::config::ProjectConfig;
use crate::constants::is_source_extension;
use crate::error::Result;
use crate::extractor::extract;
use crate::joiner::join_html;
use crate::localize_error;
use crate::markdown::{document_name, parse_markdown_file};
use crate::overrides::Override;
use crate::pdf::PandocRenderer;
use crate::renderer::Renderer;
use crate::source::{list_files, InputSource};
use crate::stats::GenerationStats;
use crate::store::TranslationStore;

/// 单个文档的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub document: String,
    pub keys: usize,
    pub template: PathBuf,
    pub tables: Vec<PathBuf>,
}

/// 处理一个Markdown文档：解析、提取、写入模板与字符串表
///
/// 重复处理同一文档会从头分配键并完整替换已有的字符串表。
pub fn process_document(path: &Path, store: &TranslationStore, config: &ProjectConfig) -> Result<ProcessOutcome> {
    let document = document_name(path)?;
    let tree = parse_markdown_file(path)?;
    let extraction = extract(&tree);

    let template = store.write_template(&document, &extraction.template)?;
    let mut tables = vec![store.write_base_table(config, &document, &extraction.strings)?];
    for table in store.write_target_tables(config, &document, &extraction.strings)? {
        if !tables.contains(&table) {
            tables.push(table);
        }
    }

    info!("📝 已处理文档 {}: {} 个键", document, extraction.keys.len());
    Ok(ProcessOutcome {
        document,
        keys: extraction.keys.len(),
        template,
        tables,
    })
}

/// 处理暂存目录中全部 `.md`/`.markdown` 文件（按文件名排序）
pub fn process_staging(store: &TranslationStore, config: &ProjectConfig) -> Result<Vec<ProcessOutcome>> {
    let staging = store.layout().staging_dir();
    let mut outcomes = Vec::new();

    for path in list_files(&staging)? {
        let is_source = path
            .extension()
            .map(|ext| is_source_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_source {
            debug!("跳过非Markdown文件: {}", path.display());
            continue;
        }
        outcomes.push(process_document(&path, store, config)?);
    }

    info!("✅ 共处理 {} 个文档", outcomes.len());
    Ok(outcomes)
}

/// 暂存源文档后处理全部文档
pub fn prepare_project(
    source: &InputSource,
    store: &TranslationStore,
    config: &ProjectConfig,
) -> Result<Vec<ProcessOutcome>> {
    source.stage(store.layout())?;
    process_staging(store, config)
}

/// 发布选项
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub strict: bool,
    pub join: bool,
    pub pdf: bool,
    /// 合并文档名称，默认使用项目目录名
    pub name: Option<String>,
    pub resource_path: Option<PathBuf>,
}

/// 输出文件名中的语言前缀
fn output_language(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_string();
    name.split_once('.').map(|(lang, _)| lang.to_string())
}

/// 合并名称不能与任何文档名相同，否则合并结果会覆盖该文档的输出
fn check_join_name(store: &TranslationStore, name: &str) -> Result<()> {
    if let Some(entry) = store
        .discover_tables()?
        .into_iter()
        .find(|entry| entry.document == name)
    {
        return Err(localize_error!(
            input_validation,
            entry.document,
            format!("文档名与合并输出名称 {} 相同，请使用 --name 指定其他名称", name)
        ));
    }
    Ok(())
}

/// 批量生成，按选项合并并输出PDF，返回最终产物路径
pub fn publish(
    store: &TranslationStore,
    config: &ProjectConfig,
    overrides: &[Override],
    options: &PublishOptions,
    stats: &mut GenerationStats,
) -> Result<Vec<PathBuf>> {
    let join_name = if options.join {
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| store.layout().project_name());
        check_join_name(store, &name)?;
        Some(name)
    } else {
        None
    };

    let rendered = Renderer::new(store, config)
        .with_overrides(overrides)
        .with_strict(options.strict)
        .generate_all(stats)?;

    let mut artifacts = rendered.clone();
    if let Some(name) = join_name {
        let join_start = Instant::now();
        let languages: BTreeSet<String> = rendered.iter().filter_map(|p| output_language(p)).collect();

        artifacts.clear();
        for language in languages {
            let outcome = join_html(&language, &store.layout().output_dir(), &name)?;
            stats.files_joined += outcome.consumed.len();
            artifacts.push(outcome.output);
        }
        stats.join_time += join_start.elapsed();
    }

    if options.pdf {
        let pdf_start = Instant::now();
        let renderer = PandocRenderer::new().with_resource_path(options.resource_path.clone());
        let mut pdfs = Vec::with_capacity(artifacts.len());
        for html in &artifacts {
            let pdf = html.with_extension("pdf");
            renderer.render(html, &pdf)?;
            pdfs.push(pdf);
        }
        stats.pdf_time += pdf_start.elapsed();
        artifacts = pdfs;
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectLayout;
    use crate::error::LocalizeError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_process_document_writes_all_artifacts() {
        let dir = TempDir::new().unwrap();
        let store = TranslationStore::new(ProjectLayout::new(dir.path().join("docs")));
        let config = ProjectConfig::new("en", &["en", "fa"]);
        let source = dir.path().join("guide.md");
        fs::write(&source, "# Title\n\nHello world.\n").unwrap();

        let outcome = process_document(&source, &store, &config).unwrap();

        assert_eq!(outcome.document, "guide");
        assert_eq!(outcome.keys, 2);
        assert_eq!(outcome.tables.len(), 2);
        assert!(store.template_path("guide").exists());
        assert_eq!(store.read_table("en", "guide").unwrap()["key_02"], "Hello world.");
        assert_eq!(store.read_table("fa", "guide").unwrap()["key_02"], "");
    }

    #[test]
    fn test_process_staging_skips_other_files() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path());
        fs::create_dir_all(layout.staging_dir()).unwrap();
        fs::write(layout.staging_dir().join("b.md"), "B\n").unwrap();
        fs::write(layout.staging_dir().join("a.markdown"), "A\n").unwrap();
        fs::write(layout.staging_dir().join("logo.png"), [0u8, 1, 2]).unwrap();

        let store = TranslationStore::new(layout);
        let outcomes = process_staging(&store, &ProjectConfig::default()).unwrap();

        let names: Vec<&str> = outcomes.iter().map(|o| o.document.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_join_name_matching_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path().join("docs"));
        let store = TranslationStore::new(layout);
        let config = ProjectConfig::new("en", &["en"]);
        for (name, text) in [("a.md", "Alpha\n"), ("docs.md", "Bravo\n")] {
            let path = dir.path().join(name);
            fs::write(&path, text).unwrap();
            process_document(&path, &store, &config).unwrap();
        }

        let options = PublishOptions {
            join: true,
            ..Default::default()
        };
        let err = publish(&store, &config, &[], &options, &mut GenerationStats::default()).unwrap_err();

        assert!(matches!(err, LocalizeError::InputValidation { ref input, .. } if input == "docs"));
        assert!(!store.output_path("en", "a").exists());
        assert!(!store.output_path("en", "docs").exists());

        let renamed = PublishOptions {
            join: true,
            name: Some("book".to_string()),
            ..Default::default()
        };
        publish(&store, &config, &[], &renamed, &mut GenerationStats::default()).unwrap();
        let combined = fs::read_to_string(store.layout().output_dir().join("en.book.html")).unwrap();
        assert!(combined.contains("<p>Alpha</p>"));
        assert!(combined.contains("<p>Bravo</p>"));
    }

    #[test]
    fn test_output_language() {
        assert_eq!(output_language(Path::new("out/es.guide.html")), Some("es".to_string()));
        assert_eq!(output_language(Path::new("out/guide")), None);
    }
}
