use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

use localize_docs::cleanup::{cleanup_project, CleanupSelection};
use localize_docs::config::{Cli, Command, GenerateArgs, ProjectConfig, ProjectLayout};
use localize_docs::overrides::read_override_file;
use localize_docs::pipeline::{prepare_project, publish, PublishOptions};
use localize_docs::source::InputSource;
use localize_docs::stats::{format_duration, print_generation_stats, GenerationStats};
use localize_docs::store::TranslationStore;
use localize_docs::translator::{translate_project, TranslatorBackend, TranslatorKind};
use localize_docs::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    let layout = ProjectLayout::new(&cli.directory);
    if let Err(e) = run(cli.command, layout).await {
        if cli.quiet {
            eprintln!("{:#}", e);
        } else {
            error!("❌ 执行失败: {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command, layout: ProjectLayout) -> Result<()> {
    match command {
        Command::Init { base, target, force } => {
            let targets: Vec<&str> = target.iter().map(String::as_str).collect();
            ProjectConfig::new(&base, &targets)
                .write(&layout, force)
                .context("初始化项目配置失败")?;
        }
        Command::Prepare { source } => prepare(&layout, &source)?,
        Command::Translate {
            translator,
            overwrite,
        } => translate(&layout, translator, overwrite).await?,
        Command::Generate(args) => generate(&layout, &args)?,
        Command::Cleanup(args) => {
            if args.all && !args.force {
                anyhow::bail!("删除整个项目目录需要同时指定 --force");
            }
            let removed = cleanup_project(&layout, CleanupSelection::from(&args))?;
            info!("清理完成: 删除 {} 项", removed.len());
        }
    }
    Ok(())
}

fn load_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let path = layout.config_path();
    ProjectConfig::read(&path)
        .with_context(|| format!("读取配置失败，请先运行 init: {}", path.display()))
}

fn prepare(layout: &ProjectLayout, source: &str) -> Result<()> {
    let config = load_config(layout)?;
    let source = InputSource::from_descriptor(source)?;
    let store = TranslationStore::new(layout.clone());

    info!("🚀 准备文档: {:?}", source);
    let outcomes = prepare_project(&source, &store, &config).context("准备文档失败")?;
    let keys: usize = outcomes.iter().map(|o| o.keys).sum();
    info!("📂 {} 个文档, {} 个待翻译字符串", outcomes.len(), keys);
    Ok(())
}

async fn translate(layout: &ProjectLayout, kind: TranslatorKind, overwrite: bool) -> Result<()> {
    let config = load_config(layout)?;
    let store = TranslationStore::new(layout.clone());

    let backend = TranslatorBackend::create(kind, &config.base).context("创建翻译后端失败")?;
    info!("🌐 使用翻译后端: {:?}", kind);

    let report = translate_project(&backend, &store, &config, overwrite)
        .await
        .context("翻译失败")?;
    info!(
        "📊 {} 个文档, 写入 {} 个字符串表",
        report.documents, report.tables_written
    );
    Ok(())
}

fn generate(layout: &ProjectLayout, args: &GenerateArgs) -> Result<()> {
    let config = load_config(layout)?;
    let overrides = read_override_file(&layout.overrides_path())?;
    let store = TranslationStore::new(layout.clone());

    let options = PublishOptions {
        strict: args.strict,
        join: args.join,
        pdf: args.pdf,
        name: args.name.clone(),
        resource_path: args.resource_path.clone(),
    };

    let total_start = Instant::now();
    let mut stats = GenerationStats::default();
    let artifacts: Vec<PathBuf> =
        publish(&store, &config, &overrides, &options, &mut stats).context("生成失败")?;
    let total_duration = total_start.elapsed();

    for artifact in &artifacts {
        info!("📄 {}", artifact.display());
    }
    info!(
        "✅ 生成完成: {} 个文件, 耗时 {}",
        artifacts.len(),
        format_duration(total_duration)
    );

    if args.stats {
        print_generation_stats(&stats, total_duration);
    }
    Ok(())
}
