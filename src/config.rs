//! 配置管理模块
//!
//! 提供项目配置（基础语言、目标语言）、项目目录布局以及CLI参数解析功能。
//! 目录布局以显式值的形式贯穿所有调用，不使用进程级全局状态。

// 标准库导入
use std::fs;
use std::path::{Path, PathBuf};

// 第三方crate导入
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// 本地模块导入
use crate::constants::project_defaults;
use crate::error::{file_error, Result};
use crate::localize_error;
use crate::translator::TranslatorKind;

/// 项目配置
///
/// 定义所有翻译的来源语言，以及需要生成的目标语言（ISO 639-1 代码）。
///
/// # Examples
///
/// ```rust
/// use localize_docs::config::ProjectConfig;
///
/// let config = ProjectConfig::new("en", &["es", "fa"]);
/// assert!(config.is_configured("es"));
/// assert!(config.is_configured("en"));
/// assert!(!config.is_configured("ru"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// 源文档语言
    #[serde(default)]
    pub base: String,
    /// 翻译目标语言
    #[serde(default, rename = "target")]
    pub targets: Vec<String>,
}

impl ProjectConfig {
    /// 创建新的配置实例
    pub fn new(base: &str, targets: &[&str]) -> Self {
        Self {
            base: base.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// 从YAML文件读取配置，缺失字段回退到默认值
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(file_error(path, "读取"))?;
        let mut config: ProjectConfig = serde_yaml::from_str(&content)
            .map_err(|e| localize_error!(config, path.display(), e))?;

        if config.base.trim().is_empty() {
            warn!("基础语言未设置，使用默认值: {}", project_defaults::BASE_LANGUAGE);
            config.base = project_defaults::BASE_LANGUAGE.to_string();
        }
        if config.targets.is_empty() {
            warn!("目标语言未设置，使用默认值: {:?}", project_defaults::TARGET_LANGUAGES);
            config.targets = Self::default().targets;
        }

        debug!("配置已读取: {:?}", config);
        Ok(config)
    }

    /// 将配置写入项目目录，`force`为false时拒绝覆盖已有配置
    pub fn write(&self, layout: &ProjectLayout, force: bool) -> Result<PathBuf> {
        self.validate()?;
        let config_path = layout.config_path();

        if config_path.exists() {
            if !force {
                return Err(localize_error!(
                    config,
                    config_path.display(),
                    "配置文件已存在，使用 --force 覆盖"
                ));
            }
            info!("已有配置将被覆盖: {}", config_path.display());
        }

        layout.ensure_dir(layout.project_dir())?;
        let yaml = serde_yaml::to_string(self)?;
        fs::write(&config_path, yaml).map_err(file_error(&config_path, "写入"))?;

        info!("📁 项目目录已初始化: {}", config_path.display());
        Ok(config_path)
    }

    /// 校验配置完整性
    pub fn validate(&self) -> Result<()> {
        if self.base.trim().is_empty() {
            return Err(localize_error!(config, "base", "基础语言不能为空"));
        }
        if self.targets.is_empty() {
            return Err(localize_error!(config, "target", "至少需要一个目标语言"));
        }
        Ok(())
    }

    /// 检查语言是否属于 {基础语言} ∪ 目标语言
    pub fn is_configured(&self, lang: &str) -> bool {
        self.base == lang || self.targets.iter().any(|t| t == lang)
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::new(
            project_defaults::BASE_LANGUAGE,
            project_defaults::TARGET_LANGUAGES,
        )
    }
}

/// 项目目录布局
///
/// ```rust
/// use localize_docs::config::ProjectLayout;
///
/// let layout = ProjectLayout::new("manual");
/// assert!(layout.output_dir().ends_with("manual/output"));
/// ```
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    project_dir: PathBuf,
    staging: String,
    translations: String,
    templates: String,
    output: String,
    config_filename: String,
    overrides_filename: String,
    dir_permissions: u32,
}

impl ProjectLayout {
    /// 以默认目录名创建布局
    pub fn new<P: Into<PathBuf>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.into(),
            staging: project_defaults::DIR_STAGING.to_string(),
            translations: project_defaults::DIR_TRANSLATIONS.to_string(),
            templates: project_defaults::DIR_TEMPLATES.to_string(),
            output: project_defaults::DIR_OUTPUT.to_string(),
            config_filename: project_defaults::CONFIG_FILENAME.to_string(),
            overrides_filename: project_defaults::OVERRIDES_FILENAME.to_string(),
            dir_permissions: project_defaults::DIR_PERMISSIONS,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.project_dir.join(&self.staging)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.project_dir.join(&self.translations)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.project_dir.join(&self.templates)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.project_dir.join(&self.output)
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(&self.config_filename)
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.project_dir.join(&self.overrides_filename)
    }

    /// 项目名称（项目目录的最后一级），用作合并输出的默认文件名
    pub fn project_name(&self) -> String {
        self.project_dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| project_defaults::PROJECT_DIR.to_string())
    }

    /// 递归创建目录，并在unix上应用布局的目录权限
    pub fn ensure_dir(&self, dir: &Path) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_permissions);
        }
        builder.create(dir).map_err(file_error(dir, "创建目录"))
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::new(project_defaults::PROJECT_DIR)
    }
}

/// CLI参数结构
#[derive(Parser)]
#[command(author, version, about = "将Markdown或Wiki文档生成多语言HTML/PDF", long_about = None)]
pub struct Cli {
    /// 项目目录
    #[arg(short, long, global = true, default_value = project_defaults::PROJECT_DIR)]
    pub directory: PathBuf,

    /// 详细输出模式 (DEBUG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// 子命令
#[derive(Subcommand)]
pub enum Command {
    /// 使用非默认语言初始化项目配置
    Init {
        /// 源文档的基础语言 (ISO 639-1)
        #[arg(short, long, default_value = project_defaults::BASE_LANGUAGE)]
        base: String,

        /// 目标语言 (ISO 639-1)，可重复或以逗号分隔
        #[arg(short, long, value_delimiter = ',', default_values = ["en", "fa"])]
        target: Vec<String>,

        /// 覆盖已有配置
        #[arg(short, long)]
        force: bool,
    },

    /// 暂存源文档并生成模板与字符串表
    #[command(alias = "update")]
    Prepare {
        /// 源文档位置：本地目录或Wiki仓库URL
        #[arg(short, long)]
        source: String,
    },

    /// 将基础语言字符串翻译为各目标语言
    Translate {
        /// 翻译后端
        #[arg(short, long, value_enum, default_value_t = TranslatorKind::Google)]
        translator: TranslatorKind,

        /// 覆盖已存在的翻译
        #[arg(short, long)]
        overwrite: bool,
    },

    /// 由模板和字符串表生成发布文件
    Generate(GenerateArgs),

    /// 删除选定的项目目录
    Cleanup(CleanupArgs),
}

/// generate 子命令参数
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("format").required(true).args(["html", "pdf"])))]
pub struct GenerateArgs {
    /// 严格模式：缺失翻译时失败而不是回退到基础语言
    #[arg(short, long)]
    pub strict: bool,

    /// 将每种语言的所有文档合并为一个
    #[arg(short, long)]
    pub join: bool,

    /// 仅生成HTML
    #[arg(short = 'm', long)]
    pub html: bool,

    /// 生成PDF
    #[arg(short, long)]
    pub pdf: bool,

    /// 合并文档的名称（默认为项目目录名）
    #[arg(short, long)]
    pub name: Option<String>,

    /// PDF本地资源（图片等）查找路径
    #[arg(long)]
    pub resource_path: Option<PathBuf>,

    /// 显示生成统计
    #[arg(long)]
    pub stats: bool,
}

/// cleanup 子命令参数
#[derive(Args, Debug, Clone)]
pub struct CleanupArgs {
    /// 删除暂存目录
    #[arg(short = 'g', long)]
    pub staging: bool,

    /// 删除模板目录
    #[arg(short, long)]
    pub templates: bool,

    /// 删除字符串表目录
    #[arg(short = 'l', long)]
    pub translations: bool,

    /// 删除输出目录
    #[arg(short, long)]
    pub output: bool,

    /// 删除整个项目目录
    #[arg(short, long)]
    pub all: bool,

    /// 删除整个项目目录时无需确认
    #[arg(short, long, requires = "all")]
    pub force: bool,
}
