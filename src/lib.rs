//! localize-docs - 文档多语言本地化工具库
//!
//! 将Markdown文档转换为可复用的HTML模板与按语言划分的字符串表，
//! 再按回退策略和覆盖规则为每种语言重新生成HTML，并可合并为单个文档或输出PDF。

pub mod cleanup;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod joiner;
pub mod markdown;
pub mod markup;
pub mod overrides;
pub mod pdf;
pub mod pipeline;
pub mod renderer;
pub mod source;
pub mod stats;
pub mod store;
pub mod translator;
pub mod utils;

pub use config::{ProjectConfig, ProjectLayout};
pub use error::{LocalizeError, Result};
pub use extractor::{extract, Extraction, ExtractionKey, StringTable};
pub use markup::MarkupNode;
pub use store::TranslationStore;
