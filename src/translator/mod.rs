//! 翻译后端模块
//!
//! 翻译能力抽象为 [`Translator`] trait：给定目标语言和一组文本，按相同顺序返回译文。
//! 可用后端是一个封闭集合 [`TranslatorBackend`]，在启动时根据CLI参数选定一次，
//! 之后以引用形式传给所有需要翻译的调用方。

// 第三方crate导入
use async_trait::async_trait;
use clap::ValueEnum;

// 本地模块导入
use crate::error::Result;

pub mod google;
pub mod mock;
pub mod pass;

pub use google::GoogleTranslator;
pub use mock::MockTranslator;
pub use pass::{translate_project, TranslationReport};

/// 翻译能力
#[async_trait]
pub trait Translator: Send + Sync {
    /// 后端名称，用于日志与错误信息
    fn name(&self) -> &str;

    /// 以 `base` 为源语言时支持的目标语言代码
    async fn supported_languages(&self, base: &str) -> Result<Vec<String>>;

    /// 将文本翻译为 `target`，输出与输入一一对应
    async fn translate(&self, target: &str, texts: &[String]) -> Result<Vec<String>>;

    /// 释放后端持有的资源
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// CLI可选的翻译后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TranslatorKind {
    /// Google Translate REST API
    Google,
    /// 离线模拟翻译
    Mock,
}

/// 已选定的翻译后端
#[derive(Debug)]
pub enum TranslatorBackend {
    Google(GoogleTranslator),
    Mock(MockTranslator),
}

impl TranslatorBackend {
    /// 根据后端类型创建翻译器，`base` 为源语言
    pub fn create(kind: TranslatorKind, base: &str) -> Result<Self> {
        match kind {
            TranslatorKind::Google => Ok(Self::Google(GoogleTranslator::from_env()?.with_source(base))),
            TranslatorKind::Mock => Ok(Self::Mock(MockTranslator::new())),
        }
    }

    fn inner(&self) -> &dyn Translator {
        match self {
            Self::Google(translator) => translator,
            Self::Mock(translator) => translator,
        }
    }
}

#[async_trait]
impl Translator for TranslatorBackend {
    fn name(&self) -> &str {
        self.inner().name()
    }

    async fn supported_languages(&self, base: &str) -> Result<Vec<String>> {
        self.inner().supported_languages(base).await
    }

    async fn translate(&self, target: &str, texts: &[String]) -> Result<Vec<String>> {
        self.inner().translate(target, texts).await
    }

    async fn close(&self) -> Result<()> {
        self.inner().close().await
    }
}
