//! 离线模拟翻译器
//!
//! 不访问网络，将文本包裹为 `<mock:LANG>text</mock:LANG>`，便于测试完整流程。

// 第三方crate导入
use async_trait::async_trait;
use tracing::debug;

// 本地模块导入
use super::Translator;
use crate::constants::translator_config::MOCK_LANGUAGES;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MockTranslator;

impl MockTranslator {
    pub fn new() -> Self {
        Self
    }

    /// 模拟译文
    pub fn mock_translation(target: &str, text: &str) -> String {
        format!("<mock:{}>{}</mock:{}>", target, text, target)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn supported_languages(&self, _base: &str) -> Result<Vec<String>> {
        Ok(MOCK_LANGUAGES.iter().map(|lang| lang.to_string()).collect())
    }

    async fn translate(&self, target: &str, texts: &[String]) -> Result<Vec<String>> {
        debug!("模拟翻译 {} 项 -> {}", texts.len(), target);
        Ok(texts
            .iter()
            .map(|text| Self::mock_translation(target, text))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_translate_preserves_order() {
        let texts = vec!["one".to_string(), "two".to_string()];
        let out = MockTranslator::new().translate("fa", &texts).await.unwrap();

        assert_eq!(out, vec!["<mock:fa>one</mock:fa>", "<mock:fa>two</mock:fa>"]);
    }

    #[tokio::test]
    async fn test_mock_supported_languages() {
        let langs = MockTranslator::new().supported_languages("en").await.unwrap();
        assert!(langs.contains(&"es".to_string()));
        assert!(langs.contains(&"zh".to_string()));
        assert!(!langs.contains(&"de".to_string()));
    }
}
