//! Google Translate 后端
//!
//! 使用 Google Translate REST API v2。API密钥从环境变量
//! `GOOGLE_TRANSLATE_API_KEY` 读取；超过128项的请求会被拆分为多个分块并发发送。

// 标准库导入
use std::fmt;
use std::time::Duration;

// 第三方crate导入
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

// 本地模块导入
use super::Translator;
use crate::constants::translator_config::{
    GOOGLE_API_KEY_ENV, GOOGLE_API_URL, GOOGLE_MAX_BATCH_SIZE, REQUEST_TIMEOUT_SECONDS,
};
use crate::error::Result;
use crate::localize_error;

const BACKEND: &str = "google";

#[derive(Clone)]
pub struct GoogleTranslator {
    api_key: String,
    client: Client,
    base_url: String,
    source: Option<String>,
}

impl GoogleTranslator {
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(localize_error!(config, GOOGLE_API_KEY_ENV, "API密钥不能为空"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| localize_error!(translator, BACKEND, format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: GOOGLE_API_URL.to_string(),
            source: None,
        })
    }

    /// 从环境变量读取API密钥
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(GOOGLE_API_KEY_ENV)
            .map_err(|_| localize_error!(config, GOOGLE_API_KEY_ENV, "环境变量未设置"))?;
        Self::new(api_key)
    }

    /// 指定源语言，未指定时由服务自动检测
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// 替换API地址
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request_body(&self, target: &str, texts: &[String]) -> Value {
        let mut body = json!({
            "q": texts,
            "target": target,
            "format": "text"
        });
        if let Some(source) = &self.source {
            body["source"] = json!(source);
        }
        body
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "未知错误".to_string());
            return Err(localize_error!(translator, BACKEND, error_text, status.as_u16()));
        }

        let body: Value = response.json().await?;
        Ok(body)
    }

    async fn translate_chunk(&self, index: usize, target: &str, texts: &[String]) -> Result<Vec<String>> {
        debug!("发送分块 {}: {} 项 -> {}", index + 1, texts.len(), target);

        let url = format!("{}?key={}", self.base_url, self.api_key);
        let body = self
            .send(self.client.post(&url).json(&self.request_body(target, texts)))
            .await?;

        parse_translations(&body)
    }
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("source", &self.source)
            .finish()
    }
}

/// 解析 `data.translations[].translatedText`
pub fn parse_translations(body: &Value) -> Result<Vec<String>> {
    let translations = body["data"]["translations"]
        .as_array()
        .ok_or_else(|| localize_error!(translator, BACKEND, "响应缺少 data.translations 数组"))?;

    translations
        .iter()
        .map(|item| {
            item["translatedText"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| localize_error!(translator, BACKEND, "响应缺少 translatedText 字段"))
        })
        .collect()
}

/// 解析 `data.languages[].language`
pub fn parse_languages(body: &Value) -> Result<Vec<String>> {
    let languages = body["data"]["languages"]
        .as_array()
        .ok_or_else(|| localize_error!(translator, BACKEND, "响应缺少 data.languages 数组"))?;

    Ok(languages
        .iter()
        .filter_map(|item| item["language"].as_str().map(str::to_string))
        .collect())
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn supported_languages(&self, base: &str) -> Result<Vec<String>> {
        let url = format!("{}/languages", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("target", base)]);

        let languages = parse_languages(&self.send(request).await?)?;
        debug!("Google支持 {} 种语言", languages.len());
        Ok(languages)
    }

    async fn translate(&self, target: &str, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let chunks: Vec<&[String]> = texts.chunks(GOOGLE_MAX_BATCH_SIZE).collect();
        info!("🌐 Google翻译: {} 项分为 {} 个分块 -> {}", texts.len(), chunks.len(), target);

        let tasks = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| self.translate_chunk(index, target, chunk));
        let results: Vec<String> = try_join_all(tasks).await?.into_iter().flatten().collect();

        if results.len() != texts.len() {
            return Err(localize_error!(
                translator,
                BACKEND,
                format!("译文数量不匹配: 期望 {}，实际 {}", texts.len(), results.len())
            ));
        }
        Ok(results)
    }
}
