//! 覆盖规则模块
//!
//! 对已翻译文本执行按语言限定的字面替换。规则来自项目中的YAML文件，
//! 每条规则形如 `{ title, language, original, replacement }`。

// 标准库导入
use std::fs;
use std::path::Path;

// 第三方crate导入
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// 本地模块导入
use crate::error::{file_error, Result};

/// 一条覆盖规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// 仅供人阅读的说明
    #[serde(default)]
    pub title: String,
    pub language: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub replacement: String,
}

impl Override {
    pub fn new(title: &str, language: &str, original: &str, replacement: &str) -> Self {
        Self {
            title: title.to_string(),
            language: language.to_string(),
            original: original.to_string(),
            replacement: replacement.to_string(),
        }
    }

    fn is_applicable(&self) -> bool {
        !self.original.is_empty() && !self.replacement.is_empty()
    }
}

/// 读取覆盖规则文件，文件不存在时返回空列表
pub fn read_override_file(path: &Path) -> Result<Vec<Override>> {
    if !path.exists() {
        debug!("覆盖规则文件不存在，跳过: {}", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(file_error(path, "读取"))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let overrides: Vec<Override> = serde_yaml::from_str(&content)?;
    debug!("已加载 {} 条覆盖规则: {}", overrides.len(), path.display());
    Ok(overrides)
}

/// 写入覆盖规则文件
pub fn write_override_file(path: &Path, overrides: &[Override]) -> Result<()> {
    let yaml = serde_yaml::to_string(overrides)?;
    fs::write(path, yaml).map_err(file_error(path, "写入"))
}

/// 按列表顺序应用语言匹配的覆盖规则
///
/// `original` 或 `replacement` 为空的规则会被跳过并记录警告。
pub fn apply_overrides(text: &str, language: &str, overrides: &[Override]) -> String {
    let mut result = text.to_string();

    for rule in overrides.iter().filter(|rule| rule.language == language) {
        if !rule.is_applicable() {
            warn!("⚠️  跳过无效覆盖规则 \"{}\" ({}): 原文或替换文本为空", rule.title, rule.language);
            continue;
        }
        if result.contains(&rule.original) {
            debug!("应用覆盖规则 \"{}\": {:?} -> {:?}", rule.title, rule.original, rule.replacement);
            result = result.replace(&rule.original, &rule.replacement);
        }
    }

    result
}
