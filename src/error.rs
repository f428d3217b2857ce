//! 统一错误处理模块
//!
//! 提供文档本地化流程的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;
use std::io;
use std::path::Path;

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// 文档本地化统一错误类型
///
/// 每个变体都携带足够的定位信息（路径、文档、语言、键），
/// 使运维人员无需回查日志即可定位出问题的文件。
#[derive(Debug)]
pub enum LocalizeError {
    /// 文件或目录的读取、写入、创建、删除失败
    FileOperation {
        /// 出错的路径
        path: String,
        /// 操作类型（读取、写入、创建等）
        operation: String,
        /// 底层IO错误
        source: io::Error,
    },

    /// Markdown渲染结果为空或HTML无法解析
    MarkupParse {
        /// 文档名
        document: String,
        /// 具体错误信息
        details: String,
    },

    /// 字符串表JSON结构无效或为空
    TableParse {
        /// 字符串表文件路径
        path: String,
        /// 具体错误信息
        details: String,
    },

    /// 严格模式下的缺失翻译
    MissingTranslation {
        key: String,
        document: String,
        language: String,
    },

    /// 模板占位符无法在字符串表中解析
    TemplateResolution {
        key: String,
        document: String,
        language: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 输入验证错误
    InputValidation {
        /// 输入值
        input: String,
        /// 验证失败原因
        reason: String,
    },

    /// 翻译后端错误
    Translator {
        /// 后端名称
        backend: String,
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// 外部程序（git、pandoc）调用失败
    ExternalTool {
        /// 程序名称
        tool: String,
        /// 错误详情
        details: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        /// 包装的错误
        source: AnyhowError,
    },
}

impl fmt::Display for LocalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalizeError::FileOperation { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path, source)
            }
            LocalizeError::MarkupParse { document, details } => {
                write!(f, "文档解析失败 [{}]: {}", document, details)
            }
            LocalizeError::TableParse { path, details } => {
                write!(f, "字符串表解析失败 [{}]: {}", path, details)
            }
            LocalizeError::MissingTranslation { key, document, language } => {
                write!(
                    f,
                    "[strict] 缺失翻译: 键 {} (文档 {}, 语言 {})",
                    key, document, language
                )
            }
            LocalizeError::TemplateResolution { key, document, language } => {
                write!(
                    f,
                    "模板占位符无法解析: 键 {} (文档 {}, 语言 {})",
                    key, document, language
                )
            }
            LocalizeError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            LocalizeError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            }
            LocalizeError::Translator { backend, message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "翻译后端错误 [{}] [{}]: {}", backend, code, message)
                } else {
                    write!(f, "翻译后端错误 [{}]: {}", backend, message)
                }
            }
            LocalizeError::ExternalTool { tool, details } => {
                write!(f, "外部程序{}执行失败: {}", tool, details)
            }
            LocalizeError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for LocalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocalizeError::FileOperation { source, .. } => Some(source),
            LocalizeError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// 文档本地化结果类型别名
pub type Result<T> = std::result::Result<T, LocalizeError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! localize_error {
    (markup_parse, $doc:expr, $details:expr) => {
        $crate::error::LocalizeError::MarkupParse {
            document: $doc.to_string(),
            details: $details.to_string(),
        }
    };
    (table_parse, $path:expr, $details:expr) => {
        $crate::error::LocalizeError::TableParse {
            path: $path.to_string(),
            details: $details.to_string(),
        }
    };
    (missing, $key:expr, $doc:expr, $lang:expr) => {
        $crate::error::LocalizeError::MissingTranslation {
            key: $key.to_string(),
            document: $doc.to_string(),
            language: $lang.to_string(),
        }
    };
    (unresolved, $key:expr, $doc:expr, $lang:expr) => {
        $crate::error::LocalizeError::TemplateResolution {
            key: $key.to_string(),
            document: $doc.to_string(),
            language: $lang.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::LocalizeError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::LocalizeError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
    (translator, $backend:expr, $msg:expr) => {
        $crate::error::LocalizeError::Translator {
            backend: $backend.to_string(),
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (translator, $backend:expr, $msg:expr, $code:expr) => {
        $crate::error::LocalizeError::Translator {
            backend: $backend.to_string(),
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (tool, $tool:expr, $details:expr) => {
        $crate::error::LocalizeError::ExternalTool {
            tool: $tool.to_string(),
            details: $details.to_string(),
        }
    };
}

/// 为IO错误附加路径与操作类型
///
/// 用于`map_err`：`fs::read(&path).map_err(file_error(&path, "读取"))?`
pub fn file_error<'a>(path: &'a Path, operation: &'a str) -> impl FnOnce(io::Error) -> LocalizeError + 'a {
    move |source| LocalizeError::FileOperation {
        path: path.display().to_string(),
        operation: operation.to_string(),
        source,
    }
}

/// 从anyhow::Error转换为LocalizeError
impl From<AnyhowError> for LocalizeError {
    fn from(error: AnyhowError) -> Self {
        LocalizeError::Internal { source: error }
    }
}

/// 从std::io::Error转换为LocalizeError（无路径信息时使用）
impl From<io::Error> for LocalizeError {
    fn from(error: io::Error) -> Self {
        LocalizeError::FileOperation {
            path: "unknown".to_string(),
            operation: "io".to_string(),
            source: error,
        }
    }
}

/// 从reqwest::Error转换为LocalizeError
impl From<reqwest::Error> for LocalizeError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        LocalizeError::Translator {
            backend: "http".to_string(),
            message: error.to_string(),
            status_code,
        }
    }
}

impl From<serde_yaml::Error> for LocalizeError {
    fn from(error: serde_yaml::Error) -> Self {
        LocalizeError::Configuration {
            field: "yaml".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LocalizeError {
    fn from(error: serde_json::Error) -> Self {
        LocalizeError::TableParse {
            path: "unknown".to_string(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = LocalizeError::MissingTranslation {
            key: "key_02".to_string(),
            document: "guide".to_string(),
            language: "es".to_string(),
        };

        assert_eq!(
            format!("{}", err),
            "[strict] 缺失翻译: 键 key_02 (文档 guide, 语言 es)"
        );
    }

    #[test]
    fn test_error_macro() {
        let err = localize_error!(translator, "google", "quota exceeded", 429);
        match err {
            LocalizeError::Translator { backend, message, status_code } => {
                assert_eq!(backend, "google");
                assert_eq!(message, "quota exceeded");
                assert_eq!(status_code, Some(429));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_file_error_keeps_path_and_source() {
        let path = Path::new("docs/translations/es.guide.json");
        let err = file_error(path, "读取")(io::Error::new(io::ErrorKind::NotFound, "gone"));

        assert!(err.to_string().contains("docs/translations/es.guide.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_anyhow_conversion() {
        let anyhow_err = anyhow::anyhow!("Test anyhow error");
        let converted: LocalizeError = anyhow_err.into();

        match converted {
            LocalizeError::Internal { .. } => {
                // Test passes
            }
            _ => panic!("Wrong error type"),
        }
    }
}
