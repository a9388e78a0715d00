use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecReportError {
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("事件流错误 (第 {line} 行): {message}")]
    EventError { line: usize, message: String },

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for SpecReportError {
    fn from(err: anyhow::Error) -> Self {
        SpecReportError::Other(err.to_string())
    }
}

/// Result type for specreport crate
pub type Result<T> = std::result::Result<T, SpecReportError>;
