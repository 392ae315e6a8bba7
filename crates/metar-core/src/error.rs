//! Centralized error types for METAR Card.
//!
//! Every failure that reaches the chat front end is turned into one of these
//! and answered with `user_message()`. Decoding problems never get here:
//! they degrade to placeholders inside the report.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("METAR API error: {0}")]
    Metar(#[from] MetarApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns the reply sent back to the chat user.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Metar(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Render(e) => e.user_message(),
            AppError::Io(_) | AppError::Other(_) => "出现意外错误，请稍后再试。",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        MetarApiError::USER_MESSAGE
    }
}

/// Errors reported by the METAR API itself.
#[derive(Debug, Error)]
pub enum MetarApiError {
    #[error("API returned code {code}: {message}")]
    Rejected { code: i64, message: String },

    #[error("No METAR in response for {0}")]
    MissingReport(String),
}

impl MetarApiError {
    pub const USER_MESSAGE: &'static str = "无法获取 METAR 数据，请稍后再试。";

    pub fn user_message(&self) -> &'static str {
        Self::USER_MESSAGE
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "配置无效，请检查设置。",
        }
    }
}

/// HTML rendering and screenshot errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Browser could not be started ({browser}): {message}")]
    BrowserUnavailable { browser: String, message: String },

    #[error("Screenshot failed: {0}")]
    CaptureFailed(String),
}

impl RenderError {
    pub const USER_MESSAGE: &'static str = "生成 METAR 截图失败，请稍后再试。";

    pub fn user_message(&self) -> &'static str {
        Self::USER_MESSAGE
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = NetworkError::Timeout.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_fetch_failures_share_reply() {
        let network = AppError::Network(NetworkError::ConnectionFailed("refused".into()));
        let api = AppError::Metar(MetarApiError::Rejected {
            code: 50000,
            message: "机场不存在".into(),
        });
        assert_eq!(network.user_message(), "无法获取 METAR 数据，请稍后再试。");
        assert_eq!(api.user_message(), network.user_message());
    }

    #[test]
    fn test_render_failure_reply() {
        let err = AppError::Render(RenderError::CaptureFailed("exit 1".into()));
        assert_eq!(err.user_message(), "生成 METAR 截图失败，请稍后再试。");
    }

    #[test]
    fn test_rejected_display_includes_code() {
        let err = MetarApiError::Rejected {
            code: 40400,
            message: "not found".into(),
        };
        assert!(err.to_string().contains("40400"));
    }
}
