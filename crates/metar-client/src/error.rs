//! METAR API client errors.

use metar_core::{AppError, MetarApiError, NetworkError, ReqwestErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("No METAR returned for {0}")]
    MissingReport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Whether the server answered with a 2xx response whose content was
    /// then rejected.
    pub fn is_rejected_reply(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::MissingReport(_) | Self::InvalidResponse(_)
        )
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => AppError::Network(e.into_network_error()),
            ClientError::Http { status, body } => AppError::Network(NetworkError::ServerError {
                status,
                message: body,
            }),
            ClientError::InvalidResponse(msg) => {
                AppError::Network(NetworkError::InvalidResponse(msg))
            }
            ClientError::Api { code, message } => {
                AppError::Metar(MetarApiError::Rejected { code, message })
            }
            ClientError::MissingReport(icao) => AppError::Metar(MetarApiError::MissingReport(icao)),
            ClientError::InvalidBaseUrl(url) => {
                AppError::Config(metar_core::ConfigError::Invalid(format!("api.base_url: {}", url)))
            }
        }
    }
}
