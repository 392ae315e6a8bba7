//! Error types for METAR decoding.
//!
//! Neither error escapes `ReportFormatter::format`; both degrade to
//! placeholder text there. They are public so callers using the individual
//! components can react to them directly.

use thiserror::Error;

/// The embedded `DDHHMMZ` timestamp could not be found or used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid METAR time format: no DDHHMMZ token in {0:?}")]
    MissingTimeToken(String),

    #[error("Invalid METAR time format: {0}")]
    InvalidTimeToken(String),

    #[error("METAR time out of range: {0}")]
    OutOfRange(String),
}

/// The `metarDecode` payload could not be turned into decoded fields.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("metarDecode is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metarDecode is not a JSON object (got {0})")]
    NotAnObject(&'static str),
}
