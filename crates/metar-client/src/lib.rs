//! METAR API client for METAR Card
//!
//! Fetches raw and decoded METAR reports from the XFlySim real-time map API.

pub mod client;
pub mod error;
pub mod types;

pub use client::MetarClient;
pub use error::ClientError;
pub use types::{MetarData, MetarResponse, SUCCESS_CODE};
