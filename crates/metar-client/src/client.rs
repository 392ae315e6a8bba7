//! XFlySim weather API client.

use metar_core::ApiConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::error::ClientError;
use crate::types::{MetarData, MetarResponse};

const WEATHER_PATH: [&str; 4] = ["pilot", "api", "realTimeMap", "weather"];
const USER_AGENT: &str = concat!("metar-card/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct MetarClient {
    client: Client,
    base_url: Url,
}

impl MetarClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(&api.base_url, Duration::from_secs(api.timeout_secs))
    }

    /// Endpoint for one airport, e.g. `.../pilot/api/realTimeMap/weather/ZSPD`.
    pub fn report_url(&self, icao: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(WEATHER_PATH)
            .push(icao);
        Ok(url)
    }

    /// Fetch the latest METAR for `icao`.
    ///
    /// Succeeds only when the envelope code is 20000 and a non-empty report
    /// is present.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, icao: &str) -> Result<MetarData, ClientError> {
        let url = self.report_url(icao)?;
        tracing::info!("Fetching METAR for {}", icao);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("METAR API responded with {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: MetarResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        if !envelope.is_success() {
            let message = envelope
                .message
                .unwrap_or_else(|| "无法获取 METAR 数据".to_string());
            tracing::warn!("METAR API returned code {}: {}", envelope.code, message);
            return Err(ClientError::Api {
                code: envelope.code,
                message,
            });
        }

        match envelope.data {
            Some(data) if data.metar.as_deref().is_some_and(|m| !m.trim().is_empty()) => {
                tracing::info!("Fetched METAR for {}", icao);
                Ok(data)
            }
            _ => Err(ClientError::MissingReport(icao.to_string())),
        }
    }
}
