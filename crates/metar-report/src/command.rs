//! The `metar <icao>` command: fetch, format, render and capture one report.

use chrono::{DateTime, Local, Utc};
use metar_client::{MetarClient, MetarData};
use metar_core::{AppError, Config, ConfigError};
use metar_decode::{DisplayModel, ReportFormatter};
use std::path::PathBuf;
use tracing::instrument;

use crate::html::render_html;
use crate::screenshot::{HeadlessBrowser, Screenshotter};

pub const COMMAND_NAME: &str = "metar";
pub const COMMAND_ALIASES: [&str; 3] = ["weather", "气象", "metarinfo"];
pub const COMMAND_DESCRIPTION: &str = "查询指定 ICAO 机场的 METAR/SPECI 天气报告";
pub const COMMAND_USAGE: &str = "使用方法：metar <ICAO代码>";

pub const MISSING_ICAO_REPLY: &str = "请提供一个有效的 ICAO 代码。";
pub const PROGRESS_REPLY: &str = "稍等一会，小九正在获取中~";

/// One message sent back to the chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Image(PathBuf),
}

/// Whether `name` invokes the command, by name or alias.
pub fn matches_command(name: &str) -> bool {
    name == COMMAND_NAME || COMMAND_ALIASES.contains(&name)
}

pub struct MetarCommand<S = HeadlessBrowser> {
    client: MetarClient,
    formatter: ReportFormatter,
    screenshotter: S,
    output_dir: PathBuf,
}

impl MetarCommand<HeadlessBrowser> {
    /// Build the command from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(Self::new(
            MetarClient::from_config(&config.api)?,
            config.report_formatter(),
            HeadlessBrowser::from_config(&config.render),
            config.render.output_dir.clone(),
        ))
    }
}

impl<S: Screenshotter> MetarCommand<S> {
    pub fn new(
        client: MetarClient,
        formatter: ReportFormatter,
        screenshotter: S,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            formatter,
            screenshotter,
            output_dir,
        }
    }

    pub fn screenshotter(&self) -> &S {
        &self.screenshotter
    }

    /// Run the command for a user-supplied ICAO code.
    ///
    /// Always answers: failures become text replies, never errors. The
    /// progress reply goes out once the API has answered, so it also
    /// precedes an API rejection.
    #[instrument(skip(self), level = "info")]
    pub async fn run(&self, icao: Option<&str>) -> Vec<Reply> {
        let Some(icao) = icao.map(str::trim).filter(|s| !s.is_empty()) else {
            tracing::info!("metar invoked without an ICAO code");
            return vec![Reply::Text(MISSING_ICAO_REPLY.to_string())];
        };
        let icao = icao.to_uppercase();

        let data = match self.client.fetch(&icao).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to fetch METAR for {}: {}", icao, e);
                let mut replies = Vec::new();
                if e.is_rejected_reply() {
                    replies.push(Reply::Text(PROGRESS_REPLY.to_string()));
                }
                let err: AppError = e.into();
                replies.push(Reply::Text(err.user_message().to_string()));
                return replies;
            }
        };

        let mut replies = vec![Reply::Text(PROGRESS_REPLY.to_string())];
        let (_, html) = self.render_report(&data, Utc::now(), Local::now());
        let output = self.image_path(&icao, Utc::now());

        match self.screenshotter.capture(&html, &output).await {
            Ok(()) => {
                tracing::info!("METAR report for {} ready", icao);
                replies.push(Reply::Image(output));
            }
            Err(e) => {
                tracing::error!("Failed to capture METAR report for {}: {}", icao, e);
                let err: AppError = e.into();
                replies.push(Reply::Text(err.user_message().to_string()));
            }
        }

        replies
    }

    /// Format and render a fetched report. `now` anchors the METAR timestamp,
    /// `generated_at` is printed in the page footer.
    pub fn render_report(
        &self,
        data: &MetarData,
        now: DateTime<Utc>,
        generated_at: DateTime<Local>,
    ) -> (DisplayModel, String) {
        let decoded = data.decoded_fields();
        let model = self
            .formatter
            .format(&decoded, data.metar.as_deref(), data.icao.as_deref(), now);
        let html = render_html(&model, generated_at.naive_local());
        (model, html)
    }

    fn image_path(&self, icao: &str, now: DateTime<Utc>) -> PathBuf {
        let safe: String = icao
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.output_dir
            .join(format!("metar_{}_{}.png", safe, now.timestamp_millis()))
    }
}
