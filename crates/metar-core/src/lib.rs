pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, DisplayConfig, RenderConfig, ValidationResult};
pub use error::{
    AppError, ConfigError, MetarApiError, NetworkError, RenderError, ReqwestErrorExt,
};

use anyhow::Result;

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("METAR Card core initialized");
    Ok(())
}
