use anyhow::{Context, Result};
use metar_decode::{CodeEntry, CodeMap, MetarTimeResolver, ReportFormatter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

const APP_DIR_NAME: &str = "metar";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// METAR API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// HTML rendering and screenshot settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Time display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Weather phenomenon descriptions, e.g. `BR` -> `雾`
    #[serde(default = "metar_decode::lookup::default_weather_entries")]
    pub weather_codes: Vec<CodeEntry>,

    /// Cloud coverage descriptions, e.g. `BKN` -> `多云`
    #[serde(default = "metar_decode::lookup::default_cloud_entries")]
    pub cloud_codes: Vec<CodeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the XFlySim API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.xflysim.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Chromium-compatible browser used for screenshots
    #[serde(default = "default_browser_path")]
    pub browser_path: String,

    /// Extra arguments passed before the screenshot flags, e.g. `--no-sandbox`
    #[serde(default)]
    pub browser_args: Vec<String>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Where report images are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_browser_path() -> String {
    "chromium".to_string()
}

fn default_viewport_width() -> u32 {
    1600
}

fn default_viewport_height() -> u32 {
    700
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join(APP_DIR_NAME)
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            browser_path: default_browser_path(),
            browser_args: Vec::new(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show the CST time on the host clock while UTC is shown in UTC
    #[serde(default = "default_mixed_timezone_display")]
    pub mixed_timezone_display: bool,
}

fn default_mixed_timezone_display() -> bool {
    metar_decode::LEGACY_MIXED_TIMEZONE_DISPLAY
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mixed_timezone_display: default_mixed_timezone_display(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            api: ApiConfig::default(),
            render: RenderConfig::default(),
            display: DisplayConfig::default(),
            weather_codes: metar_decode::lookup::default_weather_entries(),
            cloud_codes: metar_decode::lookup::default_cloud_entries(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!("No config at {}, writing defaults", config_path.display());
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.base_url, "api.base_url", &mut result);

        if self.api.timeout_secs == 0 {
            result.add_error("api.timeout_secs", "Timeout must be greater than 0");
        } else if self.api.timeout_secs > 120 {
            result.add_warning("api.timeout_secs", "Timeout is unusually long (>120s)");
        }

        if self.render.viewport_width == 0 {
            result.add_error("render.viewport_width", "Viewport width must be greater than 0");
        } else if self.render.viewport_width > 10000 {
            result.add_warning("render.viewport_width", "Viewport width is unusually large (>10000)");
        }

        if self.render.viewport_height == 0 {
            result.add_error("render.viewport_height", "Viewport height must be greater than 0");
        } else if self.render.viewport_height > 10000 {
            result.add_warning("render.viewport_height", "Viewport height is unusually large (>10000)");
        }

        if self.render.browser_path.trim().is_empty() {
            result.add_warning(
                "render.browser_path",
                "No browser configured - report images will be unavailable",
            );
        }

        Self::validate_codes(&self.weather_codes, "weather_codes", &mut result);
        Self::validate_codes(&self.cloud_codes, "cloud_codes", &mut result);

        result
    }

    /// Duplicates and blanks are accepted (last entry wins) but reported
    fn validate_codes(entries: &[CodeEntry], field_name: &str, result: &mut ValidationResult) {
        if entries.is_empty() {
            result.add_warning(field_name, "No codes configured - every code falls back");
        }

        let mut seen = HashSet::new();
        for entry in entries {
            if entry.code.is_empty() {
                result.add_warning(field_name, "Entry with an empty code");
            } else if !seen.insert(entry.code.as_str()) {
                result.add_warning(
                    field_name,
                    format!("Duplicate code {}: last entry wins", entry.code),
                );
            }
            if entry.description.is_empty() {
                result.add_warning(
                    field_name,
                    format!("Code {} has an empty description", entry.code),
                );
            }
        }
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    pub fn weather_map(&self) -> CodeMap {
        CodeMap::weather(self.weather_codes.iter().cloned())
    }

    pub fn cloud_map(&self) -> CodeMap {
        CodeMap::cloud(self.cloud_codes.iter().cloned())
    }

    /// Formatter wired with the configured tables and the host timezone
    pub fn report_formatter(&self) -> ReportFormatter {
        let time = MetarTimeResolver::host_local()
            .with_mixed_timezone_display(self.display.mixed_timezone_display);
        ReportFormatter::new(Arc::new(self.weather_map()), Arc::new(self.cloud_map()), time)
    }
}
