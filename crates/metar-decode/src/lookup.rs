//! Code tables for weather phenomena and cloud coverage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Returned for weather codes missing from the table.
pub const UNKNOWN_WEATHER: &str = "未知天气现象";

/// Returned when a report carries no weather phenomena at all.
pub const FINE_WEATHER: &str = "晴天";

/// Separator between resolved weather phenomena.
pub const WEATHER_SEPARATOR: &str = ", ";

/// One configurable `{code, description}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    pub description: String,
}

impl CodeEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// What a lookup yields for a code that is not in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A fixed description, e.g. "unknown phenomenon".
    Fixed(String),
    /// The code itself, displayed verbatim.
    Verbatim,
}

/// Read-only mapping from short METAR codes to descriptions.
#[derive(Debug, Clone)]
pub struct CodeMap {
    entries: HashMap<String, String>,
    fallback: Fallback,
}

impl CodeMap {
    /// Build a table from ordered entries. A duplicated code keeps its last description.
    pub fn new(entries: impl IntoIterator<Item = CodeEntry>, fallback: Fallback) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (e.code, e.description))
            .collect();
        Self { entries, fallback }
    }

    /// Weather phenomenon table; unknown codes become [`UNKNOWN_WEATHER`].
    pub fn weather(entries: impl IntoIterator<Item = CodeEntry>) -> Self {
        Self::new(entries, Fallback::Fixed(UNKNOWN_WEATHER.to_string()))
    }

    /// Cloud coverage table; unknown codes are shown as-is.
    pub fn cloud(entries: impl IntoIterator<Item = CodeEntry>) -> Self {
        Self::new(entries, Fallback::Verbatim)
    }

    pub fn default_weather() -> Self {
        Self::weather(default_weather_entries())
    }

    pub fn default_cloud() -> Self {
        Self::cloud(default_cloud_entries())
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describe a single code, falling back per the table's policy.
    pub fn resolve(&self, code: &str) -> String {
        match self.get(code) {
            Some(description) => description.to_string(),
            None => match &self.fallback {
                Fallback::Fixed(text) => text.clone(),
                Fallback::Verbatim => code.to_string(),
            },
        }
    }

    /// Describe a sequence of codes in order, joined with `", "`.
    ///
    /// `None` and an empty slice both mean "no weather", which is reported as
    /// [`FINE_WEATHER`] rather than the unknown fallback.
    pub fn resolve_many(&self, codes: Option<&[String]>) -> String {
        let codes = match codes {
            Some(codes) if !codes.is_empty() => codes,
            _ => {
                tracing::debug!("No weather phenomena, reporting fine weather");
                return FINE_WEATHER.to_string();
            }
        };

        let resolved = codes
            .iter()
            .map(|code| self.resolve(code))
            .collect::<Vec<_>>()
            .join(WEATHER_SEPARATOR);
        tracing::debug!("Resolved weather phenomena: {}", resolved);
        resolved
    }
}

/// Built-in weather phenomenon descriptions.
pub fn default_weather_entries() -> Vec<CodeEntry> {
    [
        ("BR", "雾"),
        ("FG", "雾或薄雾"),
        ("HZ", "霾"),
        ("FU", "烟雾"),
        ("VA", "火山灰"),
        ("DU", "沙尘"),
        ("SA", "沙"),
        ("SS", "尘暴"),
        ("DS", "风沙"),
        ("SG", "雪粒"),
        ("IC", "冰晶"),
        ("PL", "霰"),
        ("GR", "冰雹"),
        ("GS", "小冰雹"),
        ("UP", "未知降水或降水类型"),
        ("RA", "雨"),
        ("DZ", "毛毛雨"),
        ("SN", "雪"),
        ("SQ", "飑线"),
        ("FC", "风暴"),
        ("TS", "雷暴"),
        ("MI", "微型沙尘暴"),
        ("PR", "部分地区"),
        ("BC", "局部"),
        ("DR", "吹动的尘土或雪花"),
        ("BL", "风暴"),
        ("SH", "阵性降水"),
        ("+", "大"),
        ("-", "小"),
    ]
    .into_iter()
    .map(|(code, description)| CodeEntry::new(code, description))
    .collect()
}

/// Built-in cloud coverage descriptions.
pub fn default_cloud_entries() -> Vec<CodeEntry> {
    [
        ("FEW", "少云"),
        ("SCT", "疏云"),
        ("BKN", "多云"),
        ("OVC", "满天云"),
        ("NSC", "无显著云层"),
        ("SKC", "晴空"),
        ("CLR", "晴朗"),
    ]
    .into_iter()
    .map(|(code, description)| CodeEntry::new(code, description))
    .collect()
}
