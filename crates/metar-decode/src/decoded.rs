//! Decoded METAR fields as delivered by the upstream API.
//!
//! The payload has no schema guarantees: scalars arrive as strings or
//! numbers, `weather` may be a single code, a list or null. Everything is
//! optional and unrecognised scalars are treated as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Unit of the reported visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityUnit {
    Meter,
    Mile,
    #[default]
    #[serde(other)]
    Unknown,
}

impl VisibilityUnit {
    pub fn from_code(code: &str) -> Self {
        match code {
            "meter" => Self::Meter,
            "mile" => Self::Mile,
            _ => Self::Unknown,
        }
    }
}

/// One reported cloud layer. Height is in hundreds of feet, as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    #[serde(rename = "type")]
    pub kind: String,
    pub height: String,
}

impl CloudLayer {
    pub fn new(kind: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            height: height.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct DecodedFields {
    pub wind_dir: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_unit: Option<String>,
    pub visibility: Option<String>,
    pub visibility_unit: Option<VisibilityUnit>,
    pub temperature: Option<String>,
    pub dewpoint: Option<String>,
    pub qnh: Option<String>,
    pub qnh_unit: Option<String>,
    pub weather: Option<Vec<String>>,
    pub cloud: Option<Vec<CloudLayer>>,
    pub forecast: Option<String>,
}

impl DecodedFields {
    /// Parse the JSON-encoded `metarDecode` string.
    pub fn from_json_str(payload: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(payload)?;
        match value {
            Value::Object(map) => Ok(Self::from_object(&map)),
            other => Err(DecodeError::NotAnObject(json_kind(&other))),
        }
    }

    /// Best-effort parse: a missing, blank or broken payload yields all fields absent.
    pub fn from_payload(payload: Option<&str>) -> Self {
        let payload = match payload.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => {
                tracing::debug!("No metarDecode payload, using empty decoded fields");
                return Self::default();
            }
        };

        match Self::from_json_str(payload) {
            Ok(fields) => {
                tracing::debug!("Parsed metarDecode payload");
                fields
            }
            Err(e) => {
                tracing::warn!("Failed to parse metarDecode payload: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_object(map: &Map<String, Value>) -> Self {
        let text = |key: &str| map.get(key).and_then(scalar_text);

        Self {
            wind_dir: text("wind_dir"),
            wind_speed: text("wind_speed"),
            wind_unit: text("wind_unit"),
            visibility: text("visibility"),
            visibility_unit: text("visibility_unit").map(|u| VisibilityUnit::from_code(&u)),
            temperature: text("temperature"),
            dewpoint: text("dewpoint"),
            qnh: text("qnh"),
            qnh_unit: text("qnh_unit"),
            weather: map.get("weather").and_then(weather_codes),
            cloud: map.get("cloud").and_then(cloud_layers),
            forecast: text("forecast"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Value> for DecodedFields {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_object(&map),
            _ => Self::default(),
        }
    }
}

/// Strings and numbers become text; empty strings, null and containers are absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Every list element is kept in place so unreadable entries still resolve
/// as an unknown phenomenon; null and containers become `""`.
fn weather_codes(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().map(weather_code).collect()),
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

fn weather_code(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn cloud_layers(value: &Value) -> Option<Vec<CloudLayer>> {
    let items = value.as_array()?;
    let layers = items
        .iter()
        .filter_map(Value::as_object)
        .map(|layer| CloudLayer {
            kind: layer.get("type").and_then(scalar_text).unwrap_or_default(),
            height: layer.get("height").and_then(scalar_text).unwrap_or_default(),
        })
        .collect();
    Some(layers)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
