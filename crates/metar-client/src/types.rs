use metar_decode::DecodedFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `code` value the API uses for a successful lookup.
pub const SUCCESS_CODE: i64 = 20000;

/// Response envelope of the weather endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetarResponse {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<MetarData>,
}

impl MetarResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Report payload. Keys other than the three known ones are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetarData {
    #[serde(default)]
    pub metar: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default, rename = "metarDecode")]
    pub metar_decode: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetarData {
    /// Decoded fields for the report; never fails.
    ///
    /// `metarDecode` is normally a JSON-encoded string. An inline object is
    /// accepted too. When it is missing or blank the payload's own keys are
    /// read as the decoded fields.
    pub fn decoded_fields(&self) -> DecodedFields {
        match &self.metar_decode {
            Some(Value::String(payload)) if payload.trim().is_empty() => {
                DecodedFields::from_object(&self.extra)
            }
            Some(Value::String(payload)) => DecodedFields::from_payload(Some(payload.as_str())),
            Some(Value::Object(map)) => DecodedFields::from_object(map),
            None | Some(Value::Null) => DecodedFields::from_object(&self.extra),
            Some(other) => {
                tracing::warn!("Ignoring metarDecode of unexpected type: {}", other);
                DecodedFields::default()
            }
        }
    }
}
