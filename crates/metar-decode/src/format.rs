//! Report formatting: turns decoded fields and the raw METAR into a
//! [`DisplayModel`].
//!
//! Formatting never fails. Every missing or unusable field degrades to a
//! placeholder so a partial report still renders.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::decoded::{CloudLayer, DecodedFields, VisibilityUnit};
use crate::display::{DisplayModel, SummaryTiles};
use crate::lookup::CodeMap;
use crate::remark::extract_remark;
use crate::time::MetarTimeResolver;

/// Placeholder for detail lines.
pub const UNKNOWN: &str = "未知";
/// Placeholder for summary tiles.
pub const NOT_AVAILABLE: &str = "N/A";
/// Wind direction tile when no direction is reported.
pub const CALM_WIND: &str = "地面静风";
pub const NO_SIGNIFICANT_CLOUD: &str = "无特别云层（NSC）";
pub const NO_SIGNIFICANT_CHANGE: &str = "无显著变化";
pub const CLOUD_LAYER_SEPARATOR: &str = "，";

/// Display label for a visibility unit. Absent and unrecognised units read `未知`.
pub fn visibility_unit_label(unit: Option<VisibilityUnit>) -> &'static str {
    match unit {
        Some(VisibilityUnit::Meter) => "米",
        Some(VisibilityUnit::Mile) => "英里",
        Some(VisibilityUnit::Unknown) | None => UNKNOWN,
    }
}

fn or_placeholder(value: Option<&String>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), Clone::clone)
}

#[derive(Debug, Clone)]
pub struct ReportFormatter {
    weather: Arc<CodeMap>,
    cloud: Arc<CodeMap>,
    time: MetarTimeResolver,
}

impl ReportFormatter {
    pub fn new(weather: Arc<CodeMap>, cloud: Arc<CodeMap>, time: MetarTimeResolver) -> Self {
        Self {
            weather,
            cloud,
            time,
        }
    }

    /// Build the display model for one report.
    ///
    /// `now` anchors the month/year of the METAR timestamp; identical inputs
    /// always produce an identical model.
    pub fn format(
        &self,
        decoded: &DecodedFields,
        raw_metar: Option<&str>,
        icao: Option<&str>,
        now: DateTime<Utc>,
    ) -> DisplayModel {
        tracing::debug!("Formatting METAR report for {:?}", icao);
        let visibility_unit = visibility_unit_label(decoded.visibility_unit).to_string();
        let raw = raw_metar.filter(|s| !s.is_empty());

        DisplayModel {
            icao: icao.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN).to_string(),
            summary: SummaryTiles {
                wind_dir: or_placeholder(decoded.wind_dir.as_ref(), CALM_WIND),
                wind_speed: or_placeholder(decoded.wind_speed.as_ref(), NOT_AVAILABLE),
                temperature: or_placeholder(decoded.temperature.as_ref(), NOT_AVAILABLE),
                visibility: or_placeholder(decoded.visibility.as_ref(), NOT_AVAILABLE),
                visibility_unit: visibility_unit.clone(),
                qnh: or_placeholder(decoded.qnh.as_ref(), NOT_AVAILABLE),
            },
            time: self.format_time(raw, now),
            wind_dir: or_placeholder(decoded.wind_dir.as_ref(), UNKNOWN),
            wind_speed: or_placeholder(decoded.wind_speed.as_ref(), UNKNOWN),
            wind_unit: or_placeholder(decoded.wind_unit.as_ref(), UNKNOWN),
            visibility: or_placeholder(decoded.visibility.as_ref(), UNKNOWN),
            visibility_unit,
            weather: self.weather.resolve_many(decoded.weather.as_deref()),
            temperature: or_placeholder(decoded.temperature.as_ref(), UNKNOWN),
            dewpoint: or_placeholder(decoded.dewpoint.as_ref(), UNKNOWN),
            qnh: or_placeholder(decoded.qnh.as_ref(), UNKNOWN),
            qnh_unit: or_placeholder(decoded.qnh_unit.as_ref(), UNKNOWN),
            clouds: self.format_clouds(decoded.cloud.as_deref()),
            forecast: or_placeholder(decoded.forecast.as_ref(), NO_SIGNIFICANT_CHANGE),
            remark: extract_remark(raw.unwrap_or_default()),
            raw_metar: raw.unwrap_or(UNKNOWN).to_string(),
        }
    }

    /// Observation time, or `未知` when there is no report or no usable time token.
    pub fn format_time(&self, raw_metar: Option<&str>, now: DateTime<Utc>) -> String {
        let Some(raw) = raw_metar.filter(|s| !s.is_empty()) else {
            return UNKNOWN.to_string();
        };

        match self.time.resolve(raw, now) {
            Ok(time) => time,
            Err(e) => {
                tracing::warn!("Could not resolve METAR time: {}", e);
                UNKNOWN.to_string()
            }
        }
    }

    /// One `"{coverage} 云层高度 {height} 00英尺"` entry per layer, joined with `，`.
    pub fn format_clouds(&self, layers: Option<&[CloudLayer]>) -> String {
        let layers = match layers {
            Some(layers) if !layers.is_empty() => layers,
            _ => return NO_SIGNIFICANT_CLOUD.to_string(),
        };

        layers
            .iter()
            .map(|layer| {
                tracing::debug!("Cloud layer: {}, height: {}", layer.kind, layer.height);
                format!("{} 云层高度 {} 00英尺", self.cloud.resolve(&layer.kind), layer.height)
            })
            .collect::<Vec<_>>()
            .join(CLOUD_LAYER_SEPARATOR)
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(
            Arc::new(CodeMap::default_weather()),
            Arc::new(CodeMap::default_cloud()),
            MetarTimeResolver::host_local(),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::lookup::FINE_WEATHER;
    use crate::remark::NO_REMARK;
    use chrono::{FixedOffset, TimeZone};

    const KSFO: &str = "METAR KSFO 201256Z 28012KT 10SM BKN040 17/12 A2990 RMK AO2 SLP132";

    fn formatter() -> ReportFormatter {
        ReportFormatter::new(
            Arc::new(CodeMap::default_weather()),
            Arc::new(CodeMap::default_cloud()),
            MetarTimeResolver::new(FixedOffset::east_opt(0).unwrap()),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 25, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_visibility_unit_labels() {
        assert_eq!(visibility_unit_label(Some(VisibilityUnit::Meter)), "米");
        assert_eq!(visibility_unit_label(Some(VisibilityUnit::Mile)), "英里");
        assert_eq!(visibility_unit_label(Some(VisibilityUnit::Unknown)), UNKNOWN);
        assert_eq!(visibility_unit_label(None), UNKNOWN);
    }

    #[test]
    fn test_single_cloud_layer() {
        let layers = [CloudLayer::new("BKN", "040")];
        assert_eq!(formatter().format_clouds(Some(&layers)), "多云 云层高度 040 00英尺");
    }

    #[test]
    fn test_multiple_cloud_layers_joined() {
        let layers = [CloudLayer::new("FEW", "008"), CloudLayer::new("VV", "002")];
        assert_eq!(
            formatter().format_clouds(Some(&layers)),
            "少云 云层高度 008 00英尺，VV 云层高度 002 00英尺"
        );
    }

    #[test]
    fn test_no_clouds() {
        assert_eq!(formatter().format_clouds(None), NO_SIGNIFICANT_CLOUD);
        assert_eq!(formatter().format_clouds(Some(&[])), NO_SIGNIFICANT_CLOUD);
    }

    #[test]
    fn test_format_time_placeholders() {
        let f = formatter();
        assert_eq!(f.format_time(None, now()), UNKNOWN);
        assert_eq!(f.format_time(Some(""), now()), UNKNOWN);
        assert_eq!(f.format_time(Some("METAR KSFO CLR"), now()), UNKNOWN);
    }

    #[test]
    fn test_full_report() {
        let decoded = DecodedFields {
            wind_dir: Some("280".into()),
            wind_speed: Some("6".into()),
            wind_unit: Some("mps".into()),
            visibility: Some("16".into()),
            visibility_unit: Some(VisibilityUnit::Mile),
            temperature: Some("17".into()),
            dewpoint: Some("12".into()),
            qnh: Some("1012".into()),
            qnh_unit: Some("hPa".into()),
            weather: Some(vec!["BR".into()]),
            cloud: Some(vec![CloudLayer::new("BKN", "040")]),
            forecast: Some("NOSIG".into()),
        };

        let model = formatter().format(&decoded, Some(KSFO), Some("KSFO"), now());
        assert_eq!(model.icao, "KSFO");
        assert_eq!(model.time, "UTC 12:56 / CST  04:56");
        assert_eq!(model.summary.wind_dir, "280");
        assert_eq!(model.summary.visibility_unit, "英里");
        assert_eq!(model.weather, "雾");
        assert_eq!(model.clouds, "多云 云层高度 040 00英尺");
        assert_eq!(model.forecast, "NOSIG");
        assert_eq!(model.remark, "AO2 SLP132");
        assert_eq!(model.raw_metar, KSFO);
    }

    #[test]
    fn test_empty_report_uses_placeholders() {
        let model = formatter().format(&DecodedFields::default(), None, None, now());
        assert_eq!(model.icao, UNKNOWN);
        assert_eq!(model.time, UNKNOWN);
        assert_eq!(model.summary.wind_dir, CALM_WIND);
        assert_eq!(model.summary.wind_speed, NOT_AVAILABLE);
        assert_eq!(model.summary.temperature, NOT_AVAILABLE);
        assert_eq!(model.summary.visibility, NOT_AVAILABLE);
        assert_eq!(model.summary.qnh, NOT_AVAILABLE);
        assert_eq!(model.wind_dir, UNKNOWN);
        assert_eq!(model.wind_speed, UNKNOWN);
        assert_eq!(model.wind_unit, UNKNOWN);
        assert_eq!(model.temperature, UNKNOWN);
        assert_eq!(model.dewpoint, UNKNOWN);
        assert_eq!(model.qnh, UNKNOWN);
        assert_eq!(model.qnh_unit, UNKNOWN);
        assert_eq!(model.visibility_unit, UNKNOWN);
        assert_eq!(model.weather, FINE_WEATHER);
        assert_eq!(model.clouds, NO_SIGNIFICANT_CLOUD);
        assert_eq!(model.forecast, NO_SIGNIFICANT_CHANGE);
        assert_eq!(model.remark, NO_REMARK);
        assert_eq!(model.raw_metar, UNKNOWN);
    }

    #[test]
    fn test_malformed_time_does_not_abort() {
        let model = formatter().format(
            &DecodedFields::default(),
            Some("METAR ZBAA CAVOK RMK"),
            Some("ZBAA"),
            now(),
        );
        assert_eq!(model.time, UNKNOWN);
        assert_eq!(model.remark, "");
        assert_eq!(model.raw_metar, "METAR ZBAA CAVOK RMK");
    }

    #[test]
    fn test_format_is_idempotent() {
        let decoded = DecodedFields::from_payload(Some(
            r#"{"weather": ["TS", "RA"], "cloud": [{"type": "SCT", "height": "030"}]}"#,
        ));
        let f = formatter();
        let first = f.format(&decoded, Some(KSFO), Some("KSFO"), now());
        let second = f.format(&decoded, Some(KSFO), Some("KSFO"), now());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
