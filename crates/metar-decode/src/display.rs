//! Display-ready text for one report.

use serde::Serialize;

/// Values shown in the overview tiles. Missing data reads `N/A`, except wind
/// direction which reads as calm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTiles {
    pub wind_dir: String,
    pub wind_speed: String,
    pub temperature: String,
    pub visibility: String,
    pub visibility_unit: String,
    pub qnh: String,
}

/// Fully resolved report, ready for the HTML template. Missing data reads `未知`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub icao: String,
    pub summary: SummaryTiles,
    pub time: String,
    pub wind_dir: String,
    pub wind_speed: String,
    pub wind_unit: String,
    pub visibility: String,
    pub visibility_unit: String,
    pub weather: String,
    pub temperature: String,
    pub dewpoint: String,
    pub qnh: String,
    pub qnh_unit: String,
    pub clouds: String,
    pub forecast: String,
    pub remark: String,
    pub raw_metar: String,
}
