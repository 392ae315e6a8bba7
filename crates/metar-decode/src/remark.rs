//! Remark (`RMK`) section of a raw report.

/// Returned when a report has no `RMK` section.
pub const NO_REMARK: &str = "无 RMK 信息";

const REMARK_MARKER: &str = "RMK";

/// Free text following the first `RMK` marker, trimmed.
///
/// Only a missing marker yields [`NO_REMARK`]; a marker with nothing after
/// it yields an empty string.
pub fn extract_remark(raw: &str) -> String {
    match raw.find(REMARK_MARKER) {
        Some(idx) => {
            let remark = raw[idx + REMARK_MARKER.len()..].trim();
            tracing::debug!("Extracted RMK: {}", remark);
            remark.to_string()
        }
        None => {
            tracing::debug!("No RMK section found");
            NO_REMARK.to_string()
        }
    }
}
