//! Observation time reconstruction.
//!
//! A METAR only carries day-of-month, hour and minute (`DDHHMMZ`). Month and
//! year are inferred from a reference "now": a day later than today's day
//! must belong to last month. There is no staleness window, so a report more
//! than a month old resolves to the wrong month without any error.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::FormatError;

/// Render the CST time from the host wall clock while the UTC time is
/// rendered in UTC. Kept switchable so the mismatch stays visible.
pub const LEGACY_MIXED_TIMEZONE_DISPLAY: bool = true;

/// Fixed CST display offset, subtracted from UTC. No DST.
pub const CST_OFFSET_HOURS: i64 = 8;

const CLOCK_FORMAT: &str = "%H:%M";

#[allow(clippy::expect_used)]
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{6}Z").expect("time token pattern is valid"));

/// Day, hour and minute as written in the report. Not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetarTimestamp {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl MetarTimestamp {
    /// Parse the first `DDHHMMZ` token found anywhere in `raw`.
    pub fn find(raw: &str) -> Result<Self, FormatError> {
        let token = TIME_TOKEN
            .find(raw)
            .ok_or_else(|| FormatError::MissingTimeToken(raw.to_string()))?
            .as_str();

        let field = |range: std::ops::Range<usize>| {
            token[range]
                .parse::<u32>()
                .map_err(|e| FormatError::InvalidTimeToken(format!("{}: {}", token, e)))
        };

        Ok(Self {
            day: field(0..2)?,
            hour: field(2..4)?,
            minute: field(4..6)?,
        })
    }

    /// Place the timestamp in the month it most likely belongs to.
    ///
    /// Components overflow like calendar arithmetic: day 31 of a 30-day
    /// month lands on the 1st of the next month, day 00 on the last day of
    /// the previous one.
    pub fn resolve(&self, reference_now: DateTime<Utc>) -> Result<DateTime<Utc>, FormatError> {
        let mut year = reference_now.year();
        let mut month0 = reference_now.month0();

        if self.day > reference_now.day() {
            if month0 == 0 {
                month0 = 11;
                year -= 1;
            } else {
                month0 -= 1;
            }
        }

        let month_start = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| FormatError::OutOfRange(format!("{}-{:02}", year, month0 + 1)))?;

        let offset = Duration::days(i64::from(self.day) - 1)
            + Duration::hours(i64::from(self.hour))
            + Duration::minutes(i64::from(self.minute));

        month_start
            .checked_add_signed(offset)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| FormatError::OutOfRange(format!("{:?}", self)))
    }
}

/// Full UTC instant of the report's observation time.
pub fn resolve_instant(raw: &str, reference_now: DateTime<Utc>) -> Result<DateTime<Utc>, FormatError> {
    MetarTimestamp::find(raw)?.resolve(reference_now)
}

/// Timezone used for host wall-clock rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostZone {
    Fixed(FixedOffset),
    /// The machine's local timezone, looked up at each rendered instant so
    /// DST transitions apply.
    Local,
}

impl HostZone {
    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Fixed(offset) => *offset,
            Self::Local => Local.offset_from_utc_datetime(&instant.naive_utc()),
        }
    }
}

/// Formats the observation time as `"UTC HH:MM / CST  HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetarTimeResolver {
    host_zone: HostZone,
    mixed_timezone_display: bool,
}

impl MetarTimeResolver {
    /// Resolver rendering host wall-clock times in `host_offset`.
    pub fn new(host_offset: FixedOffset) -> Self {
        Self::with_host_zone(HostZone::Fixed(host_offset))
    }

    /// Resolver following the machine's local timezone.
    pub fn host_local() -> Self {
        Self::with_host_zone(HostZone::Local)
    }

    pub fn with_host_zone(host_zone: HostZone) -> Self {
        Self {
            host_zone,
            mixed_timezone_display: LEGACY_MIXED_TIMEZONE_DISPLAY,
        }
    }

    pub fn with_mixed_timezone_display(mut self, enabled: bool) -> Self {
        self.mixed_timezone_display = enabled;
        self
    }

    pub fn host_zone(&self) -> HostZone {
        self.host_zone
    }

    pub fn mixed_timezone_display(&self) -> bool {
        self.mixed_timezone_display
    }

    pub fn resolve(&self, raw: &str, reference_now: DateTime<Utc>) -> Result<String, FormatError> {
        tracing::debug!("Formatting METAR time");
        let utc = resolve_instant(raw, reference_now)?;
        let cst = utc - Duration::hours(CST_OFFSET_HOURS);

        let cst_clock = if self.mixed_timezone_display {
            let offset = self.host_zone.offset_at(cst);
            cst.with_timezone(&offset).format(CLOCK_FORMAT).to_string()
        } else {
            cst.format(CLOCK_FORMAT).to_string()
        };

        Ok(format!(
            "UTC {} / CST  {}",
            utc.format(CLOCK_FORMAT),
            cst_clock
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::Timelike;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 6, 0, 0).unwrap()
    }

    fn utc_resolver() -> MetarTimeResolver {
        MetarTimeResolver::new(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_find_token() {
        let ts = MetarTimestamp::find("METAR KSFO 201230Z 28012KT 10SM").unwrap();
        assert_eq!(ts, MetarTimestamp { day: 20, hour: 12, minute: 30 });
    }

    #[test]
    fn test_find_first_token_only() {
        let ts = MetarTimestamp::find("ZBAA 010000Z 020000Z").unwrap();
        assert_eq!(ts.day, 1);
    }

    #[test]
    fn test_missing_token() {
        let err = MetarTimestamp::find("METAR KSFO CLR").unwrap_err();
        assert!(matches!(err, FormatError::MissingTimeToken(_)));
    }

    #[test]
    fn test_five_digits_is_not_a_token() {
        assert!(MetarTimestamp::find("KSFO 20123Z").is_err());
    }

    #[test]
    fn test_non_ascii_digits_are_not_a_token() {
        assert!(MetarTimestamp::find("KSFO ２０１２３０Z").is_err());
    }

    #[test]
    fn test_same_month_when_day_not_after_today() {
        let instant = resolve_instant("KSFO 201230Z", at(2024, 5, 25)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 20, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_same_day_is_current_month() {
        let instant = resolve_instant("KSFO 201230Z", at(2024, 5, 20)).unwrap();
        assert_eq!(instant.month(), 5);
    }

    #[test]
    fn test_previous_month_when_day_after_today() {
        let instant = resolve_instant("KSFO 201230Z", at(2024, 5, 15)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 4, 20, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_january_rolls_back_to_december() {
        let instant = resolve_instant("EGLL 312350Z", at(2025, 1, 2)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 12, 31, 23, 50, 0).unwrap());
    }

    #[test]
    fn test_day_past_month_end_overflows() {
        // 31 April does not exist; it lands on 1 May.
        let instant = resolve_instant("KJFK 310600Z", at(2024, 5, 15)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_day_zero_is_last_day_of_previous_month() {
        let instant = resolve_instant("KJFK 001200Z", at(2024, 3, 10)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_seconds_are_zero() {
        let instant = resolve_instant("KJFK 051234Z", at(2024, 3, 10)).unwrap();
        assert_eq!(instant.second(), 0);
    }

    #[test]
    fn test_resolve_string_with_utc_host() {
        let text = utc_resolver().resolve("KSFO 201230Z", at(2024, 5, 25)).unwrap();
        assert_eq!(text, "UTC 12:30 / CST  04:30");
    }

    #[test]
    fn test_cst_wraps_to_previous_day_clock() {
        let text = utc_resolver().resolve("KSFO 200300Z", at(2024, 5, 25)).unwrap();
        assert_eq!(text, "UTC 03:00 / CST  19:00");
    }

    #[test]
    fn test_mixed_display_uses_host_offset() {
        let resolver = MetarTimeResolver::new(FixedOffset::east_opt(8 * 3600).unwrap());
        assert!(resolver.mixed_timezone_display());
        let text = resolver.resolve("ZSPD 201230Z", at(2024, 5, 25)).unwrap();
        assert_eq!(text, "UTC 12:30 / CST  12:30");
    }

    #[test]
    fn test_fixed_display_ignores_host_offset() {
        let resolver = MetarTimeResolver::new(FixedOffset::east_opt(8 * 3600).unwrap())
            .with_mixed_timezone_display(false);
        let text = resolver.resolve("ZSPD 201230Z", at(2024, 5, 25)).unwrap();
        assert_eq!(text, "UTC 12:30 / CST  04:30");
    }

    #[test]
    fn test_local_zone_uses_offset_at_rendered_instant() {
        let cst = Utc.with_ymd_and_hms(2024, 5, 20, 4, 30, 0).unwrap();
        let expected = Local.offset_from_utc_datetime(&cst.naive_utc());
        assert_eq!(HostZone::Local.offset_at(cst), expected);

        let local = MetarTimeResolver::host_local();
        assert_eq!(local.host_zone(), HostZone::Local);
        assert_eq!(
            local.resolve("ZSPD 201230Z", at(2024, 5, 25)).unwrap(),
            MetarTimeResolver::new(expected)
                .resolve("ZSPD 201230Z", at(2024, 5, 25))
                .unwrap()
        );
    }

    #[test]
    fn test_fixed_zone_ignores_instant() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let zone = HostZone::Fixed(offset);
        assert_eq!(zone.offset_at(at(2024, 1, 15)), offset);
        assert_eq!(zone.offset_at(at(2024, 7, 15)), offset);
    }

    #[test]
    fn test_resolve_propagates_missing_token() {
        assert!(matches!(
            utc_resolver().resolve("METAR KSFO CLR", at(2024, 5, 25)),
            Err(FormatError::MissingTimeToken(_))
        ));
    }
}
