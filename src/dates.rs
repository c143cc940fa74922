//! Date normalization across store representations
//!
//! The record store may hand dates back as native timestamps (document-style
//! backends), as ISO date strings, as display strings typed into the editor,
//! or as nothing at all. All core logic works on one canonical type,
//! [`DateValue`], and every store/UI boundary funnels through the conversions
//! here. Both directions are total: unparseable input becomes
//! [`DateValue::Missing`], never an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Display pattern used by the records table: day/month/year
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// A date as a backend may hand it back, before normalization.
///
/// Untagged: deserialization tries the variants in order, so an RFC 3339
/// timestamp becomes `Timestamp`, a plain `YYYY-MM-DD` string becomes `Date`,
/// any other string falls through to `Text`, and JSON `null` becomes `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Text(String),
    Null,
}

impl From<DateValue> for RawDate {
    fn from(value: DateValue) -> Self {
        match value {
            DateValue::Canonical(d) => RawDate::Date(d),
            DateValue::Missing => RawDate::Null,
        }
    }
}

/// The single canonical in-memory date representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Canonical(NaiveDate),
    Missing,
}

impl DateValue {
    /// The calendar date, if present
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            DateValue::Canonical(d) => Some(d),
            DateValue::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, DateValue::Missing)
    }
}

impl From<Option<NaiveDate>> for DateValue {
    fn from(value: Option<NaiveDate>) -> Self {
        match value {
            Some(d) => DateValue::Canonical(d),
            None => DateValue::Missing,
        }
    }
}

/// Convert any store-side representation to the canonical form.
///
/// Already-canonical values pass through unchanged. A display string is parsed
/// strictly as day/month/year; anything else yields `Missing`. Timestamps keep
/// only the calendar date.
pub fn to_storage(raw: &RawDate) -> DateValue {
    match raw {
        RawDate::Timestamp(ts) => DateValue::Canonical(ts.date_naive()),
        RawDate::Date(d) => DateValue::Canonical(*d),
        RawDate::Text(s) => parse_display(s),
        RawDate::Null => DateValue::Missing,
    }
}

/// Format a canonical date for the records table; `Missing` maps to ""
pub fn to_display(value: DateValue) -> String {
    match value {
        DateValue::Canonical(d) => d.format(DISPLAY_FORMAT).to_string(),
        DateValue::Missing => String::new(),
    }
}

/// Parse a display-form string (`DD/MM/YYYY`); empty or malformed input is `Missing`
pub fn parse_display(s: &str) -> DateValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return DateValue::Missing;
    }
    match NaiveDate::parse_from_str(trimmed, DISPLAY_FORMAT) {
        Ok(d) => DateValue::Canonical(d),
        Err(_) => DateValue::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_string_parses_day_month_year() {
        assert_eq!(
            to_storage(&RawDate::Text("05/03/2025".to_string())),
            DateValue::Canonical(date(2025, 3, 5))
        );
    }

    #[test]
    fn test_unparseable_text_is_missing() {
        for s in ["2025-03-05", "03-05-2025", "5 March 2025", "garbage", "32/01/2025"] {
            assert_eq!(to_storage(&RawDate::Text(s.to_string())), DateValue::Missing);
        }
    }

    #[test]
    fn test_null_is_missing() {
        assert_eq!(to_storage(&RawDate::Null), DateValue::Missing);
    }

    #[test]
    fn test_timestamp_keeps_calendar_date() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 10, 23, 59, 0).unwrap();
        assert_eq!(
            to_storage(&RawDate::Timestamp(ts)),
            DateValue::Canonical(date(2025, 1, 10))
        );
    }

    #[test]
    fn test_canonical_passes_through() {
        let raw = RawDate::Date(date(2025, 6, 1));
        assert_eq!(to_storage(&raw), DateValue::Canonical(date(2025, 6, 1)));
    }

    #[test]
    fn test_round_trip_display() {
        for s in ["05/03/2025", "31/12/1999", "01/01/2030"] {
            let canonical = parse_display(s);
            assert_eq!(to_display(canonical), s);
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = to_storage(&RawDate::Text("14/07/2024".to_string()));
        let twice = to_storage(&RawDate::from(once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_displays_as_empty() {
        assert_eq!(to_display(DateValue::Missing), "");
        assert_eq!(parse_display(""), DateValue::Missing);
        assert_eq!(parse_display("   "), DateValue::Missing);
    }

    #[test]
    fn test_raw_date_deserializes_all_shapes() {
        let ts: RawDate = serde_json::from_str("\"2025-01-10T08:30:00Z\"").unwrap();
        assert!(matches!(ts, RawDate::Timestamp(_)));

        let iso: RawDate = serde_json::from_str("\"2025-01-10\"").unwrap();
        assert_eq!(iso, RawDate::Date(date(2025, 1, 10)));

        let text: RawDate = serde_json::from_str("\"10/01/2025\"").unwrap();
        assert_eq!(text, RawDate::Text("10/01/2025".to_string()));

        let null: RawDate = serde_json::from_str("null").unwrap();
        assert_eq!(null, RawDate::Null);
    }
}
