use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::types::{CandelaError, Value};

// Epoch values with more digits than this are milliseconds.
const MAX_SECONDS_DIGITS: usize = 11;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

fn parse_epoch(s: &str) -> Option<Result<DateTime<Utc>, CandelaError>> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let parsed = s.parse::<i64>().ok().and_then(|v| {
        if digits.len() > MAX_SECONDS_DIGITS {
            DateTime::from_timestamp_millis(v)
        } else {
            DateTime::from_timestamp(v, 0)
        }
    });
    Some(parsed.ok_or_else(|| CandelaError::Data(format!("epoch timestamp out of range: {s}"))))
}

fn localize(
    naive: NaiveDateTime,
    tz: chrono_tz::Tz,
    raw: &str,
) -> Result<DateTime<Utc>, CandelaError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        // Fall-back overlap: take the earlier instant.
        LocalResult::Ambiguous(a, b) => Ok(a.min(b).with_timezone(&Utc)),
        LocalResult::None => Err(CandelaError::Data(format!(
            "local time {raw} does not exist in {}",
            tz.name()
        ))),
    }
}

/// Parse a vendor timestamp into UTC.
///
/// Accepted, in order: integer epoch seconds (or milliseconds when longer than
/// 11 digits); RFC 3339 and other offset-carrying forms; naive date-times and
/// bare dates, interpreted in `tz`.
///
/// # Errors
/// Returns `Data` if the text matches no accepted form, or names a local time
/// skipped by a DST transition.
pub fn parse_timestamp(raw: &str, tz: chrono_tz::Tz) -> Result<DateTime<Utc>, CandelaError> {
    let s = raw.trim();
    if let Some(res) = parse_epoch(s) {
        return res;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz, s);
        }
    }
    for fmt in DATE_FORMATS {
        if let Some(naive) = NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return localize(naive, tz, s);
        }
    }
    Err(CandelaError::Data(format!("could not parse timestamp: {raw:?}")))
}

/// Parse a decimal number, accepting scientific notation.
#[must_use]
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Infer an auxiliary cell value. Empty cells are missing.
#[must_use]
pub fn parse_value(s: &str) -> Option<Value> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if s.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Int(i));
    }
    if let Some(d) = parse_decimal(s) {
        return Some(Value::Number(d));
    }
    Some(Value::Text(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn epoch_seconds_and_millis() {
        let tz = chrono_tz::UTC;
        assert_eq!(parse_timestamp("1704101400", tz).unwrap(), utc("2024-01-01T09:30:00Z"));
        assert_eq!(parse_timestamp("1704101400000", tz).unwrap(), utc("2024-01-01T09:30:00Z"));
        assert_eq!(parse_timestamp("-60", tz).unwrap(), utc("1969-12-31T23:59:00Z"));
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        let tz = chrono_tz::UTC;
        assert_eq!(
            parse_timestamp("2024-01-01T09:30:00-05:00", tz).unwrap(),
            utc("2024-01-01T14:30:00Z")
        );
        assert_eq!(
            parse_timestamp("2024-01-01 09:30:00+01:00", tz).unwrap(),
            utc("2024-01-01T08:30:00Z")
        );
    }

    #[test]
    fn naive_times_use_source_zone() {
        let ny = chrono_tz::America::New_York;
        assert_eq!(
            parse_timestamp("2024-01-02 09:30:00", ny).unwrap(),
            utc("2024-01-02T14:30:00Z")
        );
        assert_eq!(parse_timestamp("2024-07-02 09:30", ny).unwrap(), utc("2024-07-02T13:30:00Z"));
        assert_eq!(
            parse_timestamp("2024/01/02", chrono_tz::UTC).unwrap(),
            utc("2024-01-02T00:00:00Z")
        );
    }

    #[test]
    fn dst_edges() {
        let ny = chrono_tz::America::New_York;
        // 2024-11-03 01:30 happens twice; the earlier (EDT) instant wins.
        assert_eq!(
            parse_timestamp("2024-11-03 01:30:00", ny).unwrap(),
            utc("2024-11-03T05:30:00Z")
        );
        // 2024-03-10 02:30 is skipped.
        assert!(matches!(
            parse_timestamp("2024-03-10 02:30:00", ny),
            Err(CandelaError::Data(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timestamp("yesterday", chrono_tz::UTC).is_err());
        assert!(parse_timestamp("", chrono_tz::UTC).is_err());
    }

    #[test]
    fn values_are_inferred() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("TRUE"), Some(Value::Bool(true)));
        assert_eq!(parse_value("42"), Some(Value::Int(42)));
        assert_eq!(parse_value("1.25"), Some(Value::Number(Decimal::new(125, 2))));
        assert_eq!(parse_value("FOMC"), Some(Value::Text("FOMC".into())));
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
    }
}
