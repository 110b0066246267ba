//! Calendar and session metadata columns.

use chrono::{Datelike, Weekday};

use crate::types::{Bar, BarSeries, Calendar, CandelaError, Value};

/// Names of the columns appended by [`enrich`], in order.
pub const ENRICH_COLUMNS: [&str; 6] = [
    "session",
    "day_of_week",
    "weekday_name",
    "week_of_month",
    "month",
    "is_event_day",
];

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn row_metadata(bar: &Bar, calendar: &Calendar) -> [Option<Value>; ENRICH_COLUMNS.len()] {
    let local = bar.ts.with_timezone(&calendar.timezone);
    let date = local.date_naive();
    let session = calendar.session_label(local.time());
    [
        Some(Value::Text(session.to_string())),
        Some(Value::Int(i64::from(date.weekday().num_days_from_monday()))),
        Some(Value::from(weekday_name(date.weekday()))),
        Some(Value::Int(i64::from((date.day() - 1) / 7 + 1))),
        Some(Value::Int(i64::from(date.month()))),
        Some(Value::Bool(calendar.event_dates.contains(&date))),
    ]
}

/// Append session, weekday, week-of-month, month and event-day columns.
///
/// Every value is computed from the bar timestamp converted to
/// `calendar.timezone`. Bars, their OHLCV values and the series timeframe are
/// unchanged.
///
/// # Errors
/// Returns `Data` if the series already has a column named like one of
/// [`ENRICH_COLUMNS`].
///
/// # Examples
/// ```
/// use candela_core::{Bar, BarSeries, Calendar, Decimal, Value, enrich};
///
/// let ts = "2024-03-08T15:00:00Z".parse().unwrap(); // 10:00 in New York
/// let one = Decimal::ONE;
/// let series = BarSeries::new(vec![Bar::new(ts, one, one, one, one, one)]);
/// let out = enrich(&series, &Calendar::us_equities()).unwrap();
/// assert_eq!(out.value(0, "session"), Some(&Value::Text("RTH".into())));
/// assert_eq!(out.value(0, "day_of_week"), Some(&Value::Int(4)));
/// assert_eq!(out.value(0, "weekday_name"), Some(&Value::Text("Friday".into())));
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "candela::core::enrich",
        skip(series, calendar),
        fields(rows = series.len(), timezone = %calendar.timezone),
    )
)]
pub fn enrich(series: &BarSeries, calendar: &Calendar) -> Result<BarSeries, CandelaError> {
    if let Some(clash) = ENRICH_COLUMNS
        .iter()
        .find(|name| series.column_index(name).is_some())
    {
        return Err(CandelaError::Data(format!(
            "column {clash:?} already present; series was enriched before"
        )));
    }

    let mut columns = series.columns().to_vec();
    columns.extend(ENRICH_COLUMNS.iter().map(|c| (*c).to_string()));
    let bars = series
        .bars()
        .iter()
        .map(|bar| {
            let mut out = bar.clone();
            out.extra.extend(row_metadata(bar, calendar));
            out
        })
        .collect();
    Ok(BarSeries::with_columns(columns, bars)?.with_timeframe(series.timeframe()))
}
