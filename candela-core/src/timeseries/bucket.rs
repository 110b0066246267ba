use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::types::{TimeUnit, Timeframe};

const DAY: i64 = 86_400;
/// Days from the epoch (a Thursday) to the first Monday, 1970-01-05.
const FIRST_MONDAY: i64 = 4;

const fn week_start_day(day: i64) -> i64 {
    day - ((day + 3).rem_euclid(7))
}

const fn floor_to(value: i64, step: i64) -> i64 {
    value - value.rem_euclid(step)
}

fn month_start(year: i32, month0: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
}

/// Start of the bucket containing `ts`.
///
/// - Fixed timeframes: `floor(ts / Δ) * Δ` from the Unix epoch.
/// - Days: UTC midnight; multi-day buckets count whole days from the epoch.
/// - Weeks: Monday 00:00 UTC; multi-week buckets count from 1970-01-05.
/// - Months: the 1st 00:00 UTC; multi-month buckets count from January 1970.
///
/// Returns `None` only when the result is outside chrono's representable range.
#[must_use]
pub fn bucket_start(tf: Timeframe, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let n = i64::from(tf.count());
    let secs = ts.timestamp();
    match tf.time_unit() {
        TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
            let step = tf.fixed_seconds()?;
            DateTime::from_timestamp(floor_to(secs, step), 0)
        }
        TimeUnit::Day => {
            let day = secs.div_euclid(DAY);
            DateTime::from_timestamp(floor_to(day, n) * DAY, 0)
        }
        TimeUnit::Week => {
            let ws = week_start_day(secs.div_euclid(DAY));
            let week = (ws - FIRST_MONDAY).div_euclid(7);
            DateTime::from_timestamp((FIRST_MONDAY + floor_to(week, n) * 7) * DAY, 0)
        }
        TimeUnit::Month => {
            let index = i64::from(ts.year() - 1970) * 12 + i64::from(ts.month0());
            let bucket = floor_to(index, n);
            let year = i32::try_from(1970 + bucket.div_euclid(12)).ok()?;
            let month0 = u32::try_from(bucket.rem_euclid(12)).ok()?;
            month_start(year, month0)
        }
    }
}

/// Start of the bucket following the one that starts at `start`.
#[must_use]
pub fn next_bucket_start(tf: Timeframe, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let n = i64::from(tf.count());
    match tf.time_unit() {
        TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
            DateTime::from_timestamp(start.timestamp().checked_add(tf.fixed_seconds()?)?, 0)
        }
        TimeUnit::Day => DateTime::from_timestamp(start.timestamp().checked_add(n * DAY)?, 0),
        TimeUnit::Week => DateTime::from_timestamp(start.timestamp().checked_add(n * 7 * DAY)?, 0),
        TimeUnit::Month => start.checked_add_months(Months::new(tf.count())),
    }
}
