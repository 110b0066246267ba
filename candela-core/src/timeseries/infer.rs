use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};

use crate::types::Bar;

const DAY: i64 = 86_400;
const SHORTEST_MONTH: i64 = 28 * DAY;

fn positive_deltas(bars: &[Bar]) -> Vec<i64> {
    let mut ts: Vec<DateTime<Utc>> = bars.iter().map(|b| b.ts).collect();
    ts.sort_unstable();
    let mut deltas: Vec<i64> = Vec::with_capacity(ts.len().saturating_sub(1));
    let Some(&first) = ts.first() else {
        return deltas;
    };
    let mut last = first;
    for &cur in ts.iter().skip(1) {
        let dt: TimeDelta = cur - last;
        if dt > TimeDelta::zero() {
            deltas.push(dt.num_seconds());
            last = cur;
        }
    }
    deltas
}

/// Estimate the native step (in seconds) of a series from positive adjacent
/// timestamp deltas.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median.
///
/// Unique mode (60s):
///
/// ```
/// use candela_core::{Bar, Decimal, estimate_step_seconds};
/// use chrono::DateTime;
///
/// let mk = |ts: i64| {
///     let px = Decimal::ONE;
///     Bar::new(DateTime::from_timestamp(ts, 0).unwrap(), px, px, px, px, px)
/// };
/// // Adjacent deltas: 60,60,60,120,180  => unique mode is 60
/// let bars = vec![mk(0), mk(60), mk(120), mk(180), mk(300), mk(480)];
/// assert_eq!(estimate_step_seconds(&bars), Some(60));
/// ```
///
/// No unique mode: fall back to lower median (60s):
///
/// ```
/// use candela_core::{Bar, Decimal, estimate_step_seconds};
/// use chrono::DateTime;
///
/// let mk = |ts: i64| {
///     let px = Decimal::ONE;
///     Bar::new(DateTime::from_timestamp(ts, 0).unwrap(), px, px, px, px, px)
/// };
/// // Adjacent deltas: 60,60,120,120  => lower median is 60
/// let bars = vec![mk(0), mk(60), mk(120), mk(240), mk(360)];
/// assert_eq!(estimate_step_seconds(&bars), Some(60));
/// ```
///
/// The input order does not matter; duplicates are ignored. Returns `None` if
/// fewer than two distinct timestamps are present.
#[must_use]
pub fn estimate_step_seconds(bars: &[Bar]) -> Option<i64> {
    let mut deltas = positive_deltas(bars);
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta: i64 = deltas[0];
    let mut best_count: usize = 0;
    let mut num_best_candidates: usize = 0;

    let mut cur_delta: i64 = deltas[0];
    let mut cur_count: usize = 1;
    for &d in deltas.iter().skip(1) {
        if d == cur_delta {
            cur_count += 1;
            continue;
        }
        if cur_count > best_count {
            best_count = cur_count;
            best_delta = cur_delta;
            num_best_candidates = 1;
        } else if cur_count == best_count {
            num_best_candidates = num_best_candidates.saturating_add(1);
        }
        cur_delta = d;
        cur_count = 1;
    }
    if cur_count > best_count {
        best_delta = cur_delta;
        num_best_candidates = 1;
    } else if cur_count == best_count {
        num_best_candidates = num_best_candidates.saturating_add(1);
    }

    if num_best_candidates == 1 {
        return Some(best_delta);
    }

    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

const fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn month_index(ts: DateTime<Utc>) -> Option<i64> {
    let at_month_start =
        ts.day() == 1 && ts.num_seconds_from_midnight() == 0 && ts.nanosecond() == 0;
    at_month_start.then(|| i64::from(ts.year()) * 12 + i64::from(ts.month0()))
}

/// Finest grid (in seconds) every timestamp of the series sits on.
///
/// This is the greatest common divisor of the positive adjacent deltas, so a
/// sparse series keeps the resolution of its densest stretch: daily bars that
/// trade only Monday, Wednesday and Friday resolve to one day. When every
/// timestamp is a UTC month start, the resolution is the common month step
/// counted at the shortest month length (28 days per month).
///
/// Returns `None` if fewer than two timestamps are at least one second apart.
///
/// ```
/// use candela_core::{Bar, Decimal, native_resolution_seconds};
/// use chrono::DateTime;
///
/// let mk = |ts: i64| {
///     let px = Decimal::ONE;
///     Bar::new(DateTime::from_timestamp(ts, 0).unwrap(), px, px, px, px, px)
/// };
/// // Mon, Wed, Fri, Mon: deltas of 2, 2 and 3 days
/// let day = 86_400;
/// let bars = vec![mk(4 * day), mk(6 * day), mk(8 * day), mk(11 * day)];
/// assert_eq!(native_resolution_seconds(&bars), Some(day));
/// ```
#[must_use]
pub fn native_resolution_seconds(bars: &[Bar]) -> Option<i64> {
    let step = positive_deltas(bars)
        .into_iter()
        .filter(|&d| d > 0)
        .fold(0, gcd);
    if step == 0 {
        return None;
    }

    let months: Option<Vec<i64>> = bars.iter().map(|b| month_index(b.ts)).collect();
    if let Some(mut months) = months {
        months.sort_unstable();
        months.dedup();
        let month_step = months.windows(2).map(|w| w[1] - w[0]).fold(0, gcd);
        if month_step > 0 {
            return Some(month_step.saturating_mul(SHORTEST_MONTH));
        }
    }
    Some(step)
}

/// Heuristic: determine if a series is sub-daily.
///
/// Returns `true` only if BOTH conditions hold:
/// - At least 3 adjacent deltas are strictly less than 86,400 seconds (1 day)
/// - At least 60% of adjacent deltas are strictly less than 86,400 seconds
#[must_use]
pub fn is_subdaily(bars: &[Bar]) -> bool {
    let deltas = positive_deltas(bars);
    if deltas.is_empty() {
        return false;
    }

    let total: usize = deltas.len();
    let subdaily: usize = deltas.iter().filter(|&&d| d < DAY).count();

    let min_count: usize = 3;
    // 60% = 3/5, compared as subdaily * 5 >= total * 3
    let min_ratio_num: usize = 3;
    let min_ratio_den: usize = 5;

    if subdaily < min_count {
        return false;
    }
    subdaily.saturating_mul(min_ratio_den) >= total.saturating_mul(min_ratio_num)
}
