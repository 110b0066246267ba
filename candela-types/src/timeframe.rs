//! Timeframe identifiers.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CandelaError;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

/// Unit of a [`Timeframe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Seconds (fixed duration).
    Second,
    /// Minutes (fixed duration).
    Minute,
    /// Hours (fixed duration).
    Hour,
    /// UTC calendar days.
    Day,
    /// Calendar weeks starting Monday 00:00 UTC.
    Week,
    /// Calendar months starting on the 1st 00:00 UTC.
    Month,
}

impl TimeUnit {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "mo",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        // Upper-case `M` is months (pandas `M`/`MS`); lower-case `m` is minutes.
        if s == "M" || s == "MS" {
            return Some(Self::Month);
        }
        let unit = match s.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Second,
            "m" | "t" | "min" | "mins" | "minute" | "minutes" => Self::Minute,
            "h" | "hr" | "hrs" | "hour" | "hours" => Self::Hour,
            "d" | "day" | "days" => Self::Day,
            "w" | "wk" | "week" | "weeks" => Self::Week,
            "mo" | "mon" | "month" | "months" => Self::Month,
            _ => return None,
        };
        Some(unit)
    }
}

/// Bucketing class of a timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeKind {
    /// Uniform intervals anchored at the Unix epoch.
    Fixed,
    /// Boundaries follow the UTC calendar (days, Monday weeks, months).
    Calendar,
}

/// A target period for resampling, such as `5min`, `1h`, `1d`, `1w` or `1mo`.
///
/// Construction normalizes equivalent fixed identifiers (`60min` becomes
/// `1h`), so two requests for the same bucketing compare equal. The string
/// form produced by `Display` is the canonical identifier and is also the
/// serde representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    count: u32,
    unit: TimeUnit,
}

impl Timeframe {
    /// One second.
    pub const S1: Self = Self::unit(TimeUnit::Second);
    /// One minute.
    pub const M1: Self = Self::unit(TimeUnit::Minute);
    /// Five minutes.
    pub const M5: Self = Self {
        count: 5,
        unit: TimeUnit::Minute,
    };
    /// Fifteen minutes.
    pub const M15: Self = Self {
        count: 15,
        unit: TimeUnit::Minute,
    };
    /// Thirty minutes.
    pub const M30: Self = Self {
        count: 30,
        unit: TimeUnit::Minute,
    };
    /// One hour.
    pub const H1: Self = Self::unit(TimeUnit::Hour);
    /// Four hours.
    pub const H4: Self = Self {
        count: 4,
        unit: TimeUnit::Hour,
    };
    /// One UTC day.
    pub const D1: Self = Self::unit(TimeUnit::Day);
    /// One Monday-start week.
    pub const W1: Self = Self::unit(TimeUnit::Week);
    /// One calendar month.
    pub const MO1: Self = Self::unit(TimeUnit::Month);

    const fn unit(unit: TimeUnit) -> Self {
        Self { count: 1, unit }
    }

    /// Build a timeframe from a count and unit.
    ///
    /// Counts that are whole multiples of the next unit are folded upward
    /// (`120s` → `2min`, `90min` stays `90min`, `120min` → `2h`). Whole days of
    /// hours fold into days (`24h` → `1d`, `48h` → `2d`) since both bucket from
    /// UTC midnight at the epoch. Days never fold into weeks, which start on
    /// Monday.
    ///
    /// # Errors
    /// Returns `InvalidTimeframe` when `count` is zero.
    pub fn new(count: u32, unit: TimeUnit) -> Result<Self, CandelaError> {
        if count == 0 {
            return Err(CandelaError::InvalidTimeframe(format!(
                "zero-length timeframe: 0{}",
                unit.suffix()
            )));
        }
        let (mut count, mut unit) = (count, unit);
        if unit == TimeUnit::Second && count % 60 == 0 {
            count /= 60;
            unit = TimeUnit::Minute;
        }
        if unit == TimeUnit::Minute && count % 60 == 0 {
            count /= 60;
            unit = TimeUnit::Hour;
        }
        if unit == TimeUnit::Hour && count % 24 == 0 {
            count /= 24;
            unit = TimeUnit::Day;
        }
        Ok(Self { count, unit })
    }

    /// Number of units per bucket.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Unit of the bucket.
    #[must_use]
    pub const fn time_unit(self) -> TimeUnit {
        self.unit
    }

    /// Bucketing class.
    #[must_use]
    pub const fn kind(self) -> TimeframeKind {
        match self.unit {
            TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => TimeframeKind::Fixed,
            TimeUnit::Day | TimeUnit::Week | TimeUnit::Month => TimeframeKind::Calendar,
        }
    }

    /// Bucket width in seconds for fixed-duration timeframes; `None` for calendar ones.
    #[must_use]
    pub const fn fixed_seconds(self) -> Option<i64> {
        let per = match self.unit {
            TimeUnit::Second => 1,
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => HOUR,
            TimeUnit::Day | TimeUnit::Week | TimeUnit::Month => return None,
        };
        Some(per * self.count as i64)
    }

    /// Longest possible bucket in seconds.
    ///
    /// Months count as 31 days each, which bounds every run of consecutive months.
    #[must_use]
    pub const fn max_span_seconds(self) -> i64 {
        let per = match self.unit {
            TimeUnit::Second => 1,
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => HOUR,
            TimeUnit::Day => DAY,
            TimeUnit::Week => 7 * DAY,
            TimeUnit::Month => 31 * DAY,
        };
        per * self.count as i64
    }

    /// True when the timeframe's buckets are shorter than one day.
    #[must_use]
    pub const fn is_subdaily(self) -> bool {
        self.max_span_seconds() < DAY
    }
}

impl Ord for Timeframe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.max_span_seconds()
            .cmp(&other.max_span_seconds())
            .then(self.unit.cmp(&other.unit))
            .then(self.count.cmp(&other.count))
    }
}

impl PartialOrd for Timeframe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Timeframe {
    type Err = CandelaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, rest) = trimmed.split_at(digits_end);
        let count = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| CandelaError::InvalidTimeframe(s.to_string()))?
        };
        let unit = TimeUnit::parse(rest.trim())
            .ok_or_else(|| CandelaError::InvalidTimeframe(s.to_string()))?;
        Self::new(count, unit)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = CandelaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for Timeframe {
    type Error = CandelaError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.to_string()
    }
}
