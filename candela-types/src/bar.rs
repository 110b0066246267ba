//! Canonical bar and series types.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CandelaError, Timeframe};

/// A single auxiliary cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Exact decimal number.
    Number(Decimal),
    /// Free-form text.
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Number(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Number(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One OHLCV bar plus its auxiliary cells.
///
/// `extra` is positionally aligned with the owning series' auxiliary column
/// list; a `None` cell is a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar start instant (UTC).
    pub ts: DateTime<Utc>,
    /// First traded price.
    pub open: Decimal,
    /// Highest traded price.
    pub high: Decimal,
    /// Lowest traded price.
    pub low: Decimal,
    /// Last traded price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: Decimal,
    /// Auxiliary cells.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Option<Value>>,
}

impl Bar {
    /// Build a bar without auxiliary cells.
    #[must_use]
    pub const fn new(
        ts: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
            extra: Vec::new(),
        }
    }

    /// Attach auxiliary cells.
    #[must_use]
    pub fn with_extra(mut self, extra: Vec<Option<Value>>) -> Self {
        self.extra = extra;
        self
    }

    /// True when `low <= min(open, close)` and `max(open, close) <= high`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}

#[derive(Deserialize)]
struct SeriesParts {
    #[serde(default)]
    columns: Vec<String>,
    bars: Vec<Bar>,
    #[serde(default)]
    timeframe: Option<Timeframe>,
}

/// An ordered sequence of bars with named auxiliary columns.
///
/// The constructors only check the auxiliary-column shape. Ordering and
/// uniqueness of timestamps are checked by the resampling engine, which
/// rejects unsorted input.
///
/// A series produced by resampling records its timeframe. Source series carry
/// none, and their resolution is inferred from timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SeriesParts")]
pub struct BarSeries {
    columns: Vec<String>,
    bars: Vec<Bar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeframe: Option<Timeframe>,
}

impl BarSeries {
    /// Build a series with no auxiliary columns.
    ///
    /// Any `extra` cells on the bars are dropped.
    #[must_use]
    pub fn new(mut bars: Vec<Bar>) -> Self {
        for b in &mut bars {
            b.extra.clear();
        }
        Self {
            columns: Vec::new(),
            bars,
            timeframe: None,
        }
    }

    /// Build a series with named auxiliary columns.
    ///
    /// # Errors
    /// Returns `Data` if a bar's `extra` length differs from `columns.len()`,
    /// or if a column name is repeated.
    pub fn with_columns(columns: Vec<String>, bars: Vec<Bar>) -> Result<Self, CandelaError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(CandelaError::Data(format!(
                    "duplicate auxiliary column: {name}"
                )));
            }
        }
        if let Some((row, bar)) = bars
            .iter()
            .enumerate()
            .find(|(_, b)| b.extra.len() != columns.len())
        {
            return Err(CandelaError::Data(format!(
                "row {row} has {} auxiliary cells, expected {}",
                bar.extra.len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            bars,
            timeframe: None,
        })
    }

    /// Record the timeframe the bars are aligned to.
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: Option<Timeframe>) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Bars in series order.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Timeframe this series was resampled to; `None` for source data.
    #[must_use]
    pub const fn timeframe(&self) -> Option<Timeframe> {
        self.timeframe
    }

    /// Auxiliary column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when the series has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Position of an auxiliary column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Auxiliary cell at `row` in column `name`, if present and non-missing.
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.bars.get(row)?.extra.get(col)?.as_ref()
    }

    /// Sum of volume over all bars.
    #[must_use]
    pub fn total_volume(&self) -> Decimal {
        self.bars.iter().map(|b| b.volume).sum()
    }

    /// Decompose into `(columns, bars)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Bar>) {
        (self.columns, self.bars)
    }
}

impl TryFrom<SeriesParts> for BarSeries {
    type Error = CandelaError;

    fn try_from(parts: SeriesParts) -> Result<Self, Self::Error> {
        Ok(Self::with_columns(parts.columns, parts.bars)?.with_timeframe(parts.timeframe))
    }
}
