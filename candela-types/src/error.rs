use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candela workspace.
///
/// Covers schema validation in the normalizer, input-shape checks in the
/// resampling engine, identifier parsing, and malformed cell data.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CandelaError {
    /// One or more required canonical columns are absent after column mapping.
    #[error("missing required columns: {}", missing.join(", "))]
    Schema {
        /// Canonical names of the missing columns, sorted.
        missing: Vec<String>,
    },

    /// The input series has no rows.
    #[error("series is empty")]
    EmptySeries,

    /// Timestamps are not strictly increasing.
    #[error("timestamps not strictly increasing at row {index}: {previous} then {current}")]
    UnsortedInput {
        /// Row index of the offending bar.
        index: usize,
        /// Timestamp of the preceding bar.
        previous: DateTime<Utc>,
        /// Timestamp of the offending bar.
        current: DateTime<Utc>,
    },

    /// The requested timeframe is finer than the series' native resolution.
    #[error("timeframe {requested} is finer than native resolution of {native_seconds}s")]
    Granularity {
        /// Canonical identifier of the requested timeframe.
        requested: String,
        /// Estimated native step of the input series, in seconds.
        native_seconds: i64,
    },

    /// A timeframe identifier could not be parsed.
    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with cell values or series shape (unparsable numbers, bad arity, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Failure reading tabular input.
    #[error("io error: {0}")]
    Io(String),
}

impl CandelaError {
    /// Helper: build a `Schema` error from any collection of column names.
    ///
    /// Names are sorted so the message is stable regardless of detection order.
    pub fn schema<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut missing: Vec<String> = missing.into_iter().map(Into::into).collect();
        missing.sort();
        missing.dedup();
        Self::Schema { missing }
    }

    /// Helper: build a `Granularity` error.
    pub fn granularity(requested: impl Into<String>, native_seconds: i64) -> Self {
        Self::Granularity {
            requested: requested.into(),
            native_seconds,
        }
    }

    /// Helper: build an `UnsortedInput` error.
    #[must_use]
    pub const fn unsorted(index: usize, previous: DateTime<Utc>, current: DateTime<Utc>) -> Self {
        Self::UnsortedInput {
            index,
            previous,
            current,
        }
    }

    /// Returns true if the error stems from the caller's input data rather than
    /// from arguments or I/O.
    ///
    /// Callers typically re-fetch and re-normalize on these.
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::Schema { .. } | Self::EmptySeries | Self::UnsortedInput { .. } | Self::Data(_)
        )
    }
}

impl From<std::io::Error> for CandelaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
