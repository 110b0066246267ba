//! Candela prepares vendor OHLCV data for multi-timeframe analysis.
//!
//! Overview
//! - Normalizes vendor tables (CSV or in-memory) into one canonical bar schema,
//!   failing fast when required columns are missing.
//! - Resamples a canonical series into any set of fixed (`5min`, `4h`) and
//!   calendar (`1d`, `1w`, `1mo`) timeframes in one atomic call.
//! - Optionally appends session, weekday, week-of-month, month and event-day
//!   columns evaluated in an exchange timezone.
//! - Every output series records its timeframe, so resampling an output again
//!   at the same timeframe returns it unchanged.
//!
//! Key behaviors and trade-offs
//! - Bars are labelled with their bucket start. Fixed buckets are anchored at the
//!   Unix epoch and calendar buckets follow UTC midnight, Monday and the 1st.
//! - The engine rejects unsorted input instead of sorting it; the normalizer sorts
//!   and keeps the first of any duplicate timestamps.
//! - `FillPolicy::ForwardFill` synthesizes flat zero-volume bars for interior gaps.
//!   With `FillPolicy::None` empty buckets are simply absent.
//! - Prices and volume are `Decimal`, so volume sums are exact and repeated runs
//!   are bit-identical.
//!
//! Examples
//! ```
//! use candela::{Calendar, Decimal, FillPolicy, Pipeline, RawTable, Timeframe};
//!
//! let table = RawTable::new(
//!     ["time", "open", "high", "low", "close", "volume"].map(String::from).to_vec(),
//!     vec![
//!         ["2024-01-02T14:30:00Z", "100", "102", "99", "101", "10"].map(String::from).to_vec(),
//!         ["2024-01-02T14:31:00Z", "101", "103", "100", "102", "20"].map(String::from).to_vec(),
//!         ["2024-01-02T14:32:00Z", "103", "104", "102", "103", "30"].map(String::from).to_vec(),
//!     ],
//! );
//! let pipeline = Pipeline::builder()
//!     .timeframe("3min".parse()?)
//!     .timeframe(Timeframe::H1)
//!     .fill_policy(FillPolicy::ForwardFill)
//!     .enrich_with(Calendar::us_equities())
//!     .build()?;
//! let out = pipeline.run(&table)?;
//! let three = &out[&"3min".parse::<Timeframe>()?];
//! assert_eq!(three.len(), 1);
//! assert_eq!(three.bars()[0].volume, Decimal::from(60));
//! assert_eq!(three.value(0, "session").map(ToString::to_string), Some("RTH".into()));
//! # Ok::<(), candela::CandelaError>(())
//! ```
#![warn(missing_docs)]

mod pipeline;

pub use pipeline::{Pipeline, PipelineBuilder};

pub use candela_core::{
    ENRICH_COLUMNS, Field, RawTable, ResampledSet, count_malformed, enrich, estimate_step_seconds,
    is_subdaily, native_resolution_seconds, normalize, resample, resample_one,
};

// Re-export core types for convenience
pub use candela_core::{
    Bar, BarSeries, Calendar, CandelaError, Decimal, FillPolicy, NormalizeOptions,
    PipelineConfig, SessionWindow, TimeUnit, Timeframe, TimeframeKind, Tz, Value,
};
