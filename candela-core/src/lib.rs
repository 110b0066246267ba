//! candela-core
//!
//! Normalization, resampling and enrichment of OHLCV bar series.
//!
//! - `normalize`: map vendor tables (CSV or in-memory) into canonical series.
//! - `timeseries`: bucket alignment, step inference and the resampling engine.
//! - `enrich`: append session and calendar metadata columns.
//! - `types`: re-exports of the shared data model from `candela-types`.
//!
//! Every operation is synchronous and pure apart from the explicit CSV reader.
//! Enable the `tracing` feature for spans and events.
#![warn(missing_docs)]

/// Calendar and session enrichment.
pub mod enrich;
/// Vendor schema normalization.
pub mod normalize;
/// Time-series utilities for bucketing, step inference and resampling.
pub mod timeseries;
pub mod types;

pub use enrich::{ENRICH_COLUMNS, enrich};
pub use normalize::{Field, RawTable, normalize};
pub use timeseries::infer::{estimate_step_seconds, is_subdaily, native_resolution_seconds};
pub use timeseries::resample::{ResampledSet, resample, resample_one};
pub use timeseries::util::count_malformed;
pub use types::*;
