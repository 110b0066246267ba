//! Time-series utilities at the heart of the pipeline.
//!
//! Modules include:
//! - `bucket`: calendar and fixed-duration bucket alignment
//! - `infer`: infer native step and detect sub-daily cadence
//! - `resample`: aggregate bars to coarser timeframes
//! - `util`: canonical-series invariant checks
/// Bucket alignment for fixed and calendar timeframes.
pub mod bucket;
/// Native-step inference and sub-daily detection helpers.
pub mod infer;
/// Multi-timeframe OHLCV resampling.
pub mod resample;
/// Canonical-series invariant checks.
pub mod util;
