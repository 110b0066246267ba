//! Shared checks for canonical series invariants.

use crate::types::{Bar, BarSeries, CandelaError};

/// Ensure timestamps are strictly increasing.
///
/// # Errors
/// Returns `Err(CandelaError::UnsortedInput)` at the first bar whose timestamp
/// is not after its predecessor's, duplicates included.
pub fn ensure_strictly_increasing(bars: &[Bar]) -> Result<(), CandelaError> {
    match bars.windows(2).position(|w| w[1].ts <= w[0].ts) {
        Some(i) => Err(CandelaError::unsorted(i + 1, bars[i].ts, bars[i + 1].ts)),
        None => Ok(()),
    }
}

/// Ensure a series is usable as resampling input: non-empty and strictly
/// ascending by timestamp.
///
/// # Errors
/// - Returns `Err(CandelaError::EmptySeries)` if the series has no bars.
/// - Returns `Err(CandelaError::UnsortedInput)` if timestamps are not strictly increasing.
pub fn ensure_canonical(series: &BarSeries) -> Result<(), CandelaError> {
    if series.is_empty() {
        return Err(CandelaError::EmptySeries);
    }
    ensure_strictly_increasing(series.bars())
}

/// Count bars violating `low <= min(open, close) <= max(open, close) <= high`.
///
/// Malformed bars are passed through by the engine; callers can use this to
/// decide whether to trust the output.
#[must_use]
pub fn count_malformed(bars: &[Bar]) -> usize {
    bars.iter().filter(|b| !b.is_well_formed()).count()
}
