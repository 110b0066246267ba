use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::timeseries::bucket::{bucket_start, next_bucket_start};
use crate::timeseries::infer::native_resolution_seconds;
use crate::timeseries::util::ensure_canonical;
use crate::types::{Bar, BarSeries, CandelaError, FillPolicy, Timeframe, Value};

/// One output series per requested timeframe, ordered by timeframe duration.
pub type ResampledSet = BTreeMap<Timeframe, BarSeries>;

fn out_of_range(ts: DateTime<Utc>) -> CandelaError {
    CandelaError::Data(format!("bucket boundary out of range near {ts}"))
}

struct BucketAgg {
    start: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
    extra: Vec<Option<Value>>,
}

impl BucketAgg {
    fn open_with(start: DateTime<Utc>, bar: &Bar) -> Self {
        Self {
            start,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            extra: bar.extra.clone(),
        }
    }

    fn absorb(&mut self, bar: &Bar) -> Result<(), CandelaError> {
        if bar.high > self.high {
            self.high = bar.high;
        }
        if bar.low < self.low {
            self.low = bar.low;
        }
        self.close = bar.close;
        self.volume = self.volume.checked_add(bar.volume).ok_or_else(|| {
            CandelaError::Data(format!("volume overflow in bucket at {}", self.start))
        })?;
        for (slot, cell) in self.extra.iter_mut().zip(&bar.extra) {
            if cell.is_some() {
                slot.clone_from(cell);
            }
        }
        Ok(())
    }
}

/// Explicit last-value-carried-forward state for auxiliary cells.
struct ForwardFill {
    last: Vec<Option<Value>>,
}

impl ForwardFill {
    fn new(width: usize) -> Self {
        Self {
            last: vec![None; width],
        }
    }

    fn fill(&mut self, extra: &mut [Option<Value>]) {
        for (cell, last) in extra.iter_mut().zip(self.last.iter_mut()) {
            if cell.is_some() {
                last.clone_from(cell);
            } else {
                cell.clone_from(last);
            }
        }
    }
}

fn finalize_bucket(out: &mut Vec<Bar>, carry: Option<&mut ForwardFill>, agg: BucketAgg) {
    let mut extra = agg.extra;
    if let Some(ff) = carry {
        ff.fill(&mut extra);
    }
    out.push(Bar {
        ts: agg.start,
        open: agg.open,
        high: agg.high,
        low: agg.low,
        close: agg.close,
        volume: agg.volume,
        extra,
    });
}

/// Synthesize flat, zero-volume bars for every bucket strictly between
/// `after` and `before`, priced at the last emitted close.
fn fill_gap(
    out: &mut Vec<Bar>,
    ff: &mut ForwardFill,
    tf: Timeframe,
    after: DateTime<Utc>,
    before: DateTime<Utc>,
) -> Result<(), CandelaError> {
    let Some(prev_close) = out.last().map(|b| b.close) else {
        return Ok(());
    };
    let mut cursor = next_bucket_start(tf, after).ok_or_else(|| out_of_range(after))?;
    while cursor < before {
        let mut extra = vec![None; ff.last.len()];
        ff.fill(&mut extra);
        out.push(Bar {
            ts: cursor,
            open: prev_close,
            high: prev_close,
            low: prev_close,
            close: prev_close,
            volume: Decimal::ZERO,
            extra,
        });
        cursor = next_bucket_start(tf, cursor).ok_or_else(|| out_of_range(cursor))?;
    }
    Ok(())
}

/// Group ascending bars into buckets and aggregate OHLCV plus auxiliary cells.
///
/// Assumes `series` already passed [`ensure_canonical`].
fn resample_by(
    series: &BarSeries,
    tf: Timeframe,
    fill: FillPolicy,
) -> Result<BarSeries, CandelaError> {
    let bars = series.bars();
    let width = series.columns().len();
    let mut ff = match fill {
        FillPolicy::ForwardFill => Some(ForwardFill::new(width)),
        FillPolicy::None => None,
    };

    let columns = series.columns().to_vec();
    let mut out: Vec<Bar> = Vec::new();
    let Some((first, rest)) = bars.split_first() else {
        return Ok(BarSeries::with_columns(columns, out)?.with_timeframe(Some(tf)));
    };
    let start = bucket_start(tf, first.ts).ok_or_else(|| out_of_range(first.ts))?;
    let mut agg = BucketAgg::open_with(start, first);

    for bar in rest {
        let bucket = bucket_start(tf, bar.ts).ok_or_else(|| out_of_range(bar.ts))?;
        if bucket == agg.start {
            agg.absorb(bar)?;
            continue;
        }
        let prev_start = agg.start;
        finalize_bucket(&mut out, ff.as_mut(), agg);
        if let Some(ff) = ff.as_mut() {
            fill_gap(&mut out, ff, tf, prev_start, bucket)?;
        }
        agg = BucketAgg::open_with(bucket, bar);
    }
    finalize_bucket(&mut out, ff.as_mut(), agg);

    Ok(BarSeries::with_columns(columns, out)?.with_timeframe(Some(tf)))
}

/// Resolution of a series in seconds: the longest bucket of the timeframe it
/// was resampled to, otherwise the grid inferred from its timestamps.
fn native_seconds(series: &BarSeries) -> Option<i64> {
    match series.timeframe() {
        Some(tf) => Some(tf.max_span_seconds()),
        None => native_resolution_seconds(series.bars()),
    }
}

fn check_granularity(tf: Timeframe, native_seconds: Option<i64>) -> Result<(), CandelaError> {
    match native_seconds {
        Some(step) if tf.max_span_seconds() < step => {
            Err(CandelaError::granularity(tf.to_string(), step))
        }
        _ => Ok(()),
    }
}

/// Resample one canonical series into every requested timeframe.
///
/// Aggregation per bucket:
/// - Open = first open (earliest ts)
/// - High = max high
/// - Low  = min low
/// - Close = last close (latest ts)
/// - Volume = sum of volumes
/// - Auxiliary cells = last non-missing value; with [`FillPolicy::ForwardFill`]
///   cells still missing take the previous output bar's value
///
/// Output bars are stamped with their bucket start and every output series
/// records its timeframe. Fixed timeframes are anchored at the Unix epoch;
/// days, weeks (Monday) and months (the 1st) follow the UTC calendar. Empty
/// buckets are omitted, unless `fill` is `ForwardFill`, in which case buckets
/// between the first and last source row are synthesized from the previous
/// close with zero volume.
///
/// Duplicate timeframes collapse to one computation. The call is atomic: every
/// timeframe is validated before any aggregation runs, and no partial result is
/// returned on failure.
///
/// # Errors
/// - `EmptySeries` if `series` has no bars.
/// - `UnsortedInput` if timestamps are not strictly increasing (the engine never
///   sorts; see the normalizer).
/// - `Granularity` if a timeframe's longest bucket is shorter than the series'
///   native resolution. A resampled series resolves to its recorded timeframe,
///   so resampling an output again at the same timeframe always passes. Source
///   series resolve to the finest grid their timestamps share (see
///   [`native_resolution_seconds`]).
/// - `InvalidArg` if no timeframe is requested.
///
/// ```
/// use candela_core::{Bar, BarSeries, Decimal, FillPolicy, Timeframe, resample};
/// use chrono::{DateTime, Utc};
///
/// fn t(s: &str) -> DateTime<Utc> { s.parse().unwrap() }
/// let d = |v: i64| Decimal::from(v);
/// let series = BarSeries::new(vec![
///     Bar::new(t("2024-01-02T09:30:00Z"), d(100), d(102), d(99), d(101), d(10)),
///     Bar::new(t("2024-01-02T09:31:00Z"), d(101), d(103), d(100), d(102), d(20)),
///     Bar::new(t("2024-01-02T09:32:00Z"), d(103), d(104), d(102), d(103), d(30)),
/// ]);
/// let tf: Timeframe = "3min".parse().unwrap();
/// let out = resample(&series, [tf], FillPolicy::None).unwrap();
/// let bar = &out[&tf].bars()[0];
/// assert_eq!(
///     (bar.open, bar.high, bar.low, bar.close, bar.volume),
///     (d(100), d(104), d(99), d(103), d(60))
/// );
/// assert_eq!(bar.ts, t("2024-01-02T09:30:00Z"));
/// ```
pub fn resample<I>(
    series: &BarSeries,
    timeframes: I,
    fill: FillPolicy,
) -> Result<ResampledSet, CandelaError>
where
    I: IntoIterator<Item = Timeframe>,
{
    let requested: BTreeSet<Timeframe> = timeframes.into_iter().collect();
    if requested.is_empty() {
        return Err(CandelaError::InvalidArg(
            "no timeframes requested".to_string(),
        ));
    }
    ensure_canonical(series)?;

    let native = native_seconds(series);
    for &tf in &requested {
        check_granularity(tf, native)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = series.len(),
        native_seconds = native,
        timeframes = requested.len(),
        "resampling series"
    );

    let mut out = ResampledSet::new();
    for tf in requested {
        let resampled = resample_by(series, tf, fill)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(timeframe = %tf, bars = resampled.len(), "timeframe done");
        out.insert(tf, resampled);
    }
    Ok(out)
}

/// Resample into a single timeframe.
///
/// Same rules and errors as [`resample`].
///
/// # Errors
/// See [`resample`].
pub fn resample_one(
    series: &BarSeries,
    tf: Timeframe,
    fill: FillPolicy,
) -> Result<BarSeries, CandelaError> {
    ensure_canonical(series)?;
    check_granularity(tf, native_seconds(series))?;
    resample_by(series, tf, fill)
}
