//! Schema normalization: vendor tables into canonical bar series.
//!
//! Headers are mapped in two passes. The caller's explicit `column_map` is
//! consulted first, then the built-in alias table. The first column claiming a
//! canonical field wins; anything else becomes an auxiliary column.

/// Canonical fields and the vendor alias table.
pub mod aliases;
/// Timestamp, decimal and auxiliary cell parsing.
pub mod parse;
/// In-memory and CSV-backed raw tables.
pub mod table;

pub use aliases::{Field, resolve};
pub use table::RawTable;

use std::collections::BTreeMap;

use aliases::FieldSlots;
use parse::{parse_decimal, parse_timestamp, parse_value};

use crate::types::{Bar, BarSeries, CandelaError, NormalizeOptions};

fn mapped_target<'a>(map: &'a BTreeMap<String, String>, header: &str) -> Option<&'a str> {
    map.get(header)
        .or_else(|| {
            map.iter()
                .find_map(|(k, v)| k.eq_ignore_ascii_case(header).then_some(v))
        })
        .map(String::as_str)
}

struct ColumnPlan {
    slots: FieldSlots,
    aux: Vec<(usize, String)>,
}

impl ColumnPlan {
    fn build(headers: &[String], opts: &NormalizeOptions) -> Self {
        let mut slots = FieldSlots::default();
        let mut aux = Vec::new();
        for (col, header) in headers.iter().enumerate() {
            let name = mapped_target(&opts.column_map, header).unwrap_or(header);
            let claimed = resolve(name).is_some_and(|field| slots.claim(field, col));
            if !claimed && opts.keep_extra_columns {
                aux.push((col, name.trim().to_string()));
            }
        }
        Self { slots, aux }
    }

    fn require(&self) -> Result<[usize; 6], CandelaError> {
        let missing: Vec<&str> = self.slots.missing().map(aliases::Field::name).collect();
        if !missing.is_empty() {
            return Err(CandelaError::schema(missing));
        }
        let mut cols = [0; 6];
        for (dst, field) in cols.iter_mut().zip(Field::ALL) {
            *dst = self.slots.get(field).unwrap_or_default();
        }
        Ok(cols)
    }
}

fn cell_error(row: usize, header: &str, detail: impl std::fmt::Display) -> CandelaError {
    CandelaError::Data(format!("row {row}, column {header:?}: {detail}"))
}

fn required_decimal(
    table: &RawTable,
    row: usize,
    col: usize,
) -> Result<rust_decimal::Decimal, CandelaError> {
    let raw = table.cell(row, col);
    parse_decimal(raw).ok_or_else(|| {
        let header = table.headers().get(col).map_or("", String::as_str);
        cell_error(row, header, format_args!("not a number: {raw:?}"))
    })
}

/// Map a vendor table into the canonical OHLCV schema.
///
/// The result is sorted ascending by timestamp. When timestamps repeat, the
/// first row in table order is kept.
///
/// # Errors
/// - `Schema` listing every required field that no column maps to.
/// - `Data` naming the row and column of the first unparsable cell, or of a
///   negative volume.
///
/// # Examples
/// ```
/// use candela_core::{NormalizeOptions, RawTable, normalize};
///
/// let table = RawTable::new(
///     ["Date", "O", "H", "L", "C", "Vol"].map(String::from).to_vec(),
///     vec![["2024-01-02 09:30:00", "100", "101", "99", "100.5", "10"].map(String::from).to_vec()],
/// );
/// let series = normalize(&table, &NormalizeOptions::default()).unwrap();
/// assert_eq!(series.len(), 1);
/// assert!(series.columns().is_empty());
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "candela::core::normalize",
        skip(table, opts),
        fields(rows = table.len(), columns = table.headers().len()),
    )
)]
pub fn normalize(table: &RawTable, opts: &NormalizeOptions) -> Result<BarSeries, CandelaError> {
    let plan = ColumnPlan::build(table.headers(), opts);
    let [ts_col, open_col, high_col, low_col, close_col, vol_col] = plan.require()?;
    let tz = opts.source_timezone;

    let mut bars = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let ts = parse_timestamp(table.cell(row, ts_col), tz).map_err(|e| {
            let header = table.headers().get(ts_col).map_or("", String::as_str);
            match e {
                CandelaError::Data(msg) => cell_error(row, header, msg),
                other => other,
            }
        })?;
        let volume = required_decimal(table, row, vol_col)?;
        if volume.is_sign_negative() && !volume.is_zero() {
            let header = table.headers().get(vol_col).map_or("", String::as_str);
            return Err(cell_error(row, header, format_args!("negative volume {volume}")));
        }
        let extra = plan
            .aux
            .iter()
            .map(|(col, _)| parse_value(table.cell(row, *col)))
            .collect();
        bars.push(
            Bar::new(
                ts,
                required_decimal(table, row, open_col)?,
                required_decimal(table, row, high_col)?,
                required_decimal(table, row, low_col)?,
                required_decimal(table, row, close_col)?,
                volume,
            )
            .with_extra(extra),
        );
    }

    // Stable: among equal timestamps the earliest row stays in front.
    bars.sort_by_key(|b| b.ts);
    let before = bars.len();
    bars.dedup_by_key(|b| b.ts);
    let dropped = before - bars.len();
    if dropped > 0 {
        #[cfg(feature = "tracing")]
        tracing::warn!(dropped, "duplicate timestamps; kept first occurrence");
    }

    let columns = plan.aux.into_iter().map(|(_, name)| name).collect();
    BarSeries::with_columns(columns, bars)
}
