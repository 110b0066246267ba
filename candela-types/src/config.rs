//! Configuration types shared by the normalizer, engine and pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Calendar, Timeframe};

/// How auxiliary cells and empty buckets are populated during resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Omit empty buckets; leave missing auxiliary cells missing.
    #[default]
    None,
    /// Synthesize empty interior buckets from the previous close with zero
    /// volume, and carry auxiliary values forward into missing cells.
    ForwardFill,
}

/// Options for mapping vendor tables into the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Explicit vendor-column → canonical-column renames, applied before the
    /// built-in alias table.
    pub column_map: BTreeMap<String, String>,
    /// Timezone used for timestamps that carry no offset.
    pub source_timezone: chrono_tz::Tz,
    /// Keep non-OHLCV columns as auxiliary columns.
    pub keep_extra_columns: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            column_map: BTreeMap::new(),
            source_timezone: chrono_tz::UTC,
            keep_extra_columns: true,
        }
    }
}

impl NormalizeOptions {
    /// Add one explicit column rename.
    #[must_use]
    pub fn with_column(mut self, vendor: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.column_map.insert(vendor.into(), canonical.into());
        self
    }

    /// Set the timezone for offset-less timestamps.
    #[must_use]
    pub const fn with_source_timezone(mut self, tz: chrono_tz::Tz) -> Self {
        self.source_timezone = tz;
        self
    }
}

/// Global configuration for a `candela` pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target timeframes; duplicates collapse.
    pub timeframes: Vec<Timeframe>,
    /// Gap and auxiliary-cell policy.
    pub fill_policy: FillPolicy,
    /// Schema normalization options.
    pub normalize: NormalizeOptions,
    /// When set, every resampled series is enriched with this calendar.
    pub calendar: Option<Calendar>,
}
