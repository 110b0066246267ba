use std::path::Path;

use candela_core::{
    BarSeries, Calendar, CandelaError, FillPolicy, NormalizeOptions, RawTable, ResampledSet,
    Timeframe, Tz, count_malformed, enrich, normalize, resample,
};
use candela_types::PipelineConfig;

/// Raw vendor data in, one canonical series per timeframe out.
///
/// A pipeline is an immutable bundle of configuration. Every run allocates its
/// own output and shares nothing with other runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    cfg: PipelineConfig,
}

/// Builder for constructing a [`Pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    cfg: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new builder with default options.
    ///
    /// Defaults: no timeframes, `FillPolicy::None`, UTC source timezone, extra
    /// columns kept, no enrichment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request one more output timeframe. Duplicates collapse.
    #[must_use]
    pub fn timeframe(mut self, tf: Timeframe) -> Self {
        self.cfg.timeframes.push(tf);
        self
    }

    /// Request several output timeframes.
    #[must_use]
    pub fn timeframes<I>(mut self, tfs: I) -> Self
    where
        I: IntoIterator<Item = Timeframe>,
    {
        self.cfg.timeframes.extend(tfs);
        self
    }

    /// Select how empty buckets and missing auxiliary cells are handled.
    #[must_use]
    pub const fn fill_policy(mut self, policy: FillPolicy) -> Self {
        self.cfg.fill_policy = policy;
        self
    }

    /// Replace all normalization options.
    #[must_use]
    pub fn normalize_options(mut self, opts: NormalizeOptions) -> Self {
        self.cfg.normalize = opts;
        self
    }

    /// Map a vendor column to a canonical or auxiliary column name.
    ///
    /// Explicit aliases are checked before the built-in alias table.
    #[must_use]
    pub fn column_alias(mut self, vendor: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.cfg
            .normalize
            .column_map
            .insert(vendor.into(), canonical.into());
        self
    }

    /// Timezone for timestamps that carry no UTC offset.
    #[must_use]
    pub const fn source_timezone(mut self, tz: Tz) -> Self {
        self.cfg.normalize.source_timezone = tz;
        self
    }

    /// Append session and calendar columns to every output series.
    #[must_use]
    pub fn enrich_with(mut self, calendar: Calendar) -> Self {
        self.cfg.calendar = Some(calendar);
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no timeframe was requested.
    pub fn build(self) -> Result<Pipeline, CandelaError> {
        Pipeline::from_config(self.cfg)
    }
}

impl Pipeline {
    /// Start building a new pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Build a pipeline from a deserialized configuration.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `cfg.timeframes` is empty.
    pub fn from_config(cfg: PipelineConfig) -> Result<Self, CandelaError> {
        if cfg.timeframes.is_empty() {
            return Err(CandelaError::InvalidArg(
                "no timeframes requested; add at least one via timeframe(...)".to_string(),
            ));
        }
        Ok(Self { cfg })
    }

    /// The configuration this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Normalize a raw table, then resample (and enrich, if configured).
    ///
    /// # Errors
    /// Any normalizer, engine or enricher error; no partial output is returned.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candela::pipeline::run",
            skip(self, table),
            fields(rows = table.len()),
        )
    )]
    pub fn run(&self, table: &RawTable) -> Result<ResampledSet, CandelaError> {
        let series = normalize(table, &self.cfg.normalize)?;
        self.run_series(&series)
    }

    /// Read a CSV file and run it through the pipeline.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`Pipeline::run`].
    pub fn run_csv(&self, path: impl AsRef<Path>) -> Result<ResampledSet, CandelaError> {
        let table = RawTable::from_csv_path(path)?;
        self.run(&table)
    }

    /// Resample (and enrich, if configured) an already canonical series.
    ///
    /// # Errors
    /// Engine and enricher errors, see [`candela_core::resample`] and
    /// [`candela_core::enrich`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candela::pipeline::run_series",
            skip(self, series),
            fields(rows = series.len(), timeframes = self.cfg.timeframes.len()),
        )
    )]
    pub fn run_series(&self, series: &BarSeries) -> Result<ResampledSet, CandelaError> {
        let malformed = count_malformed(series.bars());
        if malformed > 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(malformed, "bars with high/low outside open/close; passed through");
        }

        let out = resample(series, self.cfg.timeframes.iter().copied(), self.cfg.fill_policy)?;
        let Some(calendar) = &self.cfg.calendar else {
            return Ok(out);
        };
        out.into_iter()
            .map(|(tf, s)| enrich(&s, calendar).map(|e| (tf, e)))
            .collect()
    }
}
