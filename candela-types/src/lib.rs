//! Candela data model, timeframe identifiers, configuration primitives and the
//! workspace error type.
#![warn(missing_docs)]

mod bar;
mod calendar;
mod config;
mod error;
mod timeframe;

pub use bar::{Bar, BarSeries, Value};
pub use calendar::{Calendar, SessionWindow};
pub use config::{FillPolicy, NormalizeOptions, PipelineConfig};
pub use error::CandelaError;
pub use timeframe::{TimeUnit, Timeframe, TimeframeKind};

/// Re-exported decimal type used for prices and volume.
pub use rust_decimal::Decimal;
/// Re-exported IANA timezone type used by normalization and calendars.
pub use chrono_tz::Tz;
