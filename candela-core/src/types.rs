//! Re-export of foundational types from `candela-types`.
// Consolidated re-exports so downstream crates can depend on `candela-core` only

pub use candela_types::{Bar, BarSeries, Decimal, Tz, Value};
pub use candela_types::{Calendar, SessionWindow};
pub use candela_types::{CandelaError, FillPolicy, NormalizeOptions, PipelineConfig};
pub use candela_types::{TimeUnit, Timeframe, TimeframeKind};
