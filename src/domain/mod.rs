// ============================================================================
// Domain Models Module
// Value types shared by the converter and the period algebra
// ============================================================================

pub mod config;
pub mod interval;
pub mod precision;
pub mod rolling_period;
pub mod span;

pub use config::{AlgebraConfig, SpanApiVersion};
pub use interval::StepInterval;
pub use precision::{Boundaries, IntervalName, Precision, RawPrecision};
pub use rolling_period::{parse_instant, PeriodOptions, RollingPeriod};
pub use span::{PrecisionSpan, SpanCollection, SpanDuration};
