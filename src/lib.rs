// ============================================================================
// Period Algebra Library
// Lossless rolling period <-> precision span conversion with set algebra
// ============================================================================

//! # Period Algebra
//!
//! Converts calendar-stepped rolling periods into fixed-precision spans and
//! back, and exposes span set operations directly on rolling periods.
//!
//! ## Features
//!
//! - **Lossless round trips** between periods stepped by one calendar unit and spans
//! - **Two span API generations** behind one trait, chosen at construction
//! - **Set algebra**: overlap, overlap-any, overlap-all, symmetric diff, subtract, gap
//! - **Flexible operands**: spans, periods, chrono ranges or raw string arguments
//!
//! ## Example
//!
//! ```rust
//! use period_algebra::prelude::*;
//!
//! let algebra = PeriodAlgebra::default();
//!
//! let a = RollingPeriod::create("2018-01-01", "2018-01-10").unwrap();
//! let b = RollingPeriod::create("2018-01-15", "2018-01-31").unwrap();
//!
//! let gap = algebra.gap(&a, &b).unwrap().unwrap();
//! assert_eq!(gap.to_string(), "Every 1 day from 2018-01-11 to 2018-01-14");
//!
//! // Raw arguments work as operands too
//! let hours = RollingPeriod::create_with_interval("2019-09-01 08:02", "2019-09-01 15:03", "1 hour").unwrap();
//! assert!(algebra.touches_with(&hours, ("2019-09-01 16:00", "2019-09-01 18:00", "1 hour")).unwrap());
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        parse_instant, AlgebraConfig, Boundaries, PeriodOptions, Precision, PrecisionSpan,
        RawPrecision, RollingPeriod, SpanApiVersion, SpanCollection, SpanDuration, StepInterval,
    };
    pub use crate::engine::{
        create_from_config, Converter, LegacySpanAlgebra, ModernSpanAlgebra, Operand,
        PeriodAlgebra, PeriodAlgebraBuilder,
    };
    pub use crate::errors::{PeriodError, PeriodResult, SpanError, SpanResult};
    pub use crate::interfaces::{SpanAlgebra, SpanCapabilities};
}
