// ============================================================================
// Engine Module
// Span API backends, precision conversion and the period algebra adapter
// ============================================================================

mod converter;
mod legacy;
mod modern;
mod operand;
mod period_algebra;

pub mod factory;

pub use converter::{Converter, PrecisionInput};
pub use factory::{create_backend, create_from_config, create_with_backend, PeriodAlgebraBuilder};
pub use legacy::LegacySpanAlgebra;
pub use modern::ModernSpanAlgebra;
pub use operand::{Normalized, Operand};
pub use period_algebra::PeriodAlgebra;
