// ============================================================================
// Interfaces Module
// Contains the span algebra contract
// ============================================================================

mod span_algebra;

pub use span_algebra::{SpanAlgebra, SpanCapabilities};
