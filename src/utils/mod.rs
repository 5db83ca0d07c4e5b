// ============================================================================
// Utilities Module
// Helper functions shared by binaries, tests and benchmarks
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::{init_logging, init_logging_with};
