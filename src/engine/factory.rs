// ============================================================================
// Period Algebra Factory
// Creates period algebra adapters with proper configuration
// ============================================================================

use crate::domain::config::{AlgebraConfig, SpanApiVersion};
use crate::engine::{LegacySpanAlgebra, ModernSpanAlgebra, PeriodAlgebra};
use crate::errors::{PeriodError, PeriodResult};
use crate::interfaces::SpanAlgebra;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a period algebra from configuration
///
/// # Example
/// ```
/// use period_algebra::prelude::*;
///
/// let algebra = create_from_config(AlgebraConfig::legacy_compatible()).unwrap();
/// assert_eq!(algebra.backend_name(), "legacy");
/// ```
pub fn create_from_config(config: AlgebraConfig) -> PeriodResult<PeriodAlgebra> {
    let backend = create_backend(config.api_version);
    create_with_backend(config, backend)
}

/// Creates a period algebra over a caller-supplied span API
///
/// Only the compatibility settings of `config` apply; its version is ignored.
pub fn create_with_backend(
    config: AlgebraConfig,
    backend: Arc<dyn SpanAlgebra>,
) -> PeriodResult<PeriodAlgebra> {
    config.validate().map_err(PeriodError::Config)?;

    if config.require_modern_api && !backend.capabilities().is_complete() {
        return Err(PeriodError::Config(format!(
            "span API '{}' lacks second-generation primitives ({})",
            backend.name(),
            backend.capabilities()
        )));
    }

    Ok(PeriodAlgebra::new(backend).with_legacy_defect_suppression(config.suppress_legacy_defects))
}

/// Creates the span API for a version
pub fn create_backend(version: SpanApiVersion) -> Arc<dyn SpanAlgebra> {
    match version {
        SpanApiVersion::Legacy => Arc::new(LegacySpanAlgebra::new()),
        SpanApiVersion::Modern => Arc::new(ModernSpanAlgebra::new()),
    }
}

impl Default for PeriodAlgebra {
    fn default() -> Self {
        PeriodAlgebra::new(create_backend(SpanApiVersion::Modern))
    }
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for period algebra adapters
///
/// # Example
/// ```
/// use period_algebra::prelude::*;
///
/// let algebra = PeriodAlgebraBuilder::new()
///     .legacy_api()
///     .suppress_legacy_defects(false)
///     .build()
///     .unwrap();
/// assert!(!algebra.capabilities().duration);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PeriodAlgebraBuilder {
    config: AlgebraConfig,
}

impl PeriodAlgebraBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the first-generation span API
    pub fn legacy_api(mut self) -> Self {
        self.config.api_version = SpanApiVersion::Legacy;
        self
    }

    /// Drive the second-generation span API (default)
    pub fn modern_api(mut self) -> Self {
        self.config.api_version = SpanApiVersion::Modern;
        self
    }

    pub fn suppress_legacy_defects(mut self, on: bool) -> Self {
        self.config.suppress_legacy_defects = on;
        self
    }

    pub fn require_modern_api(mut self, on: bool) -> Self {
        self.config.require_modern_api = on;
        self
    }

    /// Start from a preset configuration
    pub fn from_config(config: AlgebraConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> PeriodResult<PeriodAlgebra> {
        create_from_config(self.config)
    }

    pub fn get_config(&self) -> &AlgebraConfig {
        &self.config
    }
}
