// ============================================================================
// Algebra Configuration
// Span API selection and compatibility behaviour of the adapter
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Span API Version
// ============================================================================

/// Which generation of the span API the adapter drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpanApiVersion {
    /// First generation
    /// - Precision encoded as an integer bitmask
    /// - Collection-shaped `overlap`, `diff_single`, `diff`
    /// - No `duration`
    Legacy,

    /// Second generation
    /// - Precision is an opaque named value
    /// - `overlap_single`, `overlap_any`, `diff_symmetric`, `subtract`, `duration`
    #[default]
    Modern,
}

// ============================================================================
// Complete Algebra Configuration
// ============================================================================

/// Configuration for building a period algebra adapter
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlgebraConfig {
    /// Span API generation to drive
    pub api_version: SpanApiVersion,

    /// Turn the legacy `overlap_all` missing-span failure into "no common region"
    pub suppress_legacy_defects: bool,

    /// Refuse to build against a span API lacking any second-generation primitive
    pub require_modern_api: bool,
}

impl Default for AlgebraConfig {
    fn default() -> Self {
        Self::new(SpanApiVersion::Modern)
    }
}

impl AlgebraConfig {
    /// Create a new configuration with compatibility shims enabled
    pub fn new(api_version: SpanApiVersion) -> Self {
        Self {
            api_version,
            suppress_legacy_defects: true,
            require_modern_api: false,
        }
    }

    /// Builder method: toggle the legacy defect shim
    pub fn with_legacy_defect_suppression(mut self, on: bool) -> Self {
        self.suppress_legacy_defects = on;
        self
    }

    /// Builder method: demand the second-generation API
    pub fn with_modern_api_required(mut self, on: bool) -> Self {
        self.require_modern_api = on;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.require_modern_api && self.api_version == SpanApiVersion::Legacy {
            return Err("Legacy span API cannot satisfy require_modern_api".to_string());
        }

        Ok(())
    }

    /// Parse a configuration from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl AlgebraConfig {
    /// Legacy API with the compatibility shim on
    pub fn legacy_compatible() -> Self {
        Self::new(SpanApiVersion::Legacy)
    }

    /// Modern API, shims left on for mixed deployments
    pub fn modern() -> Self {
        Self::new(SpanApiVersion::Modern)
    }

    /// Modern API only, no compatibility shims
    pub fn strict() -> Self {
        Self::new(SpanApiVersion::Modern)
            .with_legacy_defect_suppression(false)
            .with_modern_api_required(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = AlgebraConfig::new(SpanApiVersion::Legacy);

        assert_eq!(config.api_version, SpanApiVersion::Legacy);
        assert!(config.suppress_legacy_defects);
        assert!(!config.require_modern_api);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_is_modern() {
        assert_eq!(AlgebraConfig::default(), AlgebraConfig::modern());
    }

    #[test]
    fn test_validation() {
        let config = AlgebraConfig::legacy_compatible().with_modern_api_required(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_configs() {
        let strict = AlgebraConfig::strict();
        assert!(strict.require_modern_api);
        assert!(!strict.suppress_legacy_defects);
        assert!(strict.validate().is_ok());

        let legacy = AlgebraConfig::legacy_compatible();
        assert!(matches!(legacy.api_version, SpanApiVersion::Legacy));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let config = AlgebraConfig::from_json(
            r#"{"api_version":"Legacy","suppress_legacy_defects":false,"require_modern_api":false}"#,
        )
        .unwrap();
        assert_eq!(config.api_version, SpanApiVersion::Legacy);
        assert!(!config.suppress_legacy_defects);

        let invalid = AlgebraConfig::from_json(
            r#"{"api_version":"Legacy","suppress_legacy_defects":true,"require_modern_api":true}"#,
        );
        assert!(invalid.is_err());
    }
}
