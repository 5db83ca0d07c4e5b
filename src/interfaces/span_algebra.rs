// ============================================================================
// Span Algebra Interface
// Contract for span API versions and the capabilities they advertise
// ============================================================================

use crate::domain::{Boundaries, PrecisionSpan, RawPrecision, SpanCollection, SpanDuration};
use crate::errors::{SpanError, SpanResult};
use chrono::NaiveDateTime;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which primitives a span API version provides.
///
/// Read once when the adapter is built; nothing is re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpanCapabilities {
    /// Precision is an opaque named value rather than an integer mask
    pub named_precision: bool,
    /// `overlap_single` is available (otherwise only collection `overlap`)
    pub single_overlap: bool,
    /// `overlap_any` is available (otherwise collection `overlap`)
    pub overlap_any: bool,
    /// `diff_symmetric` is available (otherwise `diff_single`)
    pub symmetric_diff: bool,
    /// `subtract` is available (otherwise `diff`)
    pub subtract: bool,
    /// `duration` is available
    pub duration: bool,
}

impl SpanCapabilities {
    /// First-generation API shape
    pub const fn legacy() -> Self {
        Self {
            named_precision: false,
            single_overlap: false,
            overlap_any: false,
            symmetric_diff: false,
            subtract: false,
            duration: false,
        }
    }

    /// Second-generation API shape
    pub const fn modern() -> Self {
        Self {
            named_precision: true,
            single_overlap: true,
            overlap_any: true,
            symmetric_diff: true,
            subtract: true,
            duration: true,
        }
    }

    /// True when every modern primitive is present.
    pub fn is_complete(&self) -> bool {
        *self == Self::modern()
    }
}

impl fmt::Display for SpanCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            ("named_precision", self.named_precision),
            ("single_overlap", self.single_overlap),
            ("overlap_any", self.overlap_any),
            ("symmetric_diff", self.symmetric_diff),
            ("subtract", self.subtract),
            ("duration", self.duration),
        ];
        let enabled: Vec<&str> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        write!(f, "[{}]", enabled.join(", "))
    }
}

/// A span API version.
///
/// Both naming conventions are part of the contract; a version implements the
/// ones it has and reports them through [`SpanAlgebra::capabilities`]. The
/// defaults fail with [`SpanError::Backend`].
pub trait SpanAlgebra: Send + Sync {
    /// Name for logging
    fn name(&self) -> &str;

    fn capabilities(&self) -> SpanCapabilities;

    /// Construct a span from this version's precision encoding.
    fn make(
        &self,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        precision: RawPrecision,
        boundaries: Boundaries,
    ) -> SpanResult<PrecisionSpan>;

    /// Precision of `span` in this version's encoding.
    fn raw_precision(&self, span: &PrecisionSpan) -> RawPrecision;

    fn length(&self, span: &PrecisionSpan) -> SpanResult<i64> {
        span.length()
    }

    fn overlaps_with(&self, span: &PrecisionSpan, other: &PrecisionSpan) -> SpanResult<bool> {
        span.overlaps_with(other)
    }

    fn touches_with(&self, span: &PrecisionSpan, other: &PrecisionSpan) -> SpanResult<bool> {
        span.touches_with(other)
    }

    fn gap(&self, span: &PrecisionSpan, other: &PrecisionSpan) -> SpanResult<Option<PrecisionSpan>> {
        span.gap(other)
    }

    fn overlap_all(
        &self,
        span: &PrecisionSpan,
        others: &[PrecisionSpan],
    ) -> SpanResult<Option<PrecisionSpan>> {
        span.overlap_all(others)
    }

    // ---- Second-generation names ----

    fn overlap_single(
        &self,
        _span: &PrecisionSpan,
        _other: &PrecisionSpan,
    ) -> SpanResult<Option<PrecisionSpan>> {
        Err(missing(self.name(), "overlap_single"))
    }

    fn overlap_any(&self, _span: &PrecisionSpan, _others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        Err(missing(self.name(), "overlap_any"))
    }

    fn diff_symmetric(&self, _span: &PrecisionSpan, _other: &PrecisionSpan) -> SpanResult<SpanCollection> {
        Err(missing(self.name(), "diff_symmetric"))
    }

    fn subtract(&self, _span: &PrecisionSpan, _others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        Err(missing(self.name(), "subtract"))
    }

    fn duration(&self, _span: &PrecisionSpan) -> SpanResult<SpanDuration> {
        Err(missing(self.name(), "duration"))
    }

    // ---- First-generation names ----

    /// Collection-shaped overlap with every operand.
    fn overlap(&self, _span: &PrecisionSpan, _others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        Err(missing(self.name(), "overlap"))
    }

    fn diff_single(&self, _span: &PrecisionSpan, _other: &PrecisionSpan) -> SpanResult<SpanCollection> {
        Err(missing(self.name(), "diff_single"))
    }

    fn diff(&self, _span: &PrecisionSpan, _others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        Err(missing(self.name(), "diff"))
    }
}

fn missing(backend: &str, method: &str) -> SpanError {
    SpanError::Backend(format!("{backend} does not provide {method}()"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Precision;

    struct Bare;

    impl SpanAlgebra for Bare {
        fn name(&self) -> &str {
            "bare"
        }

        fn capabilities(&self) -> SpanCapabilities {
            SpanCapabilities::legacy()
        }

        fn make(
            &self,
            start: NaiveDateTime,
            end: Option<NaiveDateTime>,
            _precision: RawPrecision,
            boundaries: Boundaries,
        ) -> SpanResult<PrecisionSpan> {
            PrecisionSpan::new(start, end, Precision::Day, boundaries)
        }

        fn raw_precision(&self, span: &PrecisionSpan) -> RawPrecision {
            RawPrecision::Mask(span.precision().mask())
        }
    }

    #[test]
    fn test_capability_presets() {
        assert!(SpanCapabilities::modern().is_complete());
        assert!(!SpanCapabilities::legacy().is_complete());
        assert_eq!(SpanCapabilities::legacy().to_string(), "[]");
        assert!(SpanCapabilities::modern().to_string().contains("duration"));
    }

    #[test]
    fn test_missing_primitives_fail() {
        let start = chrono::NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let span = Bare
            .make(start, Some(start), RawPrecision::Mask(0b111000), Boundaries::ExcludeNone)
            .unwrap();

        assert_eq!(
            Bare.duration(&span),
            Err(SpanError::Backend("bare does not provide duration()".to_string()))
        );
        assert!(Bare.overlap_single(&span, &span).is_err());
        assert_eq!(Bare.length(&span), Ok(1));
    }

    #[test]
    fn test_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SpanAlgebra>();
    }
}
