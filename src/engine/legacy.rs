// ============================================================================
// Legacy Span API
// First-generation span algebra: mask precision, collection-shaped results
// ============================================================================

use crate::domain::{Boundaries, Precision, PrecisionSpan, RawPrecision, SpanCollection};
use crate::errors::{SpanError, SpanResult};
use crate::interfaces::{SpanAlgebra, SpanCapabilities};
use chrono::NaiveDateTime;

/// First-generation span API.
///
/// Precision travels as an integer mask, overlaps come back as collections,
/// and there is no `duration`. `overlap_all` keeps the first-generation fold, which
/// fails with [`SpanError::NullReceiver`] once an intermediate overlap is
/// empty and further operands remain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySpanAlgebra;

impl LegacySpanAlgebra {
    pub fn new() -> Self {
        Self
    }
}

impl SpanAlgebra for LegacySpanAlgebra {
    fn name(&self) -> &str {
        "legacy"
    }

    fn capabilities(&self) -> SpanCapabilities {
        SpanCapabilities::legacy()
    }

    fn make(
        &self,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        precision: RawPrecision,
        boundaries: Boundaries,
    ) -> SpanResult<PrecisionSpan> {
        let level = match precision {
            RawPrecision::Mask(mask) => Precision::from_mask(i64::from(mask))
                .ok_or_else(|| SpanError::Backend(format!("invalid precision mask {mask:#b}")))?,
            RawPrecision::Named(level) => {
                return Err(SpanError::Backend(format!(
                    "legacy span API expects a precision mask, got {level}"
                )))
            }
        };
        PrecisionSpan::new(start, end, level, boundaries)
    }

    fn raw_precision(&self, span: &PrecisionSpan) -> RawPrecision {
        RawPrecision::Mask(span.precision().mask())
    }

    fn overlap_all(
        &self,
        span: &PrecisionSpan,
        others: &[PrecisionSpan],
    ) -> SpanResult<Option<PrecisionSpan>> {
        let mut overlap = Some(*span);
        for other in others {
            let receiver = overlap.ok_or(SpanError::NullReceiver {
                method: "overlap_single",
            })?;
            overlap = receiver.overlap_single(other)?;
        }
        Ok(overlap)
    }

    fn overlap(&self, span: &PrecisionSpan, others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        span.overlap_any(others)
    }

    fn diff_single(&self, span: &PrecisionSpan, other: &PrecisionSpan) -> SpanResult<SpanCollection> {
        span.diff_symmetric(other)
    }

    fn diff(&self, span: &PrecisionSpan, others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        span.subtract(others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_instant;

    fn span(start: &str, end: &str) -> PrecisionSpan {
        LegacySpanAlgebra
            .make(
                parse_instant(start).unwrap(),
                Some(parse_instant(end).unwrap()),
                RawPrecision::Mask(0b111000),
                Boundaries::ExcludeNone,
            )
            .unwrap()
    }

    #[test]
    fn test_make_requires_mask() {
        let start = parse_instant("2018-01-01").unwrap();
        let named = LegacySpanAlgebra.make(start, None, RawPrecision::Named(Precision::Day), Boundaries::ExcludeNone);
        assert!(matches!(named, Err(SpanError::Backend(_))));

        let bad_mask = LegacySpanAlgebra.make(start, None, RawPrecision::Mask(0b101), Boundaries::ExcludeNone);
        assert!(matches!(bad_mask, Err(SpanError::Backend(_))));
    }

    #[test]
    fn test_raw_precision_is_mask() {
        let s = span("2018-01-01", "2018-01-10");
        assert_eq!(LegacySpanAlgebra.raw_precision(&s), RawPrecision::Mask(0b111000));
    }

    #[test]
    fn test_overlap_all_null_receiver_defect() {
        let a = span("2018-01-01", "2018-02-01");
        let b = span("2018-05-10", "2018-06-01");
        let c = span("2018-01-10", "2018-02-01");

        assert_eq!(
            LegacySpanAlgebra.overlap_all(&a, &[b, c]),
            Err(SpanError::NullReceiver {
                method: "overlap_single"
            })
        );
        // Disjoint last operand: nothing left to call on, so no defect
        assert_eq!(LegacySpanAlgebra.overlap_all(&a, &[c, b]), Ok(None));
    }

    #[test]
    fn test_second_generation_names_missing() {
        let s = span("2018-01-01", "2018-01-10");
        assert!(LegacySpanAlgebra.overlap_single(&s, &s).is_err());
        assert!(LegacySpanAlgebra.duration(&s).is_err());
        assert!(LegacySpanAlgebra.subtract(&s, &[]).is_err());
    }

    #[test]
    fn test_collection_overlap() {
        let a = span("2018-01-01", "2018-01-15");
        let b = span("2018-01-10", "2018-01-30");
        assert_eq!(
            LegacySpanAlgebra.overlap(&a, &[b]).unwrap(),
            vec![span("2018-01-10", "2018-01-15")]
        );
    }
}
