// ============================================================================
// Modern Span API
// Second-generation span algebra: opaque precision, single-result primitives
// ============================================================================

use crate::domain::{Boundaries, PrecisionSpan, RawPrecision, SpanCollection, SpanDuration};
use crate::engine::converter::Converter;
use crate::errors::SpanResult;
use crate::interfaces::{SpanAlgebra, SpanCapabilities};
use chrono::NaiveDateTime;

/// Second-generation span API with every primitive available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModernSpanAlgebra;

impl ModernSpanAlgebra {
    pub fn new() -> Self {
        Self
    }
}

impl SpanAlgebra for ModernSpanAlgebra {
    fn name(&self) -> &str {
        "modern"
    }

    fn capabilities(&self) -> SpanCapabilities {
        SpanCapabilities::modern()
    }

    fn make(
        &self,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        precision: RawPrecision,
        boundaries: Boundaries,
    ) -> SpanResult<PrecisionSpan> {
        PrecisionSpan::new(start, end, Converter::decode(precision), boundaries)
    }

    fn raw_precision(&self, span: &PrecisionSpan) -> RawPrecision {
        RawPrecision::Named(span.precision())
    }

    fn overlap_single(
        &self,
        span: &PrecisionSpan,
        other: &PrecisionSpan,
    ) -> SpanResult<Option<PrecisionSpan>> {
        span.overlap_single(other)
    }

    fn overlap_any(&self, span: &PrecisionSpan, others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        span.overlap_any(others)
    }

    fn diff_symmetric(&self, span: &PrecisionSpan, other: &PrecisionSpan) -> SpanResult<SpanCollection> {
        span.diff_symmetric(other)
    }

    fn subtract(&self, span: &PrecisionSpan, others: &[PrecisionSpan]) -> SpanResult<SpanCollection> {
        span.subtract(others)
    }

    fn duration(&self, span: &PrecisionSpan) -> SpanResult<SpanDuration> {
        span.duration()
    }
}
