// ============================================================================
// Period Algebra
// Rolling period <-> precision span round trips and set operations
// ============================================================================

use super::converter::Converter;
use super::operand::{Normalized, Operand};
use crate::domain::{
    Boundaries, PeriodOptions, PrecisionSpan, RollingPeriod, SpanCollection, SpanDuration,
};
use crate::errors::{PeriodError, PeriodResult};
use crate::interfaces::{SpanAlgebra, SpanCapabilities};
use std::fmt;
use std::sync::Arc;

/// Method whose missing receiver the legacy `overlap_all` trips over.
const LEGACY_OVERLAP_ALL_RECEIVER: &str = "overlap_single";

/// Adapter running rolling periods through a span API.
///
/// Every operation converts the period to a span, resolves the operands,
/// delegates to the span API and converts the results back. Results carry
/// the mutability of the period they were computed from.
pub struct PeriodAlgebra {
    /// Span API in use
    backend: Arc<dyn SpanAlgebra>,

    /// Capabilities read from the backend at construction
    capabilities: SpanCapabilities,

    /// Map the legacy `overlap_all` missing-receiver failure to `None`
    suppress_legacy_defects: bool,
}

impl fmt::Debug for PeriodAlgebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodAlgebra")
            .field("backend", &self.backend.name())
            .field("capabilities", &self.capabilities)
            .field("suppress_legacy_defects", &self.suppress_legacy_defects)
            .finish()
    }
}

impl PeriodAlgebra {
    /// Create a new adapter over a span API
    pub fn new(backend: Arc<dyn SpanAlgebra>) -> Self {
        let capabilities = backend.capabilities();
        tracing::debug!(
            backend = backend.name(),
            %capabilities,
            "period algebra ready"
        );

        Self {
            backend,
            capabilities,
            suppress_legacy_defects: true,
        }
    }

    /// Builder method: toggle the legacy `overlap_all` shim
    pub fn with_legacy_defect_suppression(mut self, on: bool) -> Self {
        self.suppress_legacy_defects = on;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn capabilities(&self) -> SpanCapabilities {
        self.capabilities
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Convert a rolling period to a precision span.
    ///
    /// # Errors
    /// `Validation` when the step is not a single unit with quantity one.
    pub fn to_span(&self, period: &RollingPeriod) -> PeriodResult<PrecisionSpan> {
        let precision = Converter::interval_to_precision(&period.interval(), &self.capabilities)?;
        let floored = period.clone().floor()?;
        let end = floored.calculate_end()?;
        let boundaries = Boundaries::from_flags(floored.is_start_excluded(), floored.is_end_excluded());

        Ok(self.backend.make(floored.start(), end, precision, boundaries)?)
    }

    /// Convert a span back to a rolling period.
    ///
    /// `mutable` decides the result's mutability regardless of the span.
    pub fn from_span(&self, span: &PrecisionSpan, mutable: bool) -> RollingPeriod {
        let interval = Converter::precision_to_interval(self.backend.raw_precision(span));
        let options = PeriodOptions::NONE
            .with(PeriodOptions::IMMUTABLE, !mutable)
            .with(PeriodOptions::EXCLUDE_START_DATE, span.is_start_excluded())
            .with(PeriodOptions::EXCLUDE_END_DATE, span.is_end_excluded());

        RollingPeriod::new(span.start(), span.end(), interval, options)
    }

    pub fn from_span_or_none(
        &self,
        span: Option<&PrecisionSpan>,
        mutable: bool,
    ) -> Option<RollingPeriod> {
        span.map(|span| self.from_span(span, mutable))
    }

    /// Convert every span, preserving order.
    ///
    /// Positional only; use [`PeriodAlgebra::from_keyed_spans`] when each
    /// span carries a key.
    pub fn from_span_collection(&self, spans: &[PrecisionSpan], mutable: bool) -> Vec<RollingPeriod> {
        spans.iter().map(|span| self.from_span(span, mutable)).collect()
    }

    /// Convert keyed spans, keeping every key with its period.
    pub fn from_keyed_spans<K, I>(&self, spans: I, mutable: bool) -> Vec<(K, RollingPeriod)>
    where
        I: IntoIterator<Item = (K, PrecisionSpan)>,
    {
        spans
            .into_iter()
            .map(|(key, span)| (key, self.from_span(&span, mutable)))
            .collect()
    }

    /// Convert only the first span of a collection.
    pub fn from_first_of(&self, spans: &[PrecisionSpan], mutable: bool) -> Option<RollingPeriod> {
        self.from_span_or_none(spans.first(), mutable)
    }

    /// Turn any period-shaped operand into a span.
    ///
    /// # Errors
    /// Parse errors from raw arguments and validation errors from the step.
    pub fn resolve_operand<'a>(&self, operand: impl Into<Operand<'a>>) -> PeriodResult<PrecisionSpan> {
        match operand.into().normalize()? {
            Normalized::Span(span) => Ok(span),
            Normalized::Period(period) => self.to_span(&period),
        }
    }

    fn resolve_all<'a, I>(&self, operands: I) -> PeriodResult<Vec<PrecisionSpan>>
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a>>,
    {
        operands
            .into_iter()
            .map(|operand| self.resolve_operand(operand))
            .collect()
    }

    fn collect(&self, period: &RollingPeriod, spans: SpanCollection) -> Vec<RollingPeriod> {
        self.from_span_collection(&spans, !period.is_immutable())
    }

    fn single(&self, period: &RollingPeriod, span: Option<PrecisionSpan>) -> Option<RollingPeriod> {
        self.from_span_or_none(span.as_ref(), !period.is_immutable())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of precision units covered by the period.
    pub fn length(&self, period: &RollingPeriod) -> PeriodResult<i64> {
        let span = self.to_span(period)?;
        Ok(self.backend.length(&span)?)
    }

    pub fn overlaps_with<'a>(
        &self,
        period: &RollingPeriod,
        other: impl Into<Operand<'a>>,
    ) -> PeriodResult<bool> {
        let span = self.to_span(period)?;
        let other = self.resolve_operand(other)?;
        Ok(self.backend.overlaps_with(&span, &other)?)
    }

    pub fn touches_with<'a>(
        &self,
        period: &RollingPeriod,
        other: impl Into<Operand<'a>>,
    ) -> PeriodResult<bool> {
        let span = self.to_span(period)?;
        let other = self.resolve_operand(other)?;
        Ok(self.backend.touches_with(&span, &other)?)
    }

    /// # Errors
    /// `UnsupportedOperation` when the span API has no `duration`.
    pub fn duration(&self, period: &RollingPeriod) -> PeriodResult<SpanDuration> {
        if !self.capabilities.duration {
            return Err(PeriodError::UnsupportedOperation {
                operation: "duration",
                minimum_version: "2.0",
            });
        }

        let span = self.to_span(period)?;
        Ok(self.backend.duration(&span)?)
    }

    // ========================================================================
    // Set operations
    // ========================================================================

    /// Overlap with one operand, `None` if disjoint.
    pub fn overlap<'a>(
        &self,
        period: &RollingPeriod,
        other: impl Into<Operand<'a>>,
    ) -> PeriodResult<Option<RollingPeriod>> {
        let span = self.to_span(period)?;
        let other = self.resolve_operand(other)?;

        if self.capabilities.single_overlap {
            let overlap = self.backend.overlap_single(&span, &other)?;
            return Ok(self.single(period, overlap));
        }

        tracing::debug!(backend = self.backend_name(), "no overlap_single, using first of overlap");
        let overlaps = self.backend.overlap(&span, &[other])?;
        Ok(self.from_first_of(&overlaps, !period.is_immutable()))
    }

    /// Chunks of the period that intersect each operand.
    ///
    /// ```text
    /// A        [========]
    /// B                     [==]
    /// C                             [=====]
    /// CURRENT        [================]
    ///
    /// OVERLAP        [==]   [==]    [=]
    /// ```
    pub fn overlap_any<'a, I>(&self, period: &RollingPeriod, others: I) -> PeriodResult<Vec<RollingPeriod>>
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a>>,
    {
        let span = self.to_span(period)?;
        let others = self.resolve_all(others)?;

        let chunks = if self.capabilities.overlap_any {
            self.backend.overlap_any(&span, &others)?
        } else {
            self.backend.overlap(&span, &others)?
        };
        Ok(self.collect(period, chunks))
    }

    /// Region common to the period and every operand.
    ///
    /// ```text
    /// A              [============]
    /// B                   [==]
    /// C                  [=======]
    ///
    /// OVERLAP             [==]
    /// ```
    pub fn overlap_all<'a, I>(&self, period: &RollingPeriod, others: I) -> PeriodResult<Option<RollingPeriod>>
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a>>,
    {
        let span = self.to_span(period)?;
        let others = self.resolve_all(others)?;

        match self.backend.overlap_all(&span, &others) {
            Ok(overlap) => Ok(self.single(period, overlap)),
            Err(err) if self.suppress_legacy_defects && err.is_null_receiver(LEGACY_OVERLAP_ALL_RECEIVER) => {
                tracing::debug!(
                    backend = self.backend_name(),
                    "overlap_all lost its receiver, no common region"
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Parts covered by exactly one of the period and the operand.
    pub fn diff_any<'a>(
        &self,
        period: &RollingPeriod,
        other: impl Into<Operand<'a>>,
    ) -> PeriodResult<Vec<RollingPeriod>> {
        let span = self.to_span(period)?;
        let other = self.resolve_operand(other)?;

        let pieces = if self.capabilities.symmetric_diff {
            self.backend.diff_symmetric(&span, &other)?
        } else {
            self.backend.diff_single(&span, &other)?
        };
        Ok(self.collect(period, pieces))
    }

    /// Parts of the period not covered by any operand.
    ///
    /// ```text
    /// A                   [====]
    /// B                               [========]
    /// C         [=====]
    /// CURRENT      [========================]
    ///
    /// DIFF             [=]      [====]
    /// ```
    pub fn diff<'a, I>(&self, period: &RollingPeriod, others: I) -> PeriodResult<Vec<RollingPeriod>>
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a>>,
    {
        let span = self.to_span(period)?;
        let others = self.resolve_all(others)?;

        let pieces = if self.capabilities.subtract {
            self.backend.subtract(&span, &others)?
        } else {
            self.backend.diff(&span, &others)?
        };
        Ok(self.collect(period, pieces))
    }

    /// Span strictly between the period and the operand.
    ///
    /// ```text
    /// A       [========]
    /// B                     [===========]
    ///
    /// GAP               [==]
    /// ```
    pub fn gap<'a>(
        &self,
        period: &RollingPeriod,
        other: impl Into<Operand<'a>>,
    ) -> PeriodResult<Option<RollingPeriod>> {
        let span = self.to_span(period)?;
        let other = self.resolve_operand(other)?;
        let gap = self.backend.gap(&span, &other)?;
        Ok(self.single(period, gap))
    }
}
