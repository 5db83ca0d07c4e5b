// ============================================================================
// Operands
// Everything period-shaped that the algebra methods accept
// ============================================================================

use crate::domain::{parse_instant, PeriodOptions, PrecisionSpan, RollingPeriod, StepInterval};
use crate::errors::PeriodResult;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::ops::{Range, RangeInclusive};

/// An operand for the period algebra.
///
/// Built through `From`, so callers can pass spans, rolling periods, chrono
/// ranges, or raw string arguments directly.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Already a precision span
    Span(PrecisionSpan),
    /// A rolling period, converted on resolution
    Period(Cow<'a, RollingPeriod>),
    /// Foreign date range walked by `interval`
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
        interval: StepInterval,
        exclude_end: bool,
    },
    /// Raw construction arguments: start, end and an optional step
    Args {
        start: &'a str,
        end: &'a str,
        interval: Option<&'a str>,
    },
}

/// An operand reduced to one of the two shapes the adapter converts from.
#[derive(Debug, Clone)]
pub enum Normalized<'a> {
    Span(PrecisionSpan),
    Period(Cow<'a, RollingPeriod>),
}

impl<'a> Operand<'a> {
    /// Reduce to a span or a rolling period, parsing raw arguments.
    ///
    /// # Errors
    /// `Parse` for malformed dates or intervals.
    pub fn normalize(self) -> PeriodResult<Normalized<'a>> {
        let period = match self {
            Operand::Span(span) => return Ok(Normalized::Span(span)),
            Operand::Period(period) => return Ok(Normalized::Period(period)),
            Operand::Range {
                start,
                end,
                interval,
                exclude_end,
            } => RollingPeriod::new(
                start,
                Some(end),
                interval,
                PeriodOptions::NONE.with(PeriodOptions::EXCLUDE_END_DATE, exclude_end),
            ),
            Operand::Args {
                start,
                end,
                interval,
            } => {
                let interval = match interval {
                    Some(text) => text.parse()?,
                    None => StepInterval::day(),
                };
                RollingPeriod::new(
                    parse_instant(start)?,
                    Some(parse_instant(end)?),
                    interval,
                    PeriodOptions::NONE,
                )
            }
        };
        Ok(Normalized::Period(Cow::Owned(period)))
    }
}

impl From<PrecisionSpan> for Operand<'_> {
    fn from(span: PrecisionSpan) -> Self {
        Operand::Span(span)
    }
}

impl From<&PrecisionSpan> for Operand<'_> {
    fn from(span: &PrecisionSpan) -> Self {
        Operand::Span(*span)
    }
}

impl From<RollingPeriod> for Operand<'_> {
    fn from(period: RollingPeriod) -> Self {
        Operand::Period(Cow::Owned(period))
    }
}

impl<'a> From<&'a RollingPeriod> for Operand<'a> {
    fn from(period: &'a RollingPeriod) -> Self {
        Operand::Period(Cow::Borrowed(period))
    }
}

/// Half-open range: the end is excluded, one-day step.
impl From<Range<NaiveDateTime>> for Operand<'_> {
    fn from(range: Range<NaiveDateTime>) -> Self {
        Operand::Range {
            start: range.start,
            end: range.end,
            interval: StepInterval::day(),
            exclude_end: true,
        }
    }
}

/// Closed range, one-day step.
impl From<RangeInclusive<NaiveDateTime>> for Operand<'_> {
    fn from(range: RangeInclusive<NaiveDateTime>) -> Self {
        let (start, end) = range.into_inner();
        Operand::Range {
            start,
            end,
            interval: StepInterval::day(),
            exclude_end: false,
        }
    }
}

/// `(start, end, step)` with the end excluded, like a date-period iterator.
impl From<(NaiveDateTime, NaiveDateTime, StepInterval)> for Operand<'_> {
    fn from((start, end, interval): (NaiveDateTime, NaiveDateTime, StepInterval)) -> Self {
        Operand::Range {
            start,
            end,
            interval,
            exclude_end: true,
        }
    }
}

impl<'a> From<(&'a str, &'a str)> for Operand<'a> {
    fn from((start, end): (&'a str, &'a str)) -> Self {
        Operand::Args {
            start,
            end,
            interval: None,
        }
    }
}

impl<'a> From<(&'a str, &'a str, &'a str)> for Operand<'a> {
    fn from((start, end, interval): (&'a str, &'a str, &'a str)) -> Self {
        Operand::Args {
            start,
            end,
            interval: Some(interval),
        }
    }
}
