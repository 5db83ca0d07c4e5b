// ============================================================================
// Errors
// Error types for period conversion and span algebra
// ============================================================================

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised by the span algebra backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// A backend method was invoked on a span that does not exist.
    ///
    /// The legacy `overlap_all` folds `overlap_single` over its operands and
    /// hits this as soon as an intermediate overlap is empty.
    #[error("call to {method}() on a missing span")]
    NullReceiver { method: &'static str },

    /// The operation needs a span with an end instant.
    #[error("{operation}() requires a span with an end")]
    Unbounded { operation: &'static str },

    /// End instant lies before the start instant.
    #[error("span end {end} is before its start {start}")]
    Inverted {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Calendar arithmetic left the representable range
    #[error("calendar arithmetic overflow")]
    Overflow,

    /// Any other backend failure
    #[error("{0}")]
    Backend(String),
}

impl SpanError {
    /// True for the null-receiver shape produced by the given method.
    #[inline]
    pub fn is_null_receiver(&self, name: &str) -> bool {
        matches!(self, SpanError::NullReceiver { method } if *method == name)
    }
}

/// Errors surfaced by the converter and the period algebra adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// The step interval is not a single unit with quantity one.
    #[error("{0}")]
    Validation(String),

    /// The linked span API does not provide the requested operation.
    #[error("{operation}() method is only available since span API {minimum_version}.")]
    UnsupportedOperation {
        operation: &'static str,
        minimum_version: &'static str,
    },

    /// An operand could not be parsed.
    #[error("could not parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// Adapter configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Span(#[from] SpanError),
}

impl PeriodError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PeriodError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for span algebra operations
pub type SpanResult<T> = Result<T, SpanError>;

/// Result type alias for conversion and adapter operations
pub type PeriodResult<T> = Result<T, PeriodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PeriodError::UnsupportedOperation {
            operation: "duration",
            minimum_version: "2.0",
        };
        assert_eq!(
            err.to_string(),
            "duration() method is only available since span API 2.0."
        );
        assert_eq!(
            SpanError::NullReceiver {
                method: "overlap_single"
            }
            .to_string(),
            "call to overlap_single() on a missing span"
        );
    }

    #[test]
    fn test_span_error_converts() {
        let err: PeriodError = SpanError::Overflow.into();
        assert_eq!(err, PeriodError::Span(SpanError::Overflow));
        assert_eq!(err.to_string(), "calendar arithmetic overflow");
    }

    #[test]
    fn test_null_receiver_match_is_narrow() {
        let err = SpanError::NullReceiver {
            method: "overlap_single",
        };
        assert!(err.is_null_receiver("overlap_single"));
        assert!(!err.is_null_receiver("overlap"));
        assert!(!SpanError::Overflow.is_null_receiver("overlap_single"));
    }
}
