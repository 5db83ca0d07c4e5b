// ============================================================================
// Precision Converter
// Translation between step intervals and precision levels
// ============================================================================

use crate::domain::{IntervalName, Precision, RawPrecision, StepInterval};
use crate::errors::{PeriodError, PeriodResult};
use crate::interfaces::SpanCapabilities;

const NOT_CONVERTIBLE: &str = "Only periods with 1 year, 1 month, 1 day, 1 hour, 1 minute or 1 second \
                               interval can be converted to a precision span";

/// Any shape a precision may arrive in when read back from a span API.
#[derive(Clone, Copy)]
pub enum PrecisionInput<'a> {
    /// Short code (`y m d h i s`), unit name, or a mask written as text
    Text(&'a str),
    /// Raw integer mask
    Mask(i64),
    /// Opaque value able to report its unit name
    Named(&'a dyn IntervalName),
    /// A span API's own encoding
    Raw(RawPrecision),
}

impl<'a> From<&'a str> for PrecisionInput<'a> {
    fn from(text: &'a str) -> Self {
        PrecisionInput::Text(text)
    }
}

impl From<i64> for PrecisionInput<'_> {
    fn from(mask: i64) -> Self {
        PrecisionInput::Mask(mask)
    }
}

impl From<u8> for PrecisionInput<'_> {
    fn from(mask: u8) -> Self {
        PrecisionInput::Mask(i64::from(mask))
    }
}

impl From<RawPrecision> for PrecisionInput<'_> {
    fn from(raw: RawPrecision) -> Self {
        PrecisionInput::Raw(raw)
    }
}

impl From<Precision> for PrecisionInput<'_> {
    fn from(level: Precision) -> Self {
        PrecisionInput::Raw(RawPrecision::Named(level))
    }
}

/// Stateless conversions between [`StepInterval`] and [`Precision`].
///
/// The only place that interprets unit semantics or mask bits.
pub struct Converter;

impl Converter {
    /// Level of a single-unit, quantity-one interval.
    ///
    /// A zero interval maps to `Day`.
    ///
    /// # Errors
    /// `Validation` if more than one unit is set or the quantity is not 1.
    pub fn interval_to_level(interval: &StepInterval) -> PeriodResult<Precision> {
        let mut level = None;

        for (unit, quantity) in interval.non_zero_units() {
            if quantity != 1 || level.is_some() {
                return Err(PeriodError::Validation(NOT_CONVERTIBLE.to_string()));
            }
            level = Some(unit);
        }

        Ok(level.unwrap_or(Precision::Day))
    }

    /// Mask form of [`Converter::interval_to_level`].
    pub fn interval_to_mask(interval: &StepInterval) -> PeriodResult<u8> {
        Self::interval_to_level(interval).map(Precision::mask)
    }

    /// Precision of `interval` in the encoding the given API expects.
    pub fn interval_to_precision(
        interval: &StepInterval,
        capabilities: &SpanCapabilities,
    ) -> PeriodResult<RawPrecision> {
        Self::interval_to_level(interval).map(|level| Self::encode(level, capabilities))
    }

    /// One unit of the given level.
    pub fn level_to_interval(level: Precision) -> StepInterval {
        StepInterval::of(level, 1)
    }

    /// Interval for a mask; unknown masks give one day.
    pub fn mask_to_interval(mask: i64) -> StepInterval {
        let level = Precision::from_mask(mask).unwrap_or_else(|| {
            tracing::trace!(mask, "unknown precision mask, using day");
            Precision::Day
        });
        Self::level_to_interval(level)
    }

    /// Interval for a precision in any accepted shape; never fails.
    pub fn precision_to_interval<'a>(input: impl Into<PrecisionInput<'a>>) -> StepInterval {
        Self::level_to_interval(Self::input_to_level(input.into()))
    }

    /// Level named by a token; unrecognised tokens give `Day`.
    pub fn string_to_level(token: &str) -> Precision {
        Self::input_to_level(PrecisionInput::Text(token))
    }

    fn input_to_level(input: PrecisionInput<'_>) -> Precision {
        match input {
            PrecisionInput::Raw(raw) => Self::decode(raw),
            PrecisionInput::Mask(mask) => Self::mask_level(mask),
            PrecisionInput::Named(value) => Self::text_level(value.interval_name()),
            PrecisionInput::Text(text) => Self::text_level(text),
        }
    }

    fn text_level(text: &str) -> Precision {
        if let Some(level) = level_from_name(text) {
            return level;
        }
        // Not a unit name: give it a chance as an integer mask
        Self::mask_level(text.trim().parse::<i64>().unwrap_or(0))
    }

    fn mask_level(mask: i64) -> Precision {
        Precision::from_mask(mask).unwrap_or_else(|| {
            tracing::trace!(mask, "unrecognised precision, using day");
            Precision::Day
        })
    }

    // ========================================================================
    // Boundary encoding
    // ========================================================================

    /// Encode a level for a span API.
    pub fn encode(level: Precision, capabilities: &SpanCapabilities) -> RawPrecision {
        if capabilities.named_precision {
            RawPrecision::Named(level)
        } else {
            RawPrecision::Mask(level.mask())
        }
    }

    /// Decode a span API's precision; unknown masks give `Day`.
    pub fn decode(raw: RawPrecision) -> Precision {
        match raw {
            RawPrecision::Named(level) => level,
            RawPrecision::Mask(mask) => Self::mask_level(i64::from(mask)),
        }
    }
}

/// Short codes are exact; unit names are case-insensitive, singular or plural.
fn level_from_name(text: &str) -> Option<Precision> {
    let text = text.trim();
    let by_code = match text {
        "y" => Some(Precision::Year),
        "m" => Some(Precision::Month),
        "d" => Some(Precision::Day),
        "h" => Some(Precision::Hour),
        "i" => Some(Precision::Minute),
        "s" => Some(Precision::Second),
        _ => None,
    };

    by_code.or_else(|| {
        let lower = text.to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        Precision::ALL
            .into_iter()
            .find(|level| level.name() == singular)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn test_round_trip_every_level() {
        for level in Precision::ALL {
            let interval = Converter::level_to_interval(level);
            assert_eq!(Converter::interval_to_level(&interval).unwrap(), level);
        }
    }

    #[test]
    fn test_mask_and_interval_pairs() {
        let pairs = [
            (0b100000, StepInterval::year()),
            (0b110000, StepInterval::month()),
            (0b111000, StepInterval::day()),
            (0b111100, StepInterval::hour()),
            (0b111110, StepInterval::minute()),
            (0b111111, StepInterval::second()),
        ];

        for (mask, interval) in pairs {
            assert_eq!(Converter::interval_to_mask(&interval).unwrap(), mask);
            assert_eq!(
                Converter::mask_to_interval(i64::from(mask)).total_seconds(),
                interval.total_seconds()
            );
        }
    }

    #[test]
    fn test_multi_unit_interval_rejected() {
        let interval = StepInterval::of(Precision::Hour, 2).with(Precision::Minute, 40);
        let err = Converter::interval_to_level(&interval).unwrap_err();
        assert!(matches!(err, PeriodError::Validation(_)));
        assert!(err.to_string().starts_with("Only periods with 1 year, 1 month"));
    }

    #[test]
    fn test_quantity_other_than_one_rejected() {
        assert!(Converter::interval_to_level(&StepInterval::of(Precision::Day, 2)).is_err());
        assert!(Converter::interval_to_level(&StepInterval::of(Precision::Day, -1)).is_err());
    }

    #[test]
    fn test_zero_interval_is_day() {
        assert_eq!(
            Converter::interval_to_level(&StepInterval::ZERO).unwrap(),
            Precision::Day
        );
        assert_eq!(Converter::interval_to_mask(&StepInterval::ZERO).unwrap(), 0b111000);
    }

    #[test]
    fn test_default_fallbacks() {
        assert_eq!(Converter::mask_to_interval(0b101).total_seconds(), 86_400);
        assert_eq!(Converter::precision_to_interval("nope").total_seconds(), 86_400);
        assert_eq!(Converter::decode(RawPrecision::Mask(0b1)), Precision::Day);
    }

    #[test]
    fn test_string_tokens() {
        assert_eq!(Converter::string_to_level("y"), Precision::Year);
        assert_eq!(Converter::string_to_level("i"), Precision::Minute);
        assert_eq!(Converter::string_to_level("m"), Precision::Month);
        assert_eq!(Converter::string_to_level("Hour"), Precision::Hour);
        assert_eq!(Converter::string_to_level("SECONDS"), Precision::Second);
        assert_eq!(Converter::string_to_level("60"), Precision::Hour);
        assert_eq!(Converter::string_to_level("-1"), Precision::Day);
    }

    #[test]
    fn test_opaque_and_raw_inputs() {
        let named: &dyn IntervalName = &Precision::Minute;
        assert_eq!(
            Converter::precision_to_interval(PrecisionInput::Named(named)),
            StepInterval::minute()
        );
        assert_eq!(
            Converter::precision_to_interval(RawPrecision::Mask(0b110000)),
            StepInterval::month()
        );
        assert_eq!(Converter::precision_to_interval(Precision::Year), StepInterval::year());
        assert_eq!(Converter::precision_to_interval(0b111111_u8), StepInterval::second());
    }

    #[test]
    fn test_encode_follows_capabilities() {
        assert_eq!(
            Converter::encode(Precision::Hour, &SpanCapabilities::legacy()),
            RawPrecision::Mask(0b111100)
        );
        assert_eq!(
            Converter::encode(Precision::Hour, &SpanCapabilities::modern()),
            RawPrecision::Named(Precision::Hour)
        );
        for caps in [SpanCapabilities::legacy(), SpanCapabilities::modern()] {
            for level in Precision::ALL {
                assert_eq!(Converter::decode(Converter::encode(level, &caps)), level);
            }
        }
        assert_eq!(
            Converter::interval_to_precision(&StepInterval::day(), &SpanCapabilities::legacy())
                .unwrap(),
            RawPrecision::Mask(0b111000)
        );
    }

    #[test]
    fn test_two_units_never_convert() {
        fn prop(a: u8, b: u8, qa: i8, qb: i8) -> TestResult {
            let (a, b) = (usize::from(a % 6), usize::from(b % 6));
            if a == b || qa == 0 || qb == 0 {
                return TestResult::discard();
            }
            let interval = StepInterval::of(Precision::ALL[a], i64::from(qa))
                .with(Precision::ALL[b], i64::from(qb));
            TestResult::from_bool(Converter::interval_to_level(&interval).is_err())
        }
        quickcheck(prop as fn(u8, u8, i8, i8) -> TestResult);
    }

    #[test]
    fn test_single_unit_converts_only_with_quantity_one() {
        fn prop(unit: u8, quantity: i8) -> TestResult {
            if quantity == 0 {
                return TestResult::discard();
            }
            let level = Precision::ALL[usize::from(unit % 6)];
            let result = Converter::interval_to_level(&StepInterval::of(level, i64::from(quantity)));
            TestResult::from_bool(result.is_ok() == (quantity == 1))
        }
        quickcheck(prop as fn(u8, i8) -> TestResult);
    }
}
