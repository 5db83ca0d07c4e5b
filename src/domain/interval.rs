// ============================================================================
// Step Interval
// Calendar duration used as the repeat step of a rolling period
// ============================================================================

use super::precision::Precision;
use crate::errors::{PeriodError, SpanError, SpanResult};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A calendar duration split into its six unit fields.
///
/// Fields are kept separately (1 month is not 30 days) so the converter can
/// tell which unit a step is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepInterval {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl StepInterval {
    /// Zero-length interval
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// `quantity` units of a single precision level.
    pub fn of(unit: Precision, quantity: i64) -> Self {
        Self::ZERO.with(unit, quantity)
    }

    pub fn year() -> Self {
        Self::of(Precision::Year, 1)
    }

    pub fn month() -> Self {
        Self::of(Precision::Month, 1)
    }

    pub fn day() -> Self {
        Self::of(Precision::Day, 1)
    }

    pub fn hour() -> Self {
        Self::of(Precision::Hour, 1)
    }

    pub fn minute() -> Self {
        Self::of(Precision::Minute, 1)
    }

    pub fn second() -> Self {
        Self::of(Precision::Second, 1)
    }

    /// Builder method: set one unit field
    pub fn with(mut self, unit: Precision, quantity: i64) -> Self {
        *self.field_mut(unit) = quantity;
        self
    }

    fn field_mut(&mut self, unit: Precision) -> &mut i64 {
        match unit {
            Precision::Year => &mut self.years,
            Precision::Month => &mut self.months,
            Precision::Day => &mut self.days,
            Precision::Hour => &mut self.hours,
            Precision::Minute => &mut self.minutes,
            Precision::Second => &mut self.seconds,
        }
    }

    /// Unit fields paired with their level, coarsest first.
    pub fn units(&self) -> [(Precision, i64); 6] {
        [
            (Precision::Year, self.years),
            (Precision::Month, self.months),
            (Precision::Day, self.days),
            (Precision::Hour, self.hours),
            (Precision::Minute, self.minutes),
            (Precision::Second, self.seconds),
        ]
    }

    /// Only the non-zero unit fields, coarsest first.
    pub fn non_zero_units(&self) -> impl Iterator<Item = (Precision, i64)> {
        self.units().into_iter().filter(|(_, quantity)| *quantity != 0)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Finest unit carrying a non-zero quantity.
    pub fn finest_unit(&self) -> Option<Precision> {
        self.non_zero_units().last().map(|(unit, _)| unit)
    }

    /// Nominal length in seconds (1 year = 365 days, 1 month = 30 days).
    ///
    /// Saturates at the `i64` bounds.
    pub fn total_seconds(&self) -> i64 {
        const DAY: i64 = 86_400;
        [
            (self.years, 365 * DAY),
            (self.months, 30 * DAY),
            (self.days, DAY),
            (self.hours, 3_600),
            (self.minutes, 60),
            (self.seconds, 1),
        ]
        .into_iter()
        .fold(0_i64, |total, (quantity, seconds)| {
            total.saturating_add(quantity.saturating_mul(seconds))
        })
    }

    /// Advance an instant by `times` whole steps.
    pub fn advance(&self, instant: NaiveDateTime, times: i64) -> SpanResult<NaiveDateTime> {
        self.non_zero_units().try_fold(instant, |acc, (unit, quantity)| {
            let count = quantity
                .checked_mul(times)
                .ok_or(SpanError::Overflow)?;
            unit.add_units(acc, count)
        })
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for StepInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0 seconds");
        }

        let mut first = true;
        for (unit, quantity) in self.non_zero_units() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            let plural = if quantity.abs() == 1 { "" } else { "s" };
            write!(f, "{} {}{}", quantity, unit.name(), plural)?;
        }
        Ok(())
    }
}

// ============================================================================
// String Parsing
// ============================================================================

/// Resolve a human unit token ("hours", "min", "d", ...) to a level.
///
/// Weeks are returned as days with a multiplier of seven.
fn unit_from_word(word: &str) -> Option<(Precision, i64)> {
    let word = word.to_ascii_lowercase();
    let unit = match word.as_str() {
        "y" | "yr" | "yrs" | "year" | "years" => Precision::Year,
        "mo" | "month" | "months" => Precision::Month,
        "w" | "week" | "weeks" => return Some((Precision::Day, 7)),
        "d" | "day" | "days" => Precision::Day,
        "h" | "hr" | "hrs" | "hour" | "hours" => Precision::Hour,
        "i" | "min" | "mins" | "minute" | "minutes" => Precision::Minute,
        "s" | "sec" | "secs" | "second" | "seconds" => Precision::Second,
        _ => return None,
    };
    Some((unit, 1))
}

/// Add `quantity * factor` of `unit`, rejecting anything outside `i64`.
fn accumulate(
    interval: &mut StepInterval,
    unit: Precision,
    quantity: i64,
    factor: i64,
    input: &str,
) -> Result<(), PeriodError> {
    let field = interval.field_mut(unit);
    let current = *field;
    *field = quantity
        .checked_mul(factor)
        .and_then(|amount| current.checked_add(amount))
        .ok_or_else(|| PeriodError::parse(input, "quantity out of range"))?;
    Ok(())
}

fn parse_human(input: &str) -> Result<StepInterval, PeriodError> {
    let mut interval = StepInterval::ZERO;
    let mut pending: Option<i64> = None;

    for token in input.split_whitespace() {
        if let Ok(number) = token.parse::<i64>() {
            if pending.replace(number).is_some() {
                return Err(PeriodError::parse(input, "two quantities in a row"));
            }
            continue;
        }

        let (unit, factor) = unit_from_word(token)
            .ok_or_else(|| PeriodError::parse(input, format!("unknown unit {token:?}")))?;
        accumulate(&mut interval, unit, pending.take().unwrap_or(1), factor, input)?;
    }

    if pending.is_some() {
        return Err(PeriodError::parse(input, "quantity without a unit"));
    }
    Ok(interval)
}

fn parse_iso(input: &str) -> Result<StepInterval, PeriodError> {
    let body = &input[1..];
    let mut interval = StepInterval::ZERO;
    let mut in_time = false;
    let mut digits = String::new();

    for c in body.chars() {
        match c {
            'T' | 't' if !in_time && digits.is_empty() => in_time = true,
            '0'..='9' => digits.push(c),
            _ => {
                let quantity: i64 = digits
                    .parse()
                    .map_err(|_| PeriodError::parse(input, format!("missing quantity before {c:?}")))?;
                digits.clear();
                let (unit, factor) = match (in_time, c.to_ascii_uppercase()) {
                    (false, 'Y') => (Precision::Year, 1),
                    (false, 'M') => (Precision::Month, 1),
                    (false, 'W') => (Precision::Day, 7),
                    (false, 'D') => (Precision::Day, 1),
                    (true, 'H') => (Precision::Hour, 1),
                    (true, 'M') => (Precision::Minute, 1),
                    (true, 'S') => (Precision::Second, 1),
                    _ => return Err(PeriodError::parse(input, format!("unexpected designator {c:?}"))),
                };
                accumulate(&mut interval, unit, quantity, factor, input)?;
            }
        }
    }

    if !digits.is_empty() {
        return Err(PeriodError::parse(input, "trailing quantity without designator"));
    }
    Ok(interval)
}

impl FromStr for StepInterval {
    type Err = PeriodError;

    /// Parse either a human form ("1 hour", "2 hours 40 minutes", "day")
    /// or an ISO 8601 duration ("P1D", "PT1H", "P1Y2M").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PeriodError::parse(s, "empty interval"));
        }

        let mut chars = s.chars();
        let is_iso = matches!(chars.next(), Some('P' | 'p'))
            && matches!(chars.next(), Some('0'..='9' | 'T' | 't'));

        if is_iso {
            parse_iso(s)
        } else {
            parse_human(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_unit_constructors() {
        assert_eq!(StepInterval::hour().hours, 1);
        assert_eq!(StepInterval::day().non_zero_units().count(), 1);
        assert!(StepInterval::ZERO.is_zero());
        assert_eq!(StepInterval::of(Precision::Minute, 5).minutes, 5);
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(StepInterval::day().total_seconds(), 86_400);
        assert_eq!(StepInterval::hour().total_seconds(), 3_600);
        assert_eq!(
            StepInterval::hour().with(Precision::Minute, 40).total_seconds(),
            6_000
        );
    }

    #[test]
    fn test_finest_unit() {
        let interval = StepInterval::of(Precision::Hour, 2).with(Precision::Minute, 40);
        assert_eq!(interval.finest_unit(), Some(Precision::Minute));
        assert_eq!(StepInterval::ZERO.finest_unit(), None);
    }

    #[test]
    fn test_parse_human() {
        assert_eq!("1 hour".parse::<StepInterval>().unwrap(), StepInterval::hour());
        assert_eq!("day".parse::<StepInterval>().unwrap(), StepInterval::day());
        assert_eq!(
            "2 hours 40 minutes".parse::<StepInterval>().unwrap(),
            StepInterval::of(Precision::Hour, 2).with(Precision::Minute, 40)
        );
        assert_eq!("1 week".parse::<StepInterval>().unwrap().days, 7);
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!("PT1H".parse::<StepInterval>().unwrap(), StepInterval::hour());
        assert_eq!("P1D".parse::<StepInterval>().unwrap(), StepInterval::day());
        assert_eq!(
            "P1Y2M".parse::<StepInterval>().unwrap(),
            StepInterval::year().with(Precision::Month, 2)
        );
        assert_eq!("PT1M".parse::<StepInterval>().unwrap(), StepInterval::minute());
        assert_eq!("P1M".parse::<StepInterval>().unwrap(), StepInterval::month());
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<StepInterval>().is_err());
        assert!("3 fortnights".parse::<StepInterval>().is_err());
        assert!("1 2 days".parse::<StepInterval>().is_err());
        assert!("P1X".parse::<StepInterval>().is_err());
        assert!("PT5".parse::<StepInterval>().is_err());
    }

    #[test]
    fn test_parse_quantity_out_of_range() {
        for input in [
            "9223372036854775807 weeks",
            "P9223372036854775807W",
            "9223372036854775807 days 1 day",
            "P9223372036854775807D1D",
        ] {
            let err = input.parse::<StepInterval>().unwrap_err();
            assert!(
                matches!(&err, PeriodError::Parse { reason, .. } if reason == "quantity out of range"),
                "{input}: {err}"
            );
        }
        assert_eq!(
            "9223372036854775807 days".parse::<StepInterval>().unwrap().days,
            i64::MAX
        );
    }

    #[test]
    fn test_total_seconds_saturates() {
        assert_eq!(StepInterval::of(Precision::Year, i64::MAX).total_seconds(), i64::MAX);
        assert_eq!(StepInterval::of(Precision::Day, i64::MIN).total_seconds(), i64::MIN);
        let mixed = StepInterval::of(Precision::Second, i64::MAX).with(Precision::Minute, 1);
        assert_eq!(mixed.total_seconds(), i64::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(StepInterval::day().to_string(), "1 day");
        assert_eq!(
            StepInterval::of(Precision::Hour, 2).with(Precision::Minute, 40).to_string(),
            "2 hours 40 minutes"
        );
        assert_eq!(StepInterval::ZERO.to_string(), "0 seconds");
    }

    #[test]
    fn test_advance() {
        let start = NaiveDateTime::parse_from_str("2018-01-31 10:00", "%Y-%m-%d %H:%M").unwrap();
        let end = StepInterval::day().advance(start, 3).unwrap();
        assert_eq!(end.to_string(), "2018-02-03 10:00:00");
    }
}
