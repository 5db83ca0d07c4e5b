// ============================================================================
// Rolling Period
// Recurring date range defined by a start, an optional end, and a step
// ============================================================================

use super::interval::StepInterval;
use super::precision::Precision;
use crate::errors::{PeriodError, PeriodResult, SpanResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::ops::BitOr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Period Options
// ============================================================================

/// Option bits of a rolling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodOptions(u8);

impl PeriodOptions {
    pub const NONE: Self = Self(0);
    pub const EXCLUDE_START_DATE: Self = Self(1);
    pub const EXCLUDE_END_DATE: Self = Self(2);
    pub const IMMUTABLE: Self = Self(4);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set or clear `flag`.
    #[inline]
    pub const fn with(self, flag: Self, on: bool) -> Self {
        if on {
            Self(self.0 | flag.0)
        } else {
            Self(self.0 & !flag.0)
        }
    }
}

impl BitOr for PeriodOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

// ============================================================================
// Instant Parsing
// ============================================================================

const INSTANT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse "2019-09-01", "2019-09-01 08:02" or "2019-09-01 08:02:10".
pub fn parse_instant(input: &str) -> PeriodResult<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| PeriodError::parse(input, "not a recognised date or date-time"))
}

// ============================================================================
// Rolling Period
// ============================================================================

/// A date range walked in fixed steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingPeriod {
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    recurrences: Option<u32>,
    interval: StepInterval,
    options: PeriodOptions,
}

impl RollingPeriod {
    /// Create a new rolling period
    pub fn new(
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        interval: StepInterval,
        options: PeriodOptions,
    ) -> Self {
        Self {
            start,
            end,
            recurrences: None,
            interval,
            options,
        }
    }

    /// Daily, mutable period between two parsed instants.
    pub fn create(start: &str, end: &str) -> PeriodResult<Self> {
        Ok(Self::new(
            parse_instant(start)?,
            Some(parse_instant(end)?),
            StepInterval::day(),
            PeriodOptions::NONE,
        ))
    }

    /// Like [`RollingPeriod::create`] with an explicit step ("1 hour", "PT1H").
    pub fn create_with_interval(start: &str, end: &str, interval: &str) -> PeriodResult<Self> {
        Ok(Self::create(start, end)?.every(interval.parse()?))
    }

    /// Open period starting at the epoch, walked by `interval`.
    pub fn stepping(interval: StepInterval) -> Self {
        Self::new(
            NaiveDate::default().and_time(NaiveTime::MIN),
            None,
            interval,
            PeriodOptions::NONE,
        )
    }

    pub fn years() -> Self {
        Self::stepping(StepInterval::year())
    }

    pub fn months() -> Self {
        Self::stepping(StepInterval::month())
    }

    pub fn days() -> Self {
        Self::stepping(StepInterval::day())
    }

    pub fn hours() -> Self {
        Self::stepping(StepInterval::hour())
    }

    pub fn minutes() -> Self {
        Self::stepping(StepInterval::minute())
    }

    pub fn seconds() -> Self {
        Self::stepping(StepInterval::second())
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    pub fn since(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    pub fn until(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method: bound the period by a number of recurrences
    pub fn times(mut self, recurrences: u32) -> Self {
        self.recurrences = Some(recurrences);
        self
    }

    pub fn every(mut self, interval: StepInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn exclude_start_date(mut self) -> Self {
        self.options = self.options.with(PeriodOptions::EXCLUDE_START_DATE, true);
        self
    }

    pub fn exclude_end_date(mut self) -> Self {
        self.options = self.options.with(PeriodOptions::EXCLUDE_END_DATE, true);
        self
    }

    pub fn immutable(mut self) -> Self {
        self.options = self.options.with(PeriodOptions::IMMUTABLE, true);
        self
    }

    pub fn mutable(mut self) -> Self {
        self.options = self.options.with(PeriodOptions::IMMUTABLE, false);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    #[inline]
    pub fn recurrences(&self) -> Option<u32> {
        self.recurrences
    }

    #[inline]
    pub fn interval(&self) -> StepInterval {
        self.interval
    }

    #[inline]
    pub fn options(&self) -> PeriodOptions {
        self.options
    }

    #[inline]
    pub fn is_start_excluded(&self) -> bool {
        self.options.contains(PeriodOptions::EXCLUDE_START_DATE)
    }

    #[inline]
    pub fn is_end_excluded(&self) -> bool {
        self.options.contains(PeriodOptions::EXCLUDE_END_DATE)
    }

    #[inline]
    pub fn is_immutable(&self) -> bool {
        self.options.contains(PeriodOptions::IMMUTABLE)
    }

    // ========================================================================
    // Normalisation
    // ========================================================================

    /// Truncate start and end down to the finest unit of the step.
    ///
    /// A zero step floors to days.
    pub fn floor(mut self) -> SpanResult<Self> {
        let unit = self.interval.finest_unit().unwrap_or(Precision::Day);
        self.start = unit.truncate(self.start)?;
        self.end = self.end.map(|end| unit.truncate(end)).transpose()?;
        Ok(self)
    }

    /// Last instant of the period.
    ///
    /// The explicit end when set, otherwise derived from the recurrence
    /// count. `None` for an open-ended period.
    pub fn calculate_end(&self) -> SpanResult<Option<NaiveDateTime>> {
        if let Some(end) = self.end {
            return Ok(Some(end));
        }
        if self.interval.is_zero() {
            return Ok(Some(self.start));
        }
        match self.recurrences {
            Some(count) => {
                let steps = i64::from(count.saturating_sub(1));
                self.interval.advance(self.start, steps).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn is_midnight(instant: NaiveDateTime) -> bool {
    instant.num_seconds_from_midnight() == 0 && instant.nanosecond() == 0
}

impl fmt::Display for RollingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date_only = is_midnight(self.start) && self.end.map_or(true, is_midnight);
        let pattern = if date_only { "%Y-%m-%d" } else { "%Y-%m-%d %H:%M:%S" };

        write!(f, "Every {} from {}", self.interval, self.start.format(pattern))?;
        if let Some(end) = self.end {
            write!(f, " to {}", end.format(pattern))?;
        } else if let Some(count) = self.recurrences {
            write!(f, " {} times", count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_instant(s).unwrap()
    }

    #[test]
    fn test_parse_instant_formats() {
        assert_eq!(at("2019-09-01").to_string(), "2019-09-01 00:00:00");
        assert_eq!(at("2019-09-01 08:02").to_string(), "2019-09-01 08:02:00");
        assert_eq!(at("2019-09-01T08:02:10").to_string(), "2019-09-01 08:02:10");
        assert!(matches!(parse_instant("yesterday"), Err(PeriodError::Parse { .. })));
    }

    #[test]
    fn test_options_bits() {
        let options = PeriodOptions::EXCLUDE_START_DATE | PeriodOptions::IMMUTABLE;
        assert_eq!(options.bits(), 5);
        assert!(options.contains(PeriodOptions::IMMUTABLE));
        assert!(!options.contains(PeriodOptions::EXCLUDE_END_DATE));
        assert_eq!(options.with(PeriodOptions::IMMUTABLE, false), PeriodOptions::EXCLUDE_START_DATE);
    }

    #[test]
    fn test_create_defaults() {
        let period = RollingPeriod::create("2018-01-01", "2018-01-15").unwrap();
        assert_eq!(period.interval(), StepInterval::day());
        assert_eq!(period.options(), PeriodOptions::NONE);
        assert!(!period.is_immutable());
    }

    #[test]
    fn test_fluent_builder() {
        let period = RollingPeriod::hours()
            .since(at("2019-09-01 08:02"))
            .until(at("2019-09-01 15:03"))
            .exclude_start_date()
            .immutable();

        assert_eq!(period.interval(), StepInterval::hour());
        assert!(period.is_start_excluded());
        assert!(!period.is_end_excluded());
        assert!(period.is_immutable());
        assert!(!period.mutable().is_immutable());
    }

    #[test]
    fn test_floor_uses_step_unit() {
        let period = RollingPeriod::hours()
            .since(at("2019-09-01 08:02"))
            .until(at("2019-09-01 15:03"))
            .floor()
            .unwrap();
        assert_eq!(period.start(), at("2019-09-01 08:00"));
        assert_eq!(period.end(), Some(at("2019-09-01 15:00")));

        let zero = RollingPeriod::stepping(StepInterval::ZERO)
            .since(at("2019-09-01 08:02"))
            .floor()
            .unwrap();
        assert_eq!(zero.start(), at("2019-09-01"));
    }

    #[test]
    fn test_calculate_end() {
        let bounded = RollingPeriod::create("2018-01-01", "2018-01-10").unwrap();
        assert_eq!(bounded.calculate_end().unwrap(), Some(at("2018-01-10")));

        let counted = RollingPeriod::days().since(at("2018-01-01")).times(5);
        assert_eq!(counted.calculate_end().unwrap(), Some(at("2018-01-05")));

        let open = RollingPeriod::days().since(at("2018-01-01"));
        assert_eq!(open.calculate_end().unwrap(), None);

        let zero = RollingPeriod::stepping(StepInterval::ZERO).since(at("2018-01-01"));
        assert_eq!(zero.calculate_end().unwrap(), Some(at("2018-01-01")));
    }

    #[test]
    fn test_display() {
        let period = RollingPeriod::create("2018-01-11", "2018-01-14").unwrap();
        assert_eq!(period.to_string(), "Every 1 day from 2018-01-11 to 2018-01-14");

        let hourly = RollingPeriod::create_with_interval("2019-09-01 08:00", "2019-09-01 15:00", "1 hour")
            .unwrap();
        assert_eq!(
            hourly.to_string(),
            "Every 1 hour from 2019-09-01 08:00:00 to 2019-09-01 15:00:00"
        );

        let counted = RollingPeriod::days().since(at("2018-01-01")).times(3);
        assert_eq!(counted.to_string(), "Every 1 day from 2018-01-01 3 times");
    }
}
