// ============================================================================
// Precision and Boundaries
// Granularity levels and boundary exclusion flags for precision spans
// ============================================================================

use crate::errors::{SpanError, SpanResult};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Precision
// ============================================================================

/// Granularity at which the boundaries of a span are meaningful.
///
/// Ordered from coarsest (`Year`) to finest (`Second`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    Year,
    Month,
    #[default]
    Day,
    Hour,
    Minute,
    Second,
}

impl Precision {
    /// All levels, coarsest first.
    pub const ALL: [Precision; 6] = [
        Precision::Year,
        Precision::Month,
        Precision::Day,
        Precision::Hour,
        Precision::Minute,
        Precision::Second,
    ];

    /// Bitmask form used by the legacy span API.
    ///
    /// Each finer mask keeps every bit of the coarser one and sets the next.
    #[inline]
    pub const fn mask(self) -> u8 {
        match self {
            Precision::Year => 0b100000,
            Precision::Month => 0b110000,
            Precision::Day => 0b111000,
            Precision::Hour => 0b111100,
            Precision::Minute => 0b111110,
            Precision::Second => 0b111111,
        }
    }

    /// Exact inverse of [`Precision::mask`].
    pub fn from_mask(mask: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| i64::from(p.mask()) == mask)
    }

    /// Canonical unit name ("year" .. "second").
    pub const fn name(self) -> &'static str {
        match self {
            Precision::Year => "year",
            Precision::Month => "month",
            Precision::Day => "day",
            Precision::Hour => "hour",
            Precision::Minute => "minute",
            Precision::Second => "second",
        }
    }

    // ========================================================================
    // Calendar arithmetic
    // ========================================================================

    /// Truncate an instant down to this precision.
    pub fn truncate(self, instant: NaiveDateTime) -> SpanResult<NaiveDateTime> {
        let date = instant.date();
        let (date, time) = match self {
            Precision::Year => (NaiveDate::from_ymd_opt(date.year(), 1, 1), Some(NaiveTime::MIN)),
            Precision::Month => (
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
                Some(NaiveTime::MIN),
            ),
            Precision::Day => (Some(date), Some(NaiveTime::MIN)),
            Precision::Hour => (Some(date), NaiveTime::from_hms_opt(instant.hour(), 0, 0)),
            Precision::Minute => (
                Some(date),
                NaiveTime::from_hms_opt(instant.hour(), instant.minute(), 0),
            ),
            Precision::Second => (
                Some(date),
                NaiveTime::from_hms_opt(instant.hour(), instant.minute(), instant.second()),
            ),
        };

        match (date, time) {
            (Some(date), Some(time)) => Ok(date.and_time(time)),
            _ => Err(SpanError::Overflow),
        }
    }

    /// Shift an instant by `count` units of this precision (negative moves back).
    pub fn add_units(self, instant: NaiveDateTime, count: i64) -> SpanResult<NaiveDateTime> {
        let shifted = match self {
            Precision::Year => shift_months(instant, count.checked_mul(12)),
            Precision::Month => shift_months(instant, Some(count)),
            Precision::Day => TimeDelta::try_days(count).and_then(|d| instant.checked_add_signed(d)),
            Precision::Hour => {
                TimeDelta::try_hours(count).and_then(|d| instant.checked_add_signed(d))
            }
            Precision::Minute => {
                TimeDelta::try_minutes(count).and_then(|d| instant.checked_add_signed(d))
            }
            Precision::Second => {
                TimeDelta::try_seconds(count).and_then(|d| instant.checked_add_signed(d))
            }
        };

        shifted.ok_or(SpanError::Overflow)
    }

    /// Whole units from `from` to `to`, both expected to be truncated.
    pub fn units_between(self, from: NaiveDateTime, to: NaiveDateTime) -> i64 {
        match self {
            Precision::Year => i64::from(to.year() - from.year()),
            Precision::Month => {
                let months = |d: NaiveDateTime| i64::from(d.year()) * 12 + i64::from(d.month0());
                months(to) - months(from)
            }
            Precision::Day => (to.date() - from.date()).num_days(),
            Precision::Hour => (to - from).num_hours(),
            Precision::Minute => (to - from).num_minutes(),
            Precision::Second => (to - from).num_seconds(),
        }
    }
}

fn shift_months(instant: NaiveDateTime, months: Option<i64>) -> Option<NaiveDateTime> {
    let months = months?;
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        instant.checked_add_months(magnitude)
    } else {
        instant.checked_sub_months(magnitude)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can report the canonical unit name of a precision.
///
/// This is how opaque precision values are recognised by the converter.
pub trait IntervalName {
    fn interval_name(&self) -> &str;
}

impl IntervalName for Precision {
    fn interval_name(&self) -> &str {
        self.name()
    }
}

// ============================================================================
// Raw precision (boundary encoding)
// ============================================================================

/// Precision as a particular span API version encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RawPrecision {
    /// Integer bitmask (legacy API)
    Mask(u8),
    /// Opaque named value (modern API)
    Named(Precision),
}

impl IntervalName for RawPrecision {
    fn interval_name(&self) -> &str {
        match self {
            RawPrecision::Named(level) => level.name(),
            RawPrecision::Mask(mask) => Precision::from_mask(i64::from(*mask))
                .map(Precision::name)
                .unwrap_or(""),
        }
    }
}

// ============================================================================
// Boundaries
// ============================================================================

/// Which ends of a span are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Boundaries {
    #[default]
    ExcludeNone,
    ExcludeStart,
    ExcludeEnd,
    ExcludeAll,
}

impl Boundaries {
    pub const fn from_flags(start_excluded: bool, end_excluded: bool) -> Self {
        match (start_excluded, end_excluded) {
            (true, true) => Boundaries::ExcludeAll,
            (true, false) => Boundaries::ExcludeStart,
            (false, true) => Boundaries::ExcludeEnd,
            (false, false) => Boundaries::ExcludeNone,
        }
    }

    #[inline]
    pub const fn start_excluded(self) -> bool {
        matches!(self, Boundaries::ExcludeStart | Boundaries::ExcludeAll)
    }

    #[inline]
    pub const fn end_excluded(self) -> bool {
        matches!(self, Boundaries::ExcludeEnd | Boundaries::ExcludeAll)
    }
}
