// ============================================================================
// Precision Span
// Date range annotated with the granularity of its boundaries
// ============================================================================

use super::precision::{Boundaries, Precision};
use crate::errors::{SpanError, SpanResult};
use chrono::{NaiveDateTime, TimeDelta};
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A date range whose boundaries are meaningful at a given precision.
///
/// Start and end are truncated to the precision on construction. A missing
/// end means the span runs forward without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionSpan {
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    precision: Precision,
    boundaries: Boundaries,
}

/// Ordered spans, insertion order significant.
pub type SpanCollection = Vec<PrecisionSpan>;

impl PrecisionSpan {
    /// Create a new span.
    ///
    /// # Errors
    /// - `Inverted` if the truncated end lies before the truncated start
    /// - `Overflow` if truncation leaves the calendar range
    pub fn new(
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        precision: Precision,
        boundaries: Boundaries,
    ) -> SpanResult<Self> {
        let start = precision.truncate(start)?;
        let end = end.map(|e| precision.truncate(e)).transpose()?;

        if let Some(end) = end {
            if end < start {
                return Err(SpanError::Inverted { start, end });
            }
        }

        Ok(Self {
            start,
            end,
            precision,
            boundaries,
        })
    }

    /// Closed span, both ends included.
    pub fn closed(start: NaiveDateTime, end: NaiveDateTime, precision: Precision) -> SpanResult<Self> {
        Self::new(start, Some(end), precision, Boundaries::ExcludeNone)
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
    pub fn precision(&self) -> Precision {
        self.precision
    }

    #[inline]
    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    #[inline]
    pub fn is_start_excluded(&self) -> bool {
        self.boundaries.start_excluded()
    }

    #[inline]
    pub fn is_end_excluded(&self) -> bool {
        self.boundaries.end_excluded()
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }

    /// First instant that belongs to the span.
    pub fn included_start(&self) -> SpanResult<NaiveDateTime> {
        if self.is_start_excluded() {
            self.precision.add_units(self.start, 1)
        } else {
            Ok(self.start)
        }
    }

    /// Last instant that belongs to the span, `None` when unbounded.
    pub fn included_end(&self) -> SpanResult<Option<NaiveDateTime>> {
        match self.end {
            Some(end) if self.is_end_excluded() => self.precision.add_units(end, -1).map(Some),
            end => Ok(end),
        }
    }

    fn included(&self) -> SpanResult<(NaiveDateTime, Option<NaiveDateTime>)> {
        Ok((self.included_start()?, self.included_end()?))
    }

    /// Closed span at this precision, or `None` when `start > end`.
    fn chunk(&self, start: NaiveDateTime, end: Option<NaiveDateTime>) -> SpanResult<Option<Self>> {
        if matches!(end, Some(end) if end < start) {
            return Ok(None);
        }
        Self::new(start, end, self.precision, Boundaries::ExcludeNone).map(Some)
    }

    fn step(&self, instant: NaiveDateTime, count: i64) -> SpanResult<NaiveDateTime> {
        self.precision.add_units(instant, count)
    }

    // ========================================================================
    // Algebra primitives
    // ========================================================================

    /// Number of precision units covered, both included ends counted.
    pub fn length(&self) -> SpanResult<i64> {
        let (start, end) = self.included()?;
        let end = end.ok_or(SpanError::Unbounded { operation: "length" })?;
        Ok((self.precision.units_between(start, end) + 1).max(0))
    }

    /// True when no instant is included, e.g. a single unit with both ends excluded.
    pub fn is_empty(&self) -> SpanResult<bool> {
        let (start, end) = self.included()?;
        Ok(end.is_some_and(|end| end < start))
    }

    /// Empty spans overlap nothing.
    pub fn overlaps_with(&self, other: &Self) -> SpanResult<bool> {
        if self.is_empty()? || other.is_empty()? {
            return Ok(false);
        }

        let (start, end) = self.included()?;
        let (other_start, other_end) = other.included()?;

        Ok(before_or_at(start, other_end) && before_or_at(other_start, end))
    }

    /// True when one span ends exactly one unit before the other starts.
    pub fn touches_with(&self, other: &Self) -> SpanResult<bool> {
        if self.is_empty()? || other.is_empty()? {
            return Ok(false);
        }

        let (start, end) = self.included()?;
        let (other_start, other_end) = other.included()?;

        if let Some(end) = end {
            if self.step(end, 1)? == other_start {
                return Ok(true);
            }
        }
        if let Some(other_end) = other_end {
            if self.step(other_end, 1)? == start {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Region covered by both spans, `None` if disjoint.
    pub fn overlap_single(&self, other: &Self) -> SpanResult<Option<Self>> {
        if !self.overlaps_with(other)? {
            return Ok(None);
        }

        let (start, end) = self.included()?;
        let (other_start, other_end) = other.included()?;

        self.chunk(start.max(other_start), min_end(end, other_end))
    }

    /// Chunks of this span that intersect each operand, chronological.
    pub fn overlap_any(&self, others: &[Self]) -> SpanResult<SpanCollection> {
        let mut chunks = SpanCollection::with_capacity(others.len());
        for other in others {
            if let Some(chunk) = self.overlap_single(other)? {
                chunks.push(chunk);
            }
        }
        chunks.sort_by_key(|chunk| chunk.start);
        Ok(chunks)
    }

    /// Region common to this span and every operand.
    pub fn overlap_all(&self, others: &[Self]) -> SpanResult<Option<Self>> {
        let mut overlap = *self;
        for other in others {
            match overlap.overlap_single(other)? {
                Some(next) => overlap = next,
                None => return Ok(None),
            }
        }
        Ok(Some(overlap))
    }

    /// Parts covered by exactly one of the two spans, chronological.
    pub fn diff_symmetric(&self, other: &Self) -> SpanResult<SpanCollection> {
        let overlap = match self.overlap_single(other)? {
            Some(overlap) => overlap,
            None => {
                let mut both = SpanCollection::with_capacity(2);
                for span in [self, other] {
                    if !span.is_empty()? {
                        both.push(*span);
                    }
                }
                both.sort_by_key(|span| span.start);
                return Ok(both);
            }
        };

        let (start, end) = self.included()?;
        let (other_start, other_end) = other.included()?;
        let outer_start = start.min(other_start);
        let outer_end = max_end(end, other_end);

        let mut pieces = SpanCollection::with_capacity(2);
        if outer_start < overlap.start {
            let before = self.step(overlap.start, -1)?;
            pieces.extend(self.chunk(outer_start, Some(before))?);
        }
        if let Some(overlap_end) = overlap.end {
            if outer_end.map_or(true, |end| end > overlap_end) {
                let after = self.step(overlap_end, 1)?;
                pieces.extend(self.chunk(after, outer_end)?);
            }
        }
        Ok(pieces)
    }

    /// Parts of this span not covered by any operand, chronological.
    pub fn subtract(&self, others: &[Self]) -> SpanResult<SpanCollection> {
        let (start, end) = self.included()?;
        let mut pieces: SpanCollection = self.chunk(start, end)?.into_iter().collect();

        for other in others {
            let (other_start, other_end) = other.included()?;
            let mut remaining = SpanCollection::with_capacity(pieces.len() + 1);

            for piece in pieces {
                if !piece.overlaps_with(other)? {
                    remaining.push(piece);
                    continue;
                }
                if piece.start < other_start {
                    let before = self.step(other_start, -1)?;
                    remaining.extend(self.chunk(piece.start, Some(before))?);
                }
                if let Some(other_end) = other_end {
                    if piece.end.map_or(true, |end| end > other_end) {
                        let after = self.step(other_end, 1)?;
                        remaining.extend(self.chunk(after, piece.end)?);
                    }
                }
            }
            pieces = remaining;
        }

        Ok(pieces)
    }

    /// Span strictly between the two, `None` if they overlap or touch.
    pub fn gap(&self, other: &Self) -> SpanResult<Option<Self>> {
        if self.is_empty()? || other.is_empty()? {
            return Ok(None);
        }
        if self.overlaps_with(other)? || self.touches_with(other)? {
            return Ok(None);
        }

        let (start, end) = self.included()?;
        let (other_start, other_end) = other.included()?;

        let (left_end, right_start) = if other_end.map_or(false, |e| e < start) {
            (other_end, start)
        } else {
            (end, other_start)
        };

        match left_end {
            Some(left_end) => {
                let from = self.step(left_end, 1)?;
                let to = self.step(right_start, -1)?;
                self.chunk(from, Some(to))
            }
            None => Ok(None),
        }
    }

    /// Duration of the closed span.
    pub fn duration(&self) -> SpanResult<SpanDuration> {
        let (start, end) = self.included()?;
        let end = end.ok_or(SpanError::Unbounded { operation: "duration" })?;
        Ok(SpanDuration {
            start,
            end,
            precision: self.precision,
        })
    }
}

/// `a <= b` where a missing `b` is unbounded.
fn before_or_at(a: NaiveDateTime, b: Option<NaiveDateTime>) -> bool {
    b.map_or(true, |b| a <= b)
}

fn min_end(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn max_end(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        _ => None,
    }
}

impl fmt::Display for PrecisionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = match self.precision {
            Precision::Year => "%Y",
            Precision::Month => "%Y-%m",
            Precision::Day => "%Y-%m-%d",
            Precision::Hour => "%Y-%m-%d %H:00",
            Precision::Minute => "%Y-%m-%d %H:%M",
            Precision::Second => "%Y-%m-%d %H:%M:%S",
        };
        let open = if self.is_start_excluded() { '(' } else { '[' };
        let close = if self.is_end_excluded() { ')' } else { ']' };

        write!(f, "{}{}, ", open, self.start.format(pattern))?;
        match self.end {
            Some(end) => write!(f, "{}{}", end.format(pattern), close),
            None => write!(f, "..{}", close),
        }
    }
}

// ============================================================================
// Span Duration
// ============================================================================

/// Length of a closed span, measured between its included ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanDuration {
    start: NaiveDateTime,
    end: NaiveDateTime,
    precision: Precision,
}

impl SpanDuration {
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Number of precision units, both ends counted.
    pub fn units(&self) -> i64 {
        self.precision.units_between(self.start, self.end) + 1
    }

    /// Elapsed time from the included start to the end of the last unit.
    pub fn to_time_delta(&self) -> SpanResult<TimeDelta> {
        Ok(self.precision.add_units(self.end, 1)? - self.start)
    }

    pub fn compare_to(&self, other: &Self) -> SpanResult<Ordering> {
        Ok(self.to_time_delta()?.cmp(&other.to_time_delta()?))
    }

    pub fn is_larger_than(&self, other: &Self) -> SpanResult<bool> {
        Ok(self.compare_to(other)? == Ordering::Greater)
    }

    pub fn is_smaller_than(&self, other: &Self) -> SpanResult<bool> {
        Ok(self.compare_to(other)? == Ordering::Less)
    }
}
