//! A single change of UTC offset on the local time-line.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::{FieldError, Result};

/// The instant at which the offset changes from `offset_before` to
/// `offset_after`.
///
/// A gap (offset increases, spring forward) skips local times; an overlap
/// (offset decreases, fall back) repeats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneOffsetTransition {
    instant: DateTime<Utc>,
    local_before: NaiveDateTime,
    local_after: NaiveDateTime,
    offset_before: FixedOffset,
    offset_after: FixedOffset,
}

impl ZoneOffsetTransition {
    /// A transition at local time `transition`, expressed in `offset_before`.
    ///
    /// # Errors
    /// Returns `FieldError::InvalidRule` if the offsets are equal or the local
    /// time has a sub-second part, `FieldError::Overflow` if the instant is
    /// out of range.
    pub fn new(
        transition: NaiveDateTime,
        offset_before: FixedOffset,
        offset_after: FixedOffset,
    ) -> Result<Self> {
        if offset_before == offset_after {
            return Err(FieldError::InvalidRule(
                "offsets must not be equal".to_string(),
            ));
        }
        if transition.nanosecond() != 0 {
            return Err(FieldError::InvalidRule(
                "nano-of-second must be zero".to_string(),
            ));
        }
        Self::from_parts(transition, offset_before, offset_after)
    }

    /// Builds a transition without the equal-offset check; rules may describe
    /// a change of standard offset that leaves the wall offset unchanged.
    pub(crate) fn from_parts(
        transition: NaiveDateTime,
        offset_before: FixedOffset,
        offset_after: FixedOffset,
    ) -> Result<Self> {
        let out_of_range = || FieldError::Overflow(format!("transition at {transition}"));
        let utc = transition
            .checked_sub_signed(Duration::seconds(i64::from(offset_before.local_minus_utc())))
            .ok_or_else(out_of_range)?;
        let local_after = utc
            .checked_add_signed(Duration::seconds(i64::from(offset_after.local_minus_utc())))
            .ok_or_else(out_of_range)?;
        Ok(Self {
            instant: Utc.from_utc_datetime(&utc),
            local_before: transition,
            local_after,
            offset_before,
            offset_after,
        })
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn to_epoch_second(&self) -> i64 {
        self.instant.timestamp()
    }

    /// Local date-time of the transition expressed in the offset before.
    pub fn date_time_before(&self) -> NaiveDateTime {
        self.local_before
    }

    /// Local date-time of the transition expressed in the offset after.
    pub fn date_time_after(&self) -> NaiveDateTime {
        self.local_after
    }

    pub fn offset_before(&self) -> FixedOffset {
        self.offset_before
    }

    pub fn offset_after(&self) -> FixedOffset {
        self.offset_after
    }

    /// Signed size of the change: positive for a gap, negative for an overlap.
    pub fn duration(&self) -> Duration {
        Duration::seconds(i64::from(self.offset_change()))
    }

    pub fn is_gap(&self) -> bool {
        self.offset_change() > 0
    }

    pub fn is_overlap(&self) -> bool {
        self.offset_change() < 0
    }

    /// Whether `offset` is valid for local times during the transition:
    /// never during a gap, either offset during an overlap.
    pub fn is_valid_offset(&self, offset: FixedOffset) -> bool {
        if self.is_gap() {
            false
        } else {
            offset == self.offset_before || offset == self.offset_after
        }
    }

    fn offset_change(&self) -> i32 {
        self.offset_after.local_minus_utc() - self.offset_before.local_minus_utc()
    }
}

impl PartialOrd for ZoneOffsetTransition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Transitions order by instant.
impl Ord for ZoneOffsetTransition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| {
                self.offset_before
                    .local_minus_utc()
                    .cmp(&other.offset_before.local_minus_utc())
            })
            .then_with(|| {
                self.offset_after
                    .local_minus_utc()
                    .cmp(&other.offset_after.local_minus_utc())
            })
    }
}

impl fmt::Display for ZoneOffsetTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transition[{} at {}{} to {}]",
            if self.is_gap() { "Gap" } else { "Overlap" },
            self.local_before.format("%Y-%m-%dT%H:%M:%S"),
            self.offset_before,
            self.offset_after
        )
    }
}
