//! Yearly recurrence rules for offset transitions.
//!
//! A rule such as "last Sunday in October at 01:00 UTC" carries no year;
//! [`ZoneOffsetTransitionRule::create_transition`] materializes it for one.

use std::fmt;

use chrono::{Duration, FixedOffset, Month, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calendar;
use crate::error::{FieldError, Result};
use crate::transition::ZoneOffsetTransition;

/// How the local time of a rule is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDefinition {
    /// The time is in UTC.
    Utc,
    /// The time is local wall-clock time in the offset before the transition.
    #[default]
    Wall,
    /// The time is local time in the standard offset.
    Standard,
}

impl TimeDefinition {
    /// Converts `date_time` read under this definition to wall-clock time in
    /// `wall_offset`.
    ///
    /// # Errors
    /// Returns `FieldError::Overflow` if the result is out of range.
    pub fn create_date_time(
        &self,
        date_time: NaiveDateTime,
        standard_offset: FixedOffset,
        wall_offset: FixedOffset,
    ) -> Result<NaiveDateTime> {
        let shift = match self {
            TimeDefinition::Utc => wall_offset.local_minus_utc(),
            TimeDefinition::Standard => {
                wall_offset.local_minus_utc() - standard_offset.local_minus_utc()
            }
            TimeDefinition::Wall => return Ok(date_time),
        };
        date_time
            .checked_add_signed(Duration::seconds(i64::from(shift)))
            .ok_or_else(|| FieldError::Overflow(format!("{date_time} plus {shift} seconds")))
    }
}

impl fmt::Display for TimeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeDefinition::Utc => "UTC",
            TimeDefinition::Wall => "WALL",
            TimeDefinition::Standard => "STANDARD",
        })
    }
}

/// A recurring yearly offset transition.
///
/// The day is given by `day_of_month_indicator`: positive values count from
/// the start of the month, negative from the end (-1 is the last day).
/// With a day-of-week the date moves to the next (positive) or previous
/// (negative) occurrence of that weekday, so "Sunday on or after the 8th"
/// or "last Sunday" are both expressible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneOffsetTransitionRule {
    month: Month,
    day_of_month_indicator: i8,
    day_of_week: Option<Weekday>,
    time: NaiveTime,
    time_end_of_day: bool,
    time_definition: TimeDefinition,
    standard_offset: FixedOffset,
    offset_before: FixedOffset,
    offset_after: FixedOffset,
}

impl ZoneOffsetTransitionRule {
    /// # Errors
    /// Returns `FieldError::InvalidRule` if `day_of_month_indicator` is zero
    /// or outside -28 to 31, if `time_end_of_day` is set with a time other
    /// than midnight, or if `time` has a sub-second part.
    #[allow(clippy::too_many_arguments)]
    pub fn of(
        month: Month,
        day_of_month_indicator: i32,
        day_of_week: Option<Weekday>,
        time: NaiveTime,
        time_end_of_day: bool,
        time_definition: TimeDefinition,
        standard_offset: FixedOffset,
        offset_before: FixedOffset,
        offset_after: FixedOffset,
    ) -> Result<Self> {
        if !(-28..=31).contains(&day_of_month_indicator) || day_of_month_indicator == 0 {
            return Err(FieldError::InvalidRule(format!(
                "day of month indicator must be between -28 and 31 inclusive excluding zero, was {day_of_month_indicator}"
            )));
        }
        if time_end_of_day && time != NaiveTime::MIN {
            return Err(FieldError::InvalidRule(
                "time must be midnight when end of day flag is true".to_string(),
            ));
        }
        if time.nanosecond() != 0 {
            return Err(FieldError::InvalidRule(
                "time's nano-of-second must be zero".to_string(),
            ));
        }
        Ok(Self {
            month,
            // checked above to lie in -28..=31
            day_of_month_indicator: day_of_month_indicator as i8,
            day_of_week,
            time,
            time_end_of_day,
            time_definition,
            standard_offset,
            offset_before,
            offset_after,
        })
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn day_of_month_indicator(&self) -> i32 {
        i32::from(self.day_of_month_indicator)
    }

    pub fn day_of_week(&self) -> Option<Weekday> {
        self.day_of_week
    }

    /// Local time of the transition; midnight when [`is_midnight_end_of_day`](Self::is_midnight_end_of_day).
    pub fn local_time(&self) -> NaiveTime {
        self.time
    }

    /// Whether the transition happens at 24:00, the end of the computed day.
    pub fn is_midnight_end_of_day(&self) -> bool {
        self.time_end_of_day
    }

    pub fn time_definition(&self) -> TimeDefinition {
        self.time_definition
    }

    pub fn standard_offset(&self) -> FixedOffset {
        self.standard_offset
    }

    pub fn offset_before(&self) -> FixedOffset {
        self.offset_before
    }

    pub fn offset_after(&self) -> FixedOffset {
        self.offset_after
    }

    /// The transition this rule describes in `year`.
    ///
    /// # Errors
    /// Fails if the day does not exist in that month of `year` (e.g. the
    /// 31st of April) or the result leaves the supported date range.
    pub fn create_transition(&self, year: i32) -> Result<ZoneOffsetTransition> {
        let month = self.month.number_from_month();
        let indicator = i64::from(self.day_of_month_indicator);
        let mut date = if indicator < 0 {
            let day = i64::from(calendar::length_of_month(i64::from(year), month)) + 1 + indicator;
            let date = calendar::date_of(year, month, calendar::to_u32(day)?)?;
            match self.day_of_week {
                Some(weekday) => calendar::previous_or_same(date, weekday)?,
                None => date,
            }
        } else {
            let date = calendar::date_of(year, month, calendar::to_u32(indicator)?)?;
            match self.day_of_week {
                Some(weekday) => calendar::next_or_same(date, weekday)?,
                None => date,
            }
        };
        if self.time_end_of_day {
            date = calendar::plus_days(date, 1)?;
        }
        let local = self.time_definition.create_date_time(
            date.and_time(self.time),
            self.standard_offset,
            self.offset_before,
        )?;
        let transition = ZoneOffsetTransition::from_parts(local, self.offset_before, self.offset_after)?;
        trace!(year, %transition, "created transition from rule");
        Ok(transition)
    }
}

impl fmt::Display for ZoneOffsetTransitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.offset_after.local_minus_utc() > self.offset_before.local_minus_utc() {
            "Gap"
        } else {
            "Overlap"
        };
        write!(
            f,
            "TransitionRule[{kind} {} to {}, ",
            self.offset_before, self.offset_after
        )?;
        let month = self.month.name();
        match self.day_of_week {
            Some(weekday) if self.day_of_month_indicator == -1 => {
                write!(f, "{weekday} on or before last day of {month}")?;
            }
            Some(weekday) if self.day_of_month_indicator < 0 => {
                write!(
                    f,
                    "{weekday} on or before last day minus {} of {month}",
                    -self.day_of_month_indicator - 1
                )?;
            }
            Some(weekday) => {
                write!(f, "{weekday} on or after {month} {}", self.day_of_month_indicator)?;
            }
            None => write!(f, "{month} {}", self.day_of_month_indicator)?,
        }
        if self.time_end_of_day {
            write!(f, " at 24:00")?;
        } else if self.time.second() == 0 {
            write!(f, " at {}", self.time.format("%H:%M"))?;
        } else {
            write!(f, " at {}", self.time.format("%H:%M:%S"))?;
        }
        write!(
            f,
            " {}, standard offset {}]",
            self.time_definition, self.standard_offset
        )
    }
}
