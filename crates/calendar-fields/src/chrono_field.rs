//! Built-in ISO fields and units answered directly by the `chrono` types.

use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::calendar;
use crate::error::Result;
use crate::field::{TemporalField, TemporalUnit, Unit};
use crate::range::ValueRange;
use crate::temporal::{Temporal, TemporalAccessor};

/// The primitive fields of the ISO calendar and time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChronoField {
    NanoOfSecond,
    SecondOfMinute,
    MinuteOfHour,
    HourOfDay,
    SecondOfDay,
    /// ISO day-of-week, Monday = 1 through Sunday = 7.
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
    MonthOfYear,
    /// Proleptic year, limited to the years `chrono` can represent.
    Year,
    /// Days since 1970-01-01.
    EpochDay,
}

impl ChronoField {
    /// Checks `value` against [`TemporalField::range`].
    ///
    /// # Errors
    /// Returns `FieldError::ValueOutOfRange` if the value is invalid.
    pub fn check_valid_value(&self, value: i64) -> Result<i64> {
        self.range().check_valid_value(value, self)
    }

    /// Checks `value` against [`TemporalField::range`] and narrows it to `i32`.
    ///
    /// # Errors
    /// Returns `FieldError::ValueOutOfRange` if the value is invalid.
    pub fn check_valid_int_value(&self, value: i64) -> Result<i32> {
        self.range().check_valid_int_value(value, self)
    }

    fn name(&self) -> &'static str {
        match self {
            ChronoField::NanoOfSecond => "NanoOfSecond",
            ChronoField::SecondOfMinute => "SecondOfMinute",
            ChronoField::MinuteOfHour => "MinuteOfHour",
            ChronoField::HourOfDay => "HourOfDay",
            ChronoField::SecondOfDay => "SecondOfDay",
            ChronoField::DayOfWeek => "DayOfWeek",
            ChronoField::DayOfMonth => "DayOfMonth",
            ChronoField::DayOfYear => "DayOfYear",
            ChronoField::MonthOfYear => "MonthOfYear",
            ChronoField::Year => "Year",
            ChronoField::EpochDay => "EpochDay",
        }
    }
}

impl fmt::Display for ChronoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TemporalField for ChronoField {
    fn base_unit(&self) -> Unit {
        let unit = match self {
            ChronoField::NanoOfSecond => ChronoUnit::Nanos,
            ChronoField::SecondOfMinute | ChronoField::SecondOfDay => ChronoUnit::Seconds,
            ChronoField::MinuteOfHour => ChronoUnit::Minutes,
            ChronoField::HourOfDay => ChronoUnit::Hours,
            ChronoField::DayOfWeek
            | ChronoField::DayOfMonth
            | ChronoField::DayOfYear
            | ChronoField::EpochDay => ChronoUnit::Days,
            ChronoField::MonthOfYear => ChronoUnit::Months,
            ChronoField::Year => ChronoUnit::Years,
        };
        Unit::Chrono(unit)
    }

    fn range_unit(&self) -> Unit {
        let unit = match self {
            ChronoField::NanoOfSecond => ChronoUnit::Seconds,
            ChronoField::SecondOfMinute => ChronoUnit::Minutes,
            ChronoField::MinuteOfHour => ChronoUnit::Hours,
            ChronoField::HourOfDay | ChronoField::SecondOfDay => ChronoUnit::Days,
            ChronoField::DayOfWeek => ChronoUnit::Weeks,
            ChronoField::DayOfMonth => ChronoUnit::Months,
            ChronoField::DayOfYear | ChronoField::MonthOfYear => ChronoUnit::Years,
            ChronoField::Year | ChronoField::EpochDay => ChronoUnit::Forever,
        };
        Unit::Chrono(unit)
    }

    fn range(&self) -> ValueRange {
        match self {
            ChronoField::NanoOfSecond => ValueRange::fixed(0, 999_999_999),
            ChronoField::SecondOfMinute | ChronoField::MinuteOfHour => ValueRange::fixed(0, 59),
            ChronoField::HourOfDay => ValueRange::fixed(0, 23),
            ChronoField::SecondOfDay => ValueRange::fixed(0, 86_399),
            ChronoField::DayOfWeek => ValueRange::fixed(1, 7),
            ChronoField::DayOfMonth => ValueRange::new_unchecked(1, 1, 28, 31),
            ChronoField::DayOfYear => ValueRange::new_unchecked(1, 1, 365, 366),
            ChronoField::MonthOfYear => ValueRange::fixed(1, 12),
            ChronoField::Year => ValueRange::fixed(calendar::min_year(), calendar::max_year()),
            ChronoField::EpochDay => ValueRange::new_unchecked(
                calendar::epoch_day(NaiveDate::MIN),
                calendar::epoch_day(NaiveDate::MIN),
                calendar::epoch_day(NaiveDate::MAX),
                calendar::epoch_day(NaiveDate::MAX),
            ),
        }
    }

    fn is_date_based(&self) -> bool {
        matches!(
            self,
            ChronoField::DayOfWeek
                | ChronoField::DayOfMonth
                | ChronoField::DayOfYear
                | ChronoField::MonthOfYear
                | ChronoField::Year
                | ChronoField::EpochDay
        )
    }

    fn is_time_based(&self) -> bool {
        !self.is_date_based()
    }

    fn as_chrono_field(&self) -> Option<ChronoField> {
        Some(*self)
    }

    fn is_supported_by<T: TemporalAccessor>(&self, temporal: &T) -> bool {
        temporal.is_supported(self)
    }

    fn range_refined_by<T: TemporalAccessor>(&self, temporal: &T) -> Result<ValueRange> {
        temporal.range(self)
    }

    fn get_from<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        temporal.get_long(self)
    }

    fn adjust_into<T: Temporal>(&self, temporal: &T, new_value: i64) -> Result<T> {
        temporal.with_field(self, new_value)
    }
}

/// The standard units of the ISO calendar and time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChronoUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    HalfDays,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
    Forever,
}

/// Average Gregorian year: 365.2425 days.
pub(crate) const SECONDS_PER_YEAR: i64 = 31_556_952;

impl ChronoUnit {
    fn name(&self) -> &'static str {
        match self {
            ChronoUnit::Nanos => "Nanos",
            ChronoUnit::Micros => "Micros",
            ChronoUnit::Millis => "Millis",
            ChronoUnit::Seconds => "Seconds",
            ChronoUnit::Minutes => "Minutes",
            ChronoUnit::Hours => "Hours",
            ChronoUnit::HalfDays => "HalfDays",
            ChronoUnit::Days => "Days",
            ChronoUnit::Weeks => "Weeks",
            ChronoUnit::Months => "Months",
            ChronoUnit::Years => "Years",
            ChronoUnit::Decades => "Decades",
            ChronoUnit::Centuries => "Centuries",
            ChronoUnit::Millennia => "Millennia",
            ChronoUnit::Forever => "Forever",
        }
    }
}

impl fmt::Display for ChronoUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TemporalUnit for ChronoUnit {
    fn duration(&self) -> Duration {
        match self {
            ChronoUnit::Nanos => Duration::nanoseconds(1),
            ChronoUnit::Micros => Duration::microseconds(1),
            ChronoUnit::Millis => Duration::milliseconds(1),
            ChronoUnit::Seconds => Duration::seconds(1),
            ChronoUnit::Minutes => Duration::seconds(60),
            ChronoUnit::Hours => Duration::seconds(3_600),
            ChronoUnit::HalfDays => Duration::seconds(43_200),
            ChronoUnit::Days => Duration::seconds(86_400),
            ChronoUnit::Weeks => Duration::seconds(7 * 86_400),
            ChronoUnit::Months => Duration::seconds(SECONDS_PER_YEAR / 12),
            ChronoUnit::Years => Duration::seconds(SECONDS_PER_YEAR),
            ChronoUnit::Decades => Duration::seconds(SECONDS_PER_YEAR * 10),
            ChronoUnit::Centuries => Duration::seconds(SECONDS_PER_YEAR * 100),
            ChronoUnit::Millennia => Duration::seconds(SECONDS_PER_YEAR * 1_000),
            ChronoUnit::Forever => Duration::MAX,
        }
    }

    fn is_duration_estimated(&self) -> bool {
        *self >= ChronoUnit::Days
    }

    fn is_date_based(&self) -> bool {
        *self >= ChronoUnit::Days && *self != ChronoUnit::Forever
    }

    fn is_time_based(&self) -> bool {
        *self < ChronoUnit::Days
    }

    fn as_chrono_unit(&self) -> Option<ChronoUnit> {
        Some(*self)
    }

    fn is_supported_by<T: Temporal>(&self, temporal: &T) -> bool {
        temporal.is_supported_unit(self)
    }

    fn add_to<T: Temporal>(&self, temporal: &T, amount: i64) -> Result<T> {
        temporal.plus(amount, self)
    }

    fn between<T: Temporal>(&self, start: &T, end: &T) -> Result<i64> {
        start.until(end, self)
    }
}
