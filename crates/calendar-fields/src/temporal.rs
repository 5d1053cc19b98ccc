//! Generic field access over `chrono`'s local date/time types.
//!
//! [`TemporalAccessor`] and [`Temporal`] are implemented for `NaiveDate`,
//! `NaiveDateTime` and `NaiveTime`. Built-in fields and units are matched
//! directly; anything else is handed back to the field or unit itself, so a
//! derived field written outside this module works at every generic call site.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::calendar::{self, overflow};
use crate::chrono_field::{ChronoField, ChronoUnit};
use crate::error::{FieldError, Result};
use crate::field::{TemporalField, TemporalUnit};
use crate::range::ValueRange;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;

/// Identifies the calendar system a temporal is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chronology {
    id: &'static str,
}

impl Chronology {
    /// The proleptic ISO-8601 calendar used by every `chrono` type.
    pub const ISO: Chronology = Chronology { id: "ISO" };

    pub const fn new(id: &'static str) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn is_iso(&self) -> bool {
        *self == Self::ISO
    }
}

impl fmt::Display for Chronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// Read-only access to the fields of a date, time or date-time.
pub trait TemporalAccessor {
    fn chronology(&self) -> Chronology {
        Chronology::ISO
    }

    fn is_supported<F: TemporalField + ?Sized>(&self, field: &F) -> bool;

    /// # Errors
    /// Returns `FieldError::UnsupportedField` if the field is unsupported.
    fn range<F: TemporalField + ?Sized>(&self, field: &F) -> Result<ValueRange>;

    /// # Errors
    /// Returns `FieldError::UnsupportedField` if the field is unsupported.
    fn get_long<F: TemporalField + ?Sized>(&self, field: &F) -> Result<i64>;

    /// The field value narrowed to an `i32` after checking it against
    /// [`range`](Self::range).
    ///
    /// # Errors
    /// Fails if the field is unsupported or its range does not fit an `i32`.
    fn get<F: TemporalField + ?Sized>(&self, field: &F) -> Result<i32> {
        let value = self.get_long(field)?;
        self.range(field)?.check_valid_int_value(value, field)
    }
}

/// An immutable date/time value that can produce adjusted copies.
pub trait Temporal: TemporalAccessor + Clone {
    fn is_supported_unit<U: TemporalUnit + ?Sized>(&self, unit: &U) -> bool;

    /// Copy with `field` set to `value`.
    ///
    /// # Errors
    /// Fails if the field is unsupported or the value invalid.
    fn with_field<F: TemporalField + ?Sized>(&self, field: &F, value: i64) -> Result<Self>;

    /// Copy with the date part replaced.
    ///
    /// # Errors
    /// Returns `FieldError::UnsupportedField` for types without a date.
    fn with_local_date(&self, date: NaiveDate) -> Result<Self>;

    /// # Errors
    /// Fails if the unit is unsupported or the result overflows.
    fn plus<U: TemporalUnit + ?Sized>(&self, amount: i64, unit: &U) -> Result<Self>;

    /// # Errors
    /// Fails if the unit is unsupported or the result overflows.
    fn until<U: TemporalUnit + ?Sized>(&self, end: &Self, unit: &U) -> Result<i64>;
}

/// The ISO date of any temporal that carries an epoch-day.
pub fn local_date<T: TemporalAccessor + ?Sized>(temporal: &T) -> Result<NaiveDate> {
    calendar::from_epoch_day(temporal.get_long(&ChronoField::EpochDay)?)
}

pub(crate) fn unsupported_field<F: fmt::Display + ?Sized>(field: &F) -> FieldError {
    FieldError::UnsupportedField(field.to_string())
}

pub(crate) fn unsupported_unit<U: fmt::Display + ?Sized>(unit: &U) -> FieldError {
    FieldError::UnsupportedUnit(unit.to_string())
}

// ---------------------------------------------------------------------------
// NaiveDate
// ---------------------------------------------------------------------------

impl TemporalAccessor for NaiveDate {
    fn is_supported<F: TemporalField + ?Sized>(&self, field: &F) -> bool {
        match field.as_chrono_field() {
            Some(builtin) => builtin.is_date_based(),
            None => field.is_supported_by(self),
        }
    }

    fn range<F: TemporalField + ?Sized>(&self, field: &F) -> Result<ValueRange> {
        match field.as_chrono_field() {
            Some(builtin) if builtin.is_date_based() => Ok(date_range(*self, builtin)),
            Some(builtin) => Err(unsupported_field(&builtin)),
            None => field.range_refined_by(self),
        }
    }

    fn get_long<F: TemporalField + ?Sized>(&self, field: &F) -> Result<i64> {
        match field.as_chrono_field() {
            Some(builtin) => date_get(*self, builtin),
            None => field.get_from(self),
        }
    }
}

impl Temporal for NaiveDate {
    fn is_supported_unit<U: TemporalUnit + ?Sized>(&self, unit: &U) -> bool {
        match unit.as_chrono_unit() {
            Some(builtin) => builtin.is_date_based(),
            None => unit.is_supported_by(self),
        }
    }

    fn with_field<F: TemporalField + ?Sized>(&self, field: &F, value: i64) -> Result<Self> {
        match field.as_chrono_field() {
            Some(builtin) => date_with(*self, builtin, value),
            None => field.adjust_into(self, value),
        }
    }

    fn with_local_date(&self, date: NaiveDate) -> Result<Self> {
        Ok(date)
    }

    fn plus<U: TemporalUnit + ?Sized>(&self, amount: i64, unit: &U) -> Result<Self> {
        match unit.as_chrono_unit() {
            Some(builtin) => date_plus(*self, amount, builtin),
            None => unit.add_to(self, amount),
        }
    }

    fn until<U: TemporalUnit + ?Sized>(&self, end: &Self, unit: &U) -> Result<i64> {
        match unit.as_chrono_unit() {
            Some(builtin) => date_until(*self, *end, builtin),
            None => unit.between(self, end),
        }
    }
}

fn date_range(date: NaiveDate, field: ChronoField) -> ValueRange {
    let year = i64::from(date.year());
    match field {
        ChronoField::DayOfMonth => {
            ValueRange::fixed(1, calendar::length_of_month(year, date.month()) as i32)
        }
        ChronoField::DayOfYear => ValueRange::fixed(1, calendar::length_of_year(year) as i32),
        _ => field.range(),
    }
}

fn date_get(date: NaiveDate, field: ChronoField) -> Result<i64> {
    match field {
        ChronoField::DayOfWeek => Ok(i64::from(calendar::iso_day_of_week(date))),
        ChronoField::DayOfMonth => Ok(i64::from(date.day())),
        ChronoField::DayOfYear => Ok(i64::from(date.ordinal())),
        ChronoField::MonthOfYear => Ok(i64::from(date.month())),
        ChronoField::Year => Ok(i64::from(date.year())),
        ChronoField::EpochDay => Ok(calendar::epoch_day(date)),
        ChronoField::NanoOfSecond
        | ChronoField::SecondOfMinute
        | ChronoField::MinuteOfHour
        | ChronoField::HourOfDay
        | ChronoField::SecondOfDay => Err(unsupported_field(&field)),
    }
}

fn date_with(date: NaiveDate, field: ChronoField, value: i64) -> Result<NaiveDate> {
    if !field.is_date_based() {
        return Err(unsupported_field(&field));
    }
    let value = field.check_valid_value(value)?;
    match field {
        ChronoField::DayOfWeek => {
            calendar::plus_days(date, value - i64::from(calendar::iso_day_of_week(date)))
        }
        ChronoField::DayOfMonth => {
            let day = calendar::to_u32(value)?;
            date.with_day(day).ok_or_else(|| {
                FieldError::InvalidValue(format!(
                    "day-of-month {day} is not valid for {}-{:02}",
                    date.year(),
                    date.month()
                ))
            })
        }
        ChronoField::DayOfYear => calendar::with_day_of_year(date, calendar::to_u32(value)?),
        ChronoField::MonthOfYear => calendar::with_month_clamped(date, calendar::to_u32(value)?),
        ChronoField::Year => calendar::with_year_clamped(date, calendar::to_int_exact(value)?),
        ChronoField::EpochDay => calendar::from_epoch_day(value),
        _ => Err(unsupported_field(&field)),
    }
}

fn date_plus(date: NaiveDate, amount: i64, unit: ChronoUnit) -> Result<NaiveDate> {
    let years = |factor: i64| {
        amount
            .checked_mul(factor)
            .ok_or_else(|| overflow(format!("{amount} {unit} in years")))
    };
    match unit {
        ChronoUnit::Days => calendar::plus_days(date, amount),
        ChronoUnit::Weeks => calendar::plus_weeks(date, amount),
        ChronoUnit::Months => calendar::plus_months(date, amount),
        ChronoUnit::Years => calendar::plus_years(date, amount),
        ChronoUnit::Decades => calendar::plus_years(date, years(10)?),
        ChronoUnit::Centuries => calendar::plus_years(date, years(100)?),
        ChronoUnit::Millennia => calendar::plus_years(date, years(1000)?),
        _ => Err(unsupported_unit(&unit)),
    }
}

fn date_until(start: NaiveDate, end: NaiveDate, unit: ChronoUnit) -> Result<i64> {
    let days = calendar::epoch_day(end) - calendar::epoch_day(start);
    let months = calendar::months_between(start, end);
    match unit {
        ChronoUnit::Days => Ok(days),
        ChronoUnit::Weeks => Ok(days / 7),
        ChronoUnit::Months => Ok(months),
        ChronoUnit::Years => Ok(months / 12),
        ChronoUnit::Decades => Ok(months / 120),
        ChronoUnit::Centuries => Ok(months / 1_200),
        ChronoUnit::Millennia => Ok(months / 12_000),
        _ => Err(unsupported_unit(&unit)),
    }
}

// ---------------------------------------------------------------------------
// NaiveTime
// ---------------------------------------------------------------------------

impl TemporalAccessor for NaiveTime {
    fn is_supported<F: TemporalField + ?Sized>(&self, field: &F) -> bool {
        match field.as_chrono_field() {
            Some(builtin) => builtin.is_time_based(),
            None => field.is_supported_by(self),
        }
    }

    fn range<F: TemporalField + ?Sized>(&self, field: &F) -> Result<ValueRange> {
        match field.as_chrono_field() {
            Some(builtin) if builtin.is_time_based() => Ok(builtin.range()),
            Some(builtin) => Err(unsupported_field(&builtin)),
            None => field.range_refined_by(self),
        }
    }

    fn get_long<F: TemporalField + ?Sized>(&self, field: &F) -> Result<i64> {
        match field.as_chrono_field() {
            Some(builtin) => time_get(*self, builtin),
            None => field.get_from(self),
        }
    }
}

impl Temporal for NaiveTime {
    fn is_supported_unit<U: TemporalUnit + ?Sized>(&self, unit: &U) -> bool {
        match unit.as_chrono_unit() {
            Some(builtin) => builtin.is_time_based(),
            None => unit.is_supported_by(self),
        }
    }

    fn with_field<F: TemporalField + ?Sized>(&self, field: &F, value: i64) -> Result<Self> {
        match field.as_chrono_field() {
            Some(builtin) => time_with(*self, builtin, value),
            None => field.adjust_into(self, value),
        }
    }

    fn with_local_date(&self, _date: NaiveDate) -> Result<Self> {
        Err(unsupported_field(&ChronoField::EpochDay))
    }

    /// Time-of-day arithmetic wraps around midnight.
    fn plus<U: TemporalUnit + ?Sized>(&self, amount: i64, unit: &U) -> Result<Self> {
        match unit.as_chrono_unit() {
            Some(builtin) => {
                let unit_nanos = time_unit_nanos(builtin)?;
                let shift = amount.rem_euclid(NANOS_PER_DAY / unit_nanos) * unit_nanos;
                Ok(self.overflowing_add_signed(Duration::nanoseconds(shift)).0)
            }
            None => unit.add_to(self, amount),
        }
    }

    fn until<U: TemporalUnit + ?Sized>(&self, end: &Self, unit: &U) -> Result<i64> {
        match unit.as_chrono_unit() {
            Some(builtin) => {
                let unit_nanos = time_unit_nanos(builtin)?;
                let nanos = end
                    .signed_duration_since(*self)
                    .num_nanoseconds()
                    .ok_or_else(|| overflow(format!("{self} until {end} in nanoseconds")))?;
                Ok(nanos / unit_nanos)
            }
            None => unit.between(self, end),
        }
    }
}

fn time_get(time: NaiveTime, field: ChronoField) -> Result<i64> {
    match field {
        ChronoField::NanoOfSecond => Ok(i64::from(time.nanosecond())),
        ChronoField::SecondOfMinute => Ok(i64::from(time.second())),
        ChronoField::MinuteOfHour => Ok(i64::from(time.minute())),
        ChronoField::HourOfDay => Ok(i64::from(time.hour())),
        ChronoField::SecondOfDay => Ok(i64::from(time.num_seconds_from_midnight())),
        ChronoField::DayOfWeek
        | ChronoField::DayOfMonth
        | ChronoField::DayOfYear
        | ChronoField::MonthOfYear
        | ChronoField::Year
        | ChronoField::EpochDay => Err(unsupported_field(&field)),
    }
}

fn time_with(time: NaiveTime, field: ChronoField, value: i64) -> Result<NaiveTime> {
    if !field.is_time_based() {
        return Err(unsupported_field(&field));
    }
    let value = calendar::to_u32(field.check_valid_value(value)?)?;
    let adjusted = match field {
        ChronoField::NanoOfSecond => time.with_nanosecond(value),
        ChronoField::SecondOfMinute => time.with_second(value),
        ChronoField::MinuteOfHour => time.with_minute(value),
        ChronoField::HourOfDay => time.with_hour(value),
        ChronoField::SecondOfDay => {
            NaiveTime::from_num_seconds_from_midnight_opt(value, time.nanosecond())
        }
        _ => None,
    };
    adjusted.ok_or_else(|| FieldError::InvalidValue(format!("{field} {value} for {time}")))
}

fn time_unit_nanos(unit: ChronoUnit) -> Result<i64> {
    match unit {
        ChronoUnit::Nanos => Ok(1),
        ChronoUnit::Micros => Ok(1_000),
        ChronoUnit::Millis => Ok(1_000_000),
        ChronoUnit::Seconds => Ok(NANOS_PER_SECOND),
        ChronoUnit::Minutes => Ok(60 * NANOS_PER_SECOND),
        ChronoUnit::Hours => Ok(3_600 * NANOS_PER_SECOND),
        ChronoUnit::HalfDays => Ok(43_200 * NANOS_PER_SECOND),
        _ => Err(unsupported_unit(&unit)),
    }
}

/// `amount` time units as a `Duration`, without overflowing on the way.
fn time_unit_delta(amount: i64, unit: ChronoUnit) -> Result<Duration> {
    let unit_nanos = time_unit_nanos(unit)?;
    let too_large = || overflow(format!("{amount} {unit} as a duration"));
    if unit_nanos >= NANOS_PER_SECOND {
        let seconds = amount
            .checked_mul(unit_nanos / NANOS_PER_SECOND)
            .ok_or_else(too_large)?;
        return Duration::try_seconds(seconds).ok_or_else(too_large);
    }
    let per_second = NANOS_PER_SECOND / unit_nanos;
    let seconds = Duration::try_seconds(amount.div_euclid(per_second)).ok_or_else(too_large)?;
    seconds
        .checked_add(&Duration::nanoseconds(amount.rem_euclid(per_second) * unit_nanos))
        .ok_or_else(too_large)
}

// ---------------------------------------------------------------------------
// NaiveDateTime
// ---------------------------------------------------------------------------

impl TemporalAccessor for NaiveDateTime {
    fn is_supported<F: TemporalField + ?Sized>(&self, field: &F) -> bool {
        match field.as_chrono_field() {
            Some(_) => true,
            None => field.is_supported_by(self),
        }
    }

    fn range<F: TemporalField + ?Sized>(&self, field: &F) -> Result<ValueRange> {
        match field.as_chrono_field() {
            Some(builtin) if builtin.is_date_based() => Ok(date_range(self.date(), builtin)),
            Some(builtin) => Ok(builtin.range()),
            None => field.range_refined_by(self),
        }
    }

    fn get_long<F: TemporalField + ?Sized>(&self, field: &F) -> Result<i64> {
        match field.as_chrono_field() {
            Some(builtin) if builtin.is_date_based() => date_get(self.date(), builtin),
            Some(builtin) => time_get(self.time(), builtin),
            None => field.get_from(self),
        }
    }
}

impl Temporal for NaiveDateTime {
    fn is_supported_unit<U: TemporalUnit + ?Sized>(&self, unit: &U) -> bool {
        match unit.as_chrono_unit() {
            Some(builtin) => builtin != ChronoUnit::Forever,
            None => unit.is_supported_by(self),
        }
    }

    fn with_field<F: TemporalField + ?Sized>(&self, field: &F, value: i64) -> Result<Self> {
        match field.as_chrono_field() {
            Some(builtin) if builtin.is_date_based() => {
                Ok(date_with(self.date(), builtin, value)?.and_time(self.time()))
            }
            Some(builtin) => Ok(self.date().and_time(time_with(self.time(), builtin, value)?)),
            None => field.adjust_into(self, value),
        }
    }

    fn with_local_date(&self, date: NaiveDate) -> Result<Self> {
        Ok(date.and_time(self.time()))
    }

    fn plus<U: TemporalUnit + ?Sized>(&self, amount: i64, unit: &U) -> Result<Self> {
        match unit.as_chrono_unit() {
            Some(builtin) if builtin.is_date_based() => {
                Ok(date_plus(self.date(), amount, builtin)?.and_time(self.time()))
            }
            Some(builtin) => self
                .checked_add_signed(time_unit_delta(amount, builtin)?)
                .ok_or_else(|| overflow(format!("{self} plus {amount} {builtin}"))),
            None => unit.add_to(self, amount),
        }
    }

    fn until<U: TemporalUnit + ?Sized>(&self, end: &Self, unit: &U) -> Result<i64> {
        match unit.as_chrono_unit() {
            Some(builtin) if builtin.is_date_based() => {
                // A partial final day does not count as a whole day.
                let mut end_date = end.date();
                if end_date > self.date() && end.time() < self.time() {
                    end_date = calendar::plus_days(end_date, -1)?;
                } else if end_date < self.date() && end.time() > self.time() {
                    end_date = calendar::plus_days(end_date, 1)?;
                }
                date_until(self.date(), end_date, builtin)
            }
            Some(builtin) => {
                let unit_nanos = time_unit_nanos(builtin)?;
                let elapsed = end.signed_duration_since(*self);
                if unit_nanos >= NANOS_PER_SECOND {
                    Ok(elapsed.num_seconds() / (unit_nanos / NANOS_PER_SECOND))
                } else {
                    let nanos = elapsed
                        .num_nanoseconds()
                        .ok_or_else(|| overflow(format!("{self} until {end} in {builtin}")))?;
                    Ok(nanos / unit_nanos)
                }
            }
            None => unit.between(self, end),
        }
    }
}
