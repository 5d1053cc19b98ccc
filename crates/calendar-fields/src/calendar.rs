//! Overflow-checked ISO calendar arithmetic over `chrono` dates.
//!
//! `chrono` supports a narrower year range than the proleptic calendar
//! itself, and its unchecked operators panic when a result leaves that
//! range. Everything here returns `Result` instead so that callers can
//! propagate `FieldError::Overflow` with `?`.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{FieldError, Result};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAY_FROM_CE: i64 = 719_163;

pub fn min_year() -> i32 {
    NaiveDate::MIN.year()
}

pub fn max_year() -> i32 {
    NaiveDate::MAX.year()
}

/// Proleptic ISO leap-year rule, valid for any `i64` year.
pub fn is_leap_year(year: i64) -> bool {
    (year & 3) == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn length_of_year(year: i64) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

pub fn length_of_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Builds a date, failing if the day does not exist in that month.
pub fn date_of(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        FieldError::InvalidValue(format!("invalid date {year}-{month:02}-{day:02}"))
    })
}

/// ISO day-of-week number, Monday = 1 through Sunday = 7.
pub fn iso_day_of_week(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

pub fn epoch_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAY_FROM_CE
}

pub fn from_epoch_day(epoch_day: i64) -> Result<NaiveDate> {
    epoch_day
        .checked_add(UNIX_EPOCH_DAY_FROM_CE)
        .and_then(|days| i32::try_from(days).ok())
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| overflow(format!("epoch day {epoch_day} is out of range")))
}

pub fn plus_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| overflow(format!("{date} plus {days} days")))
}

pub fn plus_weeks(date: NaiveDate, weeks: i64) -> Result<NaiveDate> {
    let days = weeks
        .checked_mul(7)
        .ok_or_else(|| overflow(format!("{weeks} weeks in days")))?;
    plus_days(date, days)
}

/// Adds months, clamping the day-of-month to the last valid day.
pub fn plus_months(date: NaiveDate, months: i64) -> Result<NaiveDate> {
    let magnitude = u32::try_from(months.unsigned_abs())
        .map_err(|_| overflow(format!("{date} plus {months} months")))?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or_else(|| overflow(format!("{date} plus {months} months")))
}

/// Adds years, moving February 29 to February 28 in non-leap targets.
pub fn plus_years(date: NaiveDate, years: i64) -> Result<NaiveDate> {
    let months = years
        .checked_mul(12)
        .ok_or_else(|| overflow(format!("{years} years in months")))?;
    plus_months(date, months)
}

pub fn with_day_of_year(date: NaiveDate, day_of_year: u32) -> Result<NaiveDate> {
    date.with_ordinal(day_of_year).ok_or_else(|| {
        FieldError::InvalidValue(format!(
            "day-of-year {day_of_year} is not valid for year {}",
            date.year()
        ))
    })
}

/// Same date with `month`, clamping the day-of-month like `plus_months`.
pub fn with_month_clamped(date: NaiveDate, month: u32) -> Result<NaiveDate> {
    let day = date.day().min(length_of_month(i64::from(date.year()), month));
    date_of(date.year(), month, day)
}

/// Same date with `year`, moving February 29 to February 28 when needed.
pub fn with_year_clamped(date: NaiveDate, year: i32) -> Result<NaiveDate> {
    let day = date
        .day()
        .min(length_of_month(i64::from(year), date.month()));
    date_of(year, date.month(), day)
}

/// Whole months from `start` to `end`, truncated toward zero.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let packed = |d: NaiveDate| {
        let proleptic_month = i64::from(d.year()) * 12 + i64::from(d.month0());
        proleptic_month * 32 + i64::from(d.day())
    };
    (packed(end) - packed(start)) / 32
}

/// The first date on or after `date` falling on `weekday`.
pub fn next_or_same(date: NaiveDate, weekday: Weekday) -> Result<NaiveDate> {
    let ahead = (7 + i64::from(weekday.num_days_from_monday())
        - i64::from(date.weekday().num_days_from_monday()))
        % 7;
    plus_days(date, ahead)
}

/// The last date on or before `date` falling on `weekday`.
pub fn previous_or_same(date: NaiveDate, weekday: Weekday) -> Result<NaiveDate> {
    let behind = (7 + i64::from(date.weekday().num_days_from_monday())
        - i64::from(weekday.num_days_from_monday()))
        % 7;
    plus_days(date, -behind)
}

/// Narrows to `i32`, failing instead of truncating.
pub fn to_int_exact(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| overflow(format!("{value} does not fit an int")))
}

pub(crate) fn to_u32(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| overflow(format!("{value} does not fit an unsigned int")))
}

pub(crate) fn overflow(message: String) -> FieldError {
    FieldError::Overflow(message)
}
