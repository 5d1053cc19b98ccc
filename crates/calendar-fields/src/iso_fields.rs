//! Quarter and ISO-8601 week-based fields of the ISO calendar.
//!
//! - [`DAY_OF_QUARTER`] counts 1 to 90, 91 or 92 within a quarter.
//! - [`QUARTER_OF_YEAR`] counts quarters 1 to 4.
//! - [`WEEK_OF_WEEK_BASED_YEAR`] and [`WEEK_BASED_YEAR`] implement ISO-8601
//!   week numbering: weeks start on Monday and week 1 is the week holding
//!   the first Thursday of the year, so a week never straddles two
//!   week-based-years.
//!
//! All four fields only apply to ISO temporals; [`TemporalField::is_supported_by`]
//! is false for any other chronology.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::calendar;
use crate::chrono_field::{ChronoField, ChronoUnit, SECONDS_PER_YEAR};
use crate::error::{FieldError, Result};
use crate::field::{Field, FieldValues, ResolverStyle, TemporalField, TemporalUnit, Unit};
use crate::range::ValueRange;
use crate::temporal::{local_date, unsupported_field, Chronology, Temporal, TemporalAccessor};

pub const DAY_OF_QUARTER: IsoField = IsoField::DayOfQuarter;
pub const QUARTER_OF_YEAR: IsoField = IsoField::QuarterOfYear;
pub const WEEK_OF_WEEK_BASED_YEAR: IsoField = IsoField::WeekOfWeekBasedYear;
pub const WEEK_BASED_YEAR: IsoField = IsoField::WeekBasedYear;

pub const WEEK_BASED_YEARS: IsoUnit = IsoUnit::WeekBasedYears;
pub const QUARTER_YEARS: IsoUnit = IsoUnit::QuarterYears;

/// Day-of-year offset of the first day of each quarter; leap years use the
/// second row.
const QUARTER_DAYS: [i64; 8] = [0, 90, 181, 273, 0, 91, 182, 274];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsoField {
    DayOfQuarter,
    QuarterOfYear,
    WeekOfWeekBasedYear,
    WeekBasedYear,
}

impl fmt::Display for IsoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IsoField::DayOfQuarter => "DayOfQuarter",
            IsoField::QuarterOfYear => "QuarterOfYear",
            IsoField::WeekOfWeekBasedYear => "WeekOfWeekBasedYear",
            IsoField::WeekBasedYear => "WeekBasedYear",
        })
    }
}

impl TemporalField for IsoField {
    fn base_unit(&self) -> Unit {
        match self {
            IsoField::DayOfQuarter => Unit::Chrono(ChronoUnit::Days),
            IsoField::QuarterOfYear => Unit::Iso(IsoUnit::QuarterYears),
            IsoField::WeekOfWeekBasedYear => Unit::Chrono(ChronoUnit::Weeks),
            IsoField::WeekBasedYear => Unit::Iso(IsoUnit::WeekBasedYears),
        }
    }

    fn range_unit(&self) -> Unit {
        match self {
            IsoField::DayOfQuarter => Unit::Iso(IsoUnit::QuarterYears),
            IsoField::QuarterOfYear => Unit::Chrono(ChronoUnit::Years),
            IsoField::WeekOfWeekBasedYear => Unit::Iso(IsoUnit::WeekBasedYears),
            IsoField::WeekBasedYear => Unit::Chrono(ChronoUnit::Forever),
        }
    }

    fn range(&self) -> ValueRange {
        match self {
            IsoField::DayOfQuarter => ValueRange::new_unchecked(1, 1, 90, 92),
            IsoField::QuarterOfYear => ValueRange::fixed(1, 4),
            IsoField::WeekOfWeekBasedYear => ValueRange::new_unchecked(1, 1, 52, 53),
            IsoField::WeekBasedYear => ChronoField::Year.range(),
        }
    }

    fn is_date_based(&self) -> bool {
        true
    }

    fn is_time_based(&self) -> bool {
        false
    }

    fn is_supported_by<T: TemporalAccessor>(&self, temporal: &T) -> bool {
        if !temporal.chronology().is_iso() {
            return false;
        }
        match self {
            IsoField::DayOfQuarter => {
                temporal.is_supported(&ChronoField::DayOfYear)
                    && temporal.is_supported(&ChronoField::MonthOfYear)
                    && temporal.is_supported(&ChronoField::Year)
            }
            IsoField::QuarterOfYear => temporal.is_supported(&ChronoField::MonthOfYear),
            IsoField::WeekOfWeekBasedYear | IsoField::WeekBasedYear => {
                temporal.is_supported(&ChronoField::EpochDay)
            }
        }
    }

    fn range_refined_by<T: TemporalAccessor>(&self, temporal: &T) -> Result<ValueRange> {
        self.ensure_supported(temporal)?;
        match self {
            IsoField::DayOfQuarter => {
                let quarter = temporal.get_long(&IsoField::QuarterOfYear)?;
                Ok(match quarter {
                    1 if calendar::is_leap_year(temporal.get_long(&ChronoField::Year)?) => {
                        ValueRange::fixed(1, 91)
                    }
                    1 => ValueRange::fixed(1, 90),
                    2 => ValueRange::fixed(1, 91),
                    3 | 4 => ValueRange::fixed(1, 92),
                    _ => self.range(),
                })
            }
            IsoField::WeekOfWeekBasedYear => Ok(week_range_of_date(local_date(temporal)?)),
            IsoField::QuarterOfYear | IsoField::WeekBasedYear => Ok(self.range()),
        }
    }

    fn get_from<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        self.ensure_supported(temporal)?;
        match self {
            IsoField::DayOfQuarter => {
                let day_of_year = i64::from(temporal.get(&ChronoField::DayOfYear)?);
                let month = i64::from(temporal.get(&ChronoField::MonthOfYear)?);
                let year = temporal.get_long(&ChronoField::Year)?;
                let row = if calendar::is_leap_year(year) { 4 } else { 0 };
                // month is 1..=12, so the index is 0..=7
                let index = ((month - 1) / 3 + row) as usize;
                Ok(day_of_year - QUARTER_DAYS[index])
            }
            IsoField::QuarterOfYear => {
                let month = temporal.get_long(&ChronoField::MonthOfYear)?;
                Ok((month + 2) / 3)
            }
            IsoField::WeekOfWeekBasedYear => Ok(i64::from(iso_week(local_date(temporal)?))),
            IsoField::WeekBasedYear => Ok(i64::from(iso_week_based_year(local_date(temporal)?))),
        }
    }

    fn adjust_into<T: Temporal>(&self, temporal: &T, new_value: i64) -> Result<T> {
        match self {
            IsoField::DayOfQuarter => {
                let current = self.get_from(temporal)?;
                self.range().check_valid_value(new_value, self)?;
                let day_of_year = temporal.get_long(&ChronoField::DayOfYear)?;
                temporal.with_field(&ChronoField::DayOfYear, day_of_year + (new_value - current))
            }
            IsoField::QuarterOfYear => {
                let current = self.get_from(temporal)?;
                self.range().check_valid_value(new_value, self)?;
                let month = temporal.get_long(&ChronoField::MonthOfYear)?;
                temporal.with_field(&ChronoField::MonthOfYear, month + (new_value - current) * 3)
            }
            IsoField::WeekOfWeekBasedYear => {
                self.range().check_valid_value(new_value, self)?;
                let weeks = new_value
                    .checked_sub(self.get_from(temporal)?)
                    .ok_or_else(|| FieldError::Overflow(format!("{self} shift to {new_value}")))?;
                temporal.plus(weeks, &ChronoUnit::Weeks)
            }
            IsoField::WeekBasedYear => {
                self.ensure_supported(temporal)?;
                let year = self.range().check_valid_int_value(new_value, self)?;
                let date = with_week_based_year(local_date(temporal)?, year)?;
                temporal.with_local_date(date)
            }
        }
    }

    fn resolve(
        &self,
        field_values: &mut FieldValues,
        chronology: &Chronology,
        style: ResolverStyle,
    ) -> Result<Option<NaiveDate>> {
        match self {
            IsoField::DayOfQuarter => resolve_day_of_quarter(field_values, chronology, style),
            IsoField::WeekOfWeekBasedYear => resolve_week_date(field_values, chronology, style),
            IsoField::QuarterOfYear | IsoField::WeekBasedYear => Ok(None),
        }
    }
}

impl IsoField {
    fn ensure_supported<T: TemporalAccessor>(&self, temporal: &T) -> Result<()> {
        if self.is_supported_by(temporal) {
            Ok(())
        } else {
            Err(unsupported_field(self))
        }
    }
}

fn ensure_iso(chronology: &Chronology) -> Result<()> {
    if chronology.is_iso() {
        Ok(())
    } else {
        Err(FieldError::UnsupportedChronology(chronology.to_string()))
    }
}

fn resolve_day_of_quarter(
    field_values: &mut FieldValues,
    chronology: &Chronology,
    style: ResolverStyle,
) -> Result<Option<NaiveDate>> {
    let year_key = Field::Chrono(ChronoField::Year);
    let quarter_key = Field::Iso(IsoField::QuarterOfYear);
    let day_key = Field::Iso(IsoField::DayOfQuarter);
    let (Some(&year), Some(&quarter), Some(&day_of_quarter)) = (
        field_values.get(&year_key),
        field_values.get(&quarter_key),
        field_values.get(&day_key),
    ) else {
        return Ok(None);
    };
    // the year is validated whatever the style
    let year = ChronoField::Year.check_valid_int_value(year)?;
    ensure_iso(chronology)?;

    let overflow = || FieldError::Overflow(format!("quarter {quarter} day {day_of_quarter}"));
    let date = match style {
        ResolverStyle::Lenient => {
            let months = quarter
                .checked_sub(1)
                .and_then(|q| q.checked_mul(3))
                .ok_or_else(overflow)?;
            let first = calendar::plus_months(calendar::date_of(year, 1, 1)?, months)?;
            calendar::plus_days(first, day_of_quarter.checked_sub(1).ok_or_else(overflow)?)?
        }
        ResolverStyle::Strict | ResolverStyle::Smart => {
            let quarter = IsoField::QuarterOfYear
                .range()
                .check_valid_int_value(quarter, &IsoField::QuarterOfYear)?;
            let month = u32::try_from((quarter - 1) * 3 + 1).map_err(|_| overflow())?;
            let first = calendar::date_of(year, month, 1)?;
            if !(1..=90).contains(&day_of_quarter) {
                if style == ResolverStyle::Strict {
                    IsoField::DayOfQuarter
                        .range_refined_by(&first)?
                        .check_valid_value(day_of_quarter, &IsoField::DayOfQuarter)?;
                } else {
                    // smart allows the full 1..=92 and may spill into the next quarter
                    IsoField::DayOfQuarter
                        .range()
                        .check_valid_value(day_of_quarter, &IsoField::DayOfQuarter)?;
                }
            }
            calendar::plus_days(first, day_of_quarter - 1)?
        }
    };

    field_values.remove(&day_key);
    field_values.remove(&year_key);
    field_values.remove(&quarter_key);
    debug!(%date, ?style, "resolved year, quarter-of-year and day-of-quarter");
    Ok(Some(date))
}

fn resolve_week_date(
    field_values: &mut FieldValues,
    chronology: &Chronology,
    style: ResolverStyle,
) -> Result<Option<NaiveDate>> {
    let week_based_year_key = Field::Iso(IsoField::WeekBasedYear);
    let week_key = Field::Iso(IsoField::WeekOfWeekBasedYear);
    let day_of_week_key = Field::Chrono(ChronoField::DayOfWeek);
    let (Some(&week_based_year), Some(&week), Some(&day_of_week)) = (
        field_values.get(&week_based_year_key),
        field_values.get(&week_key),
        field_values.get(&day_of_week_key),
    ) else {
        return Ok(None);
    };
    let week_based_year = IsoField::WeekBasedYear
        .range()
        .check_valid_int_value(week_based_year, &IsoField::WeekBasedYear)?;
    ensure_iso(chronology)?;

    // January 4th is always in week 1
    let mut date = calendar::date_of(week_based_year, 1, 4)?;
    let overflow = || FieldError::Overflow(format!("week {week} day-of-week {day_of_week}"));
    match style {
        ResolverStyle::Lenient => {
            let day_index = day_of_week.checked_sub(1).ok_or_else(overflow)?;
            date = calendar::plus_weeks(date, day_index.div_euclid(7))?;
            let day_of_week = day_index.rem_euclid(7) + 1;
            date = calendar::plus_weeks(date, week.checked_sub(1).ok_or_else(overflow)?)?;
            date = date.with_field(&ChronoField::DayOfWeek, day_of_week)?;
        }
        ResolverStyle::Strict | ResolverStyle::Smart => {
            let day_of_week = ChronoField::DayOfWeek.check_valid_int_value(day_of_week)?;
            if !(1..=52).contains(&week) {
                if style == ResolverStyle::Strict {
                    week_range_of_date(date).check_valid_value(week, &IsoField::WeekOfWeekBasedYear)?;
                } else {
                    IsoField::WeekOfWeekBasedYear
                        .range()
                        .check_valid_value(week, &IsoField::WeekOfWeekBasedYear)?;
                }
            }
            date = calendar::plus_weeks(date, week - 1)?;
            date = date.with_field(&ChronoField::DayOfWeek, i64::from(day_of_week))?;
        }
    }

    field_values.remove(&week_key);
    field_values.remove(&week_based_year_key);
    field_values.remove(&day_of_week_key);
    debug!(%date, ?style, "resolved ISO week-based-year, week and day-of-week");
    Ok(Some(date))
}

/// ISO week number of `date`, 1 to 53.
pub(crate) fn iso_week(date: NaiveDate) -> u32 {
    let day_of_week0 = i64::from(date.weekday().num_days_from_monday());
    let day_of_year0 = i64::from(date.ordinal0());
    let thursday_day_of_year0 = day_of_year0 + (3 - day_of_week0);
    let aligned_week = thursday_day_of_year0 / 7;
    let first_thursday_day_of_year0 = thursday_day_of_year0 - aligned_week * 7;
    let mut first_monday_day_of_year0 = first_thursday_day_of_year0 - 3;
    if first_monday_day_of_year0 < -3 {
        first_monday_day_of_year0 += 7;
    }
    if day_of_year0 < first_monday_day_of_year0 {
        // last week of the previous week-based-year
        return weeks_in_week_based_year(i64::from(date.year()) - 1);
    }
    let mut week = (day_of_year0 - first_monday_day_of_year0) / 7 + 1;
    if week == 53 {
        let has_week_53 = first_monday_day_of_year0 == -3
            || (first_monday_day_of_year0 == -2
                && calendar::is_leap_year(i64::from(date.year())));
        if !has_week_53 {
            week = 1;
        }
    }
    // 1..=53
    week as u32
}

/// ISO week-based-year of `date`, which differs from the calendar year for
/// up to three days at either end of the year.
pub(crate) fn iso_week_based_year(date: NaiveDate) -> i32 {
    let mut year = date.year();
    let day_of_year = i64::from(date.ordinal());
    let day_of_week0 = i64::from(date.weekday().num_days_from_monday());
    if day_of_year <= 3 {
        if day_of_year - day_of_week0 < -2 {
            year -= 1;
        }
    } else if day_of_year >= 363 {
        let leap = i64::from(calendar::is_leap_year(i64::from(date.year())));
        if day_of_year - 363 - leap - day_of_week0 >= 0 {
            year += 1;
        }
    }
    year
}

/// 52 or 53: a week-based-year has 53 weeks when it starts on a Thursday, or
/// on a Wednesday in a leap year.
pub(crate) fn weeks_in_week_based_year(week_based_year: i64) -> u32 {
    // January 1st of year y is a weekday determined by the proleptic
    // day count; computed arithmetically so any i64 year works.
    let y = week_based_year - 1;
    let days_before = 365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400);
    // 0001-01-01 is a Monday
    let jan1_day_of_week0 = days_before.rem_euclid(7);
    if jan1_day_of_week0 == 3 || (jan1_day_of_week0 == 2 && calendar::is_leap_year(week_based_year))
    {
        53
    } else {
        52
    }
}

fn week_range_of_date(date: NaiveDate) -> ValueRange {
    let weeks = weeks_in_week_based_year(i64::from(iso_week_based_year(date)));
    ValueRange::fixed(1, weeks as i32)
}

/// Moves `date` into `week_based_year`, keeping its week and day-of-week.
/// Week 53 becomes week 52 when the target year is short.
fn with_week_based_year(date: NaiveDate, week_based_year: i32) -> Result<NaiveDate> {
    let day_of_week = i64::from(calendar::iso_day_of_week(date));
    let mut week = i64::from(iso_week(date));
    if week == 53 && weeks_in_week_based_year(i64::from(week_based_year)) == 52 {
        week = 52;
    }
    let jan4 = calendar::date_of(week_based_year, 1, 4)?;
    let days = (day_of_week - i64::from(calendar::iso_day_of_week(jan4))) + (week - 1) * 7;
    calendar::plus_days(jan4, days)
}

/// The two ISO calendar units without a `ChronoUnit` counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsoUnit {
    WeekBasedYears,
    QuarterYears,
}

impl fmt::Display for IsoUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IsoUnit::WeekBasedYears => "WeekBasedYears",
            IsoUnit::QuarterYears => "QuarterYears",
        })
    }
}

impl TemporalUnit for IsoUnit {
    fn duration(&self) -> Duration {
        match self {
            IsoUnit::WeekBasedYears => Duration::seconds(SECONDS_PER_YEAR),
            IsoUnit::QuarterYears => Duration::seconds(SECONDS_PER_YEAR / 4),
        }
    }

    fn is_duration_estimated(&self) -> bool {
        true
    }

    fn is_date_based(&self) -> bool {
        true
    }

    fn is_time_based(&self) -> bool {
        false
    }

    fn is_supported_by<T: Temporal>(&self, temporal: &T) -> bool {
        temporal.is_supported(&ChronoField::EpochDay) && temporal.chronology().is_iso()
    }

    fn add_to<T: Temporal>(&self, temporal: &T, amount: i64) -> Result<T> {
        match self {
            IsoUnit::WeekBasedYears => {
                let current = temporal.get_long(&IsoField::WeekBasedYear)?;
                let target = current.checked_add(amount).ok_or_else(|| {
                    FieldError::Overflow(format!("week-based-year {current} plus {amount}"))
                })?;
                temporal.with_field(&IsoField::WeekBasedYear, target)
            }
            IsoUnit::QuarterYears => temporal
                .plus(amount / 4, &ChronoUnit::Years)?
                .plus((amount % 4) * 3, &ChronoUnit::Months),
        }
    }

    /// Week-based-years are the difference of the two [`IsoField::WeekBasedYear`]
    /// values. Both endpoints have the same type, so there is no cross-type
    /// protocol to fall back to: an endpoint without that field, such as a
    /// `NaiveTime`, gives `FieldError::UnsupportedUnit`.
    fn between<T: Temporal>(&self, start: &T, end: &T) -> Result<i64> {
        match self {
            IsoUnit::WeekBasedYears => {
                if !(start.is_supported(&IsoField::WeekBasedYear)
                    && end.is_supported(&IsoField::WeekBasedYear))
                {
                    return Err(FieldError::UnsupportedUnit(self.to_string()));
                }
                let start_year = start.get_long(&IsoField::WeekBasedYear)?;
                let end_year = end.get_long(&IsoField::WeekBasedYear)?;
                end_year.checked_sub(start_year).ok_or_else(|| {
                    FieldError::Overflow(format!("week-based-years {start_year} to {end_year}"))
                })
            }
            IsoUnit::QuarterYears => Ok(start.until(end, &ChronoUnit::Months)? / 3),
        }
    }
}
