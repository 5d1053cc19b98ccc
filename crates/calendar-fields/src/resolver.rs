//! Reconstructs a date from a map of field values.
//!
//! Derived fields get the first chance: each one present in the map is
//! offered its [`TemporalField::resolve`] hook, repeatedly, until one
//! produces a date or a full pass changes nothing. The ISO primitives
//! (epoch-day, year/month/day, year/day-of-year) are tried after that.
//! Whatever date fields remain must agree with the resolved date.

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::calendar;
use crate::chrono_field::ChronoField;
use crate::error::{FieldError, Result};
use crate::field::{Field, FieldValues, ResolverStyle, TemporalField};
use crate::temporal::{Chronology, TemporalAccessor};

/// A derived field that keeps rewriting the map without converging is a bug
/// in that field; give up after this many passes.
const MAX_PASSES: usize = 50;

/// Resolves the date determined by `field_values`, consuming the entries used.
///
/// Returns `Ok(None)` when the map does not hold enough fields for a date;
/// the map is then unchanged apart from normalization (a localized
/// day-of-week becomes the ISO day-of-week).
///
/// # Errors
/// Fails when a value is invalid for `style`, or when a leftover date field
/// conflicts with the resolved date.
pub fn resolve_date(
    field_values: &mut FieldValues,
    style: ResolverStyle,
) -> Result<Option<NaiveDate>> {
    let resolved = match resolve_derived(field_values, style)? {
        Some(date) => Some(date),
        None => resolve_iso(field_values, style)?,
    };
    if let Some(date) = resolved {
        cross_check(field_values, date)?;
        debug!(%date, ?style, remaining = field_values.len(), "resolved date");
    }
    Ok(resolved)
}

fn resolve_derived(
    field_values: &mut FieldValues,
    style: ResolverStyle,
) -> Result<Option<NaiveDate>> {
    for pass in 0..MAX_PASSES {
        let mut derived: Vec<Field> = field_values
            .keys()
            .filter(|field| field.as_chrono_field().is_none())
            .copied()
            .collect();
        derived.sort_by_cached_key(ToString::to_string);

        let mut changed = false;
        for field in derived {
            if !field_values.contains_key(&field) {
                continue;
            }
            if let Some(date) = field.resolve(field_values, &Chronology::ISO, style)? {
                return Ok(Some(date));
            }
            if !field_values.contains_key(&field) {
                changed = true;
                break;
            }
        }
        if !changed {
            return Ok(None);
        }
        trace!(pass, "derived field rewrote the field map");
    }
    Err(FieldError::InvalidValue(format!(
        "field resolution did not settle after {MAX_PASSES} passes"
    )))
}

fn resolve_iso(
    field_values: &mut FieldValues,
    style: ResolverStyle,
) -> Result<Option<NaiveDate>> {
    let epoch_day_key = Field::Chrono(ChronoField::EpochDay);
    let year_key = Field::Chrono(ChronoField::Year);
    let month_key = Field::Chrono(ChronoField::MonthOfYear);
    let day_of_month_key = Field::Chrono(ChronoField::DayOfMonth);
    let day_of_year_key = Field::Chrono(ChronoField::DayOfYear);

    if let Some(&epoch_day) = field_values.get(&epoch_day_key) {
        let date = calendar::from_epoch_day(ChronoField::EpochDay.check_valid_value(epoch_day)?)?;
        field_values.remove(&epoch_day_key);
        return Ok(Some(date));
    }
    let Some(&year) = field_values.get(&year_key) else {
        return Ok(None);
    };
    if let (Some(&month), Some(&day)) = (
        field_values.get(&month_key),
        field_values.get(&day_of_month_key),
    ) {
        let date = resolve_year_month_day(year, month, day, style)?;
        field_values.remove(&year_key);
        field_values.remove(&month_key);
        field_values.remove(&day_of_month_key);
        return Ok(Some(date));
    }
    if let Some(&day_of_year) = field_values.get(&day_of_year_key) {
        let date = resolve_year_day(year, day_of_year, style)?;
        field_values.remove(&year_key);
        field_values.remove(&day_of_year_key);
        return Ok(Some(date));
    }
    Ok(None)
}

fn resolve_year_month_day(year: i64, month: i64, day: i64, style: ResolverStyle) -> Result<NaiveDate> {
    let year = ChronoField::Year.check_valid_int_value(year)?;
    if style == ResolverStyle::Lenient {
        let overflow = || FieldError::Overflow(format!("month {month} day {day}"));
        let first = calendar::date_of(year, 1, 1)?;
        let date = calendar::plus_months(first, month.checked_sub(1).ok_or_else(overflow)?)?;
        return calendar::plus_days(date, day.checked_sub(1).ok_or_else(overflow)?);
    }
    let month = calendar::to_u32(i64::from(ChronoField::MonthOfYear.check_valid_int_value(month)?))?;
    let mut day = calendar::to_u32(i64::from(ChronoField::DayOfMonth.check_valid_int_value(day)?))?;
    if style == ResolverStyle::Smart {
        // smart clamps a day the month lacks, e.g. February 30th
        day = day.min(calendar::length_of_month(i64::from(year), month));
    }
    calendar::date_of(year, month, day)
}

fn resolve_year_day(year: i64, day_of_year: i64, style: ResolverStyle) -> Result<NaiveDate> {
    let year = ChronoField::Year.check_valid_int_value(year)?;
    let first = calendar::date_of(year, 1, 1)?;
    if style == ResolverStyle::Lenient {
        let days = day_of_year
            .checked_sub(1)
            .ok_or_else(|| FieldError::Overflow(format!("day-of-year {day_of_year}")))?;
        return calendar::plus_days(first, days);
    }
    let day_of_year = ChronoField::DayOfYear.check_valid_int_value(day_of_year)?;
    calendar::with_day_of_year(first, calendar::to_u32(i64::from(day_of_year))?)
}

/// Consumes leftover date fields that agree with `date`; fails on the first
/// that does not. Time fields are left for the caller.
fn cross_check(field_values: &mut FieldValues, date: NaiveDate) -> Result<()> {
    let mut leftovers: Vec<(Field, i64)> = field_values
        .iter()
        .filter(|(field, _)| field.is_date_based() && date.is_supported(*field))
        .map(|(field, value)| (*field, *value))
        .collect();
    leftovers.sort_by_cached_key(|(field, _)| field.to_string());
    for (field, value) in leftovers {
        let actual = date.get_long(&field)?;
        if actual != value {
            return Err(FieldError::InvalidValue(format!(
                "conflict found: {field} {actual} differs from {field} {value} while resolving {date}"
            )));
        }
        field_values.remove(&field);
    }
    Ok(())
}
