//! Tests for fields defined outside the crate: a half-of-year and a
//! day-of-half that cooperate to resolve dates.

use std::fmt;

use calendar_fields::iso_fields::QUARTER_OF_YEAR;
use calendar_fields::{
    resolve_date, ChronoField, ChronoUnit, Chronology, CustomField, Field, FieldError,
    FieldValues, ResolverStyle, Temporal, TemporalAccessor, TemporalField, Unit, ValueRange,
};
use chrono::{Datelike, NaiveDate, NaiveTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn values(entries: &[(Field, i64)]) -> FieldValues {
    entries.iter().copied().collect()
}

// ---------------------------------------------------------------------------
// Half-of-year fields
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct HalfOfYear;

#[derive(Debug)]
struct DayOfHalf;

static HALF_OF_YEAR: HalfOfYear = HalfOfYear;
static DAY_OF_HALF: DayOfHalf = DayOfHalf;

fn half() -> Field {
    Field::from(&HALF_OF_YEAR)
}

fn day_of_half() -> Field {
    Field::from(&DAY_OF_HALF)
}

fn half_of(date: NaiveDate) -> i64 {
    if date.month() <= 6 {
        1
    } else {
        2
    }
}

fn first_of_half(year: i32, half: i64) -> NaiveDate {
    date(year, if half == 1 { 1 } else { 7 }, 1)
}

impl fmt::Display for HalfOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HalfOfYear")
    }
}

impl fmt::Display for DayOfHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DayOfHalf")
    }
}

impl CustomField for HalfOfYear {
    fn id(&self) -> &'static str {
        "HalfOfYear"
    }

    fn base_unit(&self) -> Unit {
        ChronoUnit::Months.into()
    }

    fn range_unit(&self) -> Unit {
        ChronoUnit::Years.into()
    }

    fn range(&self) -> ValueRange {
        ValueRange::of(1, 2).unwrap()
    }

    fn get_from_date(&self, date: NaiveDate) -> Result<i64, FieldError> {
        Ok(half_of(date))
    }

    fn adjust_date(&self, date: NaiveDate, new_value: i64) -> Result<NaiveDate, FieldError> {
        self.range().check_valid_value(new_value, self)?;
        date.plus((new_value - half_of(date)) * 6, &ChronoUnit::Months)
    }

    fn resolve(
        &self,
        field_values: &mut FieldValues,
        _chronology: &Chronology,
        style: ResolverStyle,
    ) -> Result<Option<NaiveDate>, FieldError> {
        let year_key = Field::from(ChronoField::Year);
        let (Some(&year), Some(&half_value), Some(&day)) = (
            field_values.get(&year_key),
            field_values.get(&half()),
            field_values.get(&day_of_half()),
        ) else {
            return Ok(None);
        };
        let year = ChronoField::Year.check_valid_int_value(year)?;
        let half_value = self.range().check_valid_int_value(half_value, self)?;
        let first = first_of_half(year, i64::from(half_value));
        if style != ResolverStyle::Lenient {
            DAY_OF_HALF
                .range_refined_by_date(first)?
                .check_valid_value(day, &DAY_OF_HALF)?;
        }
        let resolved = first.plus(day - 1, &ChronoUnit::Days)?;
        for key in [year_key, half(), day_of_half()] {
            field_values.remove(&key);
        }
        Ok(Some(resolved))
    }
}

impl CustomField for DayOfHalf {
    fn id(&self) -> &'static str {
        "DayOfHalf"
    }

    fn base_unit(&self) -> Unit {
        ChronoUnit::Days.into()
    }

    fn range_unit(&self) -> Unit {
        ChronoUnit::Months.into()
    }

    fn range(&self) -> ValueRange {
        ValueRange::of_variable_max(1, 181, 184).unwrap()
    }

    fn range_refined_by_date(&self, date: NaiveDate) -> Result<ValueRange, FieldError> {
        let first = first_of_half(date.year(), half_of(date));
        let next = first.plus(6, &ChronoUnit::Months)?;
        ValueRange::of(1, (next - first).num_days())
    }

    fn get_from_date(&self, date: NaiveDate) -> Result<i64, FieldError> {
        Ok((date - first_of_half(date.year(), half_of(date))).num_days() + 1)
    }

    fn adjust_date(&self, date: NaiveDate, new_value: i64) -> Result<NaiveDate, FieldError> {
        self.range_refined_by_date(date)?.check_valid_value(new_value, self)?;
        date.plus(new_value - self.get_from_date(date)?, &ChronoUnit::Days)
    }
}

// ---------------------------------------------------------------------------
// Map keys and field access
// ---------------------------------------------------------------------------

#[test]
fn custom_fields_are_map_keys() {
    assert_eq!(half(), Field::Custom(&HALF_OF_YEAR));
    assert_ne!(half(), day_of_half());
    assert_ne!(half(), Field::from(QUARTER_OF_YEAR));
    let map = values(&[(half(), 1), (day_of_half(), 5), (half(), 2)]);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&half()], 2);
    assert_eq!(half().to_string(), "HalfOfYear");
}

#[test]
fn custom_fields_through_generic_access() {
    let d = date(2024, 8, 15);
    assert_eq!(d.get_long(&half()).unwrap(), 2);
    assert_eq!(d.get_long(&day_of_half()).unwrap(), 46);
    assert_eq!(date(2024, 12, 31).get_long(&day_of_half()).unwrap(), 184);
    assert_eq!(d.range(&day_of_half()).unwrap(), ValueRange::of(1, 184).unwrap());
    assert_eq!(date(2023, 3, 1).range(&day_of_half()).unwrap(), ValueRange::of(1, 181).unwrap());
    assert_eq!(d.with_field(&half(), 1).unwrap(), date(2024, 2, 15));
    assert_eq!(d.with_field(&day_of_half(), 1).unwrap(), date(2024, 7, 1));
    assert!(matches!(
        d.with_field(&half(), 3),
        Err(FieldError::ValueOutOfRange { .. })
    ));

    let at = d.and_hms_opt(9, 30, 0).unwrap();
    assert_eq!(at.get_long(&half()).unwrap(), 2);
    assert_eq!(
        at.with_field(&half(), 1).unwrap(),
        date(2024, 2, 15).and_hms_opt(9, 30, 0).unwrap()
    );

    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    assert!(!noon.is_supported(&half()));
    assert!(matches!(
        noon.get_long(&half()),
        Err(FieldError::UnsupportedField(_))
    ));
    assert!(half().is_date_based());
    assert!(half().as_chrono_field().is_none());
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

fn half_date(year: i64, half_value: i64, day: i64) -> FieldValues {
    values(&[
        (ChronoField::Year.into(), year),
        (half(), half_value),
        (day_of_half(), day),
    ])
}

#[test]
fn custom_fields_resolve_a_date() {
    let mut map = half_date(2024, 2, 46);
    assert_eq!(
        resolve_date(&mut map, ResolverStyle::Smart).unwrap(),
        Some(date(2024, 8, 15))
    );
    assert!(map.is_empty(), "leftover {map:?}");
}

#[test]
fn custom_resolution_by_style() {
    assert!(matches!(
        resolve_date(&mut half_date(2023, 1, 182), ResolverStyle::Strict),
        Err(FieldError::ValueOutOfRange { .. })
    ));
    assert_eq!(
        resolve_date(&mut half_date(2023, 1, 182), ResolverStyle::Lenient).unwrap(),
        Some(date(2023, 7, 1))
    );
    assert_eq!(
        resolve_date(&mut half_date(2024, 1, 182), ResolverStyle::Strict).unwrap(),
        Some(date(2024, 6, 30))
    );
}

#[test]
fn custom_resolution_needs_all_its_fields() {
    let mut map = values(&[(ChronoField::Year.into(), 2024), (half(), 2)]);
    let before = map.clone();
    assert_eq!(resolve_date(&mut map, ResolverStyle::Smart).unwrap(), None);
    assert_eq!(map, before);
}

#[test]
fn custom_fields_are_cross_checked() {
    let epoch_day = (date(2024, 8, 15) - date(1970, 1, 1)).num_days();
    let mut agreeing = values(&[(ChronoField::EpochDay.into(), epoch_day), (half(), 2)]);
    assert_eq!(
        resolve_date(&mut agreeing, ResolverStyle::Smart).unwrap(),
        Some(date(2024, 8, 15))
    );
    assert!(agreeing.is_empty(), "leftover {agreeing:?}");

    let mut conflicting = values(&[(ChronoField::EpochDay.into(), epoch_day), (half(), 1)]);
    assert!(matches!(
        resolve_date(&mut conflicting, ResolverStyle::Smart),
        Err(FieldError::InvalidValue(_))
    ));

    // built-in derived fields are checked against a custom resolution too
    let mut map = half_date(2024, 2, 46);
    map.insert(QUARTER_OF_YEAR.into(), 3);
    assert_eq!(
        resolve_date(&mut map, ResolverStyle::Strict).unwrap(),
        Some(date(2024, 8, 15))
    );
    assert!(map.is_empty(), "leftover {map:?}");
}
