//! Localized week definitions and the five fields each one derives.
//!
//! A [`WeekFields`] is the pair (first-day-of-week, minimal-days-in-first-week).
//! The first week of a month or year is the first one holding at least the
//! minimal number of days; any shorter leading fragment is week 0. ISO-8601
//! is `WeekFields::of(Weekday::Mon, 4)`, the common North-American scheme is
//! `WeekFields::of(Weekday::Sun, 1)`.
//!
//! All five fields share one computation engine, [`WeekField`], which is
//! told apart by the kind of period it counts within.
//!
//! Definitions are interned: `of` returns the same `&'static WeekFields` for
//! the same pair, so at most 49 definitions ever exist.

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, PoisonError, RwLock};

use chrono::{NaiveDate, Weekday};
use tracing::debug;

use crate::calendar;
use crate::chrono_field::{ChronoField, ChronoUnit};
use crate::error::{FieldError, Result};
use crate::field::{Field, FieldValues, ResolverStyle, TemporalField, Unit};
use crate::iso_fields::IsoUnit;
use crate::range::ValueRange;
use crate::temporal::{local_date, unsupported_field, Chronology, Temporal, TemporalAccessor};

const DAY_OF_WEEK_RANGE: ValueRange = ValueRange::fixed(1, 7);
const WEEK_OF_MONTH_RANGE: ValueRange = ValueRange::new_unchecked(0, 1, 4, 6);
const WEEK_OF_YEAR_RANGE: ValueRange = ValueRange::new_unchecked(0, 1, 52, 54);
const WEEK_OF_WEEK_BASED_YEAR_RANGE: ValueRange = ValueRange::new_unchecked(1, 1, 52, 53);

static CACHE: LazyLock<RwLock<HashMap<WeekDefinition, &'static WeekFields>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// The (first-day-of-week, minimal-days) pair a week field is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDefinition {
    first_day_of_week: Weekday,
    minimal_days: u8,
}

impl WeekDefinition {
    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn minimal_days_in_first_week(&self) -> u8 {
        self.minimal_days
    }

    /// Day-of-week numbered 1 to 7 from the first day of the week.
    fn localized_day_of_week(&self, iso_day_of_week: i64) -> i64 {
        let start = i64::from(self.first_day_of_week.number_from_monday());
        (iso_day_of_week - start).rem_euclid(7) + 1
    }

    /// Offset from the start of the period to the start of week 1.
    ///
    /// `day` is the day within the period and `localized_dow` its
    /// localized day-of-week.
    fn start_of_week_offset(&self, day: i64, localized_dow: i64) -> i64 {
        let week_start = (day - localized_dow).rem_euclid(7);
        if week_start + 1 > i64::from(self.minimal_days) {
            // the leading partial week is too short; it is week 0
            7 - week_start
        } else {
            -week_start
        }
    }

    fn compute_week(offset: i64, day: i64) -> i64 {
        (7 + offset + (day - 1)) / 7
    }

    fn field(&self, kind: WeekFieldKind) -> WeekField {
        WeekField { def: *self, kind }
    }
}

impl fmt::Display for WeekDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WeekFields[{},{}]",
            self.first_day_of_week, self.minimal_days
        )
    }
}

/// A week definition together with the five fields it derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekFields {
    def: WeekDefinition,
    day_of_week: WeekField,
    week_of_month: WeekField,
    week_of_year: WeekField,
    week_of_week_based_year: WeekField,
    week_based_year: WeekField,
}

impl WeekFields {
    /// The interned definition for the pair.
    ///
    /// # Errors
    /// Returns `FieldError::InvalidWeekDefinition` unless
    /// `minimal_days_in_first_week` is 1 to 7.
    pub fn of(first_day_of_week: Weekday, minimal_days_in_first_week: u8) -> Result<&'static Self> {
        if !(1..=7).contains(&minimal_days_in_first_week) {
            return Err(FieldError::InvalidWeekDefinition(minimal_days_in_first_week));
        }
        Ok(Self::intern(WeekDefinition {
            first_day_of_week,
            minimal_days: minimal_days_in_first_week,
        }))
    }

    /// ISO-8601: weeks start on Monday, week 1 holds at least four days.
    pub fn iso() -> &'static Self {
        Self::intern(WeekDefinition {
            first_day_of_week: Weekday::Mon,
            minimal_days: 4,
        })
    }

    /// Weeks start on Sunday, week 1 holds January 1st.
    pub fn sunday_start() -> &'static Self {
        Self::intern(WeekDefinition {
            first_day_of_week: Weekday::Sun,
            minimal_days: 1,
        })
    }

    /// The unit counted by [`week_based_year`](Self::week_based_year), shared
    /// with the ISO fields.
    pub fn week_based_years() -> Unit {
        Unit::Iso(IsoUnit::WeekBasedYears)
    }

    /// Concurrent first requests may each build a candidate; only the one
    /// that wins the insert is ever handed out.
    fn intern(def: WeekDefinition) -> &'static Self {
        let published = CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&def)
            .copied();
        if let Some(existing) = published {
            return existing;
        }
        let candidate = Self::new(def);
        let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
        *cache.entry(def).or_insert_with(|| {
            debug!(%def, "publishing week definition");
            Box::leak(Box::new(candidate))
        })
    }

    fn new(def: WeekDefinition) -> Self {
        Self {
            def,
            day_of_week: def.field(WeekFieldKind::DayOfWeek),
            week_of_month: def.field(WeekFieldKind::WeekOfMonth),
            week_of_year: def.field(WeekFieldKind::WeekOfYear),
            week_of_week_based_year: def.field(WeekFieldKind::WeekOfWeekBasedYear),
            week_based_year: def.field(WeekFieldKind::WeekBasedYear),
        }
    }

    pub fn definition(&self) -> WeekDefinition {
        self.def
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.def.first_day_of_week
    }

    pub fn minimal_days_in_first_week(&self) -> u8 {
        self.def.minimal_days
    }

    /// Localized day-of-week, 1 on the first day of the week.
    pub fn day_of_week(&self) -> WeekField {
        self.day_of_week
    }

    /// Week within the month, 0 for a too-short leading fragment.
    pub fn week_of_month(&self) -> WeekField {
        self.week_of_month
    }

    /// Week within the calendar year, 0 for a too-short leading fragment.
    pub fn week_of_year(&self) -> WeekField {
        self.week_of_year
    }

    /// Week within the week-based-year, always 1 to 52 or 53.
    pub fn week_of_week_based_year(&self) -> WeekField {
        self.week_of_week_based_year
    }

    /// Year whose weeks the date belongs to; differs from the calendar year
    /// near its ends.
    pub fn week_based_year(&self) -> WeekField {
        self.week_based_year
    }
}

impl fmt::Display for WeekFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.def, f)
    }
}

/// The period a [`WeekField`] counts within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekFieldKind {
    DayOfWeek,
    WeekOfMonth,
    WeekOfYear,
    WeekOfWeekBasedYear,
    WeekBasedYear,
}

/// One field derived from a week definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekField {
    def: WeekDefinition,
    kind: WeekFieldKind,
}

impl fmt::Display for WeekField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            WeekFieldKind::DayOfWeek => "DayOfWeek",
            WeekFieldKind::WeekOfMonth => "WeekOfMonth",
            WeekFieldKind::WeekOfYear => "WeekOfYear",
            WeekFieldKind::WeekOfWeekBasedYear => "WeekOfWeekBasedYear",
            WeekFieldKind::WeekBasedYear => "WeekBasedYear",
        };
        write!(f, "{name}[{}]", self.def)
    }
}

impl WeekField {
    pub fn kind(&self) -> WeekFieldKind {
        self.kind
    }

    pub fn definition(&self) -> WeekDefinition {
        self.def
    }

    fn sibling(&self, kind: WeekFieldKind) -> WeekField {
        self.def.field(kind)
    }

    fn localized_day_of_week<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        let iso = temporal.get_long(&ChronoField::DayOfWeek)?;
        Ok(self.def.localized_day_of_week(iso))
    }

    fn localized_week_of_month<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        let dow = self.localized_day_of_week(temporal)?;
        let day_of_month = temporal.get_long(&ChronoField::DayOfMonth)?;
        let offset = self.def.start_of_week_offset(day_of_month, dow);
        Ok(WeekDefinition::compute_week(offset, day_of_month))
    }

    fn localized_week_of_year<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        let dow = self.localized_day_of_week(temporal)?;
        let day_of_year = temporal.get_long(&ChronoField::DayOfYear)?;
        let offset = self.def.start_of_week_offset(day_of_year, dow);
        Ok(WeekDefinition::compute_week(offset, day_of_year))
    }

    /// Week number at which the following year's week 1 begins.
    fn new_year_week<T: TemporalAccessor>(&self, temporal: &T, offset: i64) -> Result<i64> {
        let year_length = temporal.range(&ChronoField::DayOfYear)?.maximum();
        Ok(WeekDefinition::compute_week(
            offset,
            year_length + i64::from(self.def.minimal_days),
        ))
    }

    fn localized_week_based_year<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        let dow = self.localized_day_of_week(temporal)?;
        let year = temporal.get_long(&ChronoField::Year)?;
        let day_of_year = temporal.get_long(&ChronoField::DayOfYear)?;
        let offset = self.def.start_of_week_offset(day_of_year, dow);
        let week = WeekDefinition::compute_week(offset, day_of_year);
        if week == 0 {
            return Ok(year - 1);
        }
        if week >= self.new_year_week(temporal, offset)? {
            return Ok(year + 1);
        }
        Ok(year)
    }

    fn localized_week_of_week_based_year<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        let dow = self.localized_day_of_week(temporal)?;
        let day_of_year = temporal.get_long(&ChronoField::DayOfYear)?;
        let offset = self.def.start_of_week_offset(day_of_year, dow);
        let week = WeekDefinition::compute_week(offset, day_of_year);
        if week == 0 {
            // the last week of the previous year
            let previous = calendar::plus_days(local_date(temporal)?, -day_of_year)?;
            return self.localized_week_of_week_based_year(&previous);
        }
        if week > 50 {
            let new_year_week = self.new_year_week(temporal, offset)?;
            if week >= new_year_week {
                return Ok(week - new_year_week + 1);
            }
        }
        Ok(week)
    }

    /// The date in `week_based_year`, `week` and localized `dow`. Weeks past
    /// the end of the year are clamped to its last week.
    fn of_week_based_year(&self, week_based_year: i32, week: i64, dow: i64) -> Result<NaiveDate> {
        let date = calendar::date_of(week_based_year, 1, 1)?;
        let local_dow = self
            .def
            .localized_day_of_week(i64::from(calendar::iso_day_of_week(date)));
        let offset = self.def.start_of_week_offset(1, local_dow);
        let year_length = i64::from(calendar::length_of_year(i64::from(week_based_year)));
        let new_year_week = WeekDefinition::compute_week(
            offset,
            year_length + i64::from(self.def.minimal_days),
        );
        let week = week.min(new_year_week - 1);
        let days = -offset + (dow - 1) + (week - 1) * 7;
        calendar::plus_days(date, days)
    }

    /// Range of week numbers within the period holding `temporal`, from the
    /// bounds of `field` in that period.
    fn range_by_week<T: TemporalAccessor>(&self, temporal: &T, field: ChronoField) -> Result<ValueRange> {
        let dow = self.localized_day_of_week(temporal)?;
        let offset = self.def.start_of_week_offset(temporal.get_long(&field)?, dow);
        let field_range = temporal.range(&field)?;
        ValueRange::of(
            WeekDefinition::compute_week(offset, field_range.minimum()),
            WeekDefinition::compute_week(offset, field_range.maximum()),
        )
    }

    fn range_week_of_week_based_year<T: TemporalAccessor>(&self, temporal: &T) -> Result<ValueRange> {
        if !temporal.is_supported(&ChronoField::DayOfYear) {
            return Ok(WEEK_OF_YEAR_RANGE);
        }
        let dow = self.localized_day_of_week(temporal)?;
        let day_of_year = temporal.get_long(&ChronoField::DayOfYear)?;
        let offset = self.def.start_of_week_offset(day_of_year, dow);
        let week = WeekDefinition::compute_week(offset, day_of_year);
        if week == 0 {
            // back down into the previous year
            let previous = calendar::plus_days(local_date(temporal)?, -(day_of_year + 7))?;
            return self.range_week_of_week_based_year(&previous);
        }
        let year_length = temporal.range(&ChronoField::DayOfYear)?.maximum();
        let new_year_week = WeekDefinition::compute_week(
            offset,
            year_length + i64::from(self.def.minimal_days),
        );
        if week >= new_year_week {
            // forward into the next year
            let next = calendar::plus_days(
                local_date(temporal)?,
                year_length - day_of_year + 1 + 7,
            )?;
            return self.range_week_of_week_based_year(&next);
        }
        ValueRange::of(1, new_year_week - 1)
    }

    fn resolve_week_of_month(
        &self,
        field_values: &mut FieldValues,
        year: i32,
        month: i64,
        week_of_month: i64,
        local_dow: i64,
        style: ResolverStyle,
    ) -> Result<NaiveDate> {
        let overflow = || FieldError::Overflow(format!("{self} {week_of_month} in month {month}"));
        let date = if style == ResolverStyle::Lenient {
            let months = month.checked_sub(1).ok_or_else(overflow)?;
            let first = calendar::plus_months(calendar::date_of(year, 1, 1)?, months)?;
            let weeks = week_of_month
                .checked_sub(self.localized_week_of_month(&first)?)
                .ok_or_else(overflow)?;
            let days = local_dow - self.localized_day_of_week(&first)?;
            let shift = weeks
                .checked_mul(7)
                .and_then(|d| d.checked_add(days))
                .ok_or_else(overflow)?;
            calendar::plus_days(first, shift)?
        } else {
            let month_valid = ChronoField::MonthOfYear.check_valid_int_value(month)?;
            let first = calendar::date_of(year, calendar::to_u32(i64::from(month_valid))?, 1)?;
            let week = i64::from(self.range().check_valid_int_value(week_of_month, self)?);
            let weeks = week - self.localized_week_of_month(&first)?;
            let days = local_dow - self.localized_day_of_week(&first)?;
            let date = calendar::plus_days(first, weeks * 7 + days)?;
            if style == ResolverStyle::Strict && date.get_long(&ChronoField::MonthOfYear)? != month {
                debug!(%date, month, "strict resolution landed in a different month");
                return Err(FieldError::InvalidValue(
                    "strict mode rejected resolved date as it is in a different month".to_string(),
                ));
            }
            date
        };
        field_values.remove(&Field::Week(*self));
        field_values.remove(&Field::Chrono(ChronoField::Year));
        field_values.remove(&Field::Chrono(ChronoField::MonthOfYear));
        field_values.remove(&Field::Chrono(ChronoField::DayOfWeek));
        Ok(date)
    }

    fn resolve_week_of_year(
        &self,
        field_values: &mut FieldValues,
        year: i32,
        week_of_year: i64,
        local_dow: i64,
        style: ResolverStyle,
    ) -> Result<NaiveDate> {
        let first = calendar::date_of(year, 1, 1)?;
        let date = if style == ResolverStyle::Lenient {
            let overflow = || FieldError::Overflow(format!("{self} {week_of_year} in {year}"));
            let weeks = week_of_year
                .checked_sub(self.localized_week_of_year(&first)?)
                .ok_or_else(overflow)?;
            let days = local_dow - self.localized_day_of_week(&first)?;
            let shift = weeks
                .checked_mul(7)
                .and_then(|d| d.checked_add(days))
                .ok_or_else(overflow)?;
            calendar::plus_days(first, shift)?
        } else {
            let week = i64::from(self.range().check_valid_int_value(week_of_year, self)?);
            let weeks = week - self.localized_week_of_year(&first)?;
            let days = local_dow - self.localized_day_of_week(&first)?;
            let date = calendar::plus_days(first, weeks * 7 + days)?;
            if style == ResolverStyle::Strict
                && date.get_long(&ChronoField::Year)? != i64::from(year)
            {
                debug!(%date, year, "strict resolution landed in a different year");
                return Err(FieldError::InvalidValue(
                    "strict mode rejected resolved date as it is in a different year".to_string(),
                ));
            }
            date
        };
        field_values.remove(&Field::Week(*self));
        field_values.remove(&Field::Chrono(ChronoField::Year));
        field_values.remove(&Field::Chrono(ChronoField::DayOfWeek));
        Ok(date)
    }

    fn resolve_week_based_year(
        &self,
        field_values: &mut FieldValues,
        week_based_year: i64,
        week: i64,
        local_dow: i64,
        style: ResolverStyle,
    ) -> Result<NaiveDate> {
        let year_field = self.sibling(WeekFieldKind::WeekBasedYear);
        let week_field = self.sibling(WeekFieldKind::WeekOfWeekBasedYear);
        let year = year_field
            .range()
            .check_valid_int_value(week_based_year, &year_field)?;
        let date = if style == ResolverStyle::Lenient {
            // rolls over by whole weeks with no bound beyond the date range
            let first = self.of_week_based_year(year, 1, local_dow)?;
            let weeks = week
                .checked_sub(1)
                .ok_or_else(|| FieldError::Overflow(format!("{week_field} {week}")))?;
            calendar::plus_weeks(first, weeks)?
        } else {
            let week = week_field.range().check_valid_int_value(week, &week_field)?;
            let date = self.of_week_based_year(year, i64::from(week), local_dow)?;
            if style == ResolverStyle::Strict
                && self.localized_week_based_year(&date)? != i64::from(year)
            {
                debug!(%date, year, "strict resolution landed in a different week-based-year");
                return Err(FieldError::InvalidValue(
                    "strict mode rejected resolved date as it is in a different week-based-year"
                        .to_string(),
                ));
            }
            date
        };
        field_values.remove(&Field::Week(*self));
        field_values.remove(&Field::Week(year_field));
        field_values.remove(&Field::Week(week_field));
        field_values.remove(&Field::Chrono(ChronoField::DayOfWeek));
        Ok(date)
    }

    /// Replaces a localized day-of-week with the equivalent ISO day-of-week.
    fn normalize_day_of_week(&self, field_values: &mut FieldValues, value: i64) -> Result<()> {
        let localized = self.range().check_valid_int_value(value, self)?;
        let start = i64::from(self.def.first_day_of_week.number_from_monday());
        let iso = ((start - 1) + (i64::from(localized) - 1)).rem_euclid(7) + 1;
        let iso_key = Field::Chrono(ChronoField::DayOfWeek);
        if let Some(&existing) = field_values.get(&iso_key) {
            if existing != iso {
                return Err(FieldError::InvalidValue(format!(
                    "conflict found: {iso_key} {existing} differs from {iso_key} {iso} derived from {self} {value}"
                )));
            }
        }
        field_values.remove(&Field::Week(*self));
        field_values.insert(iso_key, iso);
        Ok(())
    }
}

impl TemporalField for WeekField {
    fn base_unit(&self) -> Unit {
        match self.kind {
            WeekFieldKind::DayOfWeek => Unit::Chrono(ChronoUnit::Days),
            WeekFieldKind::WeekOfMonth
            | WeekFieldKind::WeekOfYear
            | WeekFieldKind::WeekOfWeekBasedYear => Unit::Chrono(ChronoUnit::Weeks),
            WeekFieldKind::WeekBasedYear => WeekFields::week_based_years(),
        }
    }

    fn range_unit(&self) -> Unit {
        match self.kind {
            WeekFieldKind::DayOfWeek => Unit::Chrono(ChronoUnit::Weeks),
            WeekFieldKind::WeekOfMonth => Unit::Chrono(ChronoUnit::Months),
            WeekFieldKind::WeekOfYear => Unit::Chrono(ChronoUnit::Years),
            WeekFieldKind::WeekOfWeekBasedYear => WeekFields::week_based_years(),
            WeekFieldKind::WeekBasedYear => Unit::Chrono(ChronoUnit::Forever),
        }
    }

    fn range(&self) -> ValueRange {
        match self.kind {
            WeekFieldKind::DayOfWeek => DAY_OF_WEEK_RANGE,
            WeekFieldKind::WeekOfMonth => WEEK_OF_MONTH_RANGE,
            WeekFieldKind::WeekOfYear => WEEK_OF_YEAR_RANGE,
            WeekFieldKind::WeekOfWeekBasedYear => WEEK_OF_WEEK_BASED_YEAR_RANGE,
            WeekFieldKind::WeekBasedYear => ChronoField::Year.range(),
        }
    }

    fn is_date_based(&self) -> bool {
        true
    }

    fn is_time_based(&self) -> bool {
        false
    }

    fn is_supported_by<T: TemporalAccessor>(&self, temporal: &T) -> bool {
        if !temporal.is_supported(&ChronoField::DayOfWeek) {
            return false;
        }
        match self.kind {
            WeekFieldKind::DayOfWeek => true,
            WeekFieldKind::WeekOfMonth => temporal.is_supported(&ChronoField::DayOfMonth),
            WeekFieldKind::WeekOfYear | WeekFieldKind::WeekOfWeekBasedYear => {
                temporal.is_supported(&ChronoField::DayOfYear)
            }
            WeekFieldKind::WeekBasedYear => temporal.is_supported(&ChronoField::Year),
        }
    }

    fn range_refined_by<T: TemporalAccessor>(&self, temporal: &T) -> Result<ValueRange> {
        if !self.is_supported_by(temporal) {
            return Err(unsupported_field(self));
        }
        match self.kind {
            WeekFieldKind::DayOfWeek => Ok(self.range()),
            WeekFieldKind::WeekOfMonth => self.range_by_week(temporal, ChronoField::DayOfMonth),
            WeekFieldKind::WeekOfYear => self.range_by_week(temporal, ChronoField::DayOfYear),
            WeekFieldKind::WeekOfWeekBasedYear => self.range_week_of_week_based_year(temporal),
            WeekFieldKind::WeekBasedYear => Ok(ChronoField::Year.range()),
        }
    }

    fn get_from<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        if !self.is_supported_by(temporal) {
            return Err(unsupported_field(self));
        }
        match self.kind {
            WeekFieldKind::DayOfWeek => self.localized_day_of_week(temporal),
            WeekFieldKind::WeekOfMonth => self.localized_week_of_month(temporal),
            WeekFieldKind::WeekOfYear => self.localized_week_of_year(temporal),
            WeekFieldKind::WeekOfWeekBasedYear => self.localized_week_of_week_based_year(temporal),
            WeekFieldKind::WeekBasedYear => self.localized_week_based_year(temporal),
        }
    }

    fn adjust_into<T: Temporal>(&self, temporal: &T, new_value: i64) -> Result<T> {
        let new_value = i64::from(self.range().check_valid_int_value(new_value, self)?);
        let current = self.get_from(temporal)?;
        if new_value == current {
            return Ok(temporal.clone());
        }
        if self.kind == WeekFieldKind::WeekBasedYear {
            let dow = temporal.get_long(&self.sibling(WeekFieldKind::DayOfWeek))?;
            let week = temporal.get_long(&self.sibling(WeekFieldKind::WeekOfWeekBasedYear))?;
            let date = self.of_week_based_year(calendar::to_int_exact(new_value)?, week, dow)?;
            return temporal.with_local_date(date);
        }
        temporal.plus(new_value - current, &self.base_unit())
    }

    fn resolve(
        &self,
        field_values: &mut FieldValues,
        chronology: &Chronology,
        style: ResolverStyle,
    ) -> Result<Option<NaiveDate>> {
        let Some(&value) = field_values.get(&Field::Week(*self)) else {
            return Ok(None);
        };
        if self.kind == WeekFieldKind::DayOfWeek {
            self.normalize_day_of_week(field_values, value)?;
            return Ok(None);
        }
        let Some(&iso_dow) = field_values.get(&Field::Chrono(ChronoField::DayOfWeek)) else {
            return Ok(None);
        };
        // every further path needs the value as an int
        calendar::to_int_exact(value)?;
        let iso_dow = ChronoField::DayOfWeek.check_valid_int_value(iso_dow)?;
        let local_dow = self.def.localized_day_of_week(i64::from(iso_dow));
        if !chronology.is_iso() {
            return Err(FieldError::UnsupportedChronology(chronology.to_string()));
        }

        if let Some(&year) = field_values.get(&Field::Chrono(ChronoField::Year)) {
            let year = ChronoField::Year.check_valid_int_value(year)?;
            match self.kind {
                WeekFieldKind::WeekOfMonth => {
                    if let Some(&month) = field_values.get(&Field::Chrono(ChronoField::MonthOfYear))
                    {
                        return self
                            .resolve_week_of_month(field_values, year, month, value, local_dow, style)
                            .map(Some);
                    }
                }
                WeekFieldKind::WeekOfYear => {
                    return self
                        .resolve_week_of_year(field_values, year, value, local_dow, style)
                        .map(Some);
                }
                _ => {}
            }
        } else if matches!(
            self.kind,
            WeekFieldKind::WeekOfWeekBasedYear | WeekFieldKind::WeekBasedYear
        ) {
            let year_key = Field::Week(self.sibling(WeekFieldKind::WeekBasedYear));
            let week_key = Field::Week(self.sibling(WeekFieldKind::WeekOfWeekBasedYear));
            if let (Some(&week_based_year), Some(&week)) =
                (field_values.get(&year_key), field_values.get(&week_key))
            {
                return self
                    .resolve_week_based_year(field_values, week_based_year, week, local_dow, style)
                    .map(Some);
            }
        }
        Ok(None)
    }
}
