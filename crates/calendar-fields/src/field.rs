//! The field and unit capability every calendar quantity implements.
//!
//! Built-in fields ([`ChronoField`]) are answered directly by the date/time
//! types. Derived fields ([`IsoField`], [`WeekField`]) compute their value
//! from built-ins and cooperate during resolution through
//! [`TemporalField::resolve`], which inspects the shared field-value map
//! and consumes the entries it used. Fields defined outside the crate join
//! the map as [`Field::Custom`] through the [`CustomField`] trait.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::chrono_field::{ChronoField, ChronoUnit};
use crate::error::Result;
use crate::iso_fields::{IsoField, IsoUnit};
use crate::range::ValueRange;
use crate::temporal::{local_date, unsupported_field, Chronology, Temporal, TemporalAccessor};
use crate::week_fields::WeekField;

/// Field-to-value map consumed by [`TemporalField::resolve`].
///
/// Owned by the caller and mutated in place: a successful resolve removes
/// every entry it used.
pub type FieldValues = HashMap<Field, i64>;

/// How strictly resolution validates field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverStyle {
    /// Exact validation; the resolved date must lie in the requested period.
    Strict,
    /// Numeric range validation only; the date may shift into an adjacent period.
    #[default]
    Smart,
    /// Minimal validation; out-of-range values roll over arithmetically.
    Lenient,
}

/// A calendar quantity such as month-of-year or week-of-week-based-year.
pub trait TemporalField: fmt::Display + fmt::Debug {
    /// The unit the field is measured in.
    fn base_unit(&self) -> Unit;

    /// The unit the field is bound by.
    fn range_unit(&self) -> Unit;

    /// Context-free bounds of the field.
    fn range(&self) -> ValueRange;

    fn is_date_based(&self) -> bool;

    fn is_time_based(&self) -> bool;

    /// The built-in field this is, letting date/time types answer it directly.
    fn as_chrono_field(&self) -> Option<ChronoField> {
        None
    }

    fn is_supported_by<T: TemporalAccessor>(&self, temporal: &T) -> bool;

    /// Bounds of the field refined by the context of `temporal`.
    ///
    /// # Errors
    /// Returns `FieldError::UnsupportedField` if `temporal` lacks the
    /// fields this one derives from.
    fn range_refined_by<T: TemporalAccessor>(&self, temporal: &T) -> Result<ValueRange> {
        let _ = temporal;
        Ok(self.range())
    }

    /// # Errors
    /// Returns `FieldError::UnsupportedField` if `temporal` lacks the
    /// fields this one derives from.
    fn get_from<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64>;

    /// Returns a copy of `temporal` with this field set to `new_value`.
    ///
    /// # Errors
    /// Fails if the field is unsupported or `new_value` is invalid.
    fn adjust_into<T: Temporal>(&self, temporal: &T, new_value: i64) -> Result<T>;

    /// Resolves a date from this field and related fields in `field_values`.
    ///
    /// Returns `Ok(None)` with the map unchanged (or only normalized) when the
    /// map lacks the data this field needs. On success every consumed entry,
    /// this field included, is removed from the map.
    ///
    /// # Errors
    /// Fails when a present value is invalid for `style`.
    fn resolve(
        &self,
        field_values: &mut FieldValues,
        chronology: &Chronology,
        style: ResolverStyle,
    ) -> Result<Option<NaiveDate>> {
        let _ = (field_values, chronology, style);
        Ok(None)
    }
}

/// A unit of time such as days or week-based-years.
pub trait TemporalUnit: fmt::Display + fmt::Debug {
    /// Duration of the unit, estimated for calendar units.
    fn duration(&self) -> Duration;

    fn is_duration_estimated(&self) -> bool;

    fn is_date_based(&self) -> bool;

    fn is_time_based(&self) -> bool;

    /// The built-in unit this is, letting date/time types answer it directly.
    fn as_chrono_unit(&self) -> Option<ChronoUnit> {
        None
    }

    fn is_supported_by<T: Temporal>(&self, temporal: &T) -> bool;

    /// # Errors
    /// Fails if the unit is unsupported or the result overflows.
    fn add_to<T: Temporal>(&self, temporal: &T, amount: i64) -> Result<T>;

    /// Whole units from `start` to `end`, negative when `end` is earlier.
    ///
    /// # Errors
    /// Fails if the unit is unsupported by either endpoint.
    fn between<T: Temporal>(&self, start: &T, end: &T) -> Result<i64>;
}

/// A date-based field defined outside this crate.
///
/// Unlike [`TemporalField`] this trait is object safe, so a `&'static` field
/// can key a [`FieldValues`] map as [`Field::Custom`] and take part in
/// [`resolve_date`](crate::resolve_date). Values are read and adjusted
/// through the ISO date of a temporal, so every temporal carrying an
/// epoch-day supports the field.
pub trait CustomField: fmt::Display + fmt::Debug + Send + Sync {
    /// Identity of the field; two custom fields with the same id are the
    /// same map key.
    fn id(&self) -> &'static str;

    fn base_unit(&self) -> Unit;

    fn range_unit(&self) -> Unit;

    fn range(&self) -> ValueRange;

    /// # Errors
    /// Fails if the bounds cannot be computed for `date`.
    fn range_refined_by_date(&self, date: NaiveDate) -> Result<ValueRange> {
        let _ = date;
        Ok(self.range())
    }

    /// # Errors
    /// Fails if the value cannot be computed for `date`.
    fn get_from_date(&self, date: NaiveDate) -> Result<i64>;

    /// # Errors
    /// Fails if `new_value` is invalid for `date`.
    fn adjust_date(&self, date: NaiveDate, new_value: i64) -> Result<NaiveDate>;

    /// Same contract as [`TemporalField::resolve`].
    ///
    /// # Errors
    /// Fails when a present value is invalid for `style`.
    fn resolve(
        &self,
        field_values: &mut FieldValues,
        chronology: &Chronology,
        style: ResolverStyle,
    ) -> Result<Option<NaiveDate>> {
        let _ = (field_values, chronology, style);
        Ok(None)
    }
}

/// Hashable identity of every field a [`FieldValues`] map can hold.
#[derive(Debug, Clone, Copy)]
pub enum Field {
    Chrono(ChronoField),
    Iso(IsoField),
    Week(WeekField),
    Custom(&'static dyn CustomField),
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::Chrono(a), Field::Chrono(b)) => a == b,
            (Field::Iso(a), Field::Iso(b)) => a == b,
            (Field::Week(a), Field::Week(b)) => a == b,
            (Field::Custom(a), Field::Custom(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Field::Chrono(field) => field.hash(state),
            Field::Iso(field) => field.hash(state),
            Field::Week(field) => field.hash(state),
            Field::Custom(field) => field.id().hash(state),
        }
    }
}

impl Field {
    fn supports_custom<T: TemporalAccessor>(temporal: &T) -> bool {
        temporal.chronology().is_iso() && temporal.is_supported(&ChronoField::EpochDay)
    }

    fn custom_date<T: TemporalAccessor>(field: &dyn CustomField, temporal: &T) -> Result<NaiveDate> {
        if !Self::supports_custom(temporal) {
            return Err(unsupported_field(field));
        }
        local_date(temporal)
    }
}

impl From<ChronoField> for Field {
    fn from(field: ChronoField) -> Self {
        Field::Chrono(field)
    }
}

impl From<IsoField> for Field {
    fn from(field: IsoField) -> Self {
        Field::Iso(field)
    }
}

impl From<WeekField> for Field {
    fn from(field: WeekField) -> Self {
        Field::Week(field)
    }
}

impl<F: CustomField> From<&'static F> for Field {
    fn from(field: &'static F) -> Self {
        Field::Custom(field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Chrono(field) => fmt::Display::fmt(field, f),
            Field::Iso(field) => fmt::Display::fmt(field, f),
            Field::Week(field) => fmt::Display::fmt(field, f),
            Field::Custom(field) => fmt::Display::fmt(*field, f),
        }
    }
}

impl TemporalField for Field {
    fn base_unit(&self) -> Unit {
        match self {
            Field::Chrono(field) => field.base_unit(),
            Field::Iso(field) => field.base_unit(),
            Field::Week(field) => field.base_unit(),
            Field::Custom(field) => field.base_unit(),
        }
    }

    fn range_unit(&self) -> Unit {
        match self {
            Field::Chrono(field) => field.range_unit(),
            Field::Iso(field) => field.range_unit(),
            Field::Week(field) => field.range_unit(),
            Field::Custom(field) => field.range_unit(),
        }
    }

    fn range(&self) -> ValueRange {
        match self {
            Field::Chrono(field) => field.range(),
            Field::Iso(field) => field.range(),
            Field::Week(field) => field.range(),
            Field::Custom(field) => field.range(),
        }
    }

    fn is_date_based(&self) -> bool {
        match self {
            Field::Chrono(field) => field.is_date_based(),
            Field::Iso(field) => field.is_date_based(),
            Field::Week(field) => field.is_date_based(),
            Field::Custom(_) => true,
        }
    }

    fn is_time_based(&self) -> bool {
        match self {
            Field::Chrono(field) => field.is_time_based(),
            Field::Iso(field) => field.is_time_based(),
            Field::Week(field) => field.is_time_based(),
            Field::Custom(_) => false,
        }
    }

    fn as_chrono_field(&self) -> Option<ChronoField> {
        match self {
            Field::Chrono(field) => Some(*field),
            Field::Iso(_) | Field::Week(_) | Field::Custom(_) => None,
        }
    }

    fn is_supported_by<T: TemporalAccessor>(&self, temporal: &T) -> bool {
        match self {
            Field::Chrono(field) => field.is_supported_by(temporal),
            Field::Iso(field) => field.is_supported_by(temporal),
            Field::Week(field) => field.is_supported_by(temporal),
            Field::Custom(_) => Self::supports_custom(temporal),
        }
    }

    fn range_refined_by<T: TemporalAccessor>(&self, temporal: &T) -> Result<ValueRange> {
        match self {
            Field::Chrono(field) => field.range_refined_by(temporal),
            Field::Iso(field) => field.range_refined_by(temporal),
            Field::Week(field) => field.range_refined_by(temporal),
            Field::Custom(field) => field.range_refined_by_date(Self::custom_date(*field, temporal)?),
        }
    }

    fn get_from<T: TemporalAccessor>(&self, temporal: &T) -> Result<i64> {
        match self {
            Field::Chrono(field) => field.get_from(temporal),
            Field::Iso(field) => field.get_from(temporal),
            Field::Week(field) => field.get_from(temporal),
            Field::Custom(field) => field.get_from_date(Self::custom_date(*field, temporal)?),
        }
    }

    fn adjust_into<T: Temporal>(&self, temporal: &T, new_value: i64) -> Result<T> {
        match self {
            Field::Chrono(field) => field.adjust_into(temporal, new_value),
            Field::Iso(field) => field.adjust_into(temporal, new_value),
            Field::Week(field) => field.adjust_into(temporal, new_value),
            Field::Custom(field) => {
                let date = field.adjust_date(Self::custom_date(*field, temporal)?, new_value)?;
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
            Field::Chrono(field) => field.resolve(field_values, chronology, style),
            Field::Iso(field) => field.resolve(field_values, chronology, style),
            Field::Week(field) => field.resolve(field_values, chronology, style),
            Field::Custom(field) => field.resolve(field_values, chronology, style),
        }
    }
}

/// Hashable identity of every unit this crate defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Chrono(ChronoUnit),
    Iso(IsoUnit),
}

impl From<ChronoUnit> for Unit {
    fn from(unit: ChronoUnit) -> Self {
        Unit::Chrono(unit)
    }
}

impl From<IsoUnit> for Unit {
    fn from(unit: IsoUnit) -> Self {
        Unit::Iso(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Chrono(unit) => fmt::Display::fmt(unit, f),
            Unit::Iso(unit) => fmt::Display::fmt(unit, f),
        }
    }
}

impl TemporalUnit for Unit {
    fn duration(&self) -> Duration {
        match self {
            Unit::Chrono(unit) => unit.duration(),
            Unit::Iso(unit) => unit.duration(),
        }
    }

    fn is_duration_estimated(&self) -> bool {
        match self {
            Unit::Chrono(unit) => unit.is_duration_estimated(),
            Unit::Iso(unit) => unit.is_duration_estimated(),
        }
    }

    fn is_date_based(&self) -> bool {
        match self {
            Unit::Chrono(unit) => unit.is_date_based(),
            Unit::Iso(unit) => unit.is_date_based(),
        }
    }

    fn is_time_based(&self) -> bool {
        match self {
            Unit::Chrono(unit) => unit.is_time_based(),
            Unit::Iso(unit) => unit.is_time_based(),
        }
    }

    fn as_chrono_unit(&self) -> Option<ChronoUnit> {
        match self {
            Unit::Chrono(unit) => Some(*unit),
            Unit::Iso(_) => None,
        }
    }

    fn is_supported_by<T: Temporal>(&self, temporal: &T) -> bool {
        match self {
            Unit::Chrono(unit) => unit.is_supported_by(temporal),
            Unit::Iso(unit) => unit.is_supported_by(temporal),
        }
    }

    fn add_to<T: Temporal>(&self, temporal: &T, amount: i64) -> Result<T> {
        match self {
            Unit::Chrono(unit) => unit.add_to(temporal, amount),
            Unit::Iso(unit) => unit.add_to(temporal, amount),
        }
    }

    fn between<T: Temporal>(&self, start: &T, end: &T) -> Result<i64> {
        match self {
            Unit::Chrono(unit) => unit.between(start, end),
            Unit::Iso(unit) => unit.between(start, end),
        }
    }
}
