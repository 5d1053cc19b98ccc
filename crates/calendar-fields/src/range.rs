//! Validated closed intervals bounding every field value.
//!
//! A range may itself vary: day-of-month always starts at 1 but ends
//! somewhere between 28 and 31 depending on the month. `ValueRange` keeps
//! the smallest and largest possible value of both ends, so a context-free
//! bound can still describe that variation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// A closed interval `[minimum, maximum]` where either end may vary
/// between a smallest and largest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 4]", into = "[i64; 4]")]
pub struct ValueRange {
    min_smallest: i64,
    min_largest: i64,
    max_smallest: i64,
    max_largest: i64,
}

impl ValueRange {
    /// A fixed range `[min, max]`.
    ///
    /// # Errors
    /// Returns `FieldError::InvalidRange` if `min > max`.
    pub fn of(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(FieldError::InvalidRange(
                "minimum value must be less than maximum value".to_string(),
            ));
        }
        Ok(Self::new_unchecked(min, min, max, max))
    }

    /// A range with a fixed minimum and a variable maximum.
    ///
    /// # Errors
    /// Returns `FieldError::InvalidRange` if `min > max_smallest` or
    /// `max_smallest > max_largest`.
    pub fn of_variable_max(min: i64, max_smallest: i64, max_largest: i64) -> Result<Self> {
        if min > max_smallest {
            return Err(FieldError::InvalidRange(
                "minimum value must be less than smallest maximum value".to_string(),
            ));
        }
        Self::of_variable(min, min, max_smallest, max_largest)
    }

    /// A range where both ends may vary.
    ///
    /// # Errors
    /// Returns `FieldError::InvalidRange` unless
    /// `min_smallest <= min_largest <= max_largest`, `max_smallest <= max_largest`
    /// and `min_smallest <= max_smallest`.
    pub fn of_variable(
        min_smallest: i64,
        min_largest: i64,
        max_smallest: i64,
        max_largest: i64,
    ) -> Result<Self> {
        if min_smallest > min_largest {
            return Err(FieldError::InvalidRange(
                "smallest minimum value must be less than largest minimum value".to_string(),
            ));
        }
        if max_smallest > max_largest {
            return Err(FieldError::InvalidRange(
                "smallest maximum value must be less than largest maximum value".to_string(),
            ));
        }
        if min_largest > max_largest {
            return Err(FieldError::InvalidRange(
                "minimum value must be less than maximum value".to_string(),
            ));
        }
        if min_smallest > max_smallest {
            return Err(FieldError::InvalidRange(
                "smallest minimum value must be less than smallest maximum value".to_string(),
            ));
        }
        Ok(Self::new_unchecked(
            min_smallest,
            min_largest,
            max_smallest,
            max_largest,
        ))
    }

    /// Builds a range from bounds already known to be ordered.
    pub(crate) const fn new_unchecked(
        min_smallest: i64,
        min_largest: i64,
        max_smallest: i64,
        max_largest: i64,
    ) -> Self {
        Self {
            min_smallest,
            min_largest,
            max_smallest,
            max_largest,
        }
    }

    /// Fixed range for bounds that fit an `i32`, as produced by field arithmetic.
    pub(crate) const fn fixed(min: i32, max: i32) -> Self {
        Self::new_unchecked(min as i64, min as i64, max as i64, max as i64)
    }

    /// True when neither end varies.
    pub fn is_fixed(&self) -> bool {
        self.min_smallest == self.min_largest && self.max_smallest == self.max_largest
    }

    pub fn minimum(&self) -> i64 {
        self.min_smallest
    }

    pub fn largest_minimum(&self) -> i64 {
        self.min_largest
    }

    pub fn smallest_maximum(&self) -> i64 {
        self.max_smallest
    }

    pub fn maximum(&self) -> i64 {
        self.max_largest
    }

    /// True when every value in the range fits an `i32`.
    pub fn is_int_value(&self) -> bool {
        self.minimum() >= i64::from(i32::MIN) && self.maximum() <= i64::from(i32::MAX)
    }

    pub fn is_valid_value(&self, value: i64) -> bool {
        value >= self.minimum() && value <= self.maximum()
    }

    /// True when the whole range fits an `i32` and `value` lies within it.
    pub fn is_valid_int_value(&self, value: i64) -> bool {
        self.is_int_value() && self.is_valid_value(value)
    }

    /// Checks `value` against the range, naming `field` in the error.
    ///
    /// # Errors
    /// Returns `FieldError::ValueOutOfRange` if the value lies outside the range.
    pub fn check_valid_value<F>(&self, value: i64, field: &F) -> Result<i64>
    where
        F: fmt::Display + ?Sized,
    {
        if self.is_valid_value(value) {
            Ok(value)
        } else {
            Err(self.out_of_range(value, field))
        }
    }

    /// Checks `value` against the range and narrows it to an `i32`.
    ///
    /// # Errors
    /// Returns `FieldError::ValueOutOfRange` if the range does not fit an
    /// `i32` or the value lies outside it.
    pub fn check_valid_int_value<F>(&self, value: i64, field: &F) -> Result<i32>
    where
        F: fmt::Display + ?Sized,
    {
        if !self.is_valid_int_value(value) {
            return Err(self.out_of_range(value, field));
        }
        i32::try_from(value).map_err(|_| self.out_of_range(value, field))
    }

    fn out_of_range<F>(&self, value: i64, field: &F) -> FieldError
    where
        F: fmt::Display + ?Sized,
    {
        FieldError::ValueOutOfRange {
            field: field.to_string(),
            range: *self,
            value,
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.min_smallest)?;
        if self.min_smallest != self.min_largest {
            write!(f, "/{}", self.min_largest)?;
        }
        write!(f, " - {}", self.max_smallest)?;
        if self.max_smallest != self.max_largest {
            write!(f, "/{}", self.max_largest)?;
        }
        Ok(())
    }
}

impl TryFrom<[i64; 4]> for ValueRange {
    type Error = FieldError;

    fn try_from(bounds: [i64; 4]) -> Result<Self> {
        Self::of_variable(bounds[0], bounds[1], bounds[2], bounds[3])
    }
}

impl From<ValueRange> for [i64; 4] {
    fn from(range: ValueRange) -> Self {
        [
            range.min_smallest,
            range.min_largest,
            range.max_smallest,
            range.max_largest,
        ]
    }
}
