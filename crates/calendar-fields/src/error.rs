//! Error types for calendar-field and transition-rule operations.

use thiserror::Error;

use crate::range::ValueRange;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A `ValueRange` was constructed with inconsistent bounds.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A transition or transition rule was constructed from invalid parts.
    #[error("Invalid transition rule: {0}")]
    InvalidRule(String),

    #[error("Invalid week definition: minimal number of days is invalid: {0}")]
    InvalidWeekDefinition(u8),

    /// The temporal does not carry the fields the requested field is derived from.
    #[error("Unsupported field: {0}")]
    UnsupportedField(String),

    #[error("Unsupported unit: {0}")]
    UnsupportedUnit(String),

    #[error("Unsupported chronology: {0}, expected ISO")]
    UnsupportedChronology(String),

    /// A value fell outside the declared or context-refined range of a field.
    #[error("Invalid value for {field} (valid values {range}): {value}")]
    ValueOutOfRange {
        field: String,
        range: ValueRange,
        value: i64,
    },

    /// A value was in range but does not name a real date, or strict
    /// resolution landed outside the requested period.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, FieldError>;
