//! Tests for `ValueRange` construction, validation and serialization.

use calendar_fields::{ChronoField, FieldError, ValueRange};

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn fixed_range_reports_its_bounds() {
    let range = ValueRange::of(1, 12).unwrap();
    assert!(range.is_fixed());
    assert_eq!(range.minimum(), 1);
    assert_eq!(range.largest_minimum(), 1);
    assert_eq!(range.smallest_maximum(), 12);
    assert_eq!(range.maximum(), 12);
}

#[test]
fn variable_maximum_range() {
    let range = ValueRange::of_variable_max(1, 4, 6).unwrap();
    assert!(!range.is_fixed());
    assert_eq!(range.minimum(), 1);
    assert_eq!(range.smallest_maximum(), 4);
    assert_eq!(range.maximum(), 6);
}

#[test]
fn minimum_above_smallest_maximum_is_rejected() {
    let err = ValueRange::of_variable_max(7, 4, 6).unwrap_err();
    assert!(matches!(err, FieldError::InvalidRange(_)), "got {err:?}");
}

#[test]
fn inverted_fixed_range_is_rejected() {
    assert!(matches!(
        ValueRange::of(5, 3),
        Err(FieldError::InvalidRange(_))
    ));
}

#[test]
fn variable_range_checks_every_ordering() {
    assert!(ValueRange::of_variable(0, 1, 52, 54).is_ok());
    // smallest minimum above largest minimum
    assert!(ValueRange::of_variable(2, 1, 52, 54).is_err());
    // smallest maximum above largest maximum
    assert!(ValueRange::of_variable(0, 1, 55, 54).is_err());
    // largest minimum above largest maximum
    assert!(ValueRange::of_variable(0, 60, 52, 54).is_err());
    // smallest minimum above smallest maximum
    assert!(ValueRange::of_variable(53, 53, 52, 54).is_err());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn valid_values_are_inclusive_of_both_ends() {
    let range = ValueRange::of_variable_max(1, 28, 31).unwrap();
    assert!(!range.is_valid_value(0));
    assert!(range.is_valid_value(1));
    assert!(range.is_valid_value(31));
    assert!(!range.is_valid_value(32));
}

#[test]
fn check_valid_value_names_the_field() {
    let range = ValueRange::of_variable_max(1, 28, 31).unwrap();
    assert_eq!(range.check_valid_value(15, &ChronoField::DayOfMonth), Ok(15));

    let err = range
        .check_valid_value(32, &ChronoField::DayOfMonth)
        .unwrap_err();
    assert_eq!(
        err,
        FieldError::ValueOutOfRange {
            field: "DayOfMonth".to_string(),
            range,
            value: 32,
        }
    );
    assert_eq!(
        err.to_string(),
        "Invalid value for DayOfMonth (valid values 1 - 28/31): 32"
    );
}

#[test]
fn int_checks_require_the_whole_range_to_fit() {
    let wide = ValueRange::of(0, i64::from(i32::MAX) + 1).unwrap();
    assert!(!wide.is_int_value());
    assert!(wide.is_valid_value(5));
    assert!(!wide.is_valid_int_value(5));
    assert!(wide.check_valid_int_value(5, &"Wide").is_err());

    let narrow = ValueRange::of(-10, 10).unwrap();
    assert!(narrow.is_int_value());
    assert_eq!(narrow.check_valid_int_value(-10, &"Narrow"), Ok(-10));
}

// ---------------------------------------------------------------------------
// Display and serde
// ---------------------------------------------------------------------------

#[test]
fn display_shows_variable_ends() {
    assert_eq!(ValueRange::of(1, 7).unwrap().to_string(), "1 - 7");
    assert_eq!(
        ValueRange::of_variable_max(1, 28, 31).unwrap().to_string(),
        "1 - 28/31"
    );
    assert_eq!(
        ValueRange::of_variable(0, 1, 52, 54).unwrap().to_string(),
        "0/1 - 52/54"
    );
}

#[test]
fn serializes_as_four_bounds() {
    let range = ValueRange::of_variable_max(1, 28, 31).unwrap();
    let json = serde_json::to_string(&range).unwrap();
    assert_eq!(json, "[1,1,28,31]");
    let back: ValueRange = serde_json::from_str(&json).unwrap();
    assert_eq!(back, range);
}

#[test]
fn deserializing_inconsistent_bounds_fails() {
    let result: Result<ValueRange, _> = serde_json::from_str("[5,1,2,3]");
    assert!(result.is_err());
}
