//! # calendar-fields
//!
//! Calendar-field computation and resolution over `chrono`'s ISO types.
//!
//! Answers questions such as "which ISO week is 2008-12-29 in?" (week 1 of
//! 2009) and reconstructs dates from partial field sets such as
//! (week-based-year, week, day-of-week) under three resolution styles.
//! Also models yearly UTC-offset transition rules ("last Sunday in October
//! at 01:00 UTC") and the concrete transitions they produce.
//!
//! ## Modules
//!
//! - [`range`]: validated, possibly variable, value ranges
//! - [`field`]: the field/unit capability, field-value map and resolver styles
//! - [`temporal`]: field access for `NaiveDate`, `NaiveDateTime` and `NaiveTime`
//! - [`chrono_field`]: built-in ISO fields and units
//! - [`iso_fields`]: quarter and ISO week-based fields
//! - [`week_fields`]: localized week definitions
//! - [`resolver`]: date resolution from a field-value map
//! - [`transition`]: a single offset transition
//! - [`transition_rule`]: yearly transition rules
//! - [`calendar`]: overflow-checked ISO calendar arithmetic
//! - [`error`]: Error types

pub mod calendar;
pub mod chrono_field;
pub mod error;
pub mod field;
pub mod iso_fields;
pub mod range;
pub mod resolver;
pub mod temporal;
pub mod transition;
pub mod transition_rule;
pub mod week_fields;

pub use chrono_field::{ChronoField, ChronoUnit};
pub use error::FieldError;
pub use field::{CustomField, Field, FieldValues, ResolverStyle, TemporalField, TemporalUnit, Unit};
pub use iso_fields::{IsoField, IsoUnit};
pub use range::ValueRange;
pub use resolver::resolve_date;
pub use temporal::{Chronology, Temporal, TemporalAccessor};
pub use transition::ZoneOffsetTransition;
pub use transition_rule::{TimeDefinition, ZoneOffsetTransitionRule};
pub use week_fields::{WeekDefinition, WeekField, WeekFieldKind, WeekFields};
