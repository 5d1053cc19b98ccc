//! Tests for offset transitions and the yearly rules that produce them.

use calendar_fields::{FieldError, TimeDefinition, ZoneOffsetTransition, ZoneOffsetTransitionRule};
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Europe::London;

fn offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3_600).unwrap()
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// European summer time ends on the last Sunday in October at 01:00 UTC.
fn eu_autumn() -> ZoneOffsetTransitionRule {
    ZoneOffsetTransitionRule::of(
        Month::October,
        -1,
        Some(Weekday::Sun),
        time(1, 0),
        false,
        TimeDefinition::Utc,
        offset(0),
        offset(1),
        offset(0),
    )
    .unwrap()
}

/// European summer time starts on the last Sunday in March at 01:00 UTC.
fn eu_spring() -> ZoneOffsetTransitionRule {
    ZoneOffsetTransitionRule::of(
        Month::March,
        -1,
        Some(Weekday::Sun),
        time(1, 0),
        false,
        TimeDefinition::Utc,
        offset(0),
        offset(0),
        offset(1),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// ZoneOffsetTransition
// ---------------------------------------------------------------------------

#[test]
fn gap_transition() {
    let t = ZoneOffsetTransition::new(local(2023, 3, 26, 1, 0), offset(0), offset(1)).unwrap();
    assert!(t.is_gap());
    assert!(!t.is_overlap());
    assert_eq!(t.duration(), Duration::hours(1));
    assert_eq!(t.date_time_before(), local(2023, 3, 26, 1, 0));
    assert_eq!(t.date_time_after(), local(2023, 3, 26, 2, 0));
    assert_eq!(t.instant(), Utc.with_ymd_and_hms(2023, 3, 26, 1, 0, 0).unwrap());
    assert_eq!(t.to_epoch_second(), 1_679_792_400);
    assert!(!t.is_valid_offset(offset(0)));
    assert!(!t.is_valid_offset(offset(1)));
    assert_eq!(
        t.to_string(),
        "Transition[Gap at 2023-03-26T01:00:00+00:00 to +01:00]"
    );
}

#[test]
fn overlap_transition() {
    let t = ZoneOffsetTransition::new(local(2023, 10, 29, 2, 0), offset(1), offset(0)).unwrap();
    assert!(t.is_overlap());
    assert_eq!(t.duration(), Duration::hours(-1));
    assert_eq!(t.date_time_after(), local(2023, 10, 29, 1, 0));
    assert_eq!(t.instant(), Utc.with_ymd_and_hms(2023, 10, 29, 1, 0, 0).unwrap());
    assert!(t.is_valid_offset(offset(0)));
    assert!(t.is_valid_offset(offset(1)));
    assert!(!t.is_valid_offset(offset(2)));
    assert_eq!(
        t.to_string(),
        "Transition[Overlap at 2023-10-29T02:00:00+01:00 to +00:00]"
    );
}

#[test]
fn transition_rejects_equal_offsets_and_fractional_seconds() {
    assert!(matches!(
        ZoneOffsetTransition::new(local(2023, 3, 26, 1, 0), offset(1), offset(1)),
        Err(FieldError::InvalidRule(_))
    ));
    let fractional = local(2023, 3, 26, 1, 0).with_nanosecond(5).unwrap();
    assert!(ZoneOffsetTransition::new(fractional, offset(0), offset(1)).is_err());
}

#[test]
fn transitions_order_by_instant() {
    let spring = ZoneOffsetTransition::new(local(2023, 3, 26, 1, 0), offset(0), offset(1)).unwrap();
    let autumn = ZoneOffsetTransition::new(local(2023, 10, 29, 2, 0), offset(1), offset(0)).unwrap();
    let earlier = ZoneOffsetTransition::new(local(2022, 10, 30, 2, 0), offset(1), offset(0)).unwrap();
    let mut all = vec![autumn, spring, earlier];
    all.sort();
    assert_eq!(all, vec![earlier, spring, autumn]);
}

// ---------------------------------------------------------------------------
// Rule validation
// ---------------------------------------------------------------------------

fn rule_with(indicator: i32, time: NaiveTime, end_of_day: bool) -> Result<ZoneOffsetTransitionRule, FieldError> {
    ZoneOffsetTransitionRule::of(
        Month::March,
        indicator,
        Some(Weekday::Sun),
        time,
        end_of_day,
        TimeDefinition::Wall,
        offset(0),
        offset(0),
        offset(1),
    )
}

#[test]
fn day_indicator_must_be_in_range_and_nonzero() {
    for indicator in [0, 32, -29] {
        assert!(
            matches!(rule_with(indicator, time(1, 0), false), Err(FieldError::InvalidRule(_))),
            "indicator {indicator}"
        );
    }
    assert!(rule_with(31, time(1, 0), false).is_ok());
    assert!(rule_with(-28, time(1, 0), false).is_ok());
}

#[test]
fn end_of_day_requires_midnight() {
    assert!(matches!(
        rule_with(8, time(10, 0), true),
        Err(FieldError::InvalidRule(_))
    ));
    assert!(rule_with(8, NaiveTime::MIN, true).is_ok());
}

#[test]
fn rule_time_must_be_whole_seconds() {
    let fractional = time(1, 0).with_nanosecond(1).unwrap();
    assert!(rule_with(8, fractional, false).is_err());
}

#[test]
fn rule_accessors() {
    let rule = eu_autumn();
    assert_eq!(rule.month(), Month::October);
    assert_eq!(rule.day_of_month_indicator(), -1);
    assert_eq!(rule.day_of_week(), Some(Weekday::Sun));
    assert_eq!(rule.local_time(), time(1, 0));
    assert!(!rule.is_midnight_end_of_day());
    assert_eq!(rule.time_definition(), TimeDefinition::Utc);
    assert_eq!(rule.standard_offset(), offset(0));
    assert_eq!(rule.offset_before(), offset(1));
    assert_eq!(rule.offset_after(), offset(0));
}

// ---------------------------------------------------------------------------
// Creating transitions
// ---------------------------------------------------------------------------

#[test]
fn last_sunday_of_october() {
    let t = eu_autumn().create_transition(2023).unwrap();
    assert_eq!(t.date_time_before(), local(2023, 10, 29, 2, 0));
    assert_eq!(t.offset_before(), offset(1));
    assert_eq!(t.offset_after(), offset(0));
    assert!(t.is_overlap());
    assert_eq!(t.instant(), Utc.with_ymd_and_hms(2023, 10, 29, 1, 0, 0).unwrap());
}

#[test]
fn last_sunday_of_march() {
    let t = eu_spring().create_transition(2023).unwrap();
    assert_eq!(t.date_time_before(), local(2023, 3, 26, 1, 0));
    assert!(t.is_gap());
}

#[test]
fn standard_time_definition_shifts_by_the_saving() {
    let rule = ZoneOffsetTransitionRule::of(
        Month::October,
        -1,
        Some(Weekday::Sun),
        time(2, 0),
        false,
        TimeDefinition::Standard,
        offset(1),
        offset(2),
        offset(1),
    )
    .unwrap();
    let t = rule.create_transition(2023).unwrap();
    assert_eq!(t.date_time_before(), local(2023, 10, 29, 3, 0));
    assert_eq!(t.instant(), Utc.with_ymd_and_hms(2023, 10, 29, 1, 0, 0).unwrap());
}

#[test]
fn sunday_on_or_after_at_end_of_day() {
    let rule = ZoneOffsetTransitionRule::of(
        Month::March,
        8,
        Some(Weekday::Sun),
        NaiveTime::MIN,
        true,
        TimeDefinition::Wall,
        offset(-5),
        offset(-5),
        offset(-4),
    )
    .unwrap();
    // the second Sunday of March 2024 is the 10th; 24:00 is the 11th at 00:00
    let t = rule.create_transition(2024).unwrap();
    assert_eq!(t.date_time_before(), local(2024, 3, 11, 0, 0));
    assert_eq!(
        rule.to_string(),
        "TransitionRule[Gap -05:00 to -04:00, Sun on or after March 8 at 24:00 WALL, standard offset -05:00]"
    );
}

#[test]
fn fixed_days_without_a_weekday() {
    let rule = |month, indicator| {
        ZoneOffsetTransitionRule::of(
            month,
            indicator,
            None,
            time(0, 0),
            false,
            TimeDefinition::Wall,
            offset(3),
            offset(3),
            offset(4),
        )
        .unwrap()
    };
    assert_eq!(
        rule(Month::February, -28).create_transition(2023).unwrap().date_time_before(),
        local(2023, 2, 1, 0, 0)
    );
    assert_eq!(
        rule(Month::February, -1).create_transition(2024).unwrap().date_time_before(),
        local(2024, 2, 29, 0, 0)
    );
    assert!(matches!(
        rule(Month::February, 30).create_transition(2023),
        Err(FieldError::InvalidValue(_))
    ));
}

#[test]
fn rule_display() {
    assert_eq!(
        eu_autumn().to_string(),
        "TransitionRule[Overlap +01:00 to +00:00, Sun on or before last day of October at 01:00 UTC, standard offset +00:00]"
    );
    let rule = ZoneOffsetTransitionRule::of(
        Month::April,
        -3,
        Some(Weekday::Fri),
        time(2, 30),
        false,
        TimeDefinition::Standard,
        offset(2),
        offset(2),
        offset(3),
    )
    .unwrap();
    assert_eq!(
        rule.to_string(),
        "TransitionRule[Gap +02:00 to +03:00, Fri on or before last day minus 2 of April at 02:30 STANDARD, standard offset +02:00]"
    );
}

#[test]
fn rule_display_keeps_seconds() {
    let rule = ZoneOffsetTransitionRule::of(
        Month::March,
        -1,
        Some(Weekday::Sun),
        NaiveTime::from_hms_opt(1, 30, 15).unwrap(),
        false,
        TimeDefinition::Utc,
        offset(0),
        offset(0),
        offset(1),
    )
    .unwrap();
    assert_eq!(
        rule.to_string(),
        "TransitionRule[Gap +00:00 to +01:00, Sun on or before last day of March at 01:30:15 UTC, standard offset +00:00]"
    );
}

#[test]
fn rules_match_the_london_time_zone() {
    let before = |instant: DateTime<Utc>| {
        let just_before = (instant - Duration::seconds(1)).naive_utc();
        London.offset_from_utc_datetime(&just_before).fix()
    };
    let after = |instant: DateTime<Utc>| London.offset_from_utc_datetime(&instant.naive_utc()).fix();

    for year in 1997..=2037 {
        for rule in [eu_spring(), eu_autumn()] {
            let t = rule.create_transition(year).unwrap();
            assert_eq!(t.instant().year(), year);
            assert_eq!(before(t.instant()), t.offset_before(), "{t}");
            assert_eq!(after(t.instant()), t.offset_after(), "{t}");
        }
    }
}

// ---------------------------------------------------------------------------
// TimeDefinition
// ---------------------------------------------------------------------------

#[test]
fn time_definitions_convert_to_wall_time() {
    let at = local(2023, 10, 29, 1, 0);
    assert_eq!(
        TimeDefinition::Utc.create_date_time(at, offset(0), offset(1)).unwrap(),
        local(2023, 10, 29, 2, 0)
    );
    assert_eq!(
        TimeDefinition::Standard.create_date_time(at, offset(1), offset(2)).unwrap(),
        local(2023, 10, 29, 2, 0)
    );
    assert_eq!(
        TimeDefinition::Wall.create_date_time(at, offset(1), offset(2)).unwrap(),
        at
    );
}

#[test]
fn time_definition_serde() {
    assert_eq!(serde_json::to_string(&TimeDefinition::Utc).unwrap(), "\"utc\"");
    let parsed: TimeDefinition = serde_json::from_str("\"standard\"").unwrap();
    assert_eq!(parsed, TimeDefinition::Standard);
    assert_eq!(TimeDefinition::default(), TimeDefinition::Wall);
}
