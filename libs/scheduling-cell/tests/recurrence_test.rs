// libs/scheduling-cell/tests/recurrence_test.rs
use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};

use scheduling_cell::models::{Occurrence, RecurrencePattern, RecurrenceRule, SchedulingError};
use scheduling_cell::services::recurrence::{expand, validate_rule};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn weekly(occurrences: Option<u32>, end_date: Option<NaiveDateTime>) -> RecurrenceRule {
    RecurrenceRule {
        pattern: RecurrencePattern::Weekly,
        interval: 1,
        end_date,
        occurrences,
    }
}

// ==============================================================================
// COUNT TERMINATOR
// ==============================================================================

#[test]
fn occurrence_count_excludes_the_anchor() {
    // Anchor visit ends Monday 2025-01-20 16:00, 30 minutes long
    let anchor_start = at(2025, 1, 20, 15, 30);
    let anchor_end = at(2025, 1, 20, 16, 0);

    let occurrences: Vec<Occurrence> =
        expand(anchor_start, anchor_end, &weekly(Some(3), None))
            .unwrap()
            .collect();

    // occurrences = 3 means two windows beyond the original
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].start, at(2025, 1, 27, 16, 0));
    assert_eq!(occurrences[1].start, at(2025, 2, 3, 16, 0));
}

#[test]
fn occurrences_preserve_the_anchor_duration() {
    let occurrences: Vec<Occurrence> = expand(
        at(2025, 1, 20, 15, 0),
        at(2025, 1, 20, 16, 0),
        &weekly(Some(4), None),
    )
    .unwrap()
    .collect();

    for occurrence in &occurrences {
        assert_eq!((occurrence.end - occurrence.start).num_minutes(), 60);
    }
}

#[test]
fn single_occurrence_series_yields_no_followups() {
    let occurrences: Vec<Occurrence> = expand(
        at(2025, 1, 20, 15, 0),
        at(2025, 1, 20, 16, 0),
        &weekly(Some(1), None),
    )
    .unwrap()
    .collect();

    assert!(occurrences.is_empty());
}

// ==============================================================================
// END DATE TERMINATOR
// ==============================================================================

#[test]
fn expansion_stops_at_the_end_date() {
    let occurrences: Vec<Occurrence> = expand(
        at(2025, 1, 20, 15, 0),
        at(2025, 1, 20, 16, 0),
        &weekly(None, Some(at(2025, 2, 5, 0, 0))),
    )
    .unwrap()
    .collect();

    // Jan 27 and Feb 3 fit; Feb 10 exceeds the end date
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences.last().unwrap().start, at(2025, 2, 3, 16, 0));
}

#[test]
fn end_date_between_anchor_and_first_followup_yields_nothing() {
    let occurrences: Vec<Occurrence> = expand(
        at(2025, 1, 20, 15, 0),
        at(2025, 1, 20, 16, 0),
        &weekly(None, Some(at(2025, 1, 22, 0, 0))),
    )
    .unwrap()
    .collect();

    assert!(occurrences.is_empty());
}

#[test]
fn occurrence_count_takes_precedence_over_end_date() {
    // Both terminators supplied: the count wins, the end date is ignored
    let occurrences: Vec<Occurrence> = expand(
        at(2025, 1, 20, 15, 0),
        at(2025, 1, 20, 16, 0),
        &weekly(Some(5), Some(at(2025, 1, 28, 0, 0))),
    )
    .unwrap()
    .collect();

    assert_eq!(occurrences.len(), 4);
}

// ==============================================================================
// PATTERNS AND STEPPING
// ==============================================================================

#[test]
fn daily_pattern_steps_by_interval_days() {
    let rule = RecurrenceRule {
        pattern: RecurrencePattern::Daily,
        interval: 2,
        end_date: None,
        occurrences: Some(3),
    };

    let occurrences: Vec<Occurrence> =
        expand(at(2025, 3, 1, 9, 0), at(2025, 3, 1, 9, 30), &rule)
            .unwrap()
            .collect();

    assert_eq!(occurrences[0].start, at(2025, 3, 3, 9, 30));
    assert_eq!(occurrences[1].start, at(2025, 3, 5, 9, 30));
}

#[test]
fn monthly_pattern_clamps_to_the_end_of_shorter_months() {
    let rule = RecurrenceRule {
        pattern: RecurrencePattern::Monthly,
        interval: 1,
        end_date: None,
        occurrences: Some(4),
    };

    // Anchor ends January 31st; February has no 31st
    let occurrences: Vec<Occurrence> =
        expand(at(2025, 1, 31, 10, 0), at(2025, 1, 31, 11, 0), &rule)
            .unwrap()
            .collect();

    assert_eq!(occurrences[0].start, at(2025, 2, 28, 11, 0));
    // Stepped from the anchor, not the clamped February date
    assert_eq!(occurrences[1].start, at(2025, 3, 31, 11, 0));
    assert_eq!(occurrences[2].start, at(2025, 4, 30, 11, 0));
}

#[test]
fn expansion_is_restartable() {
    let rule = weekly(Some(6), None);
    let anchor_start = at(2025, 1, 20, 15, 0);
    let anchor_end = at(2025, 1, 20, 16, 0);

    let first: Vec<Occurrence> = expand(anchor_start, anchor_end, &rule).unwrap().collect();
    let second: Vec<Occurrence> = expand(anchor_start, anchor_end, &rule).unwrap().collect();

    assert_eq!(first, second);
}

// ==============================================================================
// RULE VALIDATION
// ==============================================================================

#[test]
fn rule_without_a_terminator_is_rejected() {
    let result = validate_rule(&weekly(None, None), at(2025, 1, 20, 16, 0));

    assert_matches!(result, Err(SchedulingError::RecurrenceConfig(_)));
}

#[test]
fn zero_interval_is_rejected() {
    let rule = RecurrenceRule {
        pattern: RecurrencePattern::Daily,
        interval: 0,
        end_date: None,
        occurrences: Some(3),
    };

    assert_matches!(
        validate_rule(&rule, at(2025, 1, 20, 16, 0)),
        Err(SchedulingError::RecurrenceConfig(_))
    );
}

#[test]
fn zero_occurrences_is_rejected() {
    assert_matches!(
        validate_rule(&weekly(Some(0), None), at(2025, 1, 20, 16, 0)),
        Err(SchedulingError::RecurrenceConfig(_))
    );
}

#[test]
fn end_date_before_the_anchor_is_rejected() {
    assert_matches!(
        validate_rule(
            &weekly(None, Some(at(2025, 1, 19, 0, 0))),
            at(2025, 1, 20, 16, 0)
        ),
        Err(SchedulingError::RecurrenceConfig(_))
    );
}
