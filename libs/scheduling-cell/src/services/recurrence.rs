// libs/scheduling-cell/src/services/recurrence.rs
use chrono::{Duration, Months, NaiveDateTime};
use tracing::debug;

use crate::models::{Occurrence, RecurrencePattern, RecurrenceRule, SchedulingError};

/// Validate a recurrence rule against its anchor before any write.
///
/// A rule must carry exactly one honored terminator: `occurrences` wins
/// when both are supplied, and a rule with neither is rejected rather than
/// expanded unbounded.
pub fn validate_rule(
    rule: &RecurrenceRule,
    anchor_end: NaiveDateTime,
) -> Result<(), SchedulingError> {
    if rule.interval == 0 {
        return Err(SchedulingError::RecurrenceConfig(
            "Recurrence interval must be at least 1".to_string(),
        ));
    }

    if rule.end_date.is_none() && rule.occurrences.is_none() {
        return Err(SchedulingError::RecurrenceConfig(
            "Recurrence rule must set either end_date or occurrences".to_string(),
        ));
    }

    if let Some(occurrences) = rule.occurrences {
        if occurrences == 0 {
            return Err(SchedulingError::RecurrenceConfig(
                "Recurrence occurrence count must be at least 1".to_string(),
            ));
        }
    }

    if let Some(end_date) = rule.end_date {
        if end_date < anchor_end {
            return Err(SchedulingError::RecurrenceConfig(
                "Recurrence end date falls before the anchor appointment ends".to_string(),
            ));
        }
    }

    Ok(())
}

/// Expand a recurrence rule into the finite sequence of windows following
/// the anchor. Validates the rule first, so a caller can never obtain an
/// unbounded iterator.
pub fn expand(
    anchor_start: NaiveDateTime,
    anchor_end: NaiveDateTime,
    rule: &RecurrenceRule,
) -> Result<RecurrenceExpansion, SchedulingError> {
    validate_rule(rule, anchor_end)?;

    debug!(
        "Expanding {:?} recurrence (interval {}) from anchor ending {}",
        rule.pattern, rule.interval, anchor_end
    );

    // The count terminator excludes the anchor itself: occurrences = N
    // means N - 1 windows beyond the original visit.
    let remaining = rule.occurrences.map(|count| count - 1);

    // occurrences takes precedence; the end date is only honored alone
    let end_date = if rule.occurrences.is_some() {
        None
    } else {
        rule.end_date
    };

    Ok(RecurrenceExpansion {
        anchor_end,
        duration: anchor_end - anchor_start,
        pattern: rule.pattern,
        interval: rule.interval,
        end_date,
        remaining,
        step_index: 0,
        done: false,
    })
}

/// Lazy, finite expansion of a recurrence rule.
///
/// Each occurrence is computed from the anchor (`anchor.end` advanced by
/// `k * interval` pattern units), never from the previous occurrence, so
/// month-end clamping cannot drift and the sequence is restartable — two
/// expansions of the same anchor and rule always agree.
pub struct RecurrenceExpansion {
    anchor_end: NaiveDateTime,
    duration: Duration,
    pattern: RecurrencePattern,
    interval: u32,
    end_date: Option<NaiveDateTime>,
    remaining: Option<u32>,
    step_index: u32,
    done: bool,
}

impl Iterator for RecurrenceExpansion {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        if self.done {
            return None;
        }

        if self.remaining == Some(0) {
            self.done = true;
            return None;
        }

        self.step_index += 1;
        let steps = self.interval.checked_mul(self.step_index)?;

        let start = match advance(self.anchor_end, self.pattern, steps) {
            Some(start) => start,
            None => {
                self.done = true;
                return None;
            }
        };

        if let Some(end_date) = self.end_date {
            if start > end_date {
                self.done = true;
                return None;
            }
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }

        Some(Occurrence {
            start,
            end: start + self.duration,
        })
    }
}

/// Advance a timestamp by `steps` pattern units. Month stepping uses
/// calendar-month arithmetic with end-of-month clamping (Jan 31 + 1 month
/// lands on the last day of February).
fn advance(
    from: NaiveDateTime,
    pattern: RecurrencePattern,
    steps: u32,
) -> Option<NaiveDateTime> {
    match pattern {
        RecurrencePattern::Daily => from.checked_add_signed(Duration::days(steps as i64)),
        RecurrencePattern::Weekly => from.checked_add_signed(Duration::weeks(steps as i64)),
        RecurrencePattern::Monthly => from.checked_add_months(Months::new(steps)),
    }
}
