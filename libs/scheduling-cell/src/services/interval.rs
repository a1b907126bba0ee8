// libs/scheduling-cell/src/services/interval.rs
//
// Pure half-open interval and time-grid helpers shared by conflict
// detection and the calendar projections. No state, no I/O.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::Slot;

/// Number of cells in the fixed month grid: six full weeks.
pub const MONTH_GRID_CELLS: usize = 42;

/// Two `[start, end)` intervals overlap iff each starts before the other
/// ends. Touching intervals (`a.end == b.start`) do not overlap.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Generate the fixed-width slots covering `[start_hour:00, end_hour:00)`
/// on `day`. The same generator backs the week view (30-minute step) and
/// the day view (15-minute step); a trailing window narrower than the step
/// is not emitted.
pub fn generate_slots(
    day: NaiveDate,
    start_hour: u32,
    end_hour: u32,
    step_minutes: u32,
) -> Vec<Slot> {
    let mut slots = Vec::new();

    if start_hour >= end_hour || end_hour > 24 || step_minutes == 0 {
        return slots;
    }

    let midnight = day.and_hms_opt(0, 0, 0).unwrap();
    let grid_start = midnight + Duration::hours(start_hour as i64);
    let grid_end = midnight + Duration::hours(end_hour as i64);
    let step = Duration::minutes(step_minutes as i64);

    let mut current = grid_start;
    while current + step <= grid_end {
        slots.push(Slot {
            start: current,
            end: current + step,
        });
        current += step;
    }

    slots
}

/// The 6x7 month grid for the month containing `month_date`: 42
/// consecutive days beginning on the Sunday on/before the 1st. Always a
/// multiple of seven, always covers the full month, always ends on a
/// Saturday.
pub fn month_grid(month_date: NaiveDate) -> Vec<NaiveDate> {
    let first_of_month = month_date.with_day(1).unwrap();
    let lead_days = first_of_month.weekday().num_days_from_sunday() as i64;
    let grid_start = first_of_month - Duration::days(lead_days);

    (0..MONTH_GRID_CELLS as i64)
        .map(|offset| grid_start + Duration::days(offset))
        .collect()
}
