// libs/calendar-cell/tests/projector_test.rs
use assert_matches::assert_matches;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use uuid::Uuid;

use calendar_cell::models::{CalendarError, MONTH_CELL_VISIBLE_CAP};
use calendar_cell::services::projector::{
    layout_metrics, project_agenda, project_day, project_month, project_week, relocation_delta,
    slot_id,
};
use scheduling_cell::models::{Appointment, AppointmentKind, AppointmentStatus, Slot};

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

fn appointment(start: NaiveDateTime, end: NaiveDateTime) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        patient_name: "Jane Doe".to_string(),
        doctor_id: Uuid::new_v4(),
        doctor_name: "Dr. Smith".to_string(),
        start,
        end,
        kind: AppointmentKind::Video,
        location: None,
        status: AppointmentStatus::Scheduled,
        notes: None,
        recurrence: None,
        created_at: start,
        updated_at: start,
    }
}

// ==============================================================================
// MONTH VIEW
// ==============================================================================

#[test]
fn month_cells_span_the_fixed_grid() {
    let cells = project_month(date(2025, 1, 15), &[]);

    assert_eq!(cells.len(), 42);
    assert_eq!(cells[0].date, date(2024, 12, 29));
    assert_eq!(cells[0].date.weekday(), Weekday::Sun);
    assert_eq!(cells.last().unwrap().date.weekday(), Weekday::Sat);
}

#[test]
fn month_cells_group_appointments_by_day() {
    let on_the_20th = appointment(at(2025, 1, 20, 10, 0), at(2025, 1, 20, 10, 30));
    let on_the_21st = appointment(at(2025, 1, 21, 9, 0), at(2025, 1, 21, 9, 30));

    let cells = project_month(
        date(2025, 1, 1),
        &[on_the_21st.clone(), on_the_20th.clone()],
    );

    let cell_20 = cells.iter().find(|cell| cell.date == date(2025, 1, 20)).unwrap();
    assert_eq!(cell_20.visible.len(), 1);
    assert_eq!(cell_20.visible[0].id, on_the_20th.id);

    let cell_21 = cells.iter().find(|cell| cell.date == date(2025, 1, 21)).unwrap();
    assert_eq!(cell_21.visible[0].id, on_the_21st.id);
}

#[test]
fn crowded_cells_cap_visible_appointments_and_report_overflow() {
    let appointments: Vec<Appointment> = (0..5)
        .map(|i| {
            appointment(
                at(2025, 1, 20, 9 + i, 0),
                at(2025, 1, 20, 9 + i, 30),
            )
        })
        .collect();

    let cells = project_month(date(2025, 1, 1), &appointments);
    let crowded = cells.iter().find(|cell| cell.date == date(2025, 1, 20)).unwrap();

    assert_eq!(crowded.visible.len(), MONTH_CELL_VISIBLE_CAP);
    assert_eq!(crowded.overflow, 2);
    // Earliest appointments stay visible
    assert_eq!(crowded.visible[0].start, at(2025, 1, 20, 9, 0));
}

// ==============================================================================
// WEEK AND DAY VIEWS
// ==============================================================================

#[test]
fn week_view_has_seven_columns_of_half_hour_slots() {
    let days = project_week(date(2025, 1, 22), &[]);

    assert_eq!(days.len(), 7);
    // Week containing Wednesday Jan 22 starts on Sunday Jan 19
    assert_eq!(days[0].date, date(2025, 1, 19));
    for day in &days {
        assert_eq!(day.slots.len(), 24);
    }
}

#[test]
fn day_view_uses_quarter_hour_slots() {
    let day = project_day(date(2025, 1, 20), &[]);

    assert_eq!(day.slots.len(), 48);
}

#[test]
fn appointments_appear_in_every_slot_they_overlap() {
    let long_visit = appointment(at(2025, 1, 20, 10, 0), at(2025, 1, 20, 11, 0));
    let day = project_day(date(2025, 1, 20), &[long_visit.clone()]);

    let occupied: Vec<_> = day
        .slots
        .iter()
        .filter(|group| !group.appointments.is_empty())
        .collect();

    // One hour over 15-minute slots
    assert_eq!(occupied.len(), 4);
    assert!(occupied
        .iter()
        .all(|group| group.appointments[0].id == long_visit.id));
    assert_eq!(occupied[0].slot.start, at(2025, 1, 20, 10, 0));
}

#[test]
fn slot_boundaries_do_not_capture_touching_appointments() {
    let visit = appointment(at(2025, 1, 20, 10, 0), at(2025, 1, 20, 10, 30));
    let day = project_day(date(2025, 1, 20), &[visit]);

    let after = day
        .slots
        .iter()
        .find(|group| group.slot.start == at(2025, 1, 20, 10, 30))
        .unwrap();

    assert!(after.appointments.is_empty());
}

#[test]
fn layout_metrics_are_linear_in_minutes() {
    let visit = appointment(at(2025, 1, 20, 9, 30), at(2025, 1, 20, 10, 15));

    let layout = layout_metrics(&visit);

    // Grid opens at 08:00
    assert_eq!(layout.offset_minutes, 90);
    assert_eq!(layout.height_minutes, 45);
}

// ==============================================================================
// AGENDA VIEW
// ==============================================================================

#[test]
fn agenda_partitions_past_and_upcoming_by_day() {
    let last_week = appointment(at(2025, 1, 13, 10, 0), at(2025, 1, 13, 10, 30));
    let yesterday = appointment(at(2025, 1, 19, 10, 0), at(2025, 1, 19, 10, 30));
    let today = appointment(at(2025, 1, 20, 10, 0), at(2025, 1, 20, 10, 30));
    let next_week = appointment(at(2025, 1, 27, 10, 0), at(2025, 1, 27, 10, 30));

    let agenda = project_agenda(
        date(2025, 1, 20),
        &[next_week.clone(), last_week.clone(), today.clone(), yesterday.clone()],
    );

    // Past is most-recent-first and excludes today
    assert_eq!(agenda.past.len(), 2);
    assert_eq!(agenda.past[0].date, date(2025, 1, 19));
    assert_eq!(agenda.past[1].date, date(2025, 1, 13));

    // Today leads the upcoming partition, chronological
    assert_eq!(agenda.upcoming.len(), 2);
    assert_eq!(agenda.upcoming[0].date, date(2025, 1, 20));
    assert_eq!(agenda.upcoming[1].date, date(2025, 1, 27));
}

#[test]
fn agenda_days_keep_their_appointments_chronological() {
    let late = appointment(at(2025, 1, 27, 15, 0), at(2025, 1, 27, 15, 30));
    let early = appointment(at(2025, 1, 27, 9, 0), at(2025, 1, 27, 9, 30));

    let agenda = project_agenda(date(2025, 1, 20), &[late.clone(), early.clone()]);

    assert_eq!(agenda.upcoming.len(), 1);
    assert_eq!(agenda.upcoming[0].appointments[0].id, early.id);
    assert_eq!(agenda.upcoming[0].appointments[1].id, late.id);
}

// ==============================================================================
// DRAG RELOCATION
// ==============================================================================

#[test]
fn relocation_delta_preserves_the_duration() {
    let visit = appointment(at(2025, 1, 20, 10, 0), at(2025, 1, 20, 10, 45));
    let target = Slot {
        start: at(2025, 1, 21, 14, 0),
        end: at(2025, 1, 21, 14, 30),
    };

    let delta = relocation_delta(&visit, &slot_id(&target)).unwrap();

    assert_eq!(delta.new_start, at(2025, 1, 21, 14, 0));
    assert_eq!(delta.new_end, at(2025, 1, 21, 14, 45));
}

#[test]
fn malformed_drop_targets_are_rejected() {
    let visit = appointment(at(2025, 1, 20, 10, 0), at(2025, 1, 20, 10, 30));

    assert_matches!(
        relocation_delta(&visit, "not-a-slot"),
        Err(CalendarError::InvalidSlotId(_))
    );
    assert_matches!(
        relocation_delta(&visit, "slot-garbage"),
        Err(CalendarError::InvalidSlotId(_))
    );
}
