// libs/scheduling-cell/tests/conflict_test.rs
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use scheduling_cell::models::{Appointment, AppointmentKind, AppointmentStatus};
use scheduling_cell::services::conflict::find_conflicts;

fn at(h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 20)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn appointment(start: NaiveDateTime, end: NaiveDateTime, status: AppointmentStatus) -> Appointment {
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
        status,
        notes: None,
        recurrence: None,
        created_at: at(0, 0),
        updated_at: at(0, 0),
    }
}

#[test]
fn overlapping_scheduled_appointments_conflict() {
    let existing = vec![appointment(at(10, 0), at(10, 30), AppointmentStatus::Scheduled)];

    let conflicts = find_conflicts(at(10, 15), at(10, 45), None, &existing);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].id, existing[0].id);
}

#[test]
fn touching_appointments_do_not_conflict() {
    let existing = vec![appointment(at(10, 0), at(10, 30), AppointmentStatus::Scheduled)];

    assert!(find_conflicts(at(10, 30), at(11, 0), None, &existing).is_empty());
}

#[test]
fn non_scheduled_appointments_never_block() {
    let existing = vec![
        appointment(at(10, 0), at(10, 30), AppointmentStatus::Completed),
        appointment(at(10, 0), at(10, 30), AppointmentStatus::Cancelled),
        appointment(at(10, 0), at(10, 30), AppointmentStatus::NoShow),
    ];

    assert!(find_conflicts(at(10, 0), at(10, 30), None, &existing).is_empty());
}

#[test]
fn the_appointment_being_updated_is_excluded() {
    let own = appointment(at(10, 0), at(10, 30), AppointmentStatus::Scheduled);
    let existing = vec![own.clone()];

    // Rescheduling onto its own window conflicts with nothing
    assert!(find_conflicts(at(10, 0), at(10, 30), Some(own.id), &existing).is_empty());
}

#[test]
fn only_overlapping_appointments_are_returned() {
    let morning = appointment(at(9, 0), at(9, 30), AppointmentStatus::Scheduled);
    let midday = appointment(at(12, 0), at(12, 30), AppointmentStatus::Scheduled);
    let afternoon = appointment(at(15, 0), at(15, 30), AppointmentStatus::Scheduled);
    let existing = vec![morning, midday.clone(), afternoon];

    let conflicts = find_conflicts(at(11, 45), at(12, 15), None, &existing);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].id, midday.id);
}
