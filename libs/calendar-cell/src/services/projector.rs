// libs/calendar-cell/src/services/projector.rs
//
// Read-only projections from an appointment snapshot to the per-cell /
// per-slot groupings the calendar views render. Nothing here mutates the
// store; the drag commit goes back through the booking service.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use scheduling_cell::models::{Appointment, Slot};
use scheduling_cell::services::interval::{generate_slots, month_grid, overlaps};

use crate::models::{
    AgendaDay, AgendaView, AppointmentLayout, CalendarError, DayColumn, MonthCell,
    RelocationDelta, SlotGroup, DAY_VIEW_STEP_MINUTES, GRID_END_HOUR, GRID_START_HOUR,
    MONTH_CELL_VISIBLE_CAP, WEEK_VIEW_STEP_MINUTES,
};

/// Month view: appointments grouped per cell over the fixed 42-cell grid,
/// capped for display with the overflow count.
pub fn project_month(month_date: NaiveDate, appointments: &[Appointment]) -> Vec<MonthCell> {
    month_grid(month_date)
        .into_iter()
        .map(|date| {
            let mut on_day: Vec<Appointment> = appointments
                .iter()
                .filter(|appointment| appointment.start.date() == date)
                .cloned()
                .collect();
            on_day.sort_by_key(|appointment| appointment.start);

            let overflow = on_day.len().saturating_sub(MONTH_CELL_VISIBLE_CAP);
            on_day.truncate(MONTH_CELL_VISIBLE_CAP);

            MonthCell {
                date,
                visible: on_day,
                overflow,
            }
        })
        .collect()
}

/// Week view: seven day columns of 30-minute slots, starting on the Sunday
/// on/before `week_date`.
pub fn project_week(week_date: NaiveDate, appointments: &[Appointment]) -> Vec<DayColumn> {
    let lead_days = week_date.weekday().num_days_from_sunday() as i64;
    let week_start = week_date - Duration::days(lead_days);

    (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            DayColumn {
                date,
                slots: slot_groups(date, WEEK_VIEW_STEP_MINUTES, appointments),
            }
        })
        .collect()
}

/// Day view: a single column of 15-minute slots.
pub fn project_day(date: NaiveDate, appointments: &[Appointment]) -> DayColumn {
    DayColumn {
        date,
        slots: slot_groups(date, DAY_VIEW_STEP_MINUTES, appointments),
    }
}

/// Agenda view: past days (today excluded) most-recent-first, then today
/// and future days in chronological order, each day's appointments sorted
/// by start time.
pub fn project_agenda(today: NaiveDate, appointments: &[Appointment]) -> AgendaView {
    let mut sorted: Vec<Appointment> = appointments.to_vec();
    sorted.sort_by_key(|appointment| appointment.start);

    let mut past: Vec<AgendaDay> = Vec::new();
    let mut upcoming: Vec<AgendaDay> = Vec::new();

    for appointment in sorted {
        let date = appointment.start.date();
        let bucket = if date < today { &mut past } else { &mut upcoming };

        match bucket.last_mut() {
            Some(day) if day.date == date => day.appointments.push(appointment),
            _ => bucket.push(AgendaDay {
                date,
                appointments: vec![appointment],
            }),
        }
    }

    // Most recent history first
    past.reverse();

    AgendaView { past, upcoming }
}

/// Layout metrics for one appointment on the timed grid of its day:
/// offset and height are both linear in minutes.
pub fn layout_metrics(appointment: &Appointment) -> AppointmentLayout {
    let grid_start = appointment
        .start
        .date()
        .and_hms_opt(GRID_START_HOUR, 0, 0)
        .unwrap();

    AppointmentLayout {
        offset_minutes: (appointment.start - grid_start).num_minutes(),
        height_minutes: appointment.duration().num_minutes(),
    }
}

/// Stable drop-target id for a grid slot.
pub fn slot_id(slot: &Slot) -> String {
    format!("slot-{}", slot.start.format("%Y-%m-%dT%H:%M"))
}

/// Duration-preserving relocation for a drop: the slot id encodes the new
/// start, the end follows from the appointment's current duration. The
/// commit path re-runs the conflict check before anything moves.
pub fn relocation_delta(
    appointment: &Appointment,
    drop_slot_id: &str,
) -> Result<RelocationDelta, CalendarError> {
    let encoded = drop_slot_id
        .strip_prefix("slot-")
        .ok_or_else(|| CalendarError::InvalidSlotId(drop_slot_id.to_string()))?;

    let new_start = NaiveDateTime::parse_from_str(encoded, "%Y-%m-%dT%H:%M")
        .map_err(|_| CalendarError::InvalidSlotId(drop_slot_id.to_string()))?;

    Ok(RelocationDelta {
        new_start,
        new_end: new_start + appointment.duration(),
    })
}

fn slot_groups(date: NaiveDate, step_minutes: u32, appointments: &[Appointment]) -> Vec<SlotGroup> {
    generate_slots(date, GRID_START_HOUR, GRID_END_HOUR, step_minutes)
        .into_iter()
        .map(|slot| {
            let mut in_slot: Vec<Appointment> = appointments
                .iter()
                .filter(|appointment| {
                    overlaps(slot.start, slot.end, appointment.start, appointment.end)
                })
                .cloned()
                .collect();
            in_slot.sort_by_key(|appointment| appointment.start);

            SlotGroup {
                slot,
                appointments: in_slot,
            }
        })
        .collect()
}
