// libs/calendar-cell/src/models.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use scheduling_cell::models::{Appointment, Slot};

// ==============================================================================
// VIEW CONTRACT CONSTANTS
// ==============================================================================

/// Appointments shown per month cell before the "+N more" overflow.
pub const MONTH_CELL_VISIBLE_CAP: usize = 3;

/// Slot width for the week view grid.
pub const WEEK_VIEW_STEP_MINUTES: u32 = 30;

/// Slot width for the day view grid.
pub const DAY_VIEW_STEP_MINUTES: u32 = 15;

/// First hour rendered on the week/day grids.
pub const GRID_START_HOUR: u32 = 8;

/// Hour the week/day grids end on (exclusive).
pub const GRID_END_HOUR: u32 = 20;

// ==============================================================================
// PROJECTION MODELS
// ==============================================================================

/// One cell of the month grid: the day's appointments capped for display,
/// with the overflow count for the "+N more" indicator.
#[derive(Debug, Clone, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub visible: Vec<Appointment>,
    pub overflow: usize,
}

/// One grid slot and the appointments overlapping it.
#[derive(Debug, Clone, Serialize)]
pub struct SlotGroup {
    pub slot: Slot,
    pub appointments: Vec<Appointment>,
}

/// One day column of the week view.
#[derive(Debug, Clone, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub slots: Vec<SlotGroup>,
}

/// Linear layout metrics for rendering an appointment on a timed grid:
/// offset is minutes since the grid start, height is the duration in
/// minutes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AppointmentLayout {
    pub offset_minutes: i64,
    pub height_minutes: i64,
}

/// Appointments of one agenda day, chronological.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub appointments: Vec<Appointment>,
}

/// Agenda partition: past days (today excluded) most-recent-first,
/// today-and-future days chronological.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaView {
    pub past: Vec<AgendaDay>,
    pub upcoming: Vec<AgendaDay>,
}

/// Duration-preserving move computed from a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelocationDelta {
    pub new_start: NaiveDateTime,
    pub new_end: NaiveDateTime,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid drop target slot id: {0}")]
    InvalidSlotId(String),
}
