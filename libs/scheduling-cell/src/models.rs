// libs/scheduling-cell/src/models.rs
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// The central scheduling entity. Times are timezone-naive clinic-local by
/// contract; `[start, end)` is half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: AppointmentKind,
    pub location: Option<String>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub recurrence: Option<RecurrenceRule>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Appointment {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The participant id for one side of the appointment.
    pub fn participant_id(&self, role: ParticipantRole) -> Uuid {
        match role {
            ParticipantRole::Doctor => self.doctor_id,
            ParticipantRole::Patient => self.patient_id,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentKind {
    Video,
    Phone,
    InPerson,
}

impl fmt::Display for AppointmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentKind::Video => write!(f, "video"),
            AppointmentKind::Phone => write!(f, "phone"),
            AppointmentKind::InPerson => write!(f, "in_person"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Doctor,
    Patient,
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantRole::Doctor => write!(f, "doctor"),
            ParticipantRole::Patient => write!(f, "patient"),
        }
    }
}

// ==============================================================================
// RECURRENCE MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

/// Recurrence rule carried by the anchor appointment of a series. Exactly
/// one terminator is honored; `occurrences` takes precedence when both are
/// supplied, and a rule with neither is rejected before any write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    pub interval: u32,
    pub end_date: Option<NaiveDateTime>,
    pub occurrences: Option<u32>,
}

/// One concrete `[start, end)` window derived from a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A fixed-width grid window used for calendar rendering and drop-target
/// addressing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: AppointmentKind,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub recurrence: Option<RecurrenceRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_start: NaiveDateTime,
    pub new_duration_minutes: Option<i64>,
    pub reason: Option<String>,
}

/// Drag-and-drop commit: a duration-preserving move to the dropped slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocateAppointmentRequest {
    pub new_start: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub role: ParticipantRole,
    pub participant_id: Uuid,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment conflicts with {} existing booking(s)", conflicts.len())]
    Conflict { conflicts: Vec<Appointment> },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Recurrence configuration error: {0}")]
    RecurrenceConfig(String),

    #[error("Appointment cannot be modified in current status: {from}")]
    InvalidStatusTransition { from: AppointmentStatus },

    #[error("Doctor not available in the requested window")]
    DoctorUnavailable,
}
