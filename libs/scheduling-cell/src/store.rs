// libs/scheduling-cell/src/store.rs
//
// Repository contract for appointments plus the in-memory implementation.
// The conflict check runs inside the store's write path, under the same
// lock as the mutation, so check-then-act is a single serializable step:
// two near-simultaneous bookings for one doctor cannot both pass.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentKind, AppointmentStatus, ParticipantRole, RecurrenceRule,
    SchedulingError,
};
use crate::services::conflict::find_conflicts;
use crate::services::lifecycle::AppointmentLifecycleService;

/// Input for a new appointment record. The store assigns the id and the
/// bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct NewAppointment {
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

/// Partial update. Moving the window (`start`/`end`) is only legal for a
/// `Scheduled` appointment and re-runs the conflict check atomically.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub location: Option<String>,
}

impl AppointmentPatch {
    pub fn moves_window(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Backend-agnostic persistence seam for appointments. A durable backend
/// binds this to its own schema as long as it preserves the write-time
/// invariants: `start < end`, and no two `Scheduled` appointments sharing
/// a participant may overlap.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments for one participant, ordered by start time.
    async fn list(&self, role: ParticipantRole, participant_id: Uuid) -> Vec<Appointment>;

    async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError>;

    /// Insert a new record with a fresh id. For a recurring series only the
    /// anchor is stored; occurrences are derived on read.
    async fn create(&self, data: NewAppointment) -> Result<Appointment, SchedulingError>;

    async fn update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, SchedulingError>;

    /// Lifecycle transition (cancel / complete / no-show). Cancellation is
    /// a status change, not a deletion — history is retained.
    async fn transition(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError>;

    /// Administrative hard delete. The cancel path never uses this.
    async fn remove(&self, id: Uuid) -> Result<(), SchedulingError>;
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Blocking overlaps for a candidate window against every appointment that
/// shares a participant with it. Both sides are always consulted.
fn blocking_conflicts(
    appointments: &HashMap<Uuid, Appointment>,
    doctor_id: Uuid,
    patient_id: Uuid,
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_id: Option<Uuid>,
) -> Vec<Appointment> {
    let shared_participant: Vec<Appointment> = appointments
        .values()
        .filter(|existing| existing.doctor_id == doctor_id || existing.patient_id == patient_id)
        .cloned()
        .collect();

    find_conflicts(start, end, exclude_id, &shared_participant)
        .into_iter()
        .cloned()
        .collect()
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentStore {
    async fn list(&self, role: ParticipantRole, participant_id: Uuid) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;

        let mut matching: Vec<Appointment> = appointments
            .values()
            .filter(|appointment| appointment.participant_id(role) == participant_id)
            .cloned()
            .collect();

        matching.sort_by_key(|appointment| appointment.start);
        matching
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.appointments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SchedulingError::NotFound)
    }

    async fn create(&self, data: NewAppointment) -> Result<Appointment, SchedulingError> {
        let mut appointments = self.appointments.write().await;

        let conflicts = blocking_conflicts(
            &appointments,
            data.doctor_id,
            data.patient_id,
            data.start,
            data.end,
            None,
        );
        if !conflicts.is_empty() {
            return Err(SchedulingError::Conflict { conflicts });
        }

        let now = Utc::now().naive_utc();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: data.patient_id,
            patient_name: data.patient_name,
            doctor_id: data.doctor_id,
            doctor_name: data.doctor_name,
            start: data.start,
            end: data.end,
            kind: data.kind,
            location: data.location,
            status: AppointmentStatus::Scheduled,
            notes: data.notes,
            recurrence: data.recurrence,
            created_at: now,
            updated_at: now,
        };

        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, SchedulingError> {
        let mut appointments = self.appointments.write().await;

        let current = appointments.get(&id).ok_or(SchedulingError::NotFound)?.clone();

        let new_start = patch.start.unwrap_or(current.start);
        let new_end = patch.end.unwrap_or(current.end);

        if patch.moves_window() {
            if current.status != AppointmentStatus::Scheduled {
                return Err(SchedulingError::InvalidStatusTransition {
                    from: current.status,
                });
            }
            if new_start >= new_end {
                return Err(SchedulingError::Validation(
                    "Appointment must start before it ends".to_string(),
                ));
            }

            let conflicts = blocking_conflicts(
                &appointments,
                current.doctor_id,
                current.patient_id,
                new_start,
                new_end,
                Some(id),
            );
            if !conflicts.is_empty() {
                return Err(SchedulingError::Conflict { conflicts });
            }
        }

        let updated = appointments.get_mut(&id).ok_or(SchedulingError::NotFound)?;
        updated.start = new_start;
        updated.end = new_end;
        if let Some(notes) = patch.notes {
            updated.notes = Some(notes);
        }
        if let Some(location) = patch.location {
            updated.location = Some(location);
        }
        updated.updated_at = Utc::now().naive_utc();

        Ok(updated.clone())
    }

    async fn transition(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError> {
        let mut appointments = self.appointments.write().await;

        let appointment = appointments.get_mut(&id).ok_or(SchedulingError::NotFound)?;

        AppointmentLifecycleService::new()
            .validate_status_transition(appointment.status, new_status)?;

        appointment.status = new_status;
        appointment.updated_at = Utc::now().naive_utc();

        Ok(appointment.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<(), SchedulingError> {
        self.appointments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SchedulingError::NotFound)
    }
}
