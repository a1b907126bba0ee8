// libs/scheduling-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, ParticipantRole, SchedulingError};
use crate::services::interval::overlaps;
use crate::store::AppointmentRepository;

/// The overlapping subset of `existing` that blocks a candidate window.
///
/// Skips the candidate's own record when updating (self-exclusion) and
/// anything no longer `Scheduled` — completed, cancelled and no-show
/// appointments never block.
pub fn find_conflicts<'a>(
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_id: Option<Uuid>,
    existing: &'a [Appointment],
) -> Vec<&'a Appointment> {
    existing
        .iter()
        .filter(|appointment| Some(appointment.id) != exclude_id)
        .filter(|appointment| appointment.status == AppointmentStatus::Scheduled)
        .filter(|appointment| overlaps(start, end, appointment.start, appointment.end))
        .collect()
}

pub struct ConflictDetectionService {
    repository: Arc<dyn AppointmentRepository>,
}

impl ConflictDetectionService {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    /// Check one side of a candidate booking: the appointments of a single
    /// participant that overlap the window.
    pub async fn check_participant_conflicts(
        &self,
        role: ParticipantRole,
        participant_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        debug!(
            "Checking {} conflicts for {} from {} to {}",
            role, participant_id, start, end
        );

        let existing = self.repository.list(role, participant_id).await;
        let conflicts = find_conflicts(start, end, exclude_appointment_id, &existing)
            .into_iter()
            .cloned()
            .collect();

        Ok(conflicts)
    }

    /// Check both sides of a candidate booking. The source application only
    /// checked the acting user's side; a booking must be clean for the
    /// doctor AND the patient, so both are always consulted here.
    pub async fn check_conflicts(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut conflicts = self
            .check_participant_conflicts(
                ParticipantRole::Doctor,
                doctor_id,
                start,
                end,
                exclude_appointment_id,
            )
            .await?;

        let patient_side = self
            .check_participant_conflicts(
                ParticipantRole::Patient,
                patient_id,
                start,
                end,
                exclude_appointment_id,
            )
            .await?;

        // An appointment shared by both participants shows up once
        for appointment in patient_side {
            if !conflicts.iter().any(|existing| existing.id == appointment.id) {
                conflicts.push(appointment);
            }
        }

        if !conflicts.is_empty() {
            warn!(
                "Conflict detected for doctor {} / patient {}: {} overlapping appointment(s)",
                doctor_id,
                patient_id,
                conflicts.len()
            );
        }

        Ok(conflicts)
    }
}
