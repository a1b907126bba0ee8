// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Datelike, NaiveDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use availability_cell::models::DayOfWeek;
use availability_cell::services::availability::is_bookable;
use availability_cell::store::AvailabilityRepository;

use crate::models::{
    Appointment, AppointmentKind, AppointmentStatus, BookAppointmentRequest, Occurrence,
    ParticipantRole, RescheduleAppointmentRequest, SchedulingError,
};
use crate::notifications::{Notification, NotificationKind, NotificationSink};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::recurrence;
use crate::store::{AppointmentPatch, AppointmentRepository, NewAppointment};

/// Default cap on lazily expanded occurrence previews.
pub const DEFAULT_PREVIEW_CAP: usize = 52;

/// Every appointment mutation routes through this service: validation,
/// the availability gate, the symmetric conflict gate (inside the store's
/// write transaction) and the post-commit notification.
pub struct AppointmentBookingService {
    repository: Arc<dyn AppointmentRepository>,
    availability: Arc<dyn AvailabilityRepository>,
    notifier: Arc<dyn NotificationSink>,
    lifecycle_service: AppointmentLifecycleService,
    preview_cap: usize,
}

impl AppointmentBookingService {
    pub fn new(
        repository: Arc<dyn AppointmentRepository>,
        availability: Arc<dyn AvailabilityRepository>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            repository,
            availability,
            notifier,
            lifecycle_service: AppointmentLifecycleService::new(),
            preview_cap: DEFAULT_PREVIEW_CAP,
        }
    }

    pub fn with_preview_cap(mut self, preview_cap: usize) -> Self {
        self.preview_cap = preview_cap;
        self
    }

    /// Book a new appointment (non-recurring, or the anchor of a series).
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking appointment for patient {} with doctor {} at {}",
            request.patient_id, request.doctor_id, request.start
        );

        // **Step 1: Validation** - nothing is written on failure
        self.validate_booking_request(&request)?;

        // **Step 2: Availability Gate** - the requested window must be
        // bookable under the doctor's registered profile, if any
        self.ensure_doctor_available(request.doctor_id, request.start, request.end)
            .await?;

        // **Step 3: Conflict-Checked Write** - the store runs the
        // doctor-side and patient-side overlap checks inside its write
        // transaction and commits only when both are clean
        let appointment = self
            .repository
            .create(NewAppointment {
                patient_id: request.patient_id,
                patient_name: request.patient_name,
                doctor_id: request.doctor_id,
                doctor_name: request.doctor_name,
                start: request.start,
                end: request.end,
                kind: request.kind,
                location: request.location,
                notes: request.notes,
                recurrence: request.recurrence,
            })
            .await?;

        // **Step 4: Notify** - best-effort, never blocks the booking
        self.notifier
            .notify(Notification {
                title: "Appointment booked".to_string(),
                message: format!(
                    "{} sees {} on {}",
                    appointment.patient_name, appointment.doctor_name, appointment.start
                ),
                kind: NotificationKind::Booked,
                link: Some(format!("/appointments/{}", appointment.id)),
            })
            .await;

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.repository.get(id).await
    }

    /// All appointments for one participant, ordered by start time.
    pub async fn list_appointments(
        &self,
        role: ParticipantRole,
        participant_id: Uuid,
    ) -> Vec<Appointment> {
        self.repository.list(role, participant_id).await
    }

    /// Future `Scheduled` appointments for one participant, chronological.
    pub async fn upcoming_appointments(
        &self,
        role: ParticipantRole,
        participant_id: Uuid,
        now: NaiveDateTime,
    ) -> Vec<Appointment> {
        self.repository
            .list(role, participant_id)
            .await
            .into_iter()
            .filter(|appointment| appointment.status == AppointmentStatus::Scheduled)
            .filter(|appointment| appointment.start >= now)
            .collect()
    }

    /// Patch notes/location, or move the window (conflict re-checked).
    pub async fn update_appointment(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, SchedulingError> {
        if patch.moves_window() {
            let current = self.repository.get(id).await?;
            let new_start = patch.start.unwrap_or(current.start);
            let new_end = patch.end.unwrap_or(current.end);
            self.ensure_doctor_available(current.doctor_id, new_start, new_end)
                .await?;
        }

        self.repository.update(id, patch).await
    }

    /// Move an appointment to a new window. Preserves the current duration
    /// unless an explicit one is supplied; re-checks conflicts with the
    /// moved appointment itself excluded.
    pub async fn reschedule_appointment(
        &self,
        id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let current = self.repository.get(id).await?;

        if !self.lifecycle_service.can_reschedule(current.status) {
            warn!(
                "Rejecting reschedule of appointment {} in status {}",
                id, current.status
            );
            return Err(SchedulingError::InvalidStatusTransition {
                from: current.status,
            });
        }

        let duration = match request.new_duration_minutes {
            Some(minutes) if minutes <= 0 => {
                return Err(SchedulingError::Validation(
                    "Appointment duration must be positive".to_string(),
                ))
            }
            Some(minutes) => ChronoDuration::minutes(minutes),
            None => current.duration(),
        };
        let new_end = request.new_start + duration;

        self.ensure_doctor_available(current.doctor_id, request.new_start, new_end)
            .await?;

        let updated = self
            .repository
            .update(
                id,
                AppointmentPatch {
                    start: Some(request.new_start),
                    end: Some(new_end),
                    ..AppointmentPatch::default()
                },
            )
            .await?;

        self.notifier
            .notify(Notification {
                title: "Appointment rescheduled".to_string(),
                message: format!(
                    "{} with {} moved to {}",
                    updated.patient_name, updated.doctor_name, updated.start
                ),
                kind: NotificationKind::Rescheduled,
                link: Some(format!("/appointments/{}", updated.id)),
            })
            .await;

        Ok(updated)
    }

    /// The drag-and-drop commit path: one atomic duration-preserving move
    /// to the dropped slot's timestamp.
    pub async fn relocate_appointment(
        &self,
        id: Uuid,
        new_start: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Relocating appointment {} to {}", id, new_start);

        self.reschedule_appointment(
            id,
            RescheduleAppointmentRequest {
                new_start,
                new_duration_minutes: None,
                reason: None,
            },
        )
        .await
    }

    /// Cancel: a status transition, not a deletion. Cancelling an already
    /// terminal appointment is rejected.
    pub async fn cancel_appointment(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        let cancelled = self
            .repository
            .transition(id, AppointmentStatus::Cancelled)
            .await?;

        self.notifier
            .notify(Notification {
                title: "Appointment cancelled".to_string(),
                message: format!(
                    "{} with {} on {} was cancelled",
                    cancelled.patient_name, cancelled.doctor_name, cancelled.start
                ),
                kind: NotificationKind::Cancelled,
                link: None,
            })
            .await;

        Ok(cancelled)
    }

    pub async fn complete_appointment(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.repository
            .transition(id, AppointmentStatus::Completed)
            .await
    }

    pub async fn mark_no_show(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.repository
            .transition(id, AppointmentStatus::NoShow)
            .await
    }

    /// Expand a recurring anchor's future windows. Occurrences are derived,
    /// never persisted, so the preview is capped rather than materialized.
    pub async fn preview_occurrences(&self, id: Uuid) -> Result<Vec<Occurrence>, SchedulingError> {
        let appointment = self.repository.get(id).await?;

        let rule = appointment.recurrence.as_ref().ok_or_else(|| {
            SchedulingError::Validation("Appointment is not recurring".to_string())
        })?;

        let expansion = recurrence::expand(appointment.start, appointment.end, rule)?;
        Ok(expansion.take(self.preview_cap).collect())
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    fn validate_booking_request(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<(), SchedulingError> {
        if request.start >= request.end {
            return Err(SchedulingError::Validation(
                "Appointment must start before it ends".to_string(),
            ));
        }

        if request.patient_name.trim().is_empty() || request.doctor_name.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "Participant display names are required".to_string(),
            ));
        }

        if request.kind == AppointmentKind::InPerson {
            let has_location = request
                .location
                .as_deref()
                .map(|location| !location.trim().is_empty())
                .unwrap_or(false);
            if !has_location {
                return Err(SchedulingError::Validation(
                    "In-person appointments require a location".to_string(),
                ));
            }
        }

        if let Some(rule) = &request.recurrence {
            recurrence::validate_rule(rule, request.end)?;
        }

        Ok(())
    }

    /// The availability gate. A doctor with no registered profile is open
    /// at any time; the profile's windows are same-day, so only same-day
    /// appointments are resolved against it.
    async fn ensure_doctor_available(
        &self,
        doctor_id: Uuid,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), SchedulingError> {
        if start.date() != end.date() {
            return Ok(());
        }

        if let Some(profile) = self.availability.find(doctor_id).await {
            let day = DayOfWeek::from_weekday(start.weekday());
            if !is_bookable(&profile, day, start.time(), end.time()) {
                warn!(
                    "Doctor {} not bookable on {} from {} to {}",
                    doctor_id,
                    day,
                    start.time(),
                    end.time()
                );
                return Err(SchedulingError::DoctorUnavailable);
            }
        }

        Ok(())
    }
}
