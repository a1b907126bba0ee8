// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use availability_cell::store::AvailabilityRepository;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, ParticipantRole, RelocateAppointmentRequest,
    RescheduleAppointmentRequest, SchedulingError,
};
use crate::notifications::NotificationSink;
use crate::services::booking::AppointmentBookingService;
use crate::services::conflict::ConflictDetectionService;
use crate::store::{AppointmentPatch, AppointmentRepository};

#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn AppointmentRepository>,
    pub availability: Arc<dyn AvailabilityRepository>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl SchedulingState {
    fn booking_service(&self) -> AppointmentBookingService {
        AppointmentBookingService::new(
            self.repository.clone(),
            self.availability.clone(),
            self.notifier.clone(),
        )
        .with_preview_cap(self.config.recurrence_preview_cap)
    }
}

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ParticipantQuery {
    pub role: ParticipantRole,
    pub participant_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ConflictCheckQuery {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub exclude_appointment_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentBody {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub location: Option<String>,
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

/// Book a new appointment (non-recurring, or the anchor of a series)
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    // Patients book their own appointments; doctors and admins book on
    // behalf of patients
    let is_patient = request.patient_id.to_string() == user.id;
    if !is_patient && !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Auth(
            "Not authorized to book appointment for this patient".to_string(),
        ));
    }

    let appointment = state
        .booking_service()
        .book_appointment(request)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// List a participant's appointments
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Query(query): Query<ParticipantQuery>,
) -> Result<Json<Value>, AppError> {
    authorize_participant_access(&user, query.participant_id)?;

    let appointments = state
        .booking_service()
        .list_appointments(query.role, query.participant_id)
        .await;
    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}

/// List a participant's upcoming appointments, chronological
#[axum::debug_handler]
pub async fn get_upcoming_appointments(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Query(query): Query<ParticipantQuery>,
) -> Result<Json<Value>, AppError> {
    authorize_participant_access(&user, query.participant_id)?;

    let appointments = state
        .booking_service()
        .upcoming_appointments(query.role, query.participant_id, Utc::now().naive_utc())
        .await;
    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}

/// Fetch one appointment
#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .booking_service()
        .get_appointment(appointment_id)
        .await
        .map_err(map_scheduling_error)?;

    let is_participant = appointment.patient_id.to_string() == user.id
        || appointment.doctor_id.to_string() == user.id;
    if !is_participant && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to view this appointment".to_string(),
        ));
    }

    Ok(Json(json!({ "appointment": appointment })))
}

/// Patch notes/location or move the window
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(body): Json<UpdateAppointmentBody>,
) -> Result<Json<Value>, AppError> {
    authorize_appointment_access(&state, &user, appointment_id).await?;

    let appointment = state
        .booking_service()
        .update_appointment(
            appointment_id,
            AppointmentPatch {
                start: body.start,
                end: body.end,
                notes: body.notes,
                location: body.location,
            },
        )
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Reschedule an appointment to a new window
#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    authorize_appointment_access(&state, &user, appointment_id).await?;

    let appointment = state
        .booking_service()
        .reschedule_appointment(appointment_id, request)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Drag-and-drop commit: duration-preserving move to the dropped slot
#[axum::debug_handler]
pub async fn relocate_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RelocateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    authorize_appointment_access(&state, &user, appointment_id).await?;

    let appointment = state
        .booking_service()
        .relocate_appointment(appointment_id, request.new_start)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Cancel an appointment (status transition, history retained)
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    authorize_appointment_access(&state, &user, appointment_id).await?;

    let appointment = state
        .booking_service()
        .cancel_appointment(appointment_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Mark an appointment completed
#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth(
            "Only doctors or admins can complete appointments".to_string(),
        ));
    }

    let appointment = state
        .booking_service()
        .complete_appointment(appointment_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Mark an appointment as a no-show
#[axum::debug_handler]
pub async fn mark_no_show(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Auth(
            "Only doctors or admins can record no-shows".to_string(),
        ));
    }

    let appointment = state
        .booking_service()
        .mark_no_show(appointment_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Expand a recurring anchor's future occurrence windows
#[axum::debug_handler]
pub async fn get_occurrences(
    State(state): State<SchedulingState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    authorize_appointment_access(&state, &user, appointment_id).await?;

    let occurrences = state
        .booking_service()
        .preview_occurrences(appointment_id)
        .await
        .map_err(map_scheduling_error)?;
    let count = occurrences.len();

    Ok(Json(json!({
        "occurrences": occurrences,
        "count": count
    })))
}

/// Dry-run conflict check for a candidate window
#[axum::debug_handler]
pub async fn check_appointment_conflicts(
    State(state): State<SchedulingState>,
    Query(query): Query<ConflictCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let conflict_service = ConflictDetectionService::new(state.repository.clone());

    let conflicts = conflict_service
        .check_conflicts(
            query.doctor_id,
            query.patient_id,
            query.start,
            query.end,
            query.exclude_appointment_id,
        )
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "has_conflict": !conflicts.is_empty(),
        "conflicting_appointments": conflicts
    })))
}

// ==============================================================================
// AUTHORIZATION AND ERROR MAPPING
// ==============================================================================

fn authorize_participant_access(user: &User, participant_id: Uuid) -> Result<(), AppError> {
    if participant_id.to_string() != user.id && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to view this participant's appointments".to_string(),
        ));
    }
    Ok(())
}

async fn authorize_appointment_access(
    state: &SchedulingState,
    user: &User,
    appointment_id: Uuid,
) -> Result<(), AppError> {
    let appointment = state
        .repository
        .get(appointment_id)
        .await
        .map_err(map_scheduling_error)?;

    let is_participant = appointment.patient_id.to_string() == user.id
        || appointment.doctor_id.to_string() == user.id;
    if !is_participant && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to modify this appointment".to_string(),
        ));
    }
    Ok(())
}

fn map_scheduling_error(error: SchedulingError) -> AppError {
    match error {
        SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        SchedulingError::Conflict { conflicts } => AppError::Conflict(format!(
            "Appointment conflicts with {} existing booking(s)",
            conflicts.len()
        )),
        SchedulingError::Validation(message) => AppError::ValidationError(message),
        SchedulingError::RecurrenceConfig(message) => AppError::ValidationError(message),
        SchedulingError::InvalidStatusTransition { from } => AppError::Conflict(format!(
            "Appointment cannot be modified in current status: {}",
            from
        )),
        SchedulingError::DoctorUnavailable => {
            AppError::Conflict("Doctor not available in the requested window".to_string())
        }
    }
}
