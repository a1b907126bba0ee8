// libs/availability-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AvailabilityError, BookabilityQuery, UpsertAvailabilityRequest};
use crate::services::availability::AvailabilityService;
use crate::store::AvailabilityRepository;

#[derive(Clone)]
pub struct AvailabilityState {
    pub store: Arc<dyn AvailabilityRepository>,
}

/// Fetch a doctor's availability profile
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<AvailabilityState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state.store.clone());

    let profile = service
        .get_profile(doctor_id)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "availability": profile
    })))
}

/// Create or replace a doctor's availability profile
#[axum::debug_handler]
pub async fn put_availability(
    State(state): State<AvailabilityState>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpsertAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    // Doctors manage their own schedule; admins can manage any
    let is_own_schedule = user.id == doctor_id.to_string();
    if !is_own_schedule && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to modify this doctor's availability".to_string(),
        ));
    }

    let service = AvailabilityService::new(state.store.clone());

    let profile = service
        .upsert_profile(doctor_id, request)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": profile
    })))
}

/// Check whether a window is bookable for a doctor
#[axum::debug_handler]
pub async fn check_bookability(
    State(state): State<AvailabilityState>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<BookabilityQuery>,
) -> Result<Json<Value>, AppError> {
    if query.start_time >= query.end_time {
        return Err(AppError::ValidationError(
            "start_time must be before end_time".to_string(),
        ));
    }

    let service = AvailabilityService::new(state.store.clone());

    let bookable = service
        .is_window_bookable(doctor_id, query.day, query.start_time, query.end_time)
        .await;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "day": query.day,
        "bookable": bookable
    })))
}

fn map_availability_error(error: AvailabilityError) -> AppError {
    match error {
        AvailabilityError::NotFound => {
            AppError::NotFound("Availability profile not found".to_string())
        }
        AvailabilityError::Validation(message) => AppError::ValidationError(message),
    }
}
