// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use scheduling_cell::models::ParticipantRole;
use scheduling_cell::store::AppointmentRepository;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::services::projector;

#[derive(Clone)]
pub struct CalendarState {
    pub repository: Arc<dyn AppointmentRepository>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub date: NaiveDate,
    pub role: ParticipantRole,
    pub participant_id: Uuid,
}

/// Month view projection for one participant
#[axum::debug_handler]
pub async fn get_month_view(
    State(state): State<CalendarState>,
    Extension(user): Extension<User>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    authorize_participant_access(&user, query.participant_id)?;

    let appointments = state
        .repository
        .list(query.role, query.participant_id)
        .await;
    let cells = projector::project_month(query.date, &appointments);

    Ok(Json(json!({ "cells": cells })))
}

/// Week view projection for one participant
#[axum::debug_handler]
pub async fn get_week_view(
    State(state): State<CalendarState>,
    Extension(user): Extension<User>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    authorize_participant_access(&user, query.participant_id)?;

    let appointments = state
        .repository
        .list(query.role, query.participant_id)
        .await;
    let days = projector::project_week(query.date, &appointments);

    Ok(Json(json!({ "days": days })))
}

/// Day view projection for one participant
#[axum::debug_handler]
pub async fn get_day_view(
    State(state): State<CalendarState>,
    Extension(user): Extension<User>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    authorize_participant_access(&user, query.participant_id)?;

    let appointments = state
        .repository
        .list(query.role, query.participant_id)
        .await;
    let day = projector::project_day(query.date, &appointments);

    Ok(Json(json!({ "day": day })))
}

/// Agenda projection: past vs today-and-future, grouped by day
#[axum::debug_handler]
pub async fn get_agenda_view(
    State(state): State<CalendarState>,
    Extension(user): Extension<User>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    authorize_participant_access(&user, query.participant_id)?;

    let appointments = state
        .repository
        .list(query.role, query.participant_id)
        .await;
    let agenda = projector::project_agenda(query.date, &appointments);

    Ok(Json(json!({ "agenda": agenda })))
}

fn authorize_participant_access(user: &User, participant_id: Uuid) -> Result<(), AppError> {
    if participant_id.to_string() != user.id && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to view this participant's calendar".to_string(),
        ));
    }
    Ok(())
}
