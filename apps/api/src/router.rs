use std::sync::Arc;

use axum::{routing::get, Router};

use availability_cell::handlers::AvailabilityState;
use availability_cell::router::availability_routes;
use availability_cell::store::InMemoryAvailabilityStore;
use calendar_cell::handlers::CalendarState;
use calendar_cell::router::calendar_routes;
use scheduling_cell::handlers::SchedulingState;
use scheduling_cell::notifications::TracingNotificationSink;
use scheduling_cell::router::appointment_routes;
use scheduling_cell::store::InMemoryAppointmentStore;
use shared_config::AppConfig;

pub fn create_router(
    config: Arc<AppConfig>,
    appointments: Arc<InMemoryAppointmentStore>,
    availability: Arc<InMemoryAvailabilityStore>,
    notifier: Arc<TracingNotificationSink>,
) -> Router {
    let scheduling_state = SchedulingState {
        config,
        repository: appointments.clone(),
        availability: availability.clone(),
        notifier,
    };
    let availability_state = AvailabilityState {
        store: availability,
    };
    let calendar_state = CalendarState {
        repository: appointments,
    };

    Router::new()
        .route("/", get(|| async { "Telecare scheduling API is running!" }))
        .nest("/appointments", appointment_routes(scheduling_state))
        .nest("/availability", availability_routes(availability_state))
        .nest("/calendar", calendar_routes(calendar_state))
}
