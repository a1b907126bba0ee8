// libs/scheduling-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_utils::extractor::identity_middleware;

use crate::handlers::{self, SchedulingState};

pub fn appointment_routes(state: SchedulingState) -> Router {
    // All appointment operations require an authenticated identity
    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/upcoming", get(handlers::get_upcoming_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", patch(handlers::update_appointment))
        .route(
            "/{appointment_id}/reschedule",
            post(handlers::reschedule_appointment),
        )
        .route(
            "/{appointment_id}/relocate",
            post(handlers::relocate_appointment),
        )
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route(
            "/{appointment_id}/complete",
            post(handlers::complete_appointment),
        )
        .route("/{appointment_id}/no-show", post(handlers::mark_no_show))
        .route(
            "/{appointment_id}/occurrences",
            get(handlers::get_occurrences),
        )
        // Utility endpoints
        .route("/conflicts/check", get(handlers::check_appointment_conflicts))
        .layer(middleware::from_fn(identity_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
