// libs/availability-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::identity_middleware;

use crate::handlers::{self, AvailabilityState};

pub fn availability_routes(state: AvailabilityState) -> Router {
    let protected_routes = Router::new()
        .route("/{doctor_id}", get(handlers::get_availability))
        .route("/{doctor_id}", put(handlers::put_availability))
        .route("/{doctor_id}/check", get(handlers::check_bookability))
        .layer(middleware::from_fn(identity_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
