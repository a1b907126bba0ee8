// libs/calendar-cell/src/router.rs
use axum::{middleware, routing::get, Router};

use shared_utils::extractor::identity_middleware;

use crate::handlers::{self, CalendarState};

pub fn calendar_routes(state: CalendarState) -> Router {
    let protected_routes = Router::new()
        .route("/month", get(handlers::get_month_view))
        .route("/week", get(handlers::get_week_view))
        .route("/day", get(handlers::get_day_view))
        .route("/agenda", get(handlers::get_agenda_view))
        .layer(middleware::from_fn(identity_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
