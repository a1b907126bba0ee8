use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::auth::User;
use shared_models::error::AppError;

// Middleware for identity propagation. The gateway terminates the session
// and forwards the verified identity in plain headers; requests without
// them never reach the scheduling core in production.
pub async fn identity_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Auth("Missing x-user-id header".to_string()))?;

    let role = request
        .headers()
        .get("x-user-role")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let user = User { id: user_id, role };

    // Add user to request extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
