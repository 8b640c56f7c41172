use axum::{
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Shared secret for admin-only routes.
#[derive(Clone)]
pub struct AdminKey(pub String);

/// Accepts `Authorization: Bearer <key>` or the bare key.
pub async fn admin_auth<B>(
    State(AdminKey(admin_api_key)): State<AdminKey>,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(auth) if is_authorized(auth, &admin_api_key) => next.run(req).await,
        Some(_) => {
            tracing::warn!(uri = %req.uri(), "Rejected admin request with invalid API key");
            AppError::Unauthorized("Invalid API key".to_string()).into_response()
        }
        None => AppError::Unauthorized("Missing API key".to_string()).into_response(),
    }
}

fn is_authorized(header_value: &str, admin_api_key: &str) -> bool {
    let presented = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();
    !admin_api_key.is_empty() && presented == admin_api_key
}
