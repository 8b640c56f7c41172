use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::SiteSettings;
use crate::error::{AppError, ErrorBody};
use crate::AppState;

pub const FETCH_FAILED: &str = "Failed to fetch settings";

/// Serves the stored record, or the default one until an admin saves.
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Current site settings", body = SiteSettings),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> Response {
    match state.settings.current().await {
        Ok(settings) => (StatusCode::OK, Json(settings.unwrap_or_default())).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load site settings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(FETCH_FAILED)),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = SiteSettings,
    responses(
        (status = 200, description = "Settings saved", body = SiteSettings),
        (status = 400, description = "Settings failed validation"),
        (status = 401, description = "Missing or invalid admin API key"),
        (status = 500, description = "Storage failure")
    ),
    security(("admin_key" = [])),
    tag = "Settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<SiteSettings>,
) -> Result<Json<SiteSettings>, AppError> {
    settings.validate()?;
    let saved = state.settings.save(&settings).await?;
    Ok(Json(saved))
}
