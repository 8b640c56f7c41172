use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{SiteSettings, Transaction, TransactionWithOrder};
use crate::error::ErrorBody;
use crate::handlers::HealthStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health,
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,
        crate::handlers::transactions::list_transactions,
        crate::handlers::transactions::get_transaction_by_reference,
    ),
    components(schemas(
        SiteSettings,
        Transaction,
        TransactionWithOrder,
        ErrorBody,
        HealthStatus
    )),
    modifiers(&AdminKeyScheme),
    tags(
        (name = "Health", description = "Liveness and database connectivity"),
        (name = "Settings", description = "Editable site metadata"),
        (name = "Transactions", description = "Payment transactions and their orders")
    )
)]
pub struct ApiDoc;

struct AdminKeyScheme;

impl Modify for AdminKeyScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
