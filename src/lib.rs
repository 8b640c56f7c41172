pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod ports;
pub mod settings;
pub mod validation;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AllowedOrigins;
use crate::handlers::{settings as settings_handlers, transactions};
use crate::middleware::auth::{admin_auth, AdminKey};
use crate::middleware::request_logger::request_logger_middleware;
use crate::ports::{SettingsRepository, TransactionRepository};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub transactions: Arc<dyn TransactionRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub admin_api_key: String,
}

pub fn create_app(state: AppState) -> Router {
    let admin_key = AdminKey(state.admin_api_key.clone());
    let auth = || from_fn_with_state(admin_key.clone(), admin_auth::<axum::body::Body>);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .route(
            "/api/admin/settings",
            get(settings_handlers::get_settings)
                .merge(put(settings_handlers::update_settings).route_layer(auth())),
        )
        .route(
            "/api/admin/transactions",
            get(transactions::list_transactions).route_layer(auth()),
        )
        .route(
            "/api/admin/transactions/:reference",
            get(transactions::get_transaction_by_reference).route_layer(auth()),
        )
        .layer(from_fn(request_logger_middleware))
        .with_state(state)
}

pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}
