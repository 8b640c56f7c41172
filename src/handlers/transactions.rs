use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorBody;
use crate::AppState;

pub const LIST_FAILED: &str = "Failed to fetch transactions";
pub const LOOKUP_FAILED: &str = "Failed to fetch transaction";
pub const NOT_FOUND: &str = "Transaction not found";

#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    responses(
        (status = 200, description = "All transactions with their order, newest first", body = [crate::domain::TransactionWithOrder]),
        (status = 401, description = "Missing or invalid admin API key"),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    security(("admin_key" = [])),
    tag = "Transactions"
)]
pub async fn list_transactions(State(state): State<AppState>) -> Response {
    match state.transactions.list_with_orders().await {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list transactions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(LIST_FAILED)),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/transactions/{reference}",
    params(("reference" = String, Path, description = "Provider transaction reference")),
    responses(
        (status = 200, description = "The matching transaction with its order", body = crate::domain::TransactionWithOrder),
        (status = 401, description = "Missing or invalid admin API key"),
        (status = 404, description = "No transaction has this reference", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    security(("admin_key" = [])),
    tag = "Transactions"
)]
pub async fn get_transaction_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Response {
    match state.transactions.find_by_reference(&reference).await {
        Ok(Some(transaction)) => (StatusCode::OK, Json(transaction)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(ErrorBody::new(NOT_FOUND))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, reference = %reference, "Failed to look up transaction");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(LOOKUP_FAILED)),
            )
                .into_response()
        }
    }
}
