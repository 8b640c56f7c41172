//! Payment transaction domain entity.
//! Framework-agnostic representation of one payment attempt and its order.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One payment attempt, identified by its provider reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub reference: String,
    pub order_id: Uuid,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub currency: String,
    pub status: String,
    pub channel: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(reference: String, order_id: Uuid, amount: BigDecimal, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reference,
            order_id,
            amount,
            currency,
            status: "pending".to_string(),
            channel: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A transaction together with its eagerly loaded order.
///
/// The order is passed through as stored; `None` when the join found no row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionWithOrder {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[schema(value_type = Option<Object>)]
    pub order: Option<serde_json::Value>,
}
