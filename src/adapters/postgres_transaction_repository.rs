//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionWithOrder};
use crate::ports::{RepositoryResult, TransactionRepository};

const SELECT_WITH_ORDER: &str = r#"
    SELECT t.id, t.reference, t.order_id, t.amount, t.currency, t.status, t.channel,
           t.created_at, t.updated_at,
           CASE WHEN o.id IS NULL THEN NULL ELSE to_jsonb(o) END AS order_json
    FROM transactions t
    LEFT JOIN orders o ON o.id = t.order_id
"#;

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn list_with_orders(&self) -> RepositoryResult<Vec<TransactionWithOrder>> {
        // reference breaks ties between identical timestamps
        let sql = format!("{SELECT_WITH_ORDER} ORDER BY t.created_at DESC, t.reference ASC");
        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TransactionRow::into_domain).collect())
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<TransactionWithOrder>> {
        let sql = format!("{SELECT_WITH_ORDER} WHERE t.reference = $1 LIMIT 1");
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TransactionRow::into_domain))
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    reference: String,
    order_id: Uuid,
    amount: bigdecimal::BigDecimal,
    currency: String,
    status: String,
    channel: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    order_json: Option<serde_json::Value>,
}

impl TransactionRow {
    fn into_domain(self) -> TransactionWithOrder {
        TransactionWithOrder {
            transaction: Transaction {
                id: self.id,
                reference: self.reference,
                order_id: self.order_id,
                amount: self.amount,
                currency: self.currency,
                status: self.status,
                channel: self.channel,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            order: self.order_json,
        }
    }
}
