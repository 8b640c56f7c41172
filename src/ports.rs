//! Storage ports consumed by the HTTP handlers and the CLI.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SiteSettings, TransactionWithOrder};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored record is malformed: {0}")]
    Malformed(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Every transaction with its order, newest first.
    async fn list_with_orders(&self) -> RepositoryResult<Vec<TransactionWithOrder>>;

    /// Exact match on `reference`, with its order.
    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<TransactionWithOrder>>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The current record, if one has ever been saved.
    async fn current(&self) -> RepositoryResult<Option<SiteSettings>>;

    /// Overwrites the current record.
    async fn save(&self, settings: &SiteSettings) -> RepositoryResult<SiteSettings>;
}
