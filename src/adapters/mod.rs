pub mod postgres_settings_repository;
pub mod postgres_transaction_repository;

pub use postgres_settings_repository::PostgresSettingsRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;
