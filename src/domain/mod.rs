pub mod settings;
pub mod transaction;

pub use settings::SiteSettings;
pub use transaction::{Transaction, TransactionWithOrder};
