pub mod error;
pub mod pool;
pub mod records;
pub mod store;

// Re-export commonly used types
pub use error::{DbError, DbResult};
pub use pool::{create_pool, run_migrations};
pub use records::{FieldUpdate, FieldValue, RecordFilter, Table};
pub use store::{DataStore, Dialect, SqlDataStore};
