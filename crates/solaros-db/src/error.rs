use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Failed to update {table}: {message}")]
    UpdateFailed { table: String, message: String },

    #[error("Empty update for {0}")]
    EmptyUpdate(String),
}

pub type DbResult<T> = Result<T, DbError>;
