use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid data for event {event}: {reason}")]
    InvalidEventData { event: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
