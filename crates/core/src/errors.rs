use thiserror::Error;

#[derive(Error, Debug)]
pub enum KickoffError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl KickoffError {
    pub fn not_found(kind: &str, id: i64) -> Self {
        KickoffError::NotFound(format!("{} with ID {} not found", kind, id))
    }
}

pub type KickoffResult<T> = Result<T, KickoffError>;
