use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("internal error: {0:#?}")]
    Internal(#[from] anyhow::Error),

    #[error("configuration error: {0:#?}")]
    Config(anyhow::Error),

    #[error("database error: {0:#?}")]
    Database(anyhow::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, Error>;
