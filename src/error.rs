use thiserror::Error;

/// Errors raised by the user-domain repositories.
///
/// Missing rows are not errors: lookups return `None`, an empty `Vec`
/// or `false` instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Query or connection failure, carrying the driver's message.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
