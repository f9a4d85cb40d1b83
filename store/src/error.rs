use thiserror::Error;

/// The code the database reports for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Conflict ({code}): {message}")]
    Conflict { code: String, message: String },

    #[error("Not found")]
    NotFound,

    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    #[error("Store error ({}): {message}", .code.as_deref().unwrap_or("unknown"))]
    Failure {
        code: Option<String>,
        message: String,
    },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Db(diesel::result::Error),

    #[error("Database pool error: {0}")]
    DbPool(#[from] deadpool_diesel::PoolError),

    #[error("Unsupported store backend {0}")]
    UnsupportedBackend(String),
}

impl Error {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// The store's own error code, when it sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Conflict { code, .. } => Some(code.as_str()),
            Error::Failure { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};
        match e {
            DieselError::NotFound => Error::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Error::Conflict {
                    code: UNIQUE_VIOLATION.to_string(),
                    message: info.message().to_string(),
                }
            }
            e => Error::Db(e),
        }
    }
}
