use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The auth provider rejected the request. The message is the provider's own and is
    /// suitable for showing to the user.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Auth request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid auth provider URL {0}")]
    InvalidUrl(String),

    #[error("Session has no refresh token")]
    MissingRefreshToken,

    #[error("Reading session file: {0}")]
    SessionFile(#[from] std::io::Error),

    #[error("Invalid session file: {0}")]
    SessionFormat(#[from] serde_json::Error),
}

impl Error {
    /// The message to show for a failed sign-in.
    pub fn user_message(&self) -> String {
        match self {
            Error::Provider { message, .. } => message.clone(),
            _ => "Ein Fehler ist aufgetreten".to_string(),
        }
    }
}
