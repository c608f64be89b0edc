use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Backend rejected the credentials")]
    Unauthorized,

    #[error("Entity not found")]
    NotFound,

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Backend responded with HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RepositoryError::Transport(err.to_string())
        }
    }
}
