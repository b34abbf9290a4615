use shared::error::{ApiError, FieldErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("server url cannot carry a path: {0}")]
    CannotBeABase(url::Url),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {}", .error.message)]
    Rejected { status: u16, error: ApiError },
    #[error("unexpected response status {0}")]
    UnexpectedStatus(u16),
}

impl ClientError {
    /// Field errors reported by server-side validation, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Rejected { error, .. } if !error.fields.is_empty() => Some(&error.fields),
            _ => None,
        }
    }
}
