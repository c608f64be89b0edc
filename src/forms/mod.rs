//! Form definitions backing the portal routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod assignments;
pub mod documents;
pub mod feedback;
pub mod work_logs;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid client id")]
    InvalidClientId,

    #[error("invalid month")]
    InvalidMonth,

    #[error("invalid document category")]
    InvalidCategory,

    #[error("invalid file name")]
    InvalidFileName,

    #[error("note must not be empty")]
    InvalidNote,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid time, expected HH:MM")]
    InvalidTime,

    #[error("description must not be empty")]
    InvalidDescription,

    #[error("invalid id")]
    InvalidId,
}
