//! Form definitions backing the marketplace routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod admin;
pub mod messages;
pub mod onboarding;
pub mod profile;
pub mod reviews;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid name")]
    InvalidName,

    #[error("invalid role")]
    InvalidRole,

    #[error("invalid subjects: {0}")]
    InvalidSubjects(String),

    #[error("invalid hourly rate")]
    InvalidHourlyRate,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid teacher id")]
    InvalidTeacherId,
}

/// Trims the input and maps blank values to `None`.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
