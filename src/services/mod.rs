//! Business logic shared by the HTML routes and the JSON API.

use thiserror::Error;

use crate::domain::profile::Profile;
use crate::domain::types::{Role, TypeConstraintError};
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod admin;
pub mod favourites;
pub mod listings;
pub mod messages;
pub mod onboarding;
pub mod reviews;
pub mod teachers;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("invalid value: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the profile has one of `allowed`.
pub fn ensure_role(profile: &Profile, allowed: &[Role]) -> ServiceResult<()> {
    if allowed.contains(&profile.role) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
