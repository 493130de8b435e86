use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DisplayName, Email, ProfileId, Role, TypeConstraintError};

/// Marketplace account created during onboarding.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    /// Subject claim of the identity issued by the auth service.
    pub user_sub: String,
    pub role: Role,
    pub name: DisplayName,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Profile {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        user_sub: String,
        role: &str,
        name: String,
        email: String,
        avatar_url: Option<String>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: ProfileId::new(id)?,
            user_sub,
            role: role.parse()?,
            name: DisplayName::new(name)?,
            email: Email::new(email)?,
            avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
            created_at,
            updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewProfile {
    pub user_sub: String,
    pub role: Role,
    pub name: DisplayName,
    pub email: Email,
    pub avatar_url: Option<String>,
}

impl NewProfile {
    #[must_use]
    pub fn new(
        user_sub: impl Into<String>,
        role: Role,
        name: DisplayName,
        email: Email,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            user_sub: user_sub.into(),
            role,
            name,
            email,
            avatar_url: avatar_url
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateProfile {
    pub name: DisplayName,
    pub avatar_url: Option<String>,
}

impl UpdateProfile {
    #[must_use]
    pub fn new(name: DisplayName, avatar_url: Option<String>) -> Self {
        Self {
            name,
            avatar_url: avatar_url
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
