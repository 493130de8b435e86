//! Diesel models for marketplace profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::{
    NewProfile as DomainNewProfile, Profile as DomainProfile, UpdateProfile as DomainUpdateProfile,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::profiles)]
/// Diesel model for [`crate::domain::profile::Profile`].
pub struct Profile {
    pub id: i32,
    pub user_sub: String,
    pub role: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
/// Insertable form of [`Profile`].
pub struct NewProfile<'a> {
    pub user_sub: &'a str,
    pub role: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub avatar_url: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Profile`] record.
pub struct UpdateProfile<'a> {
    pub name: &'a str,
    pub avatar_url: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        DomainProfile::try_new(
            profile.id,
            profile.user_sub,
            &profile.role,
            profile.name,
            profile.email,
            profile.avatar_url,
            profile.created_at,
            profile.updated_at,
        )
    }
}

impl<'a> From<&'a DomainNewProfile> for NewProfile<'a> {
    fn from(profile: &'a DomainNewProfile) -> Self {
        Self {
            user_sub: profile.user_sub.as_str(),
            role: profile.role.as_str(),
            name: profile.name.as_str(),
            email: profile.email.as_str(),
            avatar_url: profile.avatar_url.as_deref(),
        }
    }
}

impl<'a> UpdateProfile<'a> {
    pub fn from_domain(update: &'a DomainUpdateProfile, now: NaiveDateTime) -> Self {
        Self {
            name: update.name.as_str(),
            avatar_url: update.avatar_url.as_deref(),
            updated_at: now,
        }
    }
}
