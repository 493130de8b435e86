//! Teacher profile editing.

use serde::Deserialize;
use validator::Validate;

use crate::domain::profile::UpdateProfile;
use crate::domain::teacher::{UpdateTeacher, parse_subjects};
use crate::domain::types::DisplayName;
use crate::forms::{FormError, optional_text};

/// Highest accepted hourly rate.
pub const MAX_HOURLY_RATE: i32 = 100_000;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TeacherProfileForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub headline: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: String,
    /// Empty input clears the rate.
    #[serde(default)]
    pub hourly_rate: String,
    /// Comma separated subject tags.
    #[serde(default)]
    pub subjects: String,
    /// Absolute URL or a storage object path.
    #[serde(default)]
    pub avatar_url: String,
}

pub struct TeacherProfilePayload {
    pub profile: UpdateProfile,
    pub teacher: UpdateTeacher,
}

fn parse_hourly_rate(raw: &str) -> Result<Option<i32>, FormError> {
    let Some(raw) = optional_text(raw) else {
        return Ok(None);
    };
    let rate = raw.parse::<i32>().map_err(|_| FormError::InvalidHourlyRate)?;
    if !(0..=MAX_HOURLY_RATE).contains(&rate) {
        return Err(FormError::InvalidHourlyRate);
    }
    Ok(Some(rate))
}

fn parse_avatar(raw: &str) -> Result<Option<String>, FormError> {
    let Some(url) = optional_text(raw) else {
        return Ok(None);
    };
    if url.chars().any(char::is_whitespace) || url.contains(['<', '>', '"']) {
        return Err(FormError::InvalidUrl);
    }
    Ok(Some(url))
}

impl TryFrom<TeacherProfileForm> for TeacherProfilePayload {
    type Error = FormError;

    fn try_from(form: TeacherProfileForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = DisplayName::new(&form.name).map_err(|_| FormError::InvalidName)?;
        let subjects =
            parse_subjects(&form.subjects).map_err(|e| FormError::InvalidSubjects(e.to_string()))?;

        Ok(Self {
            profile: UpdateProfile::new(name, parse_avatar(&form.avatar_url)?),
            teacher: UpdateTeacher {
                headline: ammonia::clean(form.headline.trim()),
                bio: ammonia::clean(form.bio.trim()),
                location: ammonia::clean(form.location.trim()),
                hourly_rate: parse_hourly_rate(&form.hourly_rate)?,
                subjects,
            },
        })
    }
}
