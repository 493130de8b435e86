//! Form submitted once after the first sign-in.

use serde::Deserialize;
use validator::Validate;

use crate::domain::profile::NewProfile;
use crate::domain::teacher::NewTeacher;
use crate::domain::types::{DisplayName, Email, Role};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct OnboardingForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub role: String,
    /// Only used when `role` is `teacher`.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub headline: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: String,
}

/// Validated onboarding data.
#[derive(Debug)]
pub struct OnboardingPayload {
    pub name: DisplayName,
    pub role: Role,
    pub headline: String,
    pub location: String,
}

impl TryFrom<OnboardingForm> for OnboardingPayload {
    type Error = FormError;

    fn try_from(form: OnboardingForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let role = form
            .role
            .parse::<Role>()
            .ok()
            .filter(|role| role.is_self_assignable())
            .ok_or(FormError::InvalidRole)?;
        let name = DisplayName::new(&form.name).map_err(|_| FormError::InvalidName)?;

        Ok(Self {
            name,
            role,
            headline: ammonia::clean(form.headline.trim()),
            location: ammonia::clean(form.location.trim()),
        })
    }
}

impl OnboardingPayload {
    /// Builds the profile row and, for teachers, the listing row.
    pub fn into_domain(self, user_sub: &str, email: Email) -> (NewProfile, Option<NewTeacher>) {
        let teacher =
            (self.role == Role::Teacher).then(|| NewTeacher::new(&self.headline, &self.location));
        let profile = NewProfile::new(user_sub, self.role, self.name, email, None);
        (profile, teacher)
    }
}
