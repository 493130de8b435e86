//! First-login profile creation.

use crate::auth::AuthenticatedUser;
use crate::domain::profile::Profile;
use crate::domain::types::Email;
use crate::forms::onboarding::{OnboardingForm, OnboardingPayload};
use crate::repository::{ProfileReader, ProfileWriter};
use crate::services::{ServiceError, ServiceResult};

/// Returns the existing profile of the signed-in user, if onboarding is done.
pub fn find_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Option<Profile>>
where
    R: ProfileReader + ?Sized,
{
    repo.get_profile_by_sub(&user.sub).map_err(|err| {
        log::error!("Failed to load profile for {}: {err}", user.sub);
        ServiceError::from(err)
    })
}

/// Creates the profile (and the listing for teachers) of a new user.
pub fn complete_onboarding<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: OnboardingForm,
) -> ServiceResult<Profile>
where
    R: ProfileReader + ProfileWriter + ?Sized,
{
    if find_profile(repo, user)?.is_some() {
        return Err(ServiceError::Form("Profile already exists".to_string()));
    }

    let payload = OnboardingPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate onboarding form: {err}");
        ServiceError::from(err)
    })?;
    let email = Email::new(&user.email)?;
    let (new_profile, new_teacher) = payload.into_domain(&user.sub, email);

    let result = match &new_teacher {
        Some(teacher) => repo.create_teacher_profile(&new_profile, teacher),
        None => repo.create_profile(&new_profile),
    };

    result.map_err(|err| {
        log::error!("Failed to create profile for {}: {err}", user.sub);
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Role;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::profile;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "sub-7".to_string(),
            email: "Meera@Example.com".to_string(),
            name: "Meera".to_string(),
            roles: vec![],
            exp: 0,
        }
    }

    fn form(role: &str) -> OnboardingForm {
        OnboardingForm {
            name: "Meera".to_string(),
            role: role.to_string(),
            headline: "Chemistry".to_string(),
            location: "Pune".to_string(),
        }
    }

    #[test]
    fn teacher_onboarding_creates_listing() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_sub().returning(|_| Ok(None));
        repo.expect_create_profile().times(0);
        repo.expect_create_teacher_profile()
            .withf(|profile, teacher| {
                profile.role == Role::Teacher
                    && profile.email.as_str() == "meera@example.com"
                    && profile.user_sub == "sub-7"
                    && teacher.location == "Pune"
            })
            .times(1)
            .returning(|_, _| Ok(profile(7, "teacher")));

        let created = complete_onboarding(&repo, &user(), form("teacher")).unwrap();
        assert_eq!(created.role, Role::Teacher);
    }

    #[test]
    fn parent_onboarding_creates_plain_profile() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_sub().returning(|_| Ok(None));
        repo.expect_create_teacher_profile().times(0);
        repo.expect_create_profile()
            .withf(|profile| profile.role == Role::Parent)
            .times(1)
            .returning(|_| Ok(profile(7, "parent")));

        complete_onboarding(&repo, &user(), form("parent")).unwrap();
    }

    #[test]
    fn duplicate_onboarding_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_sub()
            .returning(|_| Ok(Some(profile(7, "student"))));
        repo.expect_create_profile().times(0);

        let result = complete_onboarding(&repo, &user(), form("student"));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn admin_role_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_sub().returning(|_| Ok(None));
        repo.expect_create_profile().times(0);

        let result = complete_onboarding(&repo, &user(), form("admin"));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
