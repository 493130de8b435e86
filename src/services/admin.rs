//! Admin dashboard and featured-listing promotion.

use chrono::Utc;

use crate::domain::profile::Profile;
use crate::domain::teacher::Teacher;
use crate::domain::types::Role;
use crate::dto::admin::AdminPageData;
use crate::forms::admin::{FeatureTeacherForm, FeatureTeacherPayload};
use crate::repository::errors::RepositoryError;
use crate::repository::{StatsReader, TeacherWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn load_dashboard<R>(repo: &R, viewer: &Profile) -> ServiceResult<AdminPageData>
where
    R: StatsReader + ?Sized,
{
    ensure_role(viewer, &[Role::Admin])?;

    let stats = repo
        .dashboard_stats(Utc::now().naive_utc())
        .map_err(|err| {
            log::error!("Failed to load dashboard stats: {err}");
            err
        })?;

    Ok(AdminPageData {
        total_profiles: stats.total_profiles(),
        stats,
    })
}

/// Sets or clears the promotion window of a teacher.
pub fn feature_teacher<R>(
    repo: &R,
    viewer: &Profile,
    form: FeatureTeacherForm,
) -> ServiceResult<Teacher>
where
    R: TeacherWriter + ?Sized,
{
    ensure_role(viewer, &[Role::Admin])?;

    let payload = FeatureTeacherPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate featured form: {err}");
        ServiceError::from(err)
    })?;
    let until = payload.featured_until(Utc::now().naive_utc());

    match repo.set_featured_until(payload.teacher_id, until) {
        Ok(teacher) => {
            log::info!(
                "Teacher {} featured until {:?} by {}",
                teacher.id,
                teacher.featured_until,
                viewer.id
            );
            Ok(teacher)
        }
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(err) => {
            log::error!("Failed to feature teacher {}: {err}", payload.teacher_id);
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::DashboardStats;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{profile, record};

    #[test]
    fn dashboard_requires_admin() {
        let repo = MockRepository::new();
        let result = load_dashboard(&repo, &profile(1, "teacher"));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn dashboard_totals_profiles() {
        let mut repo = MockRepository::new();
        repo.expect_dashboard_stats().returning(|_| {
            Ok(DashboardStats {
                students: 3,
                parents: 2,
                teachers: 4,
                admins: 1,
                ..DashboardStats::default()
            })
        });

        let data = load_dashboard(&repo, &profile(1, "admin")).unwrap();
        assert_eq!(data.total_profiles, 10);
    }

    #[test]
    fn featuring_sets_expiry() {
        let mut repo = MockRepository::new();
        repo.expect_set_featured_until()
            .withf(|id, until| id.get() == 3 && until.is_some())
            .times(1)
            .returning(|_, _| Ok(record(3, profile(30, "teacher"), &[]).teacher));

        let form = FeatureTeacherForm {
            teacher_id: 3,
            days: 30,
        };
        feature_teacher(&repo, &profile(1, "admin"), form).unwrap();
    }

    #[test]
    fn zero_days_clears_expiry() {
        let mut repo = MockRepository::new();
        repo.expect_set_featured_until()
            .withf(|_, until| until.is_none())
            .times(1)
            .returning(|_, _| Ok(record(3, profile(30, "teacher"), &[]).teacher));

        let form = FeatureTeacherForm {
            teacher_id: 3,
            days: 0,
        };
        feature_teacher(&repo, &profile(1, "admin"), form).unwrap();
    }

    #[test]
    fn missing_teacher_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_set_featured_until()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let form = FeatureTeacherForm {
            teacher_id: 3,
            days: 1,
        };
        let result = feature_teacher(&repo, &profile(1, "admin"), form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
