use chrono::Utc;

use crate::domain::listing::TeacherListing;
use crate::domain::profile::Profile;
use crate::domain::types::TeacherId;
use crate::repository::{FavouriteReader, FavouriteWriter, TeacherReader};
use crate::services::teachers::CLIENT_ROLES;
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Adds or removes the teacher from the viewer's favourites.
///
/// Returns `true` when the teacher is a favourite afterwards.
pub fn toggle_favourite<R>(repo: &R, viewer: &Profile, teacher_id: TeacherId) -> ServiceResult<bool>
where
    R: TeacherReader + FavouriteReader + FavouriteWriter + ?Sized,
{
    ensure_role(viewer, &CLIENT_ROLES)?;

    repo.get_teacher_by_id(teacher_id)?
        .ok_or(ServiceError::NotFound)?;

    let result = if repo.is_favourite(viewer.id, teacher_id)? {
        repo.remove_favourite(viewer.id, teacher_id).map(|_| false)
    } else {
        repo.add_favourite(viewer.id, teacher_id).map(|_| true)
    };

    result.map_err(|err| {
        log::error!("Failed to toggle favourite {teacher_id} for {}: {err}", viewer.id);
        ServiceError::from(err)
    })
}

pub fn list_favourites<R>(
    repo: &R,
    viewer: &Profile,
    storage_base: &str,
) -> ServiceResult<Vec<TeacherListing>>
where
    R: FavouriteReader + ?Sized,
{
    ensure_role(viewer, &CLIENT_ROLES)?;

    let records = repo.list_favourite_teachers(viewer.id).map_err(|err| {
        log::error!("Failed to list favourites of {}: {err}", viewer.id);
        err
    })?;

    let now = Utc::now().naive_utc();
    Ok(records
        .into_iter()
        .map(|record| TeacherListing::from_record(record, now, storage_base))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{profile, record};

    fn with_teacher(repo: &mut MockRepository) {
        repo.expect_get_teacher_by_id()
            .returning(|_| Ok(Some(record(3, profile(30, "teacher"), &[]))));
    }

    #[test]
    fn toggle_adds_missing_favourite() {
        let mut repo = MockRepository::new();
        with_teacher(&mut repo);
        repo.expect_is_favourite().returning(|_, _| Ok(false));
        repo.expect_add_favourite().times(1).returning(|_, _| Ok(()));
        repo.expect_remove_favourite().times(0);

        let now_favourite =
            toggle_favourite(&repo, &profile(1, "student"), TeacherId::new(3).unwrap()).unwrap();
        assert!(now_favourite);
    }

    #[test]
    fn toggle_removes_existing_favourite() {
        let mut repo = MockRepository::new();
        with_teacher(&mut repo);
        repo.expect_is_favourite().returning(|_, _| Ok(true));
        repo.expect_add_favourite().times(0);
        repo.expect_remove_favourite()
            .times(1)
            .returning(|_, _| Ok(()));

        let now_favourite =
            toggle_favourite(&repo, &profile(1, "parent"), TeacherId::new(3).unwrap()).unwrap();
        assert!(!now_favourite);
    }

    #[test]
    fn unknown_teacher_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_teacher_by_id().returning(|_| Ok(None));

        let result = toggle_favourite(&repo, &profile(1, "student"), TeacherId::new(3).unwrap());
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn list_maps_records_to_listings() {
        let mut repo = MockRepository::new();
        repo.expect_list_favourite_teachers()
            .returning(|_| Ok(vec![record(3, profile(30, "teacher"), &["Art"])]));

        let listings = list_favourites(&repo, &profile(1, "student"), "").unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].subjects, vec!["Art"]);
    }
}
