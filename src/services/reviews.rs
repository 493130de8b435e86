use crate::domain::profile::Profile;
use crate::domain::review::{NewReview, Review};
use crate::domain::types::TeacherId;
use crate::forms::reviews::ReviewForm;
use crate::repository::{ReviewReader, ReviewWriter, TeacherReader};
use crate::services::teachers::CLIENT_ROLES;
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Stores a review from a student or parent; the teacher aggregate is
/// refreshed by the repository in the same transaction.
pub fn add_review<R>(
    repo: &R,
    viewer: &Profile,
    teacher_id: TeacherId,
    form: ReviewForm,
) -> ServiceResult<Review>
where
    R: TeacherReader + ReviewReader + ReviewWriter + ?Sized,
{
    ensure_role(viewer, &CLIENT_ROLES)?;

    repo.get_teacher_by_id(teacher_id)?
        .ok_or(ServiceError::NotFound)?;

    if repo.review_exists(teacher_id, viewer.id)? {
        return Err(ServiceError::Form(
            "You have already reviewed this teacher".to_string(),
        ));
    }

    let new_review = NewReview::try_new(teacher_id, viewer.id, form.rating, &form.comment)?;

    repo.create_review(&new_review).map_err(|err| {
        log::error!("Failed to save review for teacher {teacher_id}: {err}");
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{now, profile, record};

    fn form(rating: i32) -> ReviewForm {
        ReviewForm {
            rating,
            comment: "Patient and clear".to_string(),
        }
    }

    fn teacher_id() -> TeacherId {
        TeacherId::new(3).unwrap()
    }

    #[test]
    fn teachers_cannot_review() {
        let repo = MockRepository::new();
        let result = add_review(&repo, &profile(1, "teacher"), teacher_id(), form(5));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn second_review_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_teacher_by_id()
            .returning(|_| Ok(Some(record(3, profile(30, "teacher"), &[]))));
        repo.expect_review_exists().returning(|_, _| Ok(true));
        repo.expect_create_review().times(0);

        let result = add_review(&repo, &profile(1, "parent"), teacher_id(), form(4));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_teacher_by_id()
            .returning(|_| Ok(Some(record(3, profile(30, "teacher"), &[]))));
        repo.expect_review_exists().returning(|_, _| Ok(false));
        repo.expect_create_review().times(0);

        let result = add_review(&repo, &profile(1, "student"), teacher_id(), form(6));
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn review_is_created() {
        let mut repo = MockRepository::new();
        repo.expect_get_teacher_by_id()
            .returning(|_| Ok(Some(record(3, profile(30, "teacher"), &[]))));
        repo.expect_review_exists().returning(|_, _| Ok(false));
        repo.expect_create_review()
            .withf(|review| review.rating.get() == 5 && review.author_id.get() == 1)
            .times(1)
            .returning(|_| Ok(Review::try_new(1, 3, 1, 5, "Patient and clear".into(), now())?));

        add_review(&repo, &profile(1, "student"), teacher_id(), form(5)).unwrap();
    }
}
