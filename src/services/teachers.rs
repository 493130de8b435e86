//! Teacher detail page and self-service profile editing.

use chrono::Utc;

use crate::domain::avatar::normalize_avatar_url;
use crate::domain::listing::TeacherListing;
use crate::domain::profile::Profile;
use crate::domain::types::{Role, TeacherId};
use crate::dto::teachers::{EditProfilePageData, ReviewView, TeacherPageData};
use crate::forms::profile::{TeacherProfileForm, TeacherProfilePayload};
use crate::repository::{
    FavouriteReader, Pagination, ProfileWriter, ReviewReader, TeacherReader, TeacherWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Reviews shown on the first page of a teacher profile.
pub const REVIEWS_PER_PAGE: usize = 20;

/// Roles allowed to review and favourite teachers.
pub const CLIENT_ROLES: [Role; 2] = [Role::Student, Role::Parent];

pub fn load_teacher_page<R>(
    repo: &R,
    viewer: &Profile,
    teacher_id: TeacherId,
    storage_base: &str,
) -> ServiceResult<TeacherPageData>
where
    R: TeacherReader + ReviewReader + FavouriteReader + ?Sized,
{
    let record = repo
        .get_teacher_by_id(teacher_id)
        .map_err(|err| {
            log::error!("Failed to load teacher {teacher_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let (total_reviews, reviews) = repo
        .list_reviews(
            teacher_id,
            Some(Pagination {
                page: 1,
                per_page: REVIEWS_PER_PAGE,
            }),
        )
        .map_err(|err| {
            log::error!("Failed to load reviews of teacher {teacher_id}: {err}");
            err
        })?;

    let is_client = CLIENT_ROLES.contains(&viewer.role);
    let is_favourite = is_client && repo.is_favourite(viewer.id, teacher_id)?;
    let can_review = is_client && !repo.review_exists(teacher_id, viewer.id)?;

    let reviews = reviews
        .into_iter()
        .map(|(review, author)| ReviewView {
            rating: review.rating.get(),
            comment: review.comment,
            created_at: review.created_at,
            author_avatar_url: normalize_avatar_url(author.avatar_url.as_deref(), storage_base),
            author_name: author.name.into_inner(),
        })
        .collect();

    Ok(TeacherPageData {
        listing: TeacherListing::from_record(record, Utc::now().naive_utc(), storage_base),
        reviews,
        total_reviews,
        is_favourite,
        can_review,
    })
}

/// Loads the signed-in teacher's own listing for editing.
pub fn load_edit_profile<R>(repo: &R, viewer: &Profile) -> ServiceResult<EditProfilePageData>
where
    R: TeacherReader + ?Sized,
{
    ensure_role(viewer, &[Role::Teacher])?;

    let record = repo
        .get_teacher_by_profile(viewer.id)
        .map_err(|err| {
            log::error!("Failed to load listing of profile {}: {err}", viewer.id);
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let subjects = record
        .subjects
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(EditProfilePageData {
        profile: record.owner,
        teacher: record.teacher,
        subjects,
    })
}

/// Saves the profile edit form; returns the teacher id for the redirect.
pub fn save_profile<R>(
    repo: &R,
    viewer: &Profile,
    form: TeacherProfileForm,
) -> ServiceResult<TeacherId>
where
    R: TeacherReader + TeacherWriter + ProfileWriter + ?Sized,
{
    ensure_role(viewer, &[Role::Teacher])?;

    let payload = TeacherProfilePayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate profile form: {err}");
        ServiceError::from(err)
    })?;

    let record = repo
        .get_teacher_by_profile(viewer.id)?
        .ok_or(ServiceError::NotFound)?;

    repo.update_profile(viewer.id, &payload.profile)
        .map_err(|err| {
            log::error!("Failed to update profile {}: {err}", viewer.id);
            err
        })?;
    let teacher = repo
        .update_teacher(record.teacher.id, &payload.teacher)
        .map_err(|err| {
            log::error!("Failed to update teacher {}: {err}", record.teacher.id);
            err
        })?;

    Ok(teacher.id)
}
