//! Teacher search backing `GET /listings` and the find-teachers page.

use chrono::Utc;

use crate::domain::listing::TeacherListing;
use crate::domain::types::TeacherId;
use crate::dto::listings::ListingQuery;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{TeacherListQuery, TeacherReader};
use crate::services::{ServiceError, ServiceResult};

/// Runs the filtered search and wraps the page into the listing envelope.
///
/// The count and the page are read by a single repository call, so either
/// both succeed or the whole search fails.
pub fn search_listings<R>(
    repo: &R,
    params: ListingQuery,
    storage_base: &str,
) -> ServiceResult<Paginated<TeacherListing>>
where
    R: TeacherReader + ?Sized,
{
    let request = PageRequest::new(params.page, params.limit);

    let mut query = TeacherListQuery::new()
        .sort(params.sort.unwrap_or_default(), params.order.unwrap_or_default())
        .paginate(request.page(), request.limit());
    if let Some(subject) = params.subject {
        query = query.subject(subject);
    }
    if let Some(location) = params.location {
        query = query.location(location);
    }
    if let Some(min_rating) = params.min_rating {
        query = query.min_rating(min_rating);
    }
    if let Some(q) = params.q {
        query = query.search(q);
    }

    let (total, records) = repo.search_teachers(query).map_err(|err| {
        log::error!("Failed to search teachers: {err}");
        err
    })?;

    let now = Utc::now().naive_utc();
    let listings = records
        .into_iter()
        .map(|record| TeacherListing::from_record(record, now, storage_base))
        .collect();

    Ok(Paginated::new(listings, total, request))
}

/// Loads a single listing card.
pub fn get_listing<R>(repo: &R, id: TeacherId, storage_base: &str) -> ServiceResult<TeacherListing>
where
    R: TeacherReader + ?Sized,
{
    let record = repo
        .get_teacher_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load teacher {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(TeacherListing::from_record(
        record,
        Utc::now().naive_utc(),
        storage_base,
    ))
}
