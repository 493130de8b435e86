use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::listing::{SortField, SortOrder};
use crate::domain::message::{ConversationSummary, Message, NewMessage};
use crate::domain::profile::{NewProfile, Profile, UpdateProfile};
use crate::domain::review::{NewReview, Review};
use crate::domain::stats::DashboardStats;
use crate::domain::teacher::{NewTeacher, Teacher, TeacherRecord, UpdateTeacher};
use crate::domain::types::{ProfileId, TeacherId};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod favourite;
pub mod message;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod profile;
pub mod review;
pub mod stats;
pub mod teacher;

/// Diesel-backed repository shared by all handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Row offset of the first item on the page; page `0` is treated as `1`.
    /// Saturates instead of overflowing for huge page numbers.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }

    /// `OFFSET` value for SQL, capped at `i64::MAX`.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// `LIMIT` value for SQL, capped at `i64::MAX`.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// Predicates and ordering for the teacher search.
///
/// Every predicate that is set is ANDed with the others. Blank strings are
/// treated as absent by the builder methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherListQuery {
    /// Exact subject tag, compared case-insensitively.
    pub subject: Option<String>,
    /// Substring of the location, compared case-insensitively.
    pub location: Option<String>,
    /// Inclusive lower bound of the average rating.
    pub min_rating: Option<f64>,
    /// Substring of the owner's name or the headline.
    pub search: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
    pub pagination: Option<Pagination>,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl TeacherListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = non_blank(subject);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location);
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating).filter(|r| r.is_finite());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = non_blank(search);
        self
    }

    pub fn sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Messages exchanged between two profiles, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationQuery {
    pub profile_id: ProfileId,
    pub counterpart_id: ProfileId,
    pub pagination: Option<Pagination>,
}

impl ConversationQuery {
    pub fn new(profile_id: ProfileId, counterpart_id: ProfileId) -> Self {
        Self {
            profile_id,
            counterpart_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ProfileReader {
    fn get_profile_by_id(&self, id: ProfileId) -> RepositoryResult<Option<Profile>>;
    fn get_profile_by_sub(&self, user_sub: &str) -> RepositoryResult<Option<Profile>>;
}

pub trait ProfileWriter {
    fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile>;
    /// Inserts the profile together with its listing row in one transaction.
    fn create_teacher_profile(
        &self,
        new_profile: &NewProfile,
        teacher: &NewTeacher,
    ) -> RepositoryResult<Profile>;
    fn update_profile(&self, id: ProfileId, updates: &UpdateProfile) -> RepositoryResult<Profile>;
}

pub trait TeacherReader {
    fn get_teacher_by_id(&self, id: TeacherId) -> RepositoryResult<Option<TeacherRecord>>;
    fn get_teacher_by_profile(&self, profile_id: ProfileId)
    -> RepositoryResult<Option<TeacherRecord>>;
    /// Returns the total number of matches and the requested page.
    fn search_teachers(
        &self,
        query: TeacherListQuery,
    ) -> RepositoryResult<(usize, Vec<TeacherRecord>)>;
}

pub trait TeacherWriter {
    fn update_teacher(&self, id: TeacherId, updates: &UpdateTeacher) -> RepositoryResult<Teacher>;
    fn set_featured_until(
        &self,
        id: TeacherId,
        until: Option<NaiveDateTime>,
    ) -> RepositoryResult<Teacher>;
}

pub trait MessageReader {
    fn list_conversation(
        &self,
        query: ConversationQuery,
    ) -> RepositoryResult<(usize, Vec<Message>)>;
    fn list_conversations(&self, profile_id: ProfileId)
    -> RepositoryResult<Vec<ConversationSummary>>;
    fn count_unread_messages(&self, profile_id: ProfileId) -> RepositoryResult<usize>;
}

pub trait MessageWriter {
    fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message>;
    /// Flags every unread message from `sender_id` to `recipient_id` as read.
    fn mark_conversation_read(
        &self,
        recipient_id: ProfileId,
        sender_id: ProfileId,
    ) -> RepositoryResult<usize>;
}

pub trait ReviewReader {
    fn list_reviews(
        &self,
        teacher_id: TeacherId,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<(Review, Profile)>)>;
    fn review_exists(&self, teacher_id: TeacherId, author_id: ProfileId) -> RepositoryResult<bool>;
}

pub trait ReviewWriter {
    /// Stores the review and refreshes the teacher's rating aggregate.
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
}

pub trait FavouriteReader {
    fn list_favourite_teachers(&self, profile_id: ProfileId)
    -> RepositoryResult<Vec<TeacherRecord>>;
    fn is_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId) -> RepositoryResult<bool>;
}

pub trait FavouriteWriter {
    fn add_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId) -> RepositoryResult<()>;
    fn remove_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId)
    -> RepositoryResult<()>;
}

pub trait StatsReader {
    fn dashboard_stats(&self, now: NaiveDateTime) -> RepositoryResult<DashboardStats>;
}
