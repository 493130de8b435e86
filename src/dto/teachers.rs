//! DTOs shaped for the teacher detail and profile edit templates.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::listing::TeacherListing;
use crate::domain::profile::Profile;
use crate::domain::teacher::Teacher;

/// Review row rendered under a teacher profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewView {
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub author_name: String,
    pub author_avatar_url: String,
}

/// Aggregated data required to render `/teachers/{id}`.
#[derive(Debug, Serialize)]
pub struct TeacherPageData {
    pub listing: TeacherListing,
    pub reviews: Vec<ReviewView>,
    pub total_reviews: usize,
    pub is_favourite: bool,
    /// Whether the viewer may still leave a review.
    pub can_review: bool,
}

/// Current values of the profile edit form.
#[derive(Debug, Serialize)]
pub struct EditProfilePageData {
    pub profile: Profile,
    pub teacher: Teacher,
    pub subjects: String,
}
