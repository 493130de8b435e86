//! Diesel models for teacher reviews.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{NewReview as DomainNewReview, Review as DomainReview};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: i32,
    pub teacher_id: i32,
    pub author_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub teacher_id: i32,
    pub author_id: i32,
    pub rating: i32,
    pub comment: &'a str,
}

impl TryFrom<Review> for DomainReview {
    type Error = TypeConstraintError;

    fn try_from(review: Review) -> Result<Self, Self::Error> {
        DomainReview::try_new(
            review.id,
            review.teacher_id,
            review.author_id,
            review.rating,
            review.comment,
            review.created_at,
        )
    }
}

impl<'a> From<&'a DomainNewReview> for NewReview<'a> {
    fn from(review: &'a DomainNewReview) -> Self {
        Self {
            teacher_id: review.teacher_id.get(),
            author_id: review.author_id.get(),
            rating: review.rating.get(),
            comment: review.comment.as_str(),
        }
    }
}
