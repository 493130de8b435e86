use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ProfileId, ReviewId, ReviewRating, TeacherId, TypeConstraintError};

pub const MAX_COMMENT_LEN: usize = 2000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub teacher_id: TeacherId,
    pub author_id: ProfileId,
    pub rating: ReviewRating,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

impl Review {
    pub fn try_new(
        id: i32,
        teacher_id: i32,
        author_id: i32,
        rating: i32,
        comment: String,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: ReviewId::new(id)?,
            teacher_id: TeacherId::new(teacher_id)?,
            author_id: ProfileId::new(author_id)?,
            rating: ReviewRating::new(rating)?,
            comment,
            created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub teacher_id: TeacherId,
    pub author_id: ProfileId,
    pub rating: ReviewRating,
    pub comment: String,
}

impl NewReview {
    pub fn try_new(
        teacher_id: TeacherId,
        author_id: ProfileId,
        rating: i32,
        comment: &str,
    ) -> Result<Self, TypeConstraintError> {
        let comment = ammonia::clean(comment.trim()).trim().to_string();
        if comment.chars().count() > MAX_COMMENT_LEN {
            return Err(TypeConstraintError::TooLong(MAX_COMMENT_LEN));
        }

        Ok(Self {
            teacher_id,
            author_id,
            rating: ReviewRating::new(rating)?,
            comment,
        })
    }
}

/// Average rating rounded to two decimals, `0.0` for no reviews.
pub fn average_rating(sum: i64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    let avg = sum as f64 / count as f64;
    (avg * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rating_rounds() {
        assert_eq!(average_rating(0, 0), 0.0);
        assert_eq!(average_rating(14, 3), 4.67);
        assert_eq!(average_rating(9, 2), 4.5);
    }

    #[test]
    fn new_review_validates_rating() {
        let teacher = TeacherId::new(1).unwrap();
        let author = ProfileId::new(2).unwrap();
        assert!(NewReview::try_new(teacher, author, 5, "Great").is_ok());
        assert_eq!(
            NewReview::try_new(teacher, author, 0, "").unwrap_err(),
            TypeConstraintError::RatingOutOfRange
        );
    }
}
