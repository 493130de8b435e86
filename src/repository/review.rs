//! Repository implementation for teacher reviews.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::profile::Profile;
use crate::domain::review::{NewReview, Review, average_rating};
use crate::domain::types::{ProfileId, TeacherId};
use crate::models::profile::Profile as DbProfile;
use crate::models::review::{NewReview as DbNewReview, Review as DbReview};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, Pagination, ReviewReader, ReviewWriter};

impl ReviewReader for DieselRepository {
    fn list_reviews(
        &self,
        teacher_id: TeacherId,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<(Review, Profile)>)> {
        use crate::schema::{profiles, reviews};

        let mut conn = self.conn()?;

        let total = reviews::table
            .filter(reviews::teacher_id.eq(teacher_id.get()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = reviews::table
            .inner_join(profiles::table)
            .filter(reviews::teacher_id.eq(teacher_id.get()))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(pagination) = pagination {
            items = items
                .offset(pagination.sql_offset())
                .limit(pagination.sql_limit());
        }

        let rows = items
            .load::<(DbReview, DbProfile)>(&mut conn)?
            .into_iter()
            .map(|(review, author)| -> RepositoryResult<(Review, Profile)> {
                Ok((Review::try_from(review)?, Profile::try_from(author)?))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, rows))
    }

    fn review_exists(&self, teacher_id: TeacherId, author_id: ProfileId) -> RepositoryResult<bool> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            reviews::table
                .filter(reviews::teacher_id.eq(teacher_id.get()))
                .filter(reviews::author_id.eq(author_id.get())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review> {
        use crate::schema::{reviews, teachers};

        let mut conn = self.conn()?;
        let db_new_review: DbNewReview = new_review.into();
        let teacher_id = new_review.teacher_id.get();

        let db_review = conn.transaction::<DbReview, RepositoryError, _>(|conn| {
            let db_review = diesel::insert_into(reviews::table)
                .values(&db_new_review)
                .get_result::<DbReview>(conn)?;

            let ratings = reviews::table
                .filter(reviews::teacher_id.eq(teacher_id))
                .select(reviews::rating)
                .load::<i32>(conn)?;
            let sum = ratings.iter().map(|r| i64::from(*r)).sum::<i64>();
            let count = ratings.len() as i64;

            diesel::update(teachers::table.find(teacher_id))
                .set((
                    teachers::rating.eq(average_rating(sum, count)),
                    teachers::review_count.eq(count as i32),
                    teachers::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;

            Ok(db_review)
        })?;

        Ok(Review::try_from(db_review)?)
    }
}
