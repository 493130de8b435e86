//! Repository implementation for favourite teachers.

use diesel::prelude::*;

use crate::domain::teacher::TeacherRecord;
use crate::domain::types::{ProfileId, TeacherId};
use crate::models::favourite::NewFavourite;
use crate::models::profile::Profile as DbProfile;
use crate::models::teacher::Teacher as DbTeacher;
use crate::repository::errors::RepositoryResult;
use crate::repository::teacher::into_records;
use crate::repository::{DieselRepository, FavouriteReader, FavouriteWriter};

impl FavouriteReader for DieselRepository {
    fn list_favourite_teachers(
        &self,
        profile_id: ProfileId,
    ) -> RepositoryResult<Vec<TeacherRecord>> {
        use crate::schema::{favourites, profiles, teachers};

        let mut conn = self.conn()?;
        let rows = favourites::table
            .inner_join(teachers::table.inner_join(profiles::table))
            .filter(favourites::profile_id.eq(profile_id.get()))
            .order(favourites::created_at.desc())
            .select((teachers::all_columns, profiles::all_columns))
            .load::<(DbTeacher, DbProfile)>(&mut conn)?;

        into_records(&mut conn, rows)
    }

    fn is_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId) -> RepositoryResult<bool> {
        use crate::schema::favourites;

        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            favourites::table
                .filter(favourites::profile_id.eq(profile_id.get()))
                .filter(favourites::teacher_id.eq(teacher_id.get())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl FavouriteWriter for DieselRepository {
    fn add_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId) -> RepositoryResult<()> {
        use crate::schema::favourites;

        let mut conn = self.conn()?;
        diesel::insert_or_ignore_into(favourites::table)
            .values(NewFavourite {
                profile_id: profile_id.get(),
                teacher_id: teacher_id.get(),
            })
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_favourite(
        &self,
        profile_id: ProfileId,
        teacher_id: TeacherId,
    ) -> RepositoryResult<()> {
        use crate::schema::favourites;

        let mut conn = self.conn()?;
        diesel::delete(
            favourites::table
                .filter(favourites::profile_id.eq(profile_id.get()))
                .filter(favourites::teacher_id.eq(teacher_id.get())),
        )
        .execute(&mut conn)?;

        Ok(())
    }
}
