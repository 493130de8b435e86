//! Repository implementation for marketplace profiles.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::profile::{NewProfile, Profile, UpdateProfile};
use crate::domain::teacher::NewTeacher;
use crate::domain::types::ProfileId;
use crate::models::profile::{
    NewProfile as DbNewProfile, Profile as DbProfile, UpdateProfile as DbUpdateProfile,
};
use crate::models::teacher::{NewTeacher as DbNewTeacher, TeacherSubject as DbTeacherSubject};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProfileReader, ProfileWriter};

impl ProfileReader for DieselRepository {
    fn get_profile_by_id(&self, id: ProfileId) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let db_profile = profiles::table
            .find(id.get())
            .first::<DbProfile>(&mut conn)
            .optional()?;

        db_profile
            .map(|p| Profile::try_from(p).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_profile_by_sub(&self, user_sub: &str) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let db_profile = profiles::table
            .filter(profiles::user_sub.eq(user_sub))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        db_profile
            .map(|p| Profile::try_from(p).map_err(RepositoryError::from))
            .transpose()
    }
}

impl ProfileWriter for DieselRepository {
    fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let db_new_profile: DbNewProfile = new_profile.into();

        let db_profile = diesel::insert_into(profiles::table)
            .values(&db_new_profile)
            .get_result::<DbProfile>(&mut conn)?;

        Ok(Profile::try_from(db_profile)?)
    }

    fn create_teacher_profile(
        &self,
        new_profile: &NewProfile,
        teacher: &NewTeacher,
    ) -> RepositoryResult<Profile> {
        use crate::schema::{profiles, teacher_subjects, teachers};

        let mut conn = self.conn()?;
        let db_new_profile: DbNewProfile = new_profile.into();

        let db_profile = conn.transaction::<DbProfile, RepositoryError, _>(|conn| {
            let db_profile = diesel::insert_into(profiles::table)
                .values(&db_new_profile)
                .get_result::<DbProfile>(conn)?;

            let teacher_id = diesel::insert_into(teachers::table)
                .values(DbNewTeacher::from_domain(teacher, db_profile.id))
                .returning(teachers::id)
                .get_result::<i32>(conn)?;

            let subjects = teacher
                .subjects
                .iter()
                .map(|subject| DbTeacherSubject {
                    teacher_id,
                    subject: subject.to_string(),
                })
                .collect::<Vec<_>>();
            if !subjects.is_empty() {
                diesel::insert_into(teacher_subjects::table)
                    .values(&subjects)
                    .execute(conn)?;
            }

            Ok(db_profile)
        })?;

        Ok(Profile::try_from(db_profile)?)
    }

    fn update_profile(&self, id: ProfileId, updates: &UpdateProfile) -> RepositoryResult<Profile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let changes = DbUpdateProfile::from_domain(updates, Utc::now().naive_utc());

        let db_profile = diesel::update(profiles::table.find(id.get()))
            .set(&changes)
            .get_result::<DbProfile>(&mut conn)?;

        Ok(Profile::try_from(db_profile)?)
    }
}
