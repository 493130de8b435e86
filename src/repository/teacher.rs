//! Repository implementation for teacher listings.

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::listing::{SortField, SortOrder};
use crate::domain::profile::Profile;
use crate::domain::teacher::{Teacher, TeacherRecord, UpdateTeacher};
use crate::domain::types::{ProfileId, Subject, TeacherId};
use crate::models::profile::Profile as DbProfile;
use crate::models::teacher::{
    Teacher as DbTeacher, TeacherSubject as DbTeacherSubject, UpdateTeacher as DbUpdateTeacher,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TeacherListQuery, TeacherReader, TeacherWriter};

/// Escapes the `LIKE` wildcards so user input is matched literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

/// Loads subject tags for the given teachers, keyed by teacher id.
fn load_subjects(
    conn: &mut SqliteConnection,
    teacher_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<Subject>>> {
    use crate::schema::teacher_subjects;

    let rows = teacher_subjects::table
        .filter(teacher_subjects::teacher_id.eq_any(teacher_ids))
        .order((teacher_subjects::teacher_id, teacher_subjects::subject))
        .load::<DbTeacherSubject>(conn)?;

    let mut subjects: HashMap<i32, Vec<Subject>> = HashMap::new();
    for row in rows {
        let subject = Subject::new(&row.subject)?;
        subjects.entry(row.teacher_id).or_default().push(subject);
    }
    Ok(subjects)
}

/// Converts joined teacher/profile rows into records, preserving order.
pub(crate) fn into_records(
    conn: &mut SqliteConnection,
    rows: Vec<(DbTeacher, DbProfile)>,
) -> RepositoryResult<Vec<TeacherRecord>> {
    let ids = rows.iter().map(|(t, _)| t.id).collect::<Vec<_>>();
    let mut subjects = load_subjects(conn, &ids)?;

    rows.into_iter()
        .map(|(db_teacher, db_profile)| -> RepositoryResult<TeacherRecord> {
            let tags = subjects.remove(&db_teacher.id).unwrap_or_default();
            Ok(TeacherRecord {
                teacher: Teacher::try_from(db_teacher)?,
                owner: Profile::try_from(db_profile)?,
                subjects: tags,
            })
        })
        .collect()
}

fn replace_subjects(
    conn: &mut SqliteConnection,
    teacher_id: i32,
    subjects: &[Subject],
) -> RepositoryResult<()> {
    use crate::schema::teacher_subjects;

    diesel::delete(teacher_subjects::table.filter(teacher_subjects::teacher_id.eq(teacher_id)))
        .execute(conn)?;

    let rows = subjects
        .iter()
        .map(|subject| DbTeacherSubject {
            teacher_id,
            subject: subject.to_string(),
        })
        .collect::<Vec<_>>();
    if !rows.is_empty() {
        diesel::insert_into(teacher_subjects::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

impl TeacherReader for DieselRepository {
    fn get_teacher_by_id(&self, id: TeacherId) -> RepositoryResult<Option<TeacherRecord>> {
        use crate::schema::{profiles, teachers};

        let mut conn = self.conn()?;
        let row = teachers::table
            .inner_join(profiles::table)
            .filter(teachers::id.eq(id.get()))
            .first::<(DbTeacher, DbProfile)>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(into_records(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn get_teacher_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> RepositoryResult<Option<TeacherRecord>> {
        use crate::schema::{profiles, teachers};

        let mut conn = self.conn()?;
        let row = teachers::table
            .inner_join(profiles::table)
            .filter(teachers::profile_id.eq(profile_id.get()))
            .first::<(DbTeacher, DbProfile)>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(into_records(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn search_teachers(
        &self,
        query: TeacherListQuery,
    ) -> RepositoryResult<(usize, Vec<TeacherRecord>)> {
        use crate::schema::{profiles, teacher_subjects, teachers};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        // Subjects are exact tags; LIKE without wildcards gives a
        // case-insensitive equality in SQLite.
        let subject_pattern = query.subject.as_deref().map(escape_like);
        let location_pattern = query.location.as_deref().map(contains_pattern);
        let search_pattern = query.search.as_deref().map(contains_pattern);

        let query_builder = || {
            let mut items = teachers::table
                .inner_join(profiles::table)
                .into_boxed::<Sqlite>();

            if let Some(pattern) = &subject_pattern {
                items = items.filter(
                    teachers::id.eq_any(
                        teacher_subjects::table
                            .filter(teacher_subjects::subject.like(pattern.clone()).escape('\\'))
                            .select(teacher_subjects::teacher_id),
                    ),
                );
            }
            if let Some(pattern) = &location_pattern {
                items = items.filter(teachers::location.like(pattern.clone()).escape('\\'));
            }
            if let Some(min_rating) = query.min_rating {
                items = items.filter(teachers::rating.ge(min_rating));
            }
            if let Some(pattern) = &search_pattern {
                items = items.filter(
                    profiles::name
                        .like(pattern.clone())
                        .escape('\\')
                        .or(teachers::headline.like(pattern.clone()).escape('\\')),
                );
            }
            items
        };

        // Count, page and subjects are read in one transaction so they agree.
        let (total, records) = conn.transaction::<_, RepositoryError, _>(|conn| {
            let total = query_builder().count().get_result::<i64>(conn)?;

            // Active promotions first, then the requested order, then id so
            // consecutive pages never overlap. A NULL promotion must rank
            // with expired ones, not below them.
            let featured = teachers::featured_until
                .is_not_null()
                .and(teachers::featured_until.gt(now));
            let mut items = query_builder().order_by(featured.desc());
            items = match (query.sort, query.order) {
                (SortField::CreatedAt, SortOrder::Asc) => {
                    items.then_order_by(teachers::created_at.asc())
                }
                (SortField::CreatedAt, SortOrder::Desc) => {
                    items.then_order_by(teachers::created_at.desc())
                }
                (SortField::Rating, SortOrder::Asc) => items.then_order_by(teachers::rating.asc()),
                (SortField::Rating, SortOrder::Desc) => {
                    items.then_order_by(teachers::rating.desc())
                }
                (SortField::HourlyRate, SortOrder::Asc) => {
                    items.then_order_by(teachers::hourly_rate.asc())
                }
                (SortField::HourlyRate, SortOrder::Desc) => {
                    items.then_order_by(teachers::hourly_rate.desc())
                }
                (SortField::Name, SortOrder::Asc) => items.then_order_by(profiles::name.asc()),
                (SortField::Name, SortOrder::Desc) => items.then_order_by(profiles::name.desc()),
            };
            items = items.then_order_by(teachers::id.asc());

            if let Some(pagination) = &query.pagination {
                items = items
                    .offset(pagination.sql_offset())
                    .limit(pagination.sql_limit());
            }

            let rows = items.load::<(DbTeacher, DbProfile)>(conn)?;
            Ok((total, into_records(conn, rows)?))
        })?;

        Ok((total as usize, records))
    }
}

impl TeacherWriter for DieselRepository {
    fn update_teacher(&self, id: TeacherId, updates: &UpdateTeacher) -> RepositoryResult<Teacher> {
        use crate::schema::teachers;

        let mut conn = self.conn()?;
        let changes = DbUpdateTeacher::from_domain(updates, Utc::now().naive_utc());

        let db_teacher = conn.transaction::<DbTeacher, RepositoryError, _>(|conn| {
            let db_teacher = diesel::update(teachers::table.find(id.get()))
                .set(&changes)
                .get_result::<DbTeacher>(conn)?;
            replace_subjects(conn, db_teacher.id, &updates.subjects)?;
            Ok(db_teacher)
        })?;

        Ok(Teacher::try_from(db_teacher)?)
    }

    fn set_featured_until(
        &self,
        id: TeacherId,
        until: Option<NaiveDateTime>,
    ) -> RepositoryResult<Teacher> {
        use crate::schema::teachers;

        let mut conn = self.conn()?;
        let db_teacher = diesel::update(teachers::table.find(id.get()))
            .set(teachers::featured_until.eq(until))
            .get_result::<DbTeacher>(&mut conn)?;

        Ok(Teacher::try_from(db_teacher)?)
    }
}
