//! Diesel models for teacher listings and their subject tags.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::teacher::{
    NewTeacher as DomainNewTeacher, Teacher as DomainTeacher, UpdateTeacher as DomainUpdateTeacher,
};
use crate::domain::types::{ProfileId, TeacherId, TypeConstraintError};
use crate::models::profile::Profile;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Profile, foreign_key = profile_id))]
#[diesel(table_name = crate::schema::teachers)]
/// Diesel model for [`crate::domain::teacher::Teacher`].
pub struct Teacher {
    pub id: i32,
    pub profile_id: i32,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub hourly_rate: Option<i32>,
    pub rating: f64,
    pub review_count: i32,
    pub featured_until: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::teachers)]
pub struct NewTeacher<'a> {
    pub profile_id: i32,
    pub headline: &'a str,
    pub bio: &'a str,
    pub location: &'a str,
    pub hourly_rate: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::teachers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateTeacher<'a> {
    pub headline: &'a str,
    pub bio: &'a str,
    pub location: &'a str,
    pub hourly_rate: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Insertable, Associations, Identifiable)]
#[diesel(primary_key(teacher_id, subject))]
#[diesel(belongs_to(Teacher, foreign_key = teacher_id))]
#[diesel(table_name = crate::schema::teacher_subjects)]
/// Subject tag attached to a teacher.
pub struct TeacherSubject {
    pub teacher_id: i32,
    pub subject: String,
}

impl TryFrom<Teacher> for DomainTeacher {
    type Error = TypeConstraintError;

    fn try_from(teacher: Teacher) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeacherId::new(teacher.id)?,
            profile_id: ProfileId::new(teacher.profile_id)?,
            headline: teacher.headline,
            bio: teacher.bio,
            location: teacher.location,
            hourly_rate: teacher.hourly_rate,
            rating: teacher.rating,
            review_count: teacher.review_count,
            featured_until: teacher.featured_until,
            created_at: teacher.created_at,
            updated_at: teacher.updated_at,
        })
    }
}

impl<'a> NewTeacher<'a> {
    pub fn from_domain(teacher: &'a DomainNewTeacher, profile_id: i32) -> Self {
        Self {
            profile_id,
            headline: teacher.headline.as_str(),
            bio: teacher.bio.as_str(),
            location: teacher.location.as_str(),
            hourly_rate: teacher.hourly_rate,
        }
    }
}

impl<'a> UpdateTeacher<'a> {
    pub fn from_domain(update: &'a DomainUpdateTeacher, now: NaiveDateTime) -> Self {
        Self {
            headline: update.headline.as_str(),
            bio: update.bio.as_str(),
            location: update.location.as_str(),
            hourly_rate: update.hourly_rate,
            updated_at: now,
        }
    }
}
