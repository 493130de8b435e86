use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::profile::Profile;
use crate::domain::types::{ProfileId, Subject, TeacherId, TypeConstraintError};

/// Maximum number of subject tags a teacher may carry.
pub const MAX_SUBJECTS: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Teacher {
    pub id: TeacherId,
    pub profile_id: ProfileId,
    pub headline: String,
    pub bio: String,
    pub location: String,
    /// Price of one lesson hour in whole currency units.
    pub hourly_rate: Option<i32>,
    /// Average review rating, `0.0` when there are no reviews yet.
    pub rating: f64,
    pub review_count: i32,
    pub featured_until: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Teacher {
    /// Whether a promotion is active at `now`.
    pub fn is_featured(&self, now: NaiveDateTime) -> bool {
        self.featured_until.is_some_and(|until| until > now)
    }
}

/// Teacher joined with the owning profile and subject tags.
#[derive(Clone, Debug, PartialEq)]
pub struct TeacherRecord {
    pub teacher: Teacher,
    pub owner: Profile,
    pub subjects: Vec<Subject>,
}

/// Teacher details collected during onboarding.
#[derive(Clone, Debug)]
pub struct NewTeacher {
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub hourly_rate: Option<i32>,
    pub subjects: Vec<Subject>,
}

impl NewTeacher {
    #[must_use]
    pub fn new(headline: &str, location: &str) -> Self {
        Self {
            headline: headline.trim().to_string(),
            bio: String::new(),
            location: location.trim().to_string(),
            hourly_rate: None,
            subjects: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateTeacher {
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub hourly_rate: Option<i32>,
    pub subjects: Vec<Subject>,
}

/// Parses a comma separated subject list, dropping blanks and
/// case-insensitive duplicates while keeping the first spelling.
pub fn parse_subjects(raw: &str) -> Result<Vec<Subject>, TypeConstraintError> {
    let mut seen = HashSet::new();
    let mut subjects = Vec::new();

    for part in raw.split(',') {
        let subject = match Subject::new(part) {
            Ok(subject) => subject,
            Err(TypeConstraintError::EmptyString) => continue,
            Err(err) => return Err(err),
        };
        if seen.insert(subject.as_str().to_lowercase()) {
            subjects.push(subject);
        }
    }

    if subjects.len() > MAX_SUBJECTS {
        return Err(TypeConstraintError::InvalidValue(format!(
            "at most {MAX_SUBJECTS} subjects are allowed"
        )));
    }

    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn parse_subjects_trims_and_deduplicates() {
        let subjects = parse_subjects(" Math, physics ,, math ,Physics,Chemistry").unwrap();
        let names: Vec<_> = subjects.iter().map(Subject::as_str).collect();
        assert_eq!(names, vec!["Math", "physics", "Chemistry"]);
    }

    #[test]
    fn parse_subjects_limits_count() {
        let raw = (0..=MAX_SUBJECTS)
            .map(|i| format!("S{i}"))
            .collect::<Vec<_>>()
            .join(",");
        assert!(parse_subjects(&raw).is_err());
    }

    #[test]
    fn featured_flag_follows_expiry() {
        let now = Utc::now().naive_utc();
        let mut teacher = Teacher {
            id: TeacherId::new(1).unwrap(),
            profile_id: ProfileId::new(1).unwrap(),
            headline: String::new(),
            bio: String::new(),
            location: String::new(),
            hourly_rate: None,
            rating: 0.0,
            review_count: 0,
            featured_until: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!teacher.is_featured(now));
        teacher.featured_until = Some(now + Duration::days(1));
        assert!(teacher.is_featured(now));
        teacher.featured_until = Some(now - Duration::seconds(1));
        assert!(!teacher.is_featured(now));
    }
}
