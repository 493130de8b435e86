//! Read model returned by the teacher search.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::avatar::normalize_avatar_url;
use crate::domain::teacher::TeacherRecord;
use crate::domain::types::{ProfileId, TeacherId};

/// Column the listing page is ordered by.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Rating,
    HourlyRate,
    Name,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Rating => "rating",
            SortField::HourlyRate => "hourly_rate",
            SortField::Name => "name",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Owner details rendered on a listing card.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingOwner {
    pub profile_id: ProfileId,
    pub name: String,
    pub avatar_url: String,
}

/// One card of the find-teachers page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherListing {
    pub id: TeacherId,
    pub headline: String,
    pub bio: String,
    pub subjects: Vec<String>,
    pub location: String,
    pub rating: f64,
    pub review_count: i32,
    pub hourly_rate: Option<i32>,
    pub featured: bool,
    pub created_at: NaiveDateTime,
    pub owner: ListingOwner,
}

impl TeacherListing {
    pub fn from_record(record: TeacherRecord, now: NaiveDateTime, storage_base: &str) -> Self {
        let featured = record.teacher.is_featured(now);
        let TeacherRecord {
            teacher,
            owner,
            subjects,
        } = record;

        Self {
            id: teacher.id,
            headline: teacher.headline,
            bio: teacher.bio,
            subjects: subjects.into_iter().map(|s| s.to_string()).collect(),
            location: teacher.location,
            rating: teacher.rating,
            review_count: teacher.review_count,
            hourly_rate: teacher.hourly_rate,
            featured,
            created_at: teacher.created_at,
            owner: ListingOwner {
                profile_id: owner.id,
                avatar_url: normalize_avatar_url(owner.avatar_url.as_deref(), storage_base),
                name: owner.name.into_inner(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn listing_serializes_with_camel_case_keys() {
        let listing = TeacherListing {
            id: TeacherId::new(7).unwrap(),
            headline: "Algebra tutor".to_string(),
            bio: String::new(),
            subjects: vec!["Math".to_string()],
            location: "Delhi".to_string(),
            rating: 4.5,
            review_count: 2,
            hourly_rate: Some(800),
            featured: false,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            owner: ListingOwner {
                profile_id: ProfileId::new(3).unwrap(),
                name: "Tara".to_string(),
                avatar_url: "/assets/img/avatar.svg".to_string(),
            },
        };

        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["reviewCount"], 2);
        assert_eq!(json["hourlyRate"], 800);
        assert_eq!(json["owner"]["profileId"], 3);
        assert_eq!(json["owner"]["avatarUrl"], "/assets/img/avatar.svg");
        assert!(json["owner"].get("avatar_url").is_none());
    }
}
