//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, bounded ratings) so that once a value reaches
//! the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string exceeded the allowed length.
    #[error("value is longer than {0} characters")]
    TooLong(usize),
    /// Role name is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
    /// Review rating was outside of 1..=5.
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
                Self::new(value)
            }
        }
    };
}

id_newtype!(ProfileId, "Unique identifier for a user profile.");
id_newtype!(TeacherId, "Unique identifier for a teacher listing.");
id_newtype!(MessageId, "Unique identifier for a message.");
id_newtype!(ReviewId, "Unique identifier for a review.");

/// Marketplace role of a profile.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Parent,
    Teacher,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Roles a user may pick for themselves during onboarding.
    pub const fn is_self_assignable(self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(TypeConstraintError::UnknownRole(other.to_string())),
        }
    }
}

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed, non-empty display name with bounded length.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub const MAX_LEN: usize = 128;

    pub fn new<S: AsRef<str>>(name: S) -> Result<Self, TypeConstraintError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(TypeConstraintError::TooLong(Self::MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single subject tag attached to a teacher, e.g. `Math`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    pub const MAX_LEN: usize = 64;

    pub fn new<S: AsRef<str>>(subject: S) -> Result<Self, TypeConstraintError> {
        let collapsed = subject
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if collapsed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if collapsed.chars().count() > Self::MAX_LEN {
            return Err(TypeConstraintError::TooLong(Self::MAX_LEN));
        }
        Ok(Self(collapsed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Star rating left in a review.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReviewRating(i32);

impl ReviewRating {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::RatingOutOfRange)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ReviewRating {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(TeacherId::new(1).is_ok());
        assert_eq!(TeacherId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ProfileId::new(-3), Err(TypeConstraintError::NonPositiveId));
    }

    #[test]
    fn ids_parse_from_path_segments() {
        assert_eq!("42".parse::<TeacherId>().map(TeacherId::get), Ok(42));
        assert!(matches!(
            "abc".parse::<TeacherId>(),
            Err(TypeConstraintError::InvalidValue(_))
        ));
        assert_eq!(
            "0".parse::<TeacherId>(),
            Err(TypeConstraintError::NonPositiveId)
        );
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Anna@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "anna@example.com");
        assert_eq!(Email::new("nope"), Err(TypeConstraintError::InvalidEmail));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Student, Role::Parent, Role::Teacher, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(" Teacher ".parse::<Role>(), Ok(Role::Teacher));
        assert!("janitor".parse::<Role>().is_err());
        assert!(!Role::Admin.is_self_assignable());
    }

    #[test]
    fn subject_collapses_whitespace() {
        let subject = Subject::new("  Linear   Algebra ").unwrap();
        assert_eq!(subject.as_str(), "Linear Algebra");
        assert_eq!(Subject::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn display_name_bounds() {
        assert!(DisplayName::new("Anna").is_ok());
        assert_eq!(DisplayName::new(" "), Err(TypeConstraintError::EmptyString));
        let long = "x".repeat(DisplayName::MAX_LEN + 1);
        assert_eq!(
            DisplayName::new(long),
            Err(TypeConstraintError::TooLong(DisplayName::MAX_LEN))
        );
    }

    #[test]
    fn review_rating_range() {
        assert!(ReviewRating::new(1).is_ok());
        assert!(ReviewRating::new(5).is_ok());
        assert_eq!(
            ReviewRating::new(0),
            Err(TypeConstraintError::RatingOutOfRange)
        );
        assert_eq!(
            ReviewRating::new(6),
            Err(TypeConstraintError::RatingOutOfRange)
        );
    }
}
