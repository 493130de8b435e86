//! Admin-only forms.

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::TeacherId;
use crate::forms::FormError;

/// Longest promotion that can be granted at once, in days.
pub const MAX_FEATURED_DAYS: i64 = 365;

#[derive(Debug, Deserialize, Validate)]
pub struct FeatureTeacherForm {
    pub teacher_id: i32,
    /// `0` clears the promotion.
    #[validate(range(min = 0, max = 365))]
    pub days: i64,
}

pub struct FeatureTeacherPayload {
    pub teacher_id: TeacherId,
    pub days: i64,
}

impl TryFrom<FeatureTeacherForm> for FeatureTeacherPayload {
    type Error = FormError;

    fn try_from(form: FeatureTeacherForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let teacher_id = TeacherId::new(form.teacher_id).map_err(|_| FormError::InvalidTeacherId)?;
        Ok(Self {
            teacher_id,
            days: form.days,
        })
    }
}

impl FeatureTeacherPayload {
    /// Expiry of the promotion, or `None` when it should be cleared.
    pub fn featured_until(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        (self.days > 0).then(|| now + Duration::days(self.days))
    }
}
