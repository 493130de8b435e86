//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::message::{ConversationSummary, Message, NewMessage};
use crate::domain::profile::{NewProfile, Profile, UpdateProfile};
use crate::domain::review::{NewReview, Review};
use crate::domain::stats::DashboardStats;
use crate::domain::teacher::{NewTeacher, Teacher, TeacherRecord, UpdateTeacher};
use crate::domain::types::{ProfileId, TeacherId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ConversationQuery, FavouriteReader, FavouriteWriter, MessageReader, MessageWriter, Pagination,
    ProfileReader, ProfileWriter, ReviewReader, ReviewWriter, StatsReader, TeacherListQuery,
    TeacherReader, TeacherWriter,
};

mock! {
    pub Repository {}

    impl ProfileReader for Repository {
        fn get_profile_by_id(&self, id: ProfileId) -> RepositoryResult<Option<Profile>>;
        fn get_profile_by_sub(&self, user_sub: &str) -> RepositoryResult<Option<Profile>>;
    }

    impl ProfileWriter for Repository {
        fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile>;
        fn create_teacher_profile(
            &self,
            new_profile: &NewProfile,
            teacher: &NewTeacher,
        ) -> RepositoryResult<Profile>;
        fn update_profile(&self, id: ProfileId, updates: &UpdateProfile) -> RepositoryResult<Profile>;
    }

    impl TeacherReader for Repository {
        fn get_teacher_by_id(&self, id: TeacherId) -> RepositoryResult<Option<TeacherRecord>>;
        fn get_teacher_by_profile(
            &self,
            profile_id: ProfileId,
        ) -> RepositoryResult<Option<TeacherRecord>>;
        fn search_teachers(
            &self,
            query: TeacherListQuery,
        ) -> RepositoryResult<(usize, Vec<TeacherRecord>)>;
    }

    impl TeacherWriter for Repository {
        fn update_teacher(&self, id: TeacherId, updates: &UpdateTeacher) -> RepositoryResult<Teacher>;
        fn set_featured_until(
            &self,
            id: TeacherId,
            until: Option<NaiveDateTime>,
        ) -> RepositoryResult<Teacher>;
    }

    impl MessageReader for Repository {
        fn list_conversation(
            &self,
            query: ConversationQuery,
        ) -> RepositoryResult<(usize, Vec<Message>)>;
        fn list_conversations(
            &self,
            profile_id: ProfileId,
        ) -> RepositoryResult<Vec<ConversationSummary>>;
        fn count_unread_messages(&self, profile_id: ProfileId) -> RepositoryResult<usize>;
    }

    impl MessageWriter for Repository {
        fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message>;
        fn mark_conversation_read(
            &self,
            recipient_id: ProfileId,
            sender_id: ProfileId,
        ) -> RepositoryResult<usize>;
    }

    impl ReviewReader for Repository {
        fn list_reviews(
            &self,
            teacher_id: TeacherId,
            pagination: Option<Pagination>,
        ) -> RepositoryResult<(usize, Vec<(Review, Profile)>)>;
        fn review_exists(&self, teacher_id: TeacherId, author_id: ProfileId) -> RepositoryResult<bool>;
    }

    impl ReviewWriter for Repository {
        fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
    }

    impl FavouriteReader for Repository {
        fn list_favourite_teachers(
            &self,
            profile_id: ProfileId,
        ) -> RepositoryResult<Vec<TeacherRecord>>;
        fn is_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId) -> RepositoryResult<bool>;
    }

    impl FavouriteWriter for Repository {
        fn add_favourite(&self, profile_id: ProfileId, teacher_id: TeacherId) -> RepositoryResult<()>;
        fn remove_favourite(
            &self,
            profile_id: ProfileId,
            teacher_id: TeacherId,
        ) -> RepositoryResult<()>;
    }

    impl StatsReader for Repository {
        fn dashboard_stats(&self, now: NaiveDateTime) -> RepositoryResult<DashboardStats>;
    }
}
