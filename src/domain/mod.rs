pub mod avatar;
pub mod listing;
pub mod message;
pub mod profile;
pub mod review;
pub mod stats;
pub mod teacher;
pub mod types;
