//! DTO modules that bridge services with templates and APIs.

pub mod admin;
pub mod listings;
pub mod messages;
pub mod teachers;
