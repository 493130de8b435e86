//! Database models shared across the marketplace repository.

pub mod config;
pub mod favourite;
pub mod message;
pub mod profile;
pub mod review;
pub mod teacher;
