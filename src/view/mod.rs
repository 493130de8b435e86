//! Client-side view models driven by the listing API.

pub mod find_teachers;
