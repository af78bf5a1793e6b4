//! REST endpoint handlers organized by portal.

pub mod admin;
pub mod faculty;
pub mod student;
pub mod system;
