//! Data Transfer Objects for REST request/response serialization.
//!
//! Each role has a [`ResponseFactory`] that projects domain entities into
//! its own view. Factories are pure: shaping the same entity twice gives
//! identical payloads.

pub mod admin_dto;
pub mod common_dto;
pub mod faculty_dto;
pub mod student_dto;

use serde::Serialize;

use crate::domain::{Course, ReportBundle, RosterBundle};

pub use admin_dto::*;
pub use common_dto::*;
pub use faculty_dto::*;
pub use student_dto::*;

/// Entity handed to a [`ResponseFactory`].
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// One course.
    Course(&'a Course),
    /// A course listing.
    Courses(&'a [Course]),
    /// A class roster.
    Roster(&'a RosterBundle),
    /// A generated report.
    Report(&'a ReportBundle),
}

impl Shape<'_> {
    /// Variant name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Course(_) => "course",
            Self::Courses(_) => "courses",
            Self::Roster(_) => "roster",
            Self::Report(_) => "report",
        }
    }
}

/// Projects entities into a role-specific response payload.
///
/// Unsupported shapes produce an explicit error payload
/// (`{"error": "Unsupported data type"}`) instead of failing.
pub trait ResponseFactory {
    /// Serializable payload produced by this factory.
    type Payload: Serialize;

    /// Shapes `data` for this role.
    fn shape(&self, data: Shape<'_>) -> Self::Payload;
}
