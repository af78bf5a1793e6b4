//! Course entity and its weekly schedule.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CourseId;
use super::grading::GradingScheme;

/// Weekly meeting slot of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    /// Meeting days (e.g. `["Mon", "Wed"]`).
    pub days: Vec<String>,
    /// Time range (e.g. `"10:00-11:30"`).
    pub time: String,
    /// Room or building.
    pub location: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            days: vec!["Mon".to_string(), "Wed".to_string()],
            time: "10:00-11:30".to_string(),
            location: "Room 101".to_string(),
        }
    }
}

/// A course offering.
///
/// `enrolled` is kept in `0..=capacity`: [`Course::reserve_seat`] refuses to
/// go past capacity and [`Course::release_seat`] saturates at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    /// Unique course key.
    pub course_id: CourseId,
    /// Display name.
    pub name: String,
    /// Instructor name.
    pub instructor: String,
    /// Maximum number of enrolled students (always > 0).
    pub capacity: u32,
    /// Current number of enrolled students.
    pub enrolled: u32,
    /// Course ids that must be completed first, in declaration order.
    pub prerequisites: Vec<CourseId>,
    /// Meeting slot.
    pub schedule: Schedule,
    /// Grading policy applied to grade submissions.
    pub grading_scheme: GradingScheme,
}

impl Course {
    /// Creates a course with no enrollments, the default schedule, and
    /// letter grading.
    #[must_use]
    pub fn new(
        course_id: impl Into<CourseId>,
        name: impl Into<String>,
        instructor: impl Into<String>,
        capacity: u32,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            name: name.into(),
            instructor: instructor.into(),
            capacity,
            enrolled: 0,
            prerequisites: Vec::new(),
            schedule: Schedule::default(),
            grading_scheme: GradingScheme::default(),
        }
    }

    /// Sets the initial enrollment count, clamped to capacity.
    #[must_use]
    pub fn with_enrolled(mut self, enrolled: u32) -> Self {
        self.enrolled = enrolled.min(self.capacity);
        self
    }

    /// Sets the prerequisite list.
    #[must_use]
    pub fn with_prerequisites<I, C>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CourseId>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the grading scheme.
    #[must_use]
    pub fn with_grading_scheme(mut self, scheme: GradingScheme) -> Self {
        self.grading_scheme = scheme;
        self
    }

    /// Seats still free.
    #[must_use]
    pub fn available_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    /// Returns `true` when no seat is left.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }

    /// Enrollment as a percentage of capacity, rounded to 2 decimals.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        percentage(u64::from(self.enrolled), u64::from(self.capacity))
    }

    /// Takes one seat. Returns `false` (and changes nothing) when full.
    pub fn reserve_seat(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.enrolled += 1;
        true
    }

    /// Gives back one seat, never going below zero.
    pub fn release_seat(&mut self) {
        self.enrolled = self.enrolled.saturating_sub(1);
    }
}

/// `part / whole * 100`, rounded to 2 decimals; `0.0` when `whole` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
