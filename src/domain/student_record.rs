//! Per-student academic record.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CourseId, StudentId};

/// Action recorded in a student's enrollment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentAction {
    /// The student enrolled in the course.
    Enrolled,
    /// The student dropped the course.
    Dropped,
}

/// One entry of the append-only enrollment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Course the action applies to.
    pub course_id: CourseId,
    /// What happened.
    pub action: EnrollmentAction,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Completed and current courses of one student plus their history.
///
/// Created lazily on first enrollment. `enrollment_history` is only ever
/// appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    /// Owner of this record.
    pub student_id: StudentId,
    /// Courses passed in earlier terms.
    pub completed_courses: BTreeSet<CourseId>,
    /// Courses currently taken.
    pub current_courses: BTreeSet<CourseId>,
    enrollment_history: Vec<HistoryEntry>,
}

impl StudentRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            completed_courses: BTreeSet::new(),
            current_courses: BTreeSet::new(),
            enrollment_history: Vec::new(),
        }
    }

    /// Seeds completed courses.
    #[must_use]
    pub fn with_completed<I, C>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CourseId>,
    {
        self.completed_courses
            .extend(courses.into_iter().map(Into::into));
        self
    }

    /// Marks `course_id` as current and logs the enrollment.
    pub fn enroll(&mut self, course_id: CourseId) {
        self.current_courses.insert(course_id.clone());
        self.log(course_id, EnrollmentAction::Enrolled);
    }

    /// Removes `course_id` from current courses and logs the drop.
    ///
    /// Returns `false` (and logs nothing) if the student was not taking it.
    pub fn drop_course(&mut self, course_id: &CourseId) -> bool {
        if !self.current_courses.remove(course_id) {
            return false;
        }
        self.log(course_id.clone(), EnrollmentAction::Dropped);
        true
    }

    /// Returns `true` if the student currently takes `course_id`.
    #[must_use]
    pub fn is_taking(&self, course_id: &CourseId) -> bool {
        self.current_courses.contains(course_id)
    }

    /// The enrollment log, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.enrollment_history
    }

    fn log(&mut self, course_id: CourseId, action: EnrollmentAction) {
        self.enrollment_history.push(HistoryEntry {
            course_id,
            action,
            timestamp: Utc::now(),
        });
    }
}
