//! Per-course class rosters.
//!
//! Rosters are a projection owned by the faculty side. They are not joined
//! live against enrollment state; enrollment and drop events keep them
//! eventually consistent.

use std::collections::HashMap;

use super::{CourseId, StudentId};

/// Roster of one course, ready for response shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterBundle {
    /// Course the roster belongs to.
    pub course_id: CourseId,
    /// Enrolled students in roster order.
    pub students: Vec<StudentId>,
}

/// All rosters, each an ordered list without duplicates.
#[derive(Debug, Clone, Default)]
pub struct RosterBook {
    rosters: HashMap<CourseId, Vec<StudentId>>,
}

impl RosterBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `course_id` has a roster, leaving an existing one untouched.
    pub fn open(&mut self, course_id: CourseId) {
        self.rosters.entry(course_id).or_default();
    }

    /// Appends `student_id` unless already listed. Returns `true` if added.
    pub fn add(&mut self, course_id: &CourseId, student_id: StudentId) -> bool {
        let roster = self.rosters.entry(course_id.clone()).or_default();
        if roster.contains(&student_id) {
            return false;
        }
        roster.push(student_id);
        true
    }

    /// Removes `student_id`. Returns `true` if it was listed.
    pub fn remove(&mut self, course_id: &CourseId, student_id: &StudentId) -> bool {
        let Some(roster) = self.rosters.get_mut(course_id) else {
            return false;
        };
        let before = roster.len();
        roster.retain(|s| s != student_id);
        roster.len() != before
    }

    /// Students of `course_id`; empty if no roster was opened.
    #[must_use]
    pub fn students(&self, course_id: &CourseId) -> &[StudentId] {
        self.rosters.get(course_id).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `course_id` has a roster.
    #[must_use]
    pub fn has_roster(&self, course_id: &CourseId) -> bool {
        self.rosters.contains_key(course_id)
    }

    /// Bundles the roster of `course_id`.
    #[must_use]
    pub fn bundle(&self, course_id: &CourseId) -> RosterBundle {
        RosterBundle {
            course_id: course_id.clone(),
            students: self.students(course_id).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_ordered() {
        let mut book = RosterBook::new();
        let cs = CourseId::from("CS101");
        assert!(book.add(&cs, StudentId::from("STU002")));
        assert!(book.add(&cs, StudentId::from("STU001")));
        assert!(!book.add(&cs, StudentId::from("STU002")));
        assert_eq!(
            book.students(&cs),
            &[StudentId::from("STU002"), StudentId::from("STU001")]
        );
    }

    #[test]
    fn remove_reports_membership() {
        let mut book = RosterBook::new();
        let cs = CourseId::from("CS101");
        book.add(&cs, StudentId::from("STU001"));
        assert!(book.remove(&cs, &StudentId::from("STU001")));
        assert!(!book.remove(&cs, &StudentId::from("STU001")));
        assert!(!book.remove(&CourseId::from("CS999"), &StudentId::from("STU001")));
    }

    #[test]
    fn open_keeps_existing_roster() {
        let mut book = RosterBook::new();
        let cs = CourseId::from("CS101");
        book.add(&cs, StudentId::from("STU001"));
        book.open(cs.clone());
        assert_eq!(book.students(&cs).len(), 1);

        let fresh = CourseId::from("CS401");
        book.open(fresh.clone());
        assert!(book.has_roster(&fresh));
        assert!(book.bundle(&fresh).students.is_empty());
    }
}
