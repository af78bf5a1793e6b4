//! Demo data loaded at startup when `SEED_DEMO_DATA` is on.

use super::{Course, CourseId, RosterBook, StudentId, StudentRecord};

/// The three demo courses.
#[must_use]
pub fn demo_courses() -> Vec<Course> {
    vec![
        Course::new("CS101", "Intro to Programming", "Dr. Smith", 30).with_enrolled(25),
        Course::new("CS201", "Data Structures", "Dr. Johnson", 25)
            .with_enrolled(20)
            .with_prerequisites(["CS101"]),
        Course::new("CS301", "Algorithms", "Dr. Brown", 20)
            .with_enrolled(15)
            .with_prerequisites(["CS101", "CS201"]),
    ]
}

/// Student records known before any enrollment.
#[must_use]
pub fn demo_students() -> Vec<StudentRecord> {
    vec![StudentRecord::new(StudentId::from("STU001")).with_completed(["CS101"])]
}

/// Rosters as the faculty side sees them at startup.
#[must_use]
pub fn demo_rosters() -> RosterBook {
    let mut book = RosterBook::new();
    let rosters = [
        ("CS101", ["STU001", "STU002", "STU003"]),
        ("CS201", ["STU001", "STU004", "STU005"]),
    ];
    for (course, students) in rosters {
        let course_id = CourseId::from(course);
        for student in students {
            book.add(&course_id, StudentId::from(student));
        }
    }
    book.open(CourseId::from("CS301"));
    book
}
