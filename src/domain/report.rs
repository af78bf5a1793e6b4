//! Enrollment utilization report.

use chrono::{DateTime, Utc};

use super::course::percentage;
use super::{Course, CourseId};

/// Utilization of one course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseUtilization {
    /// Course key.
    pub course_id: CourseId,
    /// Course name.
    pub name: String,
    /// Enrolled students.
    pub enrolled: u32,
    /// Seats.
    pub capacity: u32,
    /// `enrolled / capacity` in percent, 2 decimals.
    pub utilization: f64,
}

/// Totals over every course in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilizationSummary {
    /// Number of courses.
    pub total_courses: usize,
    /// Sum of capacities.
    pub total_capacity: u64,
    /// Sum of enrollments.
    pub total_enrolled: u64,
    /// `total_enrolled / total_capacity` in percent, 2 decimals.
    pub overall_utilization: f64,
}

/// A generated report. The generation time is fixed when the report is
/// built so shaping it is repeatable.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBundle {
    /// Report kind, e.g. `"enrollment_summary"`.
    pub report_type: String,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Per-course rows.
    pub rows: Vec<CourseUtilization>,
    /// Aggregate row.
    pub summary: UtilizationSummary,
}

impl ReportBundle {
    /// Builds the enrollment summary for `courses`.
    #[must_use]
    pub fn enrollment_summary(courses: &[Course], generated_at: DateTime<Utc>) -> Self {
        let rows: Vec<CourseUtilization> = courses
            .iter()
            .map(|course| CourseUtilization {
                course_id: course.course_id.clone(),
                name: course.name.clone(),
                enrolled: course.enrolled,
                capacity: course.capacity,
                utilization: course.utilization(),
            })
            .collect();

        let total_capacity: u64 = courses.iter().map(|c| u64::from(c.capacity)).sum();
        let total_enrolled: u64 = courses.iter().map(|c| u64::from(c.enrolled)).sum();

        Self {
            report_type: "enrollment_summary".to_string(),
            generated_at,
            summary: UtilizationSummary {
                total_courses: rows.len(),
                total_capacity,
                total_enrolled,
                overall_utilization: percentage(total_enrolled, total_capacity),
            },
            rows,
        }
    }
}
