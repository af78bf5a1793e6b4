//! Admin-facing DTOs: course management, reports, and config updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::UnsupportedShape;
use super::{ResponseFactory, Shape};
use crate::api::extract::{Validate, require_non_blank};
use crate::domain::{Course, CourseId, GradingScheme, ReportBundle, Schedule};
use crate::error::EnrollError;

/// Seats given to a course created without an explicit capacity.
pub const DEFAULT_CAPACITY: u32 = 20;

/// Request body for `POST /course`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    /// New course key.
    #[schema(value_type = String, example = "CS401")]
    pub course_id: CourseId,
    /// Display name.
    pub name: String,
    /// Instructor name.
    pub instructor: String,
    /// Seats; defaults to 20.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Required course ids.
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub prerequisites: Option<Vec<CourseId>>,
    /// Grading policy; defaults to letter grades.
    #[serde(default)]
    pub grading_scheme: Option<GradingScheme>,
    /// Meeting slot; defaults to the standard slot.
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

impl Validate for CreateCourseRequest {
    fn validate(&self) -> Result<(), EnrollError> {
        require_non_blank("course_id", self.course_id.as_str())?;
        require_non_blank("name", &self.name)?;
        require_non_blank("instructor", &self.instructor)?;
        if self.capacity == Some(0) {
            return Err(EnrollError::InvalidField {
                field: "capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(prerequisites) = &self.prerequisites {
            for prerequisite in prerequisites {
                require_non_blank("prerequisites", prerequisite.as_str())?;
            }
        }
        Ok(())
    }
}

impl CreateCourseRequest {
    /// Builds the course described by this request.
    #[must_use]
    pub fn into_course(self) -> Course {
        let mut course = Course::new(
            self.course_id,
            self.name,
            self.instructor,
            self.capacity.unwrap_or(DEFAULT_CAPACITY),
        )
        .with_prerequisites(self.prerequisites.unwrap_or_default())
        .with_grading_scheme(self.grading_scheme.unwrap_or_default());
        if let Some(schedule) = self.schedule {
            course.schedule = schedule;
        }
        course
    }
}

/// Request body for `POST /config`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ConfigUpdateRequest {
    /// Announcement text.
    #[serde(default)]
    pub message: Option<String>,
}

/// A course as administrators see it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminCourseView {
    /// Course key.
    #[schema(value_type = String)]
    pub course_id: CourseId,
    /// Course name.
    pub name: String,
    /// Instructor name.
    pub instructor: String,
    /// Seats.
    pub capacity: u32,
    /// Enrolled students.
    pub enrolled: u32,
    /// Enrollment in percent of capacity, 2 decimals.
    pub utilization_rate: f64,
    /// Meeting slot.
    pub schedule: Schedule,
    /// Required course ids.
    #[schema(value_type = Vec<String>)]
    pub prerequisites: Vec<CourseId>,
    /// Grading policy.
    pub grading_scheme: GradingScheme,
    /// Always `"active"`.
    pub status: String,
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UtilizationRow {
    /// Course key.
    #[schema(value_type = String)]
    pub course_id: CourseId,
    /// Course name.
    pub name: String,
    /// Enrolled students.
    pub enrolled: u32,
    /// Seats.
    pub capacity: u32,
    /// Percent, 2 decimals.
    pub utilization: f64,
}

/// Report totals.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UtilizationSummaryView {
    /// Number of courses.
    pub total_courses: usize,
    /// Sum of capacities.
    pub total_capacity: u64,
    /// Sum of enrollments.
    pub total_enrolled: u64,
    /// Percent, 2 decimals.
    pub overall_utilization: f64,
}

/// Response body for `GET /reports/enrollment`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportView {
    /// Report kind.
    pub report_type: String,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Per-course rows.
    pub data: Vec<UtilizationRow>,
    /// Totals.
    pub summary: UtilizationSummaryView,
}

/// Course listing for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminCourseList {
    /// One entry per course.
    pub courses: Vec<AdminPayload>,
}

/// Response body for a successful `POST /course`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreateCourseResponse {
    /// Always `true`.
    pub success: bool,
    /// The created course.
    pub course: AdminPayload,
}

/// Output of [`AdminResponseFactory`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AdminPayload {
    /// One course.
    Course(AdminCourseView),
    /// A report.
    Report(ReportView),
    /// Shape not available to administrators.
    Unsupported(UnsupportedShape),
}

/// Shapes courses and reports for the admin portal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminResponseFactory;

impl ResponseFactory for AdminResponseFactory {
    type Payload = AdminPayload;

    fn shape(&self, data: Shape<'_>) -> AdminPayload {
        match data {
            Shape::Course(course) => AdminPayload::Course(course_view(course)),
            Shape::Report(report) => AdminPayload::Report(report_view(report)),
            Shape::Courses(_) | Shape::Roster(_) => {
                AdminPayload::Unsupported(UnsupportedShape::default())
            }
        }
    }
}

fn course_view(course: &Course) -> AdminCourseView {
    AdminCourseView {
        course_id: course.course_id.clone(),
        name: course.name.clone(),
        instructor: course.instructor.clone(),
        capacity: course.capacity,
        enrolled: course.enrolled,
        utilization_rate: course.utilization(),
        schedule: course.schedule.clone(),
        prerequisites: course.prerequisites.clone(),
        grading_scheme: course.grading_scheme,
        status: "active".to_string(),
    }
}

fn report_view(report: &ReportBundle) -> ReportView {
    ReportView {
        report_type: report.report_type.clone(),
        generated_at: report.generated_at,
        data: report
            .rows
            .iter()
            .map(|row| UtilizationRow {
                course_id: row.course_id.clone(),
                name: row.name.clone(),
                enrolled: row.enrolled,
                capacity: row.capacity,
                utilization: row.utilization,
            })
            .collect(),
        summary: UtilizationSummaryView {
            total_courses: report.summary.total_courses,
            total_capacity: report.summary.total_capacity,
            total_enrolled: report.summary.total_enrolled,
            overall_utilization: report.summary.overall_utilization,
        },
    }
}
