//! Faculty-facing DTOs: rosters, course load, and grade submission.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::UnsupportedShape;
use super::{ResponseFactory, Shape};
use crate::api::extract::{Validate, require_non_blank};
use crate::domain::{Course, CourseId, GradeEntry, GradeProcessing, GradingScheme, RosterBundle};
use crate::error::EnrollError;

/// Request body for `POST /submit_grades`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitGradesRequest {
    /// Course being graded.
    #[schema(value_type = String, example = "CS101")]
    pub course_id: CourseId,
    /// One entry per student.
    pub grades: Vec<GradeEntry>,
}

impl Validate for SubmitGradesRequest {
    fn validate(&self) -> Result<(), EnrollError> {
        require_non_blank("course_id", self.course_id.as_str())?;
        for entry in &self.grades {
            require_non_blank("grades.student_id", &entry.student_id)?;
        }
        Ok(())
    }
}

/// Response body for a successful `POST /submit_grades`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitGradesResponse {
    /// Always `true`.
    pub success: bool,
    /// `"Grades submitted for <n> students in <course>"`.
    pub message: String,
    /// Scheme check outcome.
    pub processing: GradeProcessing,
}

/// A course as its instructor sees it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FacultyCourseView {
    /// Course key.
    #[schema(value_type = String)]
    pub course_id: CourseId,
    /// Course name.
    pub name: String,
    /// Enrolled students.
    pub enrollment_count: u32,
    /// Seats.
    pub capacity: u32,
    /// Enrollment in percent of capacity, 2 decimals.
    pub enrollment_percentage: f64,
    /// Grading policy applied on submission.
    pub grading_scheme: GradingScheme,
}

/// One roster line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RosterStudent {
    /// Student id.
    pub student_id: String,
    /// Display name.
    pub name: String,
}

/// Class roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RosterView {
    /// Course key.
    #[schema(value_type = String)]
    pub course_id: CourseId,
    /// Students in roster order.
    pub students: Vec<RosterStudent>,
    /// Number of students listed.
    pub total_enrolled: usize,
}

/// Course listing for `GET /my_courses/{faculty_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FacultyCourseList {
    /// One entry per course.
    pub courses: Vec<FacultyPayload>,
}

/// Output of [`FacultyResponseFactory`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FacultyPayload {
    /// One course.
    Course(FacultyCourseView),
    /// A roster.
    Roster(RosterView),
    /// Shape not available to faculty.
    Unsupported(UnsupportedShape),
}

/// Shapes courses and rosters for the faculty portal.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacultyResponseFactory;

impl ResponseFactory for FacultyResponseFactory {
    type Payload = FacultyPayload;

    fn shape(&self, data: Shape<'_>) -> FacultyPayload {
        match data {
            Shape::Course(course) => FacultyPayload::Course(course_view(course)),
            Shape::Roster(roster) => FacultyPayload::Roster(roster_view(roster)),
            Shape::Courses(_) | Shape::Report(_) => {
                FacultyPayload::Unsupported(UnsupportedShape::default())
            }
        }
    }
}

fn course_view(course: &Course) -> FacultyCourseView {
    FacultyCourseView {
        course_id: course.course_id.clone(),
        name: course.name.clone(),
        enrollment_count: course.enrolled,
        capacity: course.capacity,
        enrollment_percentage: course.utilization(),
        grading_scheme: course.grading_scheme,
    }
}

fn roster_view(roster: &RosterBundle) -> RosterView {
    let students: Vec<RosterStudent> = roster
        .students
        .iter()
        .map(|id| RosterStudent {
            student_id: id.to_string(),
            name: format!("Student {id}"),
        })
        .collect();
    RosterView {
        course_id: roster.course_id.clone(),
        total_enrolled: students.len(),
        students,
    }
}
