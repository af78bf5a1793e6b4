//! Student-facing DTOs: course views and enrollment requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::UnsupportedShape;
use super::{ResponseFactory, Shape};
use crate::api::extract::{Validate, require_non_blank};
use crate::domain::{Course, CourseId, Schedule, StudentId, ValidationResult};
use crate::error::EnrollError;

/// Request body for `POST /enroll` and `POST /drop`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnrollmentRequest {
    /// Student making the request.
    #[schema(value_type = String, example = "STU001")]
    pub student_id: StudentId,
    /// Target course.
    #[schema(value_type = String, example = "CS201")]
    pub course_id: CourseId,
}

impl Validate for EnrollmentRequest {
    fn validate(&self) -> Result<(), EnrollError> {
        require_non_blank("student_id", self.student_id.as_str())?;
        require_non_blank("course_id", self.course_id.as_str())
    }
}

/// Response body for a successful `POST /enroll`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollResponse {
    /// Always `true`.
    pub success: bool,
    /// `"Successfully enrolled in <course name>"`.
    pub message: String,
    /// Every enrollment check that ran.
    pub validation_results: Vec<ValidationResult>,
}

/// A course as a student sees it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentCourseView {
    /// Course key.
    #[schema(value_type = String)]
    pub course_id: CourseId,
    /// Course name.
    pub name: String,
    /// Instructor name.
    pub instructor: String,
    /// Free seats.
    pub available_seats: u32,
    /// Meeting slot.
    pub schedule: Schedule,
    /// Required course ids.
    #[schema(value_type = Vec<String>)]
    pub prerequisites: Vec<CourseId>,
    /// `true` while seats are free.
    pub can_enroll: bool,
}

/// Course listing for students.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentCourseList {
    /// Courses ordered by id.
    pub courses: Vec<StudentCourseView>,
}

/// Output of [`StudentResponseFactory`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum StudentPayload {
    /// One course.
    Course(StudentCourseView),
    /// A listing.
    Courses(StudentCourseList),
    /// Shape not available to students.
    Unsupported(UnsupportedShape),
}

/// Shapes courses for the student portal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentResponseFactory;

impl StudentResponseFactory {
    fn course_view(course: &Course) -> StudentCourseView {
        let available_seats = course.available_seats();
        StudentCourseView {
            course_id: course.course_id.clone(),
            name: course.name.clone(),
            instructor: course.instructor.clone(),
            available_seats,
            schedule: course.schedule.clone(),
            prerequisites: course.prerequisites.clone(),
            can_enroll: available_seats > 0,
        }
    }
}

impl ResponseFactory for StudentResponseFactory {
    type Payload = StudentPayload;

    fn shape(&self, data: Shape<'_>) -> StudentPayload {
        match data {
            Shape::Course(course) => StudentPayload::Course(Self::course_view(course)),
            Shape::Courses(courses) => StudentPayload::Courses(StudentCourseList {
                courses: courses.iter().map(Self::course_view).collect(),
            }),
            Shape::Roster(_) | Shape::Report(_) => {
                StudentPayload::Unsupported(UnsupportedShape::default())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn full_course_cannot_be_enrolled() {
        let course = Course::new("CS100", "Seminar", "Dr. Full", 10).with_enrolled(10);
        let StudentPayload::Course(view) = StudentResponseFactory.shape(Shape::Course(&course))
        else {
            panic!("expected course view");
        };
        assert_eq!(view.available_seats, 0);
        assert!(!view.can_enroll);
    }

    #[test]
    fn listing_wraps_courses_key() {
        let courses = vec![Course::new("CS101", "Intro", "Dr. Smith", 30).with_enrolled(25)];
        let Ok(value) =
            serde_json::to_value(StudentResponseFactory.shape(Shape::Courses(&courses)))
        else {
            panic!("serialization failed");
        };
        assert_eq!(value["courses"][0]["available_seats"], 5);
        assert_eq!(value["courses"][0]["can_enroll"], true);
        assert_eq!(value["courses"][0]["schedule"]["location"], "Room 101");
    }

    #[test]
    fn blank_ids_fail_validation() {
        let req = EnrollmentRequest {
            student_id: StudentId::from(""),
            course_id: CourseId::from("CS101"),
        };
        assert!(matches!(
            req.validate(),
            Err(EnrollError::InvalidField { field: "student_id", .. })
        ));
    }
}
