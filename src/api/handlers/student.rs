//! Student portal handlers: UI, course listing, enroll, drop.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    EnrollResponse, EnrollmentRequest, MessageResponse, ResponseFactory, Role, RoleUi, Shape,
    StudentCourseList, StudentResponseFactory,
};
use crate::api::extract::ValidatedJson;
use crate::app_state::AppState;
use crate::error::{EnrollError, ErrorResponse};

/// `GET /ui` — Student portal descriptor.
#[utoipa::path(
    get,
    path = "/ui",
    tag = "Student",
    summary = "Student UI descriptor",
    responses(
        (status = 200, description = "Menus, permissions, and routes", body = RoleUi),
    )
)]
pub async fn ui() -> Json<RoleUi> {
    Json(Role::Student.ui())
}

/// `GET /courses` — All courses with seat availability.
#[utoipa::path(
    get,
    path = "/courses",
    tag = "Student",
    summary = "List courses",
    description = "Returns every course with free seats and whether enrollment is open.",
    responses(
        (status = 200, description = "Course listing", body = StudentCourseList),
    )
)]
pub async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    let courses = state.student.list_courses().await;
    Json(StudentResponseFactory.shape(Shape::Courses(&courses)))
}

/// `POST /enroll` — Enroll a student in a course.
///
/// # Errors
///
/// Returns [`EnrollError`] on a bad payload, unknown course, or failed
/// enrollment check.
#[utoipa::path(
    post,
    path = "/enroll",
    tag = "Student",
    summary = "Enroll in a course",
    description = "Runs the enrollment checks (duplicate, prerequisites, capacity, schedule) and takes a seat. The check trace is returned either way.",
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Enrolled", body = EnrollResponse),
        (status = 400, description = "Invalid payload or failed check", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    )
)]
pub async fn enroll(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EnrollmentRequest>,
) -> Result<Json<EnrollResponse>, EnrollError> {
    let outcome = state.student.enroll(&req.student_id, &req.course_id).await?;
    Ok(Json(EnrollResponse {
        success: true,
        message: format!("Successfully enrolled in {}", outcome.course_name),
        validation_results: outcome.validation_results,
    }))
}

/// `POST /drop` — Drop a course.
///
/// # Errors
///
/// Returns [`EnrollError`] on a bad payload, unknown course, or when the
/// student is not taking the course.
#[utoipa::path(
    post,
    path = "/drop",
    tag = "Student",
    summary = "Drop a course",
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Dropped", body = MessageResponse),
        (status = 400, description = "Invalid payload or not enrolled", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    )
)]
pub async fn drop_course(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EnrollmentRequest>,
) -> Result<Json<MessageResponse>, EnrollError> {
    let course_name = state
        .student
        .drop_course(&req.student_id, &req.course_id)
        .await?;
    Ok(Json(MessageResponse::ok(format!(
        "Successfully dropped {course_name}"
    ))))
}

/// Student portal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ui", get(ui))
        .route("/courses", get(list_courses))
        .route("/enroll", post(enroll))
        .route("/drop", post(drop_course))
}
