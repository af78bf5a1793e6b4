//! Faculty portal handlers: UI, rosters, grades, course load.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    FacultyCourseList, FacultyPayload, FacultyResponseFactory, ResponseFactory, Role, RoleUi,
    RosterView, Shape, SubmitGradesRequest, SubmitGradesResponse,
};
use crate::api::extract::ValidatedJson;
use crate::app_state::AppState;
use crate::domain::CourseId;
use crate::error::{EnrollError, ErrorResponse};

/// `GET /ui` — Faculty portal descriptor.
#[utoipa::path(
    get,
    path = "/ui",
    tag = "Faculty",
    summary = "Faculty UI descriptor",
    responses(
        (status = 200, description = "Menus, permissions, and routes", body = RoleUi),
    )
)]
pub async fn ui() -> Json<RoleUi> {
    Json(Role::Faculty.ui())
}

/// `GET /roster/{course_id}` — Class roster.
///
/// Reflects enrollments and drops once their events were delivered.
///
/// # Errors
///
/// Returns [`EnrollError::CourseNotFound`] for an unknown course.
#[utoipa::path(
    get,
    path = "/roster/{course_id}",
    tag = "Faculty",
    summary = "Class roster",
    description = "Returns the students listed for a course. The roster follows enrollment asynchronously.",
    params(("course_id" = String, Path, description = "Course identifier")),
    responses(
        (status = 200, description = "Roster", body = RosterView),
        (status = 404, description = "Course not found", body = ErrorResponse),
    )
)]
pub async fn roster(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<FacultyPayload>, EnrollError> {
    let bundle = state.faculty.roster(&CourseId::new(course_id)).await?;
    Ok(Json(FacultyResponseFactory.shape(Shape::Roster(&bundle))))
}

/// `POST /submit_grades` — Submit a grade batch.
///
/// # Errors
///
/// Returns [`EnrollError`] on a bad payload, unknown course, or when any
/// grade is outside the course's scheme (nothing is stored then).
#[utoipa::path(
    post,
    path = "/submit_grades",
    tag = "Faculty",
    summary = "Submit grades",
    description = "Checks every grade against the course's grading scheme and stores the batch only if all are legal.",
    request_body = SubmitGradesRequest,
    responses(
        (status = 200, description = "Grades stored", body = SubmitGradesResponse),
        (status = 400, description = "Invalid payload or grade entries", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    )
)]
pub async fn submit_grades(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SubmitGradesRequest>,
) -> Result<Json<SubmitGradesResponse>, EnrollError> {
    let submission = state
        .faculty
        .submit_grades(&req.course_id, &req.grades)
        .await?;
    Ok(Json(SubmitGradesResponse {
        success: true,
        message: format!(
            "Grades submitted for {} students in {}",
            submission.stored, req.course_id
        ),
        processing: submission.processing,
    }))
}

/// `GET /my_courses/{faculty_id}` — Courses of a faculty member.
#[utoipa::path(
    get,
    path = "/my_courses/{faculty_id}",
    tag = "Faculty",
    summary = "Faculty course load",
    params(("faculty_id" = String, Path, description = "Faculty identifier")),
    responses(
        (status = 200, description = "Course listing", body = FacultyCourseList),
    )
)]
pub async fn my_courses(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Json<FacultyCourseList> {
    let courses = state.faculty.courses_for(&faculty_id).await;
    Json(FacultyCourseList {
        courses: courses
            .iter()
            .map(|course| FacultyResponseFactory.shape(Shape::Course(course)))
            .collect(),
    })
}

/// Faculty portal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ui", get(ui))
        .route("/roster/{course_id}", get(roster))
        .route("/submit_grades", post(submit_grades))
        .route("/my_courses/{faculty_id}", get(my_courses))
}
