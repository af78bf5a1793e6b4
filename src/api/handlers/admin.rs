//! Admin portal handlers: UI, courses, reports, config.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AdminCourseList, AdminPayload, AdminResponseFactory, ConfigUpdateRequest,
    CreateCourseRequest, CreateCourseResponse, MessageResponse, ReportView, ResponseFactory, Role,
    RoleUi, Shape,
};
use crate::api::extract::ValidatedJson;
use crate::app_state::AppState;
use crate::error::{EnrollError, ErrorResponse};

/// `GET /ui` — Admin portal descriptor.
#[utoipa::path(
    get,
    path = "/ui",
    tag = "Admin",
    summary = "Admin UI descriptor",
    responses(
        (status = 200, description = "Menus, permissions, and routes", body = RoleUi),
    )
)]
pub async fn ui() -> Json<RoleUi> {
    Json(Role::Administrator.ui())
}

/// `GET /courses` — All courses with utilization.
#[utoipa::path(
    get,
    path = "/courses",
    tag = "Admin",
    summary = "List courses",
    responses(
        (status = 200, description = "Course listing", body = AdminCourseList),
    )
)]
pub async fn list_courses(State(state): State<AppState>) -> Json<AdminCourseList> {
    let courses = state.admin.list_courses().await;
    Json(AdminCourseList {
        courses: courses
            .iter()
            .map(|course| AdminResponseFactory.shape(Shape::Course(course)))
            .collect(),
    })
}

/// `POST /course` — Create a course.
///
/// # Errors
///
/// Returns [`EnrollError`] on a bad payload or a duplicate course id.
#[utoipa::path(
    post,
    path = "/course",
    tag = "Admin",
    summary = "Create a course",
    description = "Adds a course to the catalog and announces it to faculty and administrators. Capacity defaults to 20 and grading to letter grades.",
    request_body = CreateCourseRequest,
    responses(
        (status = 200, description = "Course created", body = CreateCourseResponse),
        (status = 400, description = "Invalid payload or duplicate id", body = ErrorResponse),
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCourseRequest>,
) -> Result<Json<CreateCourseResponse>, EnrollError> {
    let course = state.admin.create_course(req.into_course()).await?;
    Ok(Json(CreateCourseResponse {
        success: true,
        course: AdminResponseFactory.shape(Shape::Course(&course)),
    }))
}

/// `GET /reports/enrollment` — Enrollment utilization report.
#[utoipa::path(
    get,
    path = "/reports/enrollment",
    tag = "Admin",
    summary = "Enrollment report",
    description = "Per-course and overall seat utilization, rounded to two decimals.",
    responses(
        (status = 200, description = "Report", body = ReportView),
    )
)]
pub async fn enrollment_report(State(state): State<AppState>) -> Json<AdminPayload> {
    let report = state.admin.enrollment_report().await;
    Json(AdminResponseFactory.shape(Shape::Report(&report)))
}

/// `POST /config` — Announce a system configuration change.
///
/// Accepts any body; a missing or unreadable message falls back to the
/// default announcement.
#[utoipa::path(
    post,
    path = "/config",
    tag = "Admin",
    summary = "Update system configuration",
    request_body(content = ConfigUpdateRequest, description = "Optional announcement"),
    responses(
        (status = 200, description = "Announcement published", body = MessageResponse),
    )
)]
pub async fn update_config(State(state): State<AppState>, body: Bytes) -> Json<MessageResponse> {
    let req: ConfigUpdateRequest = serde_json::from_slice(&body).unwrap_or_default();
    let message = state.admin.update_config(req.message);
    Json(MessageResponse::ok(message))
}

/// Admin portal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ui", get(ui))
        .route("/courses", get(list_courses))
        .route("/course", post(create_course))
        .route("/reports/enrollment", get(enrollment_report))
        .route("/config", post(update_config))
}
