//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Each portal (student, faculty, admin) is its own router, served on its
//! own listen address. Every router also serves `/health` and, with the
//! `swagger-ui` feature, its OpenAPI document at `/api-docs/openapi.json`
//! with Swagger UI at `/swagger-ui`.

pub mod dto;
pub mod extract;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document of the student portal.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "nexus-enroll student service"),
    paths(
        handlers::system::health_handler,
        handlers::student::ui,
        handlers::student::list_courses,
        handlers::student::enroll,
        handlers::student::drop_course,
    ),
    tags((name = "Student"), (name = "System"))
)]
pub struct StudentApiDoc;

/// OpenAPI document of the faculty portal.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "nexus-enroll faculty service"),
    paths(
        handlers::system::health_handler,
        handlers::faculty::ui,
        handlers::faculty::roster,
        handlers::faculty::submit_grades,
        handlers::faculty::my_courses,
    ),
    tags((name = "Faculty"), (name = "System"))
)]
pub struct FacultyApiDoc;

/// OpenAPI document of the admin portal.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "nexus-enroll admin service"),
    paths(
        handlers::system::health_handler,
        handlers::admin::ui,
        handlers::admin::list_courses,
        handlers::admin::create_course,
        handlers::admin::enrollment_report,
        handlers::admin::update_config,
    ),
    tags((name = "Admin"), (name = "System"))
)]
pub struct AdminApiDoc;

/// Builds the student portal router.
pub fn student_router() -> Router<AppState> {
    with_docs(
        Router::new()
            .merge(handlers::student::routes())
            .merge(handlers::system::routes("student")),
        StudentApiDoc::openapi(),
    )
}

/// Builds the faculty portal router.
pub fn faculty_router() -> Router<AppState> {
    with_docs(
        Router::new()
            .merge(handlers::faculty::routes())
            .merge(handlers::system::routes("faculty")),
        FacultyApiDoc::openapi(),
    )
}

/// Builds the admin portal router.
pub fn admin_router() -> Router<AppState> {
    with_docs(
        Router::new()
            .merge(handlers::admin::routes())
            .merge(handlers::system::routes("admin")),
        AdminApiDoc::openapi(),
    )
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>, doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>, doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    router.route(
        "/api-docs/openapi.json",
        axum::routing::get(move || async move { axum::Json(doc) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_document_lists_its_own_routes() {
        let student = StudentApiDoc::openapi();
        assert!(student.paths.paths.contains_key("/enroll"));
        assert!(!student.paths.paths.contains_key("/submit_grades"));

        let faculty = FacultyApiDoc::openapi();
        assert!(faculty.paths.paths.contains_key("/roster/{course_id}"));

        let admin = AdminApiDoc::openapi();
        assert!(admin.paths.paths.contains_key("/reports/enrollment"));
        assert!(admin.paths.paths.contains_key("/health"));
    }
}
