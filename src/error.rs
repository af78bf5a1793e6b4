//! Enrollment error types with HTTP status code mapping.
//!
//! [`EnrollError`] is the central error type of the platform. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CourseId, GradeProcessing, StudentId, ValidationResult};

/// Structured JSON error response body.
///
/// All error responses follow this shape, with the business-rule trace
/// (`validation_results` or `processing`) present only when it applies:
/// ```json
/// {
///   "success": false,
///   "message": "Missing prerequisites: CS101",
///   "error": { "code": 4001, "message": "Missing prerequisites: CS101" },
///   "validation_results": [ { "valid": false, "message": "..." } ]
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub message: String,
    /// Structured error payload.
    pub error: ErrorBody,
    /// Enrollment checks run before the failure, failing check last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_results: Option<Vec<ValidationResult>>,
    /// Grade batch outcome, including the rejected entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<GradeProcessing>,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Request          | 400 Bad Request           |
/// | 2000–2999 | Not Found        | 404 Not Found             |
/// | 3000–3999 | Server           | 500 Internal Server Error |
/// | 4000–4999 | Business rules   | 400 Bad Request           |
#[derive(Debug, thiserror::Error)]
pub enum EnrollError {
    /// Body missing, not JSON, or with mistyped fields.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A well-formed body carried an unacceptable field value.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A course with this id already exists.
    #[error("Course {0} already exists")]
    CourseAlreadyExists(CourseId),

    /// Drop requested for a course the student is not taking.
    #[error("Student not enrolled in this course")]
    NotEnrolled {
        /// Student that asked.
        student_id: StudentId,
        /// Course named in the request.
        course_id: CourseId,
    },

    /// No course with the given id.
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    /// The enrollment pipeline rejected the request.
    #[error("{message}")]
    ValidationFailed {
        /// Message of the first failing check.
        message: String,
        /// Trace up to and including the failing check.
        results: Vec<ValidationResult>,
    },

    /// At least one grade is outside the course's scheme.
    #[error("Invalid grade entries")]
    InvalidGrades(GradeProcessing),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EnrollError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidPayload(_) => 1001,
            Self::InvalidField { .. } => 1002,
            Self::CourseAlreadyExists(_) => 1003,
            Self::NotEnrolled { .. } => 1004,
            Self::CourseNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::ValidationFailed { .. } => 4001,
            Self::InvalidGrades(_) => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_)
            | Self::InvalidField { .. }
            | Self::CourseAlreadyExists(_)
            | Self::NotEnrolled { .. }
            | Self::ValidationFailed { .. }
            | Self::InvalidGrades(_) => StatusCode::BAD_REQUEST,
            Self::CourseNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the response body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        let message = self.to_string();
        let (validation_results, processing) = match self {
            Self::ValidationFailed { results, .. } => (Some(results.clone()), None),
            Self::InvalidGrades(processing) => (None, Some(processing.clone())),
            _ => (None, None),
        };
        ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.error_code(),
                message: message.clone(),
            },
            message,
            validation_results,
            processing,
        }
    }
}

impl IntoResponse for EnrollError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{GradeEntry, GradingScheme};

    #[test]
    fn business_rule_failures_are_bad_requests() {
        let err = EnrollError::ValidationFailed {
            message: "Course is at full capacity".to_string(),
            results: vec![ValidationResult::fail("Course is at full capacity")],
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 4001);
        assert_eq!(err.to_string(), "Course is at full capacity");
    }

    #[test]
    fn unknown_course_is_not_found() {
        let err = EnrollError::CourseNotFound(CourseId::from("CS999"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = err.to_body();
        assert!(body.validation_results.is_none());
        assert!(body.processing.is_none());
    }

    #[test]
    fn validation_failure_body_carries_trace() {
        let err = EnrollError::ValidationFailed {
            message: "Missing prerequisites: CS101".to_string(),
            results: vec![
                ValidationResult::pass("Not yet enrolled"),
                ValidationResult::fail("Missing prerequisites: CS101"),
            ],
        };
        let Ok(body) = serde_json::to_value(err.to_body()) else {
            panic!("serialization failed");
        };
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing prerequisites: CS101");
        assert_eq!(body["error"]["code"], 4001);
        assert_eq!(body["validation_results"][1]["valid"], false);
        assert!(body.get("processing").is_none());
    }

    #[test]
    fn grade_failure_body_carries_processing() {
        let processing = GradingScheme::PassFail.process(&[GradeEntry::new("STU001", "A")]);
        let err = EnrollError::InvalidGrades(processing);
        let Ok(body) = serde_json::to_value(err.to_body()) else {
            panic!("serialization failed");
        };
        assert_eq!(body["message"], "Invalid grade entries");
        assert_eq!(body["processing"]["valid"], false);
        assert_eq!(body["processing"]["scheme"], "pass_fail");
        assert_eq!(body["processing"]["invalid_entries"][0]["grade"], "A");
    }
}
