//! Shared DTO types used across multiple endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload returned when a factory is asked to shape something it does not
/// support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UnsupportedShape {
    /// Always `"Unsupported data type"`.
    pub error: String,
}

impl Default for UnsupportedShape {
    fn default() -> Self {
        Self {
            error: "Unsupported data type".to_string(),
        }
    }
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// A successful acknowledgement with `message`.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// User role served by one of the three services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Student portal.
    Student,
    /// Faculty portal.
    Faculty,
    /// Administration portal.
    Administrator,
}

/// UI descriptor returned by `GET /ui`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleUi {
    /// Role name.
    pub role: String,
    /// Menu entries, in display order.
    pub menus: Vec<String>,
    /// Granted permissions.
    pub permissions: Vec<String>,
    /// Route templates keyed by action.
    pub routes: BTreeMap<String, String>,
}

impl Role {
    /// Builds the UI descriptor for this role.
    #[must_use]
    pub fn ui(self) -> RoleUi {
        match self {
            Self::Student => descriptor(
                "student",
                &["Dashboard", "Courses", "Enrollments"],
                &["view_courses", "enroll", "drop"],
                &[
                    ("list_courses", "/courses"),
                    ("enroll", "/enroll"),
                    ("drop", "/drop"),
                ],
            ),
            Self::Faculty => descriptor(
                "faculty",
                &["My Courses", "Rosters", "Grades"],
                &["view_rosters", "submit_grades"],
                &[
                    ("my_courses", "/my_courses/{faculty_id}"),
                    ("roster", "/roster/{course_id}"),
                    ("submit_grades", "/submit_grades"),
                ],
            ),
            Self::Administrator => descriptor(
                "administrator",
                &["Courses", "Reports", "System Config"],
                &["create_course", "view_reports", "update_system_config"],
                &[
                    ("courses", "/courses"),
                    ("create_course", "/course"),
                    ("report", "/reports/enrollment"),
                    ("config", "/config"),
                ],
            ),
        }
    }
}

fn descriptor(role: &str, menus: &[&str], permissions: &[&str], routes: &[(&str, &str)]) -> RoleUi {
    RoleUi {
        role: role.to_string(),
        menus: menus.iter().map(ToString::to_string).collect(),
        permissions: permissions.iter().map(ToString::to_string).collect(),
        routes: routes
            .iter()
            .map(|(action, path)| ((*action).to_string(), (*path).to_string()))
            .collect(),
    }
}
