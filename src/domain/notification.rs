//! Stakeholder notifications attached to administrative events.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Audience of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// All students.
    Students,
    /// All faculty members.
    Faculty,
    /// All administrators.
    Administrators,
}

impl Recipient {
    /// Wire name of the audience.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Faculty => "faculty",
            Self::Administrators => "administrators",
        }
    }
}

/// A notification ready to be fanned out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Notification type, matching the triggering event type.
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Text shown to recipients.
    pub message: String,
    /// Who should receive it.
    pub recipients: Vec<Recipient>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

/// Builds notifications for administrative actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFactory;

impl NotificationFactory {
    /// Notification announcing a new course.
    #[must_use]
    pub fn course_created(&self, course_id: &str) -> Notification {
        Notification {
            notification_type: "course_created".to_string(),
            message: format!("Course {course_id} created"),
            recipients: vec![Recipient::Administrators, Recipient::Faculty],
            timestamp: Utc::now(),
        }
    }

    /// Notification announcing a system-wide configuration change.
    #[must_use]
    pub fn system_config_updated(&self, message: &str) -> Notification {
        Notification {
            notification_type: "system_config_updated".to_string(),
            message: message.to_string(),
            recipients: vec![
                Recipient::Students,
                Recipient::Faculty,
                Recipient::Administrators,
            ],
            timestamp: Utc::now(),
        }
    }
}
