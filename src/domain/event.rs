//! Domain events describing committed mutations.
//!
//! Every successful mutation publishes one [`Event`] through the
//! [`super::EventBus`]. Events are immutable once built and are discarded
//! after dispatch.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::notification::Notification;
use super::{CourseId, StudentId};

/// Event type discriminator; subscriptions are keyed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A student enrolled in a course.
    StudentEnrolled,
    /// A student dropped a course.
    StudentDropped,
    /// A grade was stored for a student.
    GradeSubmitted,
    /// An administrator created a course.
    CourseCreated,
    /// An administrator changed system configuration.
    SystemConfigUpdated,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::StudentEnrolled,
        Self::StudentDropped,
        Self::GradeSubmitted,
        Self::CourseCreated,
        Self::SystemConfigUpdated,
    ];

    /// Wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudentEnrolled => "student_enrolled",
            Self::StudentDropped => "student_dropped",
            Self::GradeSubmitted => "grade_submitted",
            Self::CourseCreated => "course_created",
            Self::SystemConfigUpdated => "system_config_updated",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payload. Field names are the payload keys seen by consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventData {
    /// Payload of [`EventKind::StudentEnrolled`].
    StudentEnrolled {
        /// Enrolled student.
        student_id: StudentId,
        /// Target course.
        course_id: CourseId,
        /// Advisor to notify.
        advisor_email: String,
    },
    /// Payload of [`EventKind::StudentDropped`].
    StudentDropped {
        /// Dropping student.
        student_id: StudentId,
        /// Dropped course.
        course_id: CourseId,
    },
    /// Payload of [`EventKind::GradeSubmitted`].
    GradeSubmitted {
        /// Graded student.
        student_id: StudentId,
        /// Course graded.
        course_id: CourseId,
        /// Stored grade value.
        grade: String,
    },
    /// Payload of [`EventKind::CourseCreated`].
    CourseCreated {
        /// New course.
        course_id: CourseId,
        /// Course name.
        name: String,
        /// Instructor.
        instructor: String,
        /// Notification prepared by the admin service.
        notification: Notification,
    },
    /// Payload of [`EventKind::SystemConfigUpdated`].
    SystemConfigUpdated {
        /// Announcement text.
        message: String,
        /// Notification prepared by the admin service.
        notification: Notification,
    },
}

impl EventData {
    /// The kind matching this payload.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::StudentEnrolled { .. } => EventKind::StudentEnrolled,
            Self::StudentDropped { .. } => EventKind::StudentDropped,
            Self::GradeSubmitted { .. } => EventKind::GradeSubmitted,
            Self::CourseCreated { .. } => EventKind::CourseCreated,
            Self::SystemConfigUpdated { .. } => EventKind::SystemConfigUpdated,
        }
    }
}

/// Immutable envelope around a payload.
///
/// Serializes as `{id, event_type, data, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    id: uuid::Uuid,
    event_type: EventKind,
    data: EventData,
    timestamp: DateTime<Utc>,
}

impl Event {
    /// Wraps `data`, stamping it with a fresh id and the current time.
    #[must_use]
    pub fn new(data: EventData) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            event_type: data.kind(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// Unique id, useful for log correlation.
    #[must_use]
    pub const fn id(&self) -> uuid::Uuid {
        self.id
    }

    /// Event type.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.event_type
    }

    /// Payload.
    #[must_use]
    pub const fn data(&self) -> &EventData {
        &self.data
    }

    /// Creation time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl From<EventData> for Event {
    fn from(data: EventData) -> Self {
        Self::new(data)
    }
}
