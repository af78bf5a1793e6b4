//! Admin service: course creation, reporting, and system announcements.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Course, CourseCatalog, EventBus, EventData, NotificationFactory, ReportBundle,
};
use crate::error::EnrollError;

/// Announcement used when a config update carries no message.
pub const DEFAULT_CONFIG_MESSAGE: &str = "System maintenance scheduled";

/// Orchestration layer for administrative operations.
#[derive(Debug)]
pub struct AdminService {
    catalog: Arc<CourseCatalog>,
    notifications: NotificationFactory,
    event_bus: EventBus,
}

impl AdminService {
    /// Creates a new `AdminService`.
    #[must_use]
    pub fn new(catalog: Arc<CourseCatalog>, event_bus: EventBus) -> Self {
        Self {
            catalog,
            notifications: NotificationFactory,
            event_bus,
        }
    }

    /// All courses, ordered by id.
    pub async fn list_courses(&self) -> Vec<Course> {
        self.catalog.list().await
    }

    /// Adds `course` to the catalog and announces it.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::CourseAlreadyExists`] if the id is taken.
    pub async fn create_course(&self, course: Course) -> Result<Course, EnrollError> {
        self.catalog.insert(course.clone()).await?;

        let notification = self.notifications.course_created(course.course_id.as_str());
        self.event_bus.publish(EventData::CourseCreated {
            course_id: course.course_id.clone(),
            name: course.name.clone(),
            instructor: course.instructor.clone(),
            notification,
        });

        tracing::info!(
            course_id = %course.course_id,
            capacity = course.capacity,
            scheme = course.grading_scheme.as_str(),
            "course created"
        );
        Ok(course)
    }

    /// Builds the enrollment utilization report over the current catalog.
    pub async fn enrollment_report(&self) -> ReportBundle {
        let courses = self.catalog.list().await;
        ReportBundle::enrollment_summary(&courses, Utc::now())
    }

    /// Broadcasts a configuration change. Returns the announced message.
    pub fn update_config(&self, message: Option<String>) -> String {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_MESSAGE.to_string());

        let notification = self.notifications.system_config_updated(&message);
        self.event_bus.publish(EventData::SystemConfigUpdated {
            message: message.clone(),
            notification,
        });

        tracing::info!(%message, "system configuration updated");
        message
    }
}
