//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{CatalogMode, EnrollConfig};
use crate::domain::{CourseCatalog, EventBus, seed};
use crate::service::{AdminService, FacultyService, NotificationService, StudentService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Enrollment and drops.
    pub student: Arc<StudentService>,
    /// Rosters and grades.
    pub faculty: Arc<FacultyService>,
    /// Course administration and reports.
    pub admin: Arc<AdminService>,
    /// Notification fan-out.
    pub notifications: Arc<NotificationService>,
    /// Bus connecting the services.
    pub event_bus: EventBus,
}

impl AppState {
    /// Starts the event bus, builds every service, and wires their
    /// subscriptions.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn build(config: &EnrollConfig) -> Self {
        let event_bus = EventBus::start(config.event_bus_poll_interval);

        let new_catalog = || {
            if config.seed_demo_data {
                Arc::new(CourseCatalog::with_courses(seed::demo_courses()))
            } else {
                Arc::new(CourseCatalog::new())
            }
        };
        let (student_catalog, faculty_catalog, admin_catalog) = match config.catalog_mode {
            CatalogMode::Shared => {
                let shared = new_catalog();
                (Arc::clone(&shared), Arc::clone(&shared), shared)
            }
            CatalogMode::Isolated => (new_catalog(), new_catalog(), new_catalog()),
        };

        let mut student = StudentService::new(student_catalog, event_bus.clone());
        let mut faculty = FacultyService::new(faculty_catalog, event_bus.clone());
        if config.seed_demo_data {
            student = student.with_records(seed::demo_students());
            faculty = faculty.with_rosters(seed::demo_rosters());
        }
        let student = Arc::new(student);
        let faculty = Arc::new(faculty);
        let admin = Arc::new(AdminService::new(admin_catalog, event_bus.clone()));
        let notifications = Arc::new(NotificationService::new(
            config.notification_outbox_capacity,
        ));

        faculty.register_subscriptions().await;
        notifications.register_subscriptions(&event_bus).await;

        tracing::info!(
            catalog_mode = %config.catalog_mode,
            seeded = config.seed_demo_data,
            "application state ready"
        );

        Self {
            student,
            faculty,
            admin,
            notifications,
            event_bus,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::{Course, CourseId};

    fn config(mode: CatalogMode) -> EnrollConfig {
        EnrollConfig {
            catalog_mode: mode,
            event_bus_poll_interval: Duration::from_millis(10),
            ..EnrollConfig::default()
        }
    }

    #[tokio::test]
    async fn shared_mode_propagates_new_courses() {
        let state = AppState::build(&config(CatalogMode::Shared)).await;
        let created = state
            .admin
            .create_course(Course::new("CS401", "Compilers", "Dr. Lee", 20))
            .await;
        assert!(created.is_ok());
        assert!(state.student.catalog().contains(&CourseId::from("CS401")).await);
        state.event_bus.shutdown().await;
    }

    #[tokio::test]
    async fn isolated_mode_keeps_copies_apart() {
        let state = AppState::build(&config(CatalogMode::Isolated)).await;
        let created = state
            .admin
            .create_course(Course::new("CS401", "Compilers", "Dr. Lee", 20))
            .await;
        assert!(created.is_ok());
        assert!(!state.student.catalog().contains(&CourseId::from("CS401")).await);
        assert_eq!(state.student.list_courses().await.len(), 3);
        state.event_bus.shutdown().await;
    }

    #[tokio::test]
    async fn unseeded_state_starts_empty() {
        let cfg = EnrollConfig {
            seed_demo_data: false,
            ..config(CatalogMode::Shared)
        };
        let state = AppState::build(&cfg).await;
        assert!(state.admin.list_courses().await.is_empty());
        state.event_bus.shutdown().await;
    }
}
