//! Service layer: business logic orchestration.
//!
//! Each service owns its slice of state, validates requests with the
//! domain rules, and reports committed changes on the
//! [`super::domain::EventBus`]. Cross-service effects (roster sync,
//! notifications) happen only through bus subscriptions.

pub mod admin_service;
pub mod faculty_service;
pub mod notification_service;
pub mod student_service;

pub use admin_service::AdminService;
pub use faculty_service::{FacultyService, GradeSubmission};
pub use notification_service::{NotificationService, OutboxEntry};
pub use student_service::{EnrollmentOutcome, StudentService};
