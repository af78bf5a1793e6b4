//! Domain layer: entities, the event system, and business rules.
//!
//! This module holds the enrollment domain model: courses and the shared
//! course catalog, student records, rosters, the in-process event bus that
//! carries state changes between services, the enrollment validation
//! pipeline, and grading schemes.

pub mod course;
pub mod course_catalog;
pub mod event;
pub mod event_bus;
pub mod grading;
pub mod ids;
pub mod notification;
pub mod report;
pub mod roster;
pub mod seed;
pub mod student_record;
pub mod validation;

pub use course::{Course, Schedule};
pub use course_catalog::CourseCatalog;
pub use event::{Event, EventData, EventKind};
pub use event_bus::{BusStats, EventBus};
pub use grading::{GradeEntry, GradeProcessing, GradingScheme};
pub use ids::{CourseId, StudentId};
pub use notification::{Notification, NotificationFactory, Recipient};
pub use report::{CourseUtilization, ReportBundle, UtilizationSummary};
pub use roster::{RosterBook, RosterBundle};
pub use student_record::{EnrollmentAction, HistoryEntry, StudentRecord};
pub use validation::{
    EnrollmentContext, EnrollmentValidator, ValidationPipeline, ValidationReport, ValidationResult,
};
