//! # nexus-enroll
//!
//! University enrollment platform split into three role-oriented HTTP
//! services (student, faculty, admin) running in one process and sharing
//! state changes through an in-process event bus.
//!
//! Mutations are checked by a pluggable validation pipeline (enrollment)
//! or a grading scheme (grade batches) before they are committed. Side
//! effects in other services, such as roster updates and notifications,
//! follow asynchronously from bus events.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── Student / Faculty / Admin routers (api/)
//!     │
//!     ├── StudentService, FacultyService, AdminService (service/)
//!     ├── NotificationService (service/)
//!     │
//!     ├── EventBus ── dispatcher task (domain/)
//!     ├── ValidationPipeline, GradingScheme (domain/)
//!     │
//!     └── CourseCatalog, RosterBook, StudentRecord (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
