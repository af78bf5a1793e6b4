//! Faculty service: rosters and grade submission.
//!
//! Rosters are kept in sync with enrollment through bus events rather than
//! read from student records, so they may briefly lag behind.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{
    Course, CourseCatalog, CourseId, EventBus, EventData, EventKind, GradeEntry, GradeProcessing,
    RosterBook, RosterBundle, StudentId,
};
use crate::error::EnrollError;

/// Result of a stored grade batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeSubmission {
    /// Number of entries stored.
    pub stored: usize,
    /// Scheme check outcome.
    pub processing: GradeProcessing,
}

/// Orchestration layer for faculty-facing operations.
///
/// Owns rosters and stored grades. Roster mutations come from two paths:
/// startup seeding and bus handlers registered by
/// [`FacultyService::register_subscriptions`]. Both go through the same
/// lock.
#[derive(Debug)]
pub struct FacultyService {
    catalog: Arc<CourseCatalog>,
    rosters: RwLock<RosterBook>,
    grades: RwLock<HashMap<CourseId, BTreeMap<StudentId, String>>>,
    event_bus: EventBus,
}

impl FacultyService {
    /// Creates a new `FacultyService` with empty rosters.
    #[must_use]
    pub fn new(catalog: Arc<CourseCatalog>, event_bus: EventBus) -> Self {
        Self {
            catalog,
            rosters: RwLock::new(RosterBook::new()),
            grades: RwLock::new(HashMap::new()),
            event_bus,
        }
    }

    /// Replaces the roster book.
    #[must_use]
    pub fn with_rosters(self, rosters: RosterBook) -> Self {
        Self {
            rosters: RwLock::new(rosters),
            ..self
        }
    }

    /// Subscribes roster synchronization handlers on the bus.
    pub async fn register_subscriptions(self: &Arc<Self>) {
        let svc = Arc::clone(self);
        self.event_bus
            .subscribe(EventKind::StudentEnrolled, "faculty.roster_add", move |event| {
                let svc = Arc::clone(&svc);
                async move {
                    if let EventData::StudentEnrolled {
                        student_id,
                        course_id,
                        ..
                    } = event.data()
                    {
                        svc.on_student_enrolled(course_id, student_id).await;
                    }
                    anyhow::Ok(())
                }
            })
            .await;

        let svc = Arc::clone(self);
        self.event_bus
            .subscribe(EventKind::StudentDropped, "faculty.roster_remove", move |event| {
                let svc = Arc::clone(&svc);
                async move {
                    if let EventData::StudentDropped {
                        student_id,
                        course_id,
                    } = event.data()
                    {
                        svc.on_student_dropped(course_id, student_id).await;
                    }
                    anyhow::Ok(())
                }
            })
            .await;

        let svc = Arc::clone(self);
        self.event_bus
            .subscribe(EventKind::CourseCreated, "faculty.roster_open", move |event| {
                let svc = Arc::clone(&svc);
                async move {
                    if let EventData::CourseCreated { course_id, .. } = event.data() {
                        svc.rosters.write().await.open(course_id.clone());
                        tracing::info!(%course_id, "opened roster");
                    }
                    anyhow::Ok(())
                }
            })
            .await;
    }

    async fn on_student_enrolled(&self, course_id: &CourseId, student_id: &StudentId) {
        if self
            .rosters
            .write()
            .await
            .add(course_id, student_id.clone())
        {
            tracing::info!(%student_id, %course_id, "added to roster");
        }
    }

    async fn on_student_dropped(&self, course_id: &CourseId, student_id: &StudentId) {
        if self.rosters.write().await.remove(course_id, student_id) {
            tracing::info!(%student_id, %course_id, "removed from roster");
        }
    }

    /// Roster of `course_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::CourseNotFound`] if the course is unknown.
    pub async fn roster(&self, course_id: &CourseId) -> Result<RosterBundle, EnrollError> {
        if !self.catalog.contains(course_id).await {
            return Err(EnrollError::CourseNotFound(course_id.clone()));
        }
        Ok(self.rosters.read().await.bundle(course_id))
    }

    /// Courses taught by `faculty_id`.
    ///
    /// Instructors are not linked to faculty ids, so every course is
    /// returned.
    pub async fn courses_for(&self, faculty_id: &str) -> Vec<Course> {
        let courses = self.catalog.list().await;
        tracing::debug!(faculty_id, count = courses.len(), "listing faculty courses");
        courses
    }

    /// Checks `grades` against the course's scheme and stores the batch.
    ///
    /// Nothing is stored unless every entry is legal. One
    /// `grade_submitted` event is published per stored entry.
    ///
    /// # Errors
    ///
    /// - [`EnrollError::CourseNotFound`] if the course does not exist.
    /// - [`EnrollError::InvalidGrades`] if any grade is outside the scheme.
    pub async fn submit_grades(
        &self,
        course_id: &CourseId,
        grades: &[GradeEntry],
    ) -> Result<GradeSubmission, EnrollError> {
        let course = self.catalog.snapshot(course_id).await?;
        let processing = course.grading_scheme.process(grades);
        if !processing.valid {
            tracing::debug!(
                %course_id,
                invalid = processing.invalid_entries.len(),
                "grade batch rejected"
            );
            return Err(EnrollError::InvalidGrades(processing));
        }

        {
            let mut stored = self.grades.write().await;
            let book = stored.entry(course_id.clone()).or_default();
            for entry in grades {
                book.insert(StudentId::from(entry.student_id.as_str()), entry.grade.clone());
            }
        }

        for entry in grades {
            self.event_bus.publish(EventData::GradeSubmitted {
                student_id: StudentId::from(entry.student_id.as_str()),
                course_id: course_id.clone(),
                grade: entry.grade.clone(),
            });
        }

        tracing::info!(%course_id, count = grades.len(), scheme = %processing.scheme.as_str(), "grades stored");
        Ok(GradeSubmission {
            stored: grades.len(),
            processing,
        })
    }

    /// Stored grades of `course_id`, keyed by student.
    pub async fn grades_for(&self, course_id: &CourseId) -> BTreeMap<StudentId, String> {
        self.grades
            .read()
            .await
            .get(course_id)
            .cloned()
            .unwrap_or_default()
    }
}
