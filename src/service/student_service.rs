//! Student service: course browsing, enrollment, and drops.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{
    Course, CourseCatalog, CourseId, EnrollmentContext, EventBus, EventData, StudentId,
    StudentRecord, ValidationPipeline, ValidationResult,
};
use crate::error::EnrollError;

/// Result of a committed enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentOutcome {
    /// Name of the course joined.
    pub course_name: String,
    /// Every check that ran, all passing.
    pub validation_results: Vec<ValidationResult>,
}

/// Orchestration layer for student-facing operations.
///
/// Owns the student records and reads courses from a [`CourseCatalog`].
/// Every mutation follows the pattern: lock course → lock records →
/// validate → mutate → release locks → publish event.
///
/// Locks are always taken in that order (course, then records) so enroll
/// and drop never deadlock against each other.
#[derive(Debug)]
pub struct StudentService {
    catalog: Arc<CourseCatalog>,
    records: RwLock<HashMap<StudentId, StudentRecord>>,
    event_bus: EventBus,
}

impl StudentService {
    /// Creates a new `StudentService`.
    #[must_use]
    pub fn new(catalog: Arc<CourseCatalog>, event_bus: EventBus) -> Self {
        Self {
            catalog,
            records: RwLock::new(HashMap::new()),
            event_bus,
        }
    }

    /// Adds `records`, replacing any existing record with the same id.
    #[must_use]
    pub fn with_records(self, records: impl IntoIterator<Item = StudentRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.student_id.clone(), record))
            .collect();
        Self {
            records: RwLock::new(map),
            ..self
        }
    }

    /// Returns a reference to the inner [`CourseCatalog`].
    #[must_use]
    pub fn catalog(&self) -> &Arc<CourseCatalog> {
        &self.catalog
    }

    /// All courses, ordered by id.
    pub async fn list_courses(&self) -> Vec<Course> {
        self.catalog.list().await
    }

    /// A copy of one student's record, if the student ever enrolled or was
    /// seeded.
    pub async fn record(&self, student_id: &StudentId) -> Option<StudentRecord> {
        self.records.read().await.get(student_id).cloned()
    }

    /// Enrolls `student_id` in `course_id`.
    ///
    /// Runs the enrollment pipeline under the course's write lock, so two
    /// concurrent requests can never both take the last seat.
    ///
    /// # Errors
    ///
    /// - [`EnrollError::CourseNotFound`] if the course does not exist.
    /// - [`EnrollError::ValidationFailed`] with the check trace if any
    ///   enrollment rule fails.
    pub async fn enroll(
        &self,
        student_id: &StudentId,
        course_id: &CourseId,
    ) -> Result<EnrollmentOutcome, EnrollError> {
        let course_lock = self.catalog.get(course_id).await?;
        let mut course = course_lock.write().await;
        let mut records = self.records.write().await;

        let report = {
            let empty = BTreeSet::new();
            let (completed, current) = records.get(student_id).map_or((&empty, &empty), |r| {
                (&r.completed_courses, &r.current_courses)
            });
            let context = EnrollmentContext {
                course: Some(&*course),
                completed_courses: completed,
                current_courses: current,
            };
            ValidationPipeline::for_course(&course).validate_all(student_id, course_id, &context)
        };

        if !report.is_valid() {
            let message = report
                .first_failure()
                .map(|failure| failure.message.clone())
                .unwrap_or_default();
            return Err(EnrollError::ValidationFailed {
                message,
                results: report.into_results(),
            });
        }

        if !course.reserve_seat() {
            return Err(EnrollError::ValidationFailed {
                message: "Course is at full capacity".to_string(),
                results: vec![ValidationResult::fail("Course is at full capacity")],
            });
        }
        records
            .entry(student_id.clone())
            .or_insert_with(|| StudentRecord::new(student_id.clone()))
            .enroll(course_id.clone());

        let course_name = course.name.clone();
        let enrolled = course.enrolled;
        drop(records);
        drop(course);

        self.event_bus.publish(EventData::StudentEnrolled {
            student_id: student_id.clone(),
            course_id: course_id.clone(),
            advisor_email: format!("advisor_{student_id}@university.edu"),
        });

        tracing::info!(%student_id, %course_id, enrolled, "student enrolled");
        Ok(EnrollmentOutcome {
            course_name,
            validation_results: report.into_results(),
        })
    }

    /// Drops `course_id` for `student_id` and frees the seat.
    ///
    /// Returns the course name.
    ///
    /// # Errors
    ///
    /// - [`EnrollError::CourseNotFound`] if the course does not exist.
    /// - [`EnrollError::NotEnrolled`] if the student is not taking it.
    pub async fn drop_course(
        &self,
        student_id: &StudentId,
        course_id: &CourseId,
    ) -> Result<String, EnrollError> {
        let course_lock = self.catalog.get(course_id).await?;
        let mut course = course_lock.write().await;
        let mut records = self.records.write().await;

        let dropped = records
            .get_mut(student_id)
            .is_some_and(|record| record.drop_course(course_id));
        if !dropped {
            return Err(EnrollError::NotEnrolled {
                student_id: student_id.clone(),
                course_id: course_id.clone(),
            });
        }
        course.release_seat();

        let course_name = course.name.clone();
        let enrolled = course.enrolled;
        drop(records);
        drop(course);

        self.event_bus.publish(EventData::StudentDropped {
            student_id: student_id.clone(),
            course_id: course_id.clone(),
        });

        tracing::info!(%student_id, %course_id, enrolled, "student dropped course");
        Ok(course_name)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::EnrollmentAction;
    use crate::domain::seed;

    fn service() -> StudentService {
        let catalog = Arc::new(CourseCatalog::with_courses(seed::demo_courses()));
        StudentService::new(catalog, EventBus::start(Duration::from_millis(20)))
            .with_records(seed::demo_students())
    }

    fn ids(student: &str, course: &str) -> (StudentId, CourseId) {
        (StudentId::from(student), CourseId::from(course))
    }

    #[tokio::test]
    async fn enroll_with_completed_prerequisite_succeeds() {
        let svc = service();
        let (student, course) = ids("STU001", "CS201");
        let Ok(outcome) = svc.enroll(&student, &course).await else {
            panic!("enrollment should succeed");
        };
        assert_eq!(outcome.course_name, "Data Structures");
        assert!(outcome.validation_results.iter().all(|r| r.valid));

        let Ok(cs201) = svc.catalog().snapshot(&course).await else {
            panic!("course missing");
        };
        assert_eq!(cs201.enrolled, 21);

        let Some(record) = svc.record(&student).await else {
            panic!("record missing");
        };
        assert!(record.is_taking(&course));
        assert_eq!(
            record.history().last().map(|h| h.action),
            Some(EnrollmentAction::Enrolled)
        );
    }

    #[tokio::test]
    async fn missing_prerequisites_are_listed_and_seat_untouched() {
        let catalog = Arc::new(CourseCatalog::with_courses(
            seed::demo_courses().into_iter().chain([
                Course::new("CS401", "Compilers", "Dr. Lee", 10).with_prerequisites(["CS201", "CS301"]),
            ]),
        ));
        let svc = StudentService::new(Arc::clone(&catalog), EventBus::start(Duration::from_millis(20)));
        let (student, course) = ids("STU002", "CS401");

        let Err(EnrollError::ValidationFailed { message, results }) =
            svc.enroll(&student, &course).await
        else {
            panic!("enrollment should fail");
        };
        assert_eq!(message, "Missing prerequisites: CS201, CS301");
        assert_eq!(results.last().map(|r| r.valid), Some(false));

        let Ok(cs401) = catalog.snapshot(&course).await else {
            panic!("course missing");
        };
        assert_eq!(cs401.enrolled, 0);
        assert!(svc.record(&student).await.is_none());
    }

    #[tokio::test]
    async fn full_course_short_circuits_before_schedule_check() {
        let catalog = Arc::new(CourseCatalog::with_courses([
            Course::new("CS100", "Seminar", "Dr. Full", 1).with_enrolled(1),
        ]));
        let svc = StudentService::new(catalog, EventBus::start(Duration::from_millis(20)));
        let (student, course) = ids("STU009", "CS100");

        let Err(EnrollError::ValidationFailed { results, .. }) = svc.enroll(&student, &course).await
        else {
            panic!("enrollment should fail");
        };
        assert_eq!(results.len(), 2);
        assert_eq!(
            results.last().map(|r| r.message.as_str()),
            Some("Course is at full capacity")
        );
    }

    #[tokio::test]
    async fn second_enrollment_in_same_course_is_rejected() {
        let svc = service();
        let (student, course) = ids("STU004", "CS101");
        assert!(svc.enroll(&student, &course).await.is_ok());

        let Err(EnrollError::ValidationFailed { message, .. }) =
            svc.enroll(&student, &course).await
        else {
            panic!("duplicate enrollment should fail");
        };
        assert_eq!(message, "Already enrolled in CS101");

        let Ok(cs101) = svc.catalog().snapshot(&course).await else {
            panic!("course missing");
        };
        assert_eq!(cs101.enrolled, 26);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let svc = service();
        let (student, course) = ids("STU001", "CS999");
        assert!(matches!(
            svc.enroll(&student, &course).await,
            Err(EnrollError::CourseNotFound(_))
        ));
        assert!(matches!(
            svc.drop_course(&student, &course).await,
            Err(EnrollError::CourseNotFound(_))
        ));
    }

    #[tokio::test]
    async fn drop_releases_seat() {
        let svc = service();
        let (student, course) = ids("STU004", "CS101");
        assert!(svc.enroll(&student, &course).await.is_ok());

        let Ok(name) = svc.drop_course(&student, &course).await else {
            panic!("drop should succeed");
        };
        assert_eq!(name, "Intro to Programming");

        let Ok(cs101) = svc.catalog().snapshot(&course).await else {
            panic!("course missing");
        };
        assert_eq!(cs101.enrolled, 25);
    }

    #[tokio::test]
    async fn drop_without_enrollment_is_rejected() {
        let svc = service();
        let (student, course) = ids("STU001", "CS301");
        assert!(matches!(
            svc.drop_course(&student, &course).await,
            Err(EnrollError::NotEnrolled { .. })
        ));
    }

    #[tokio::test]
    async fn concurrent_enrollments_never_exceed_capacity() {
        let catalog = Arc::new(CourseCatalog::with_courses([
            Course::new("CS150", "Lab", "Dr. Busy", 3),
        ]));
        let svc = Arc::new(StudentService::new(
            Arc::clone(&catalog),
            EventBus::start(Duration::from_millis(20)),
        ));

        let mut tasks = Vec::new();
        for n in 0..10 {
            let svc = Arc::clone(&svc);
            tasks.push(tokio::spawn(async move {
                let (student, course) = ids(&format!("STU{n:03}"), "CS150");
                svc.enroll(&student, &course).await.is_ok()
            }));
        }

        let mut accepted = 0;
        for task in tasks {
            if matches!(task.await, Ok(true)) {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);

        let Ok(cs150) = catalog.snapshot(&CourseId::from("CS150")).await else {
            panic!("course missing");
        };
        assert_eq!(cs150.enrolled, 3);
    }

    #[tokio::test]
    async fn enrollment_publishes_event() {
        let svc = service();
        let (student, course) = ids("STU004", "CS101");
        assert!(svc.enroll(&student, &course).await.is_ok());
        assert_eq!(svc.event_bus.stats().published, 1);
    }
}
