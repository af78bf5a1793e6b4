//! Enrollment validation pipeline.
//!
//! A [`ValidationPipeline`] is an ordered chain of independent
//! [`EnrollmentValidator`]s evaluated against one [`EnrollmentContext`].
//! Evaluation stops at the first failing validator: validators after it
//! are not run and do not appear in the resulting trace.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Course, CourseId, StudentId};

/// Maximum number of courses a student may take at once.
pub const MAX_CURRENT_COURSES: usize = 5;

/// Outcome of a single validator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationResult {
    /// Whether the check passed.
    pub valid: bool,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    /// A failing result.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Everything a validator may look at.
#[derive(Debug, Clone, Copy)]
pub struct EnrollmentContext<'a> {
    /// Target course, if it exists.
    pub course: Option<&'a Course>,
    /// Courses the student has completed.
    pub completed_courses: &'a BTreeSet<CourseId>,
    /// Courses the student is currently taking.
    pub current_courses: &'a BTreeSet<CourseId>,
}

/// A single pluggable enrollment rule.
pub trait EnrollmentValidator: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Checks whether `student_id` may enroll in `course_id`.
    fn validate(
        &self,
        student_id: &StudentId,
        course_id: &CourseId,
        context: &EnrollmentContext<'_>,
    ) -> ValidationResult;
}

/// Every prerequisite must be in the student's completed courses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrerequisiteValidator;

impl EnrollmentValidator for PrerequisiteValidator {
    fn name(&self) -> &'static str {
        "prerequisite"
    }

    fn validate(
        &self,
        _student_id: &StudentId,
        _course_id: &CourseId,
        context: &EnrollmentContext<'_>,
    ) -> ValidationResult {
        let Some(course) = context.course.filter(|c| !c.prerequisites.is_empty()) else {
            return ValidationResult::pass("No prerequisites required");
        };

        let missing: Vec<&str> = course
            .prerequisites
            .iter()
            .filter(|prereq| !context.completed_courses.contains(*prereq))
            .map(CourseId::as_str)
            .collect();

        if missing.is_empty() {
            ValidationResult::pass("Prerequisites satisfied")
        } else {
            ValidationResult::fail(format!("Missing prerequisites: {}", missing.join(", ")))
        }
    }
}

/// The course must have a free seat.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityValidator;

impl EnrollmentValidator for CapacityValidator {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn validate(
        &self,
        _student_id: &StudentId,
        _course_id: &CourseId,
        context: &EnrollmentContext<'_>,
    ) -> ValidationResult {
        let Some(course) = context.course else {
            return ValidationResult::fail("Course not found");
        };
        if course.is_full() {
            return ValidationResult::fail("Course is at full capacity");
        }
        ValidationResult::pass("Capacity available")
    }
}

/// The student must be below the concurrent course ceiling.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleConflictValidator {
    max_courses: usize,
}

impl ScheduleConflictValidator {
    /// Creates a validator with a custom ceiling.
    #[must_use]
    pub const fn new(max_courses: usize) -> Self {
        Self { max_courses }
    }
}

impl Default for ScheduleConflictValidator {
    fn default() -> Self {
        Self::new(MAX_CURRENT_COURSES)
    }
}

impl EnrollmentValidator for ScheduleConflictValidator {
    fn name(&self) -> &'static str {
        "schedule_conflict"
    }

    fn validate(
        &self,
        _student_id: &StudentId,
        _course_id: &CourseId,
        context: &EnrollmentContext<'_>,
    ) -> ValidationResult {
        if context.course.is_none() {
            return ValidationResult::fail("Course not found");
        }
        if context.current_courses.len() >= self.max_courses {
            return ValidationResult::fail(format!(
                "Schedule conflict: Maximum {} courses allowed",
                self.max_courses
            ));
        }
        ValidationResult::pass("No schedule conflicts")
    }
}

/// The student must not already be taking the course.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateEnrollmentValidator;

impl EnrollmentValidator for DuplicateEnrollmentValidator {
    fn name(&self) -> &'static str {
        "duplicate_enrollment"
    }

    fn validate(
        &self,
        _student_id: &StudentId,
        course_id: &CourseId,
        context: &EnrollmentContext<'_>,
    ) -> ValidationResult {
        if context.current_courses.contains(course_id) {
            return ValidationResult::fail(format!("Already enrolled in {course_id}"));
        }
        ValidationResult::pass("Not yet enrolled")
    }
}

/// Ordered results of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// `true` when every collected result passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|r| r.valid)
    }

    /// The first failing result, which is the primary failure reason.
    #[must_use]
    pub fn first_failure(&self) -> Option<&ValidationResult> {
        self.results.iter().find(|r| !r.valid)
    }

    /// All collected results in evaluation order.
    #[must_use]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Consumes the report, returning the trace.
    #[must_use]
    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }
}

/// Ordered, short-circuiting chain of validators.
#[derive(Debug, Default)]
pub struct ValidationPipeline {
    validators: Vec<Box<dyn EnrollmentValidator>>,
}

impl ValidationPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator to the end of the chain.
    #[must_use]
    pub fn with(mut self, validator: impl EnrollmentValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// The standard enrollment chain for `course`: duplicate check,
    /// prerequisites (only if the course declares any), capacity, schedule.
    #[must_use]
    pub fn for_course(course: &Course) -> Self {
        let mut pipeline = Self::new().with(DuplicateEnrollmentValidator);
        if !course.prerequisites.is_empty() {
            pipeline = pipeline.with(PrerequisiteValidator);
        }
        pipeline
            .with(CapacityValidator)
            .with(ScheduleConflictValidator::default())
    }

    /// Number of validators in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if the chain has no validators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs the chain in order, stopping after the first failure.
    #[must_use]
    pub fn validate_all(
        &self,
        student_id: &StudentId,
        course_id: &CourseId,
        context: &EnrollmentContext<'_>,
    ) -> ValidationReport {
        let mut results = Vec::with_capacity(self.validators.len());
        for validator in &self.validators {
            let result = validator.validate(student_id, course_id, context);
            let failed = !result.valid;
            if failed {
                tracing::debug!(
                    validator = validator.name(),
                    %student_id,
                    %course_id,
                    reason = %result.message,
                    "enrollment check failed"
                );
            }
            results.push(result);
            if failed {
                break;
            }
        }
        ValidationReport { results }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn ids() -> (StudentId, CourseId) {
        (StudentId::from("STU002"), CourseId::from("CS401"))
    }

    fn set(items: &[&str]) -> BTreeSet<CourseId> {
        items.iter().map(|s| CourseId::from(*s)).collect()
    }

    #[test]
    fn prerequisite_lists_every_missing_id() {
        let course = Course::new("CS401", "Adv SE", "Dr. Wilson", 15)
            .with_prerequisites(["CS201", "CS301"]);
        let completed = set(&[]);
        let current = set(&[]);
        let ctx = EnrollmentContext {
            course: Some(&course),
            completed_courses: &completed,
            current_courses: &current,
        };
        let (sid, cid) = ids();
        let result = PrerequisiteValidator.validate(&sid, &cid, &ctx);
        assert!(!result.valid);
        assert_eq!(result.message, "Missing prerequisites: CS201, CS301");
    }

    #[test]
    fn prerequisite_passes_when_completed() {
        let course = Course::new("CS201", "DS", "Dr. Johnson", 25).with_prerequisites(["CS101"]);
        let completed = set(&["CS101"]);
        let current = set(&[]);
        let ctx = EnrollmentContext {
            course: Some(&course),
            completed_courses: &completed,
            current_courses: &current,
        };
        let (sid, cid) = ids();
        let result = PrerequisiteValidator.validate(&sid, &cid, &ctx);
        assert!(result.valid);
        assert_eq!(result.message, "Prerequisites satisfied");
    }

    #[test]
    fn capacity_fails_without_course() {
        let completed = set(&[]);
        let current = set(&[]);
        let ctx = EnrollmentContext {
            course: None,
            completed_courses: &completed,
            current_courses: &current,
        };
        let (sid, cid) = ids();
        let result = CapacityValidator.validate(&sid, &cid, &ctx);
        assert_eq!(result, ValidationResult::fail("Course not found"));
    }

    #[test]
    fn schedule_conflict_at_five_courses() {
        let course = Course::new("CS101", "Intro", "Dr. Smith", 30);
        let completed = set(&[]);
        let current = set(&["A1", "A2", "A3", "A4", "A5"]);
        let ctx = EnrollmentContext {
            course: Some(&course),
            completed_courses: &completed,
            current_courses: &current,
        };
        let (sid, cid) = ids();
        let result = ScheduleConflictValidator::default().validate(&sid, &cid, &ctx);
        assert!(!result.valid);
        assert_eq!(result.message, "Schedule conflict: Maximum 5 courses allowed");
    }

    #[test]
    fn pipeline_short_circuits_on_capacity() {
        let course = Course::new("CS101", "Intro", "Dr. Smith", 1).with_enrolled(1);
        let completed = set(&[]);
        let current = set(&["A1", "A2", "A3", "A4", "A5"]);
        let ctx = EnrollmentContext {
            course: Some(&course),
            completed_courses: &completed,
            current_courses: &current,
        };
        let pipeline = ValidationPipeline::for_course(&course);
        let (sid, _) = ids();
        let report = pipeline.validate_all(&sid, &course.course_id, &ctx);

        assert!(!report.is_valid());
        assert_eq!(report.results().len(), 2);
        let Some(failure) = report.first_failure() else {
            panic!("expected a failure");
        };
        assert_eq!(failure.message, "Course is at full capacity");
        assert!(
            report
                .results()
                .iter()
                .all(|r| !r.message.starts_with("Schedule"))
        );
    }

    #[test]
    fn pipeline_omits_prerequisite_check_when_none_declared() {
        let plain = Course::new("CS101", "Intro", "Dr. Smith", 30);
        assert_eq!(ValidationPipeline::for_course(&plain).len(), 3);

        let gated = plain.clone().with_prerequisites(["CS100"]);
        assert_eq!(ValidationPipeline::for_course(&gated).len(), 4);
    }

    #[test]
    fn pipeline_rejects_duplicate_enrollment_first() {
        let course = Course::new("CS101", "Intro", "Dr. Smith", 30);
        let completed = set(&[]);
        let current = set(&["CS101"]);
        let ctx = EnrollmentContext {
            course: Some(&course),
            completed_courses: &completed,
            current_courses: &current,
        };
        let report = ValidationPipeline::for_course(&course).validate_all(
            &StudentId::from("STU001"),
            &course.course_id,
            &ctx,
        );
        assert_eq!(
            report.into_results(),
            vec![ValidationResult::fail("Already enrolled in CS101")]
        );
    }

    #[test]
    fn full_pass_collects_every_result() {
        let course = Course::new("CS201", "DS", "Dr. Johnson", 25).with_prerequisites(["CS101"]);
        let completed = set(&["CS101"]);
        let current = set(&[]);
        let ctx = EnrollmentContext {
            course: Some(&course),
            completed_courses: &completed,
            current_courses: &current,
        };
        let report = ValidationPipeline::for_course(&course).validate_all(
            &StudentId::from("STU001"),
            &course.course_id,
            &ctx,
        );
        assert!(report.is_valid());
        assert_eq!(report.results().len(), 4);
        assert!(report.first_failure().is_none());
    }

    #[test]
    fn empty_pipeline_is_valid() {
        let completed = set(&[]);
        let current = set(&[]);
        let ctx = EnrollmentContext {
            course: None,
            completed_courses: &completed,
            current_courses: &current,
        };
        let (sid, cid) = ids();
        let pipeline = ValidationPipeline::new();
        assert!(pipeline.is_empty());
        assert!(pipeline.validate_all(&sid, &cid, &ctx).is_valid());
    }
}
