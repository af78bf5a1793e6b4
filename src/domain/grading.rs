//! Grading schemes and batch grade processing.
//!
//! Every course carries an explicit [`GradingScheme`] chosen at creation
//! time. Processing a batch is all-or-nothing: a single entry outside the
//! scheme's legal set rejects the entire batch.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Legal values under letter grading.
pub const LETTER_GRADES: [&str; 10] = ["A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D", "F"];

/// Legal values under pass/fail grading.
pub const PASS_FAIL_GRADES: [&str; 2] = ["P", "F"];

/// Grading policy of a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GradingScheme {
    /// A through F with +/- modifiers.
    #[default]
    Letter,
    /// P or F.
    PassFail,
}

impl GradingScheme {
    /// The set of grade values this scheme accepts.
    #[must_use]
    pub const fn legal_grades(self) -> &'static [&'static str] {
        match self {
            Self::Letter => &LETTER_GRADES,
            Self::PassFail => &PASS_FAIL_GRADES,
        }
    }

    /// Returns `true` if `grade` is legal under this scheme.
    #[must_use]
    pub fn accepts(self, grade: &str) -> bool {
        self.legal_grades().contains(&grade)
    }

    /// Checks a batch of grade entries against this scheme.
    ///
    /// The result lists every offending entry in batch order; the batch is
    /// valid only when that list is empty.
    #[must_use]
    pub fn process(self, entries: &[GradeEntry]) -> GradeProcessing {
        let invalid_entries: Vec<GradeEntry> = entries
            .iter()
            .filter(|entry| !self.accepts(&entry.grade))
            .cloned()
            .collect();

        GradeProcessing {
            scheme: self,
            valid: invalid_entries.is_empty(),
            invalid_entries,
        }
    }

    /// Scheme name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::PassFail => "pass_fail",
        }
    }
}

/// One grade in a submission batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GradeEntry {
    /// Graded student.
    pub student_id: String,
    /// Submitted grade value.
    pub grade: String,
}

impl GradeEntry {
    /// Creates a grade entry.
    #[must_use]
    pub fn new(student_id: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            grade: grade.into(),
        }
    }
}

/// Outcome of running a batch through a [`GradingScheme`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GradeProcessing {
    /// Scheme that was applied.
    pub scheme: GradingScheme,
    /// `true` iff `invalid_entries` is empty.
    pub valid: bool,
    /// Entries whose grade is outside the scheme's legal set.
    pub invalid_entries: Vec<GradeEntry>,
}
