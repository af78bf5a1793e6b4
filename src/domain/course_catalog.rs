//! Concurrent course storage with per-course locking.
//!
//! [`CourseCatalog`] is the repository every domain service reads courses
//! from. Each course sits behind its own [`tokio::sync::RwLock`], so a
//! service can hold one course's write lock across validation and commit
//! without blocking work on other courses.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Course, CourseId};
use crate::error::EnrollError;

/// Ordered store of courses keyed by [`CourseId`].
///
/// # Concurrency
///
/// - The outer map lock is held only long enough to look up, insert, or
///   clone entry handles.
/// - Writes to different courses are concurrent; writes to one course are
///   serialized by that course's lock.
#[derive(Debug, Default)]
pub struct CourseCatalog {
    courses: RwLock<BTreeMap<CourseId, Arc<RwLock<Course>>>>,
}

impl CourseCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-filled with `courses`. Later duplicates win.
    #[must_use]
    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let map = courses
            .into_iter()
            .map(|course| (course.course_id.clone(), Arc::new(RwLock::new(course))))
            .collect();
        Self {
            courses: RwLock::new(map),
        }
    }

    /// Adds a new course.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::CourseAlreadyExists`] if the id is taken.
    pub async fn insert(&self, course: Course) -> Result<(), EnrollError> {
        let mut map = self.courses.write().await;
        if map.contains_key(&course.course_id) {
            return Err(EnrollError::CourseAlreadyExists(course.course_id));
        }
        map.insert(course.course_id.clone(), Arc::new(RwLock::new(course)));
        Ok(())
    }

    /// Returns the lock guarding one course.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::CourseNotFound`] if no such course exists.
    pub async fn get(&self, course_id: &CourseId) -> Result<Arc<RwLock<Course>>, EnrollError> {
        let map = self.courses.read().await;
        map.get(course_id)
            .map(Arc::clone)
            .ok_or_else(|| EnrollError::CourseNotFound(course_id.clone()))
    }

    /// Returns a copy of one course.
    ///
    /// # Errors
    ///
    /// Returns [`EnrollError::CourseNotFound`] if no such course exists.
    pub async fn snapshot(&self, course_id: &CourseId) -> Result<Course, EnrollError> {
        let lock = self.get(course_id).await?;
        let course = lock.read().await.clone();
        Ok(course)
    }

    /// Returns `true` if the course exists.
    pub async fn contains(&self, course_id: &CourseId) -> bool {
        self.courses.read().await.contains_key(course_id)
    }

    /// Copies of all courses, ordered by id.
    pub async fn list(&self) -> Vec<Course> {
        let entries: Vec<Arc<RwLock<Course>>> =
            self.courses.read().await.values().map(Arc::clone).collect();

        let mut courses = Vec::with_capacity(entries.len());
        for entry in entries {
            courses.push(entry.read().await.clone());
        }
        courses
    }

    /// Number of courses.
    pub async fn len(&self) -> usize {
        self.courses.read().await.len()
    }

    /// Returns `true` if the catalog holds no course.
    pub async fn is_empty(&self) -> bool {
        self.courses.read().await.is_empty()
    }
}
