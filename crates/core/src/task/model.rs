//! Task model definitions

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// A to-do item.
///
/// The id is the sole identity key across every store; it never changes
/// after construction. Title and description are free-form and may be
/// empty, validation happens above this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

impl Task {
    /// Create a new active task with a generated id.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Replace the generated id, for fixtures and single-task refreshes.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark the task completed.
    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// True when the task carries no user content at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}

/// Snapshot state carried by the observation streams.
///
/// A stream can be observed before its first snapshot exists, so the
/// payload is tri-state: `Loading` until something has been published,
/// then `Loaded` or `Failed`. The error is shared behind an `Arc`
/// because watch payloads are cloned on read.
#[derive(Debug, Clone)]
pub enum Loadable<T> {
    Loading,
    Loaded(T),
    Failed(Arc<Error>),
}

impl<T> Loadable<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Loadable::Loaded(_))
    }

    /// The payload, when one has been loaded.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Error> {
        match self {
            Loadable::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<crate::Result<T>> for Loadable<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(err) => Loadable::Failed(Arc::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task() {
        let task = Task::new("Buy milk", "Two litres");
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "Two litres");
        assert!(!task.is_completed);
        assert!(task.is_active());
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Task::new("a", "");
        let b = Task::new("a", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_task_with_id() {
        let task = Task::new("Fixed", "").with_id("task-1");
        assert_eq!(task.id, "task-1");
    }

    #[test]
    fn test_completed_task_is_not_active() {
        let task = Task::new("Done", "").completed();
        assert!(task.is_completed);
        assert!(!task.is_active());
    }

    #[test]
    fn test_empty_task() {
        assert!(Task::new("", "").is_empty());
        assert!(!Task::new("t", "").is_empty());
        assert!(!Task::new("", "d").is_empty());
    }

    #[test]
    fn test_loadable_from_result() {
        let loaded: Loadable<u32> = Ok(7).into();
        assert_eq!(loaded.loaded(), Some(&7));

        let failed: Loadable<u32> = Err(Error::TaskNotFound("x".into())).into();
        assert!(failed.failure().is_some_and(Error::is_not_found));
        assert!(!failed.is_loaded());
    }
}
