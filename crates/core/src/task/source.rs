//! Task data source trait
//!
//! Defines the storage contract shared by the local and remote stores.

use async_trait::async_trait;
use tokio::sync::watch;

use super::model::{Loadable, Task};
use crate::Result;

/// Storage backend for tasks: CRUD plus push-based observation.
///
/// Absence is always a typed error, never a panic: a missing task is
/// `Error::TaskNotFound`, a disabled backing store is
/// `Error::SourceUnavailable`.
#[async_trait]
pub trait TaskDataSource: Send + Sync {
    /// Get every task held by this source, ordered by id.
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Get a single task by id.
    async fn get_task(&self, task_id: &str) -> Result<Task>;

    /// Upsert by id: insert if new, overwrite if the id exists.
    async fn save_task(&self, task: &Task) -> Result<()>;

    /// Mark the task completed.
    async fn complete_task(&self, task: &Task) -> Result<()>;

    /// Mark the task with this id completed; a missing id is a no-op.
    async fn complete_task_by_id(&self, task_id: &str) -> Result<()>;

    /// Mark the task active again.
    async fn activate_task(&self, task: &Task) -> Result<()>;

    /// Mark the task with this id active; a missing id is a no-op.
    async fn activate_task_by_id(&self, task_id: &str) -> Result<()>;

    /// Remove exactly the completed subset.
    async fn clear_completed_tasks(&self) -> Result<()>;

    /// Remove one task by id.
    async fn delete_task(&self, task_id: &str) -> Result<()>;

    /// Remove every task.
    async fn delete_all_tasks(&self) -> Result<()>;

    /// Observe the full task list. The stream is hot and stateful: new
    /// observers immediately see the latest published snapshot.
    fn observe_tasks(&self) -> watch::Receiver<Loadable<Vec<Task>>>;

    /// Observe a single task by id, with the same replay semantics.
    async fn observe_task(&self, task_id: &str) -> watch::Receiver<Loadable<Task>>;

    /// Force the list stream to re-emit a fresh snapshot.
    async fn refresh_tasks(&self) -> Result<()>;

    /// Force the stream for one task to re-emit a fresh snapshot.
    async fn refresh_task(&self, task_id: &str) -> Result<()>;
}
