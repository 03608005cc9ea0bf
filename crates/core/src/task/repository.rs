//! Task repository
//!
//! Single entry point for task data. Composes a remote source and a
//! local source with a cache-aside policy: reads answer from local,
//! a forced refresh refills local wholesale from remote, and writes
//! fan out to both sources concurrently.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::model::{Loadable, Task};
use super::source::TaskDataSource;
use crate::Result;

pub struct TaskRepository {
    remote: Arc<dyn TaskDataSource>,
    local: Arc<dyn TaskDataSource>,
}

impl TaskRepository {
    pub fn new(remote: Arc<dyn TaskDataSource>, local: Arc<dyn TaskDataSource>) -> Self {
        Self { remote, local }
    }

    /// Get every task. With `force_update` the local contents are first
    /// replaced wholesale from remote; a remote failure surfaces without
    /// touching local. Without it, local answers unconditionally.
    pub async fn get_tasks(&self, force_update: bool) -> Result<Vec<Task>> {
        if force_update {
            self.update_tasks_from_remote().await?;
        }
        self.local.get_tasks().await
    }

    /// Get one task by id. With `force_update` that single task is
    /// refreshed from remote first, best effort: a remote failure is
    /// swallowed and the local copy still answers.
    pub async fn get_task(&self, task_id: &str, force_update: bool) -> Result<Task> {
        if force_update {
            self.update_task_from_remote(task_id).await?;
        }
        self.local.get_task(task_id).await
    }

    /// Resync local from remote and force the list stream to re-emit.
    pub async fn refresh_tasks(&self) -> Result<()> {
        self.update_tasks_from_remote().await?;
        self.local.refresh_tasks().await
    }

    /// Best-effort resync of one task, then force its stream to re-emit.
    pub async fn refresh_task(&self, task_id: &str) -> Result<()> {
        self.update_task_from_remote(task_id).await?;
        self.local.refresh_task(task_id).await
    }

    /// Observe the full task list. Only local is ever observed; remote
    /// changes become visible after a refresh lands them locally.
    pub fn observe_tasks(&self) -> watch::Receiver<Loadable<Vec<Task>>> {
        self.local.observe_tasks()
    }

    /// Observe one task by id, from the local store.
    pub async fn observe_task(&self, task_id: &str) -> watch::Receiver<Loadable<Task>> {
        self.local.observe_task(task_id).await
    }

    /// Upsert the task into both sources.
    pub async fn save_task(&self, task: &Task) -> Result<()> {
        tokio::try_join!(self.remote.save_task(task), self.local.save_task(task))?;
        Ok(())
    }

    /// Mark the task completed in both sources.
    pub async fn complete_task(&self, task: &Task) -> Result<()> {
        tokio::try_join!(
            self.remote.complete_task(task),
            self.local.complete_task(task)
        )?;
        Ok(())
    }

    /// Complete by id: looks the task up locally and delegates. A task
    /// that cannot be read locally is skipped.
    pub async fn complete_task_by_id(&self, task_id: &str) -> Result<()> {
        match self.local.get_task(task_id).await {
            Ok(task) => self.complete_task(&task).await,
            Err(err) => {
                warn!(task_id, %err, "skipping complete, task not readable locally");
                Ok(())
            }
        }
    }

    /// Mark the task active again in both sources.
    pub async fn activate_task(&self, task: &Task) -> Result<()> {
        tokio::try_join!(
            self.remote.activate_task(task),
            self.local.activate_task(task)
        )?;
        Ok(())
    }

    /// Activate by id, with the same skip-on-absence behavior as
    /// [`complete_task_by_id`](Self::complete_task_by_id).
    pub async fn activate_task_by_id(&self, task_id: &str) -> Result<()> {
        match self.local.get_task(task_id).await {
            Ok(task) => self.activate_task(&task).await,
            Err(err) => {
                warn!(task_id, %err, "skipping activate, task not readable locally");
                Ok(())
            }
        }
    }

    /// Remove the completed subset from both sources.
    pub async fn clear_completed_tasks(&self) -> Result<()> {
        tokio::try_join!(
            self.remote.clear_completed_tasks(),
            self.local.clear_completed_tasks()
        )?;
        Ok(())
    }

    /// Remove one task from both sources.
    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        tokio::try_join!(
            self.remote.delete_task(task_id),
            self.local.delete_task(task_id)
        )?;
        Ok(())
    }

    /// Remove every task from both sources.
    pub async fn delete_all_tasks(&self) -> Result<()> {
        tokio::try_join!(
            self.remote.delete_all_tasks(),
            self.local.delete_all_tasks()
        )?;
        Ok(())
    }

    /// Replace the entire local contents with the remote list.
    ///
    /// Real apps might want a proper sync, reconciling each task;
    /// here the cache is refilled wholesale. Remote is read before
    /// anything is deleted, so a remote failure leaves local intact.
    async fn update_tasks_from_remote(&self) -> Result<()> {
        let remote_tasks = self.remote.get_tasks().await?;
        debug!(count = remote_tasks.len(), "refilling local cache from remote");

        self.local.delete_all_tasks().await?;
        for task in &remote_tasks {
            self.local.save_task(task).await?;
        }
        Ok(())
    }

    /// Copy one task from remote into local. Remote failures (the task
    /// missing remotely included) are swallowed at this granularity; a
    /// local save failure still propagates.
    async fn update_task_from_remote(&self, task_id: &str) -> Result<()> {
        match self.remote.get_task(task_id).await {
            Ok(task) => self.local.save_task(&task).await,
            Err(err) => {
                warn!(task_id, %err, "single-task refresh skipped");
                Ok(())
            }
        }
    }
}
