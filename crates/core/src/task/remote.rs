//! Remote task store
//!
//! In-process stand-in for a task service: a key-ordered map with an
//! optional artificial latency on each call. The whole backing map can
//! be taken away to simulate an outage, in which state every operation
//! answers `SourceUnavailable`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use super::model::{Loadable, Task};
use super::observe::TaskStreams;
use super::source::TaskDataSource;
use crate::{Error, Result};

pub struct RemoteTaskStore {
    /// `None` models the service being unreachable.
    tasks: RwLock<Option<BTreeMap<String, Task>>>,
    latency: Option<Duration>,
    streams: TaskStreams,
}

impl RemoteTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Some(BTreeMap::new())),
            latency: None,
            streams: TaskStreams::new(),
        }
    }

    /// Add a fixed per-call delay, imitating service round trips.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the service contents wholesale.
    pub async fn set_tasks(&self, tasks: impl IntoIterator<Item = Task>) {
        let map: BTreeMap<String, Task> =
            tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        let snapshot: Vec<Task> = map.values().cloned().collect();
        *self.tasks.write().await = Some(map);
        self.streams.publish(&snapshot).await;
    }

    /// Simulate an outage: every subsequent call fails until
    /// `set_tasks` restores the backing map.
    pub async fn set_unavailable(&self) {
        debug!("remote store going unavailable");
        *self.tasks.write().await = None;
        self.streams.publish_failure(Arc::new(Self::unavailable()));
    }

    fn unavailable() -> Error {
        Error::SourceUnavailable("remote task service is unreachable".to_string())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Run a mutation against the backing map; `true` from the closure
    /// means observers need a fresh snapshot.
    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, Task>) -> bool,
    {
        self.simulate_latency().await;
        let snapshot = {
            let mut guard = self.tasks.write().await;
            let map = guard.as_mut().ok_or_else(Self::unavailable)?;
            if !f(map) {
                return Ok(());
            }
            map.values().cloned().collect::<Vec<Task>>()
        };
        self.streams.publish(&snapshot).await;
        Ok(())
    }
}

impl Default for RemoteTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskDataSource for RemoteTaskStore {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.simulate_latency().await;
        let guard = self.tasks.read().await;
        let map = guard.as_ref().ok_or_else(Self::unavailable)?;
        Ok(map.values().cloned().collect())
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.simulate_latency().await;
        let guard = self.tasks.read().await;
        let map = guard.as_ref().ok_or_else(Self::unavailable)?;
        map.get(task_id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        debug!(task_id = %task.id, "saving task remotely");
        self.mutate(|map| {
            map.insert(task.id.clone(), task.clone());
            true
        })
        .await
    }

    async fn complete_task(&self, task: &Task) -> Result<()> {
        self.mutate(|map| match map.get_mut(&task.id) {
            Some(held) => {
                held.is_completed = true;
                true
            }
            None => false,
        })
        .await
    }

    async fn complete_task_by_id(&self, _task_id: &str) -> Result<()> {
        // The service keys toggles off the task object; the id-only
        // form is not required remotely.
        Ok(())
    }

    async fn activate_task(&self, task: &Task) -> Result<()> {
        self.mutate(|map| match map.get_mut(&task.id) {
            Some(held) => {
                held.is_completed = false;
                true
            }
            None => false,
        })
        .await
    }

    async fn activate_task_by_id(&self, _task_id: &str) -> Result<()> {
        Ok(())
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        self.mutate(|map| {
            map.retain(|_, task| task.is_active());
            true
        })
        .await
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        self.mutate(|map| map.remove(task_id).is_some()).await
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        debug!("deleting all remote tasks");
        self.mutate(|map| {
            map.clear();
            true
        })
        .await
    }

    fn observe_tasks(&self) -> watch::Receiver<Loadable<Vec<Task>>> {
        self.streams.subscribe_all()
    }

    async fn observe_task(&self, task_id: &str) -> watch::Receiver<Loadable<Task>> {
        let current = self.get_task(task_id).await.into();
        self.streams.subscribe_task(task_id, current).await
    }

    async fn refresh_tasks(&self) -> Result<()> {
        match self.get_tasks().await {
            Ok(tasks) => self.streams.publish(&tasks).await,
            Err(err) => self.streams.publish_failure(Arc::new(err)),
        }
        Ok(())
    }

    async fn refresh_task(&self, task_id: &str) -> Result<()> {
        let current = self.get_task(task_id).await.into();
        self.streams.publish_task(task_id, current).await;
        Ok(())
    }
}
