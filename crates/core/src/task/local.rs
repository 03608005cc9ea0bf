//! Local task store
//!
//! Durable store backed by a JSON file, with an in-memory cache. Every
//! mutation persists to disk before the observation streams see it.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use super::model::{Loadable, Task};
use super::observe::TaskStreams;
use super::source::TaskDataSource;
use crate::{Error, Result};

pub struct LocalTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of tasks, keyed by id
    cache: RwLock<HashMap<String, Task>>,
    streams: TaskStreams,
}

impl LocalTaskStore {
    /// Open a store at `path`, loading existing contents if the file
    /// exists. The file is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let tasks: Vec<Task> = serde_json::from_str(&content)?;
            tasks.into_iter().map(|t| (t.id.clone(), t)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
            streams: TaskStreams::new(),
        })
    }

    /// Persist the cache to disk.
    async fn persist(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.snapshot().await)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Current contents, ordered by id.
    async fn snapshot(&self) -> Vec<Task> {
        let cache = self.cache.read().await;
        let mut tasks: Vec<Task> = cache.values().cloned().collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        tasks
    }

    /// Persist, then push the new state to all observers.
    async fn commit(&self) -> Result<()> {
        self.persist().await?;
        self.streams.publish(&self.snapshot().await).await;
        Ok(())
    }

    async fn set_completed(&self, task_id: &str, completed: bool) -> Result<()> {
        let changed = {
            let mut cache = self.cache.write().await;
            match cache.get_mut(task_id) {
                Some(task) => {
                    task.is_completed = completed;
                    true
                }
                None => false,
            }
        };
        if changed {
            self.commit().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TaskDataSource for LocalTaskStore {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.snapshot().await)
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        let cache = self.cache.read().await;
        cache
            .get(task_id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        debug!(task_id = %task.id, "saving task locally");
        {
            let mut cache = self.cache.write().await;
            cache.insert(task.id.clone(), task.clone());
        }
        self.commit().await
    }

    async fn complete_task(&self, task: &Task) -> Result<()> {
        self.set_completed(&task.id, true).await
    }

    async fn complete_task_by_id(&self, task_id: &str) -> Result<()> {
        self.set_completed(task_id, true).await
    }

    async fn activate_task(&self, task: &Task) -> Result<()> {
        self.set_completed(&task.id, false).await
    }

    async fn activate_task_by_id(&self, task_id: &str) -> Result<()> {
        self.set_completed(task_id, false).await
    }

    async fn clear_completed_tasks(&self) -> Result<()> {
        debug!("clearing completed tasks locally");
        {
            let mut cache = self.cache.write().await;
            cache.retain(|_, task| task.is_active());
        }
        self.commit().await
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        let removed = {
            let mut cache = self.cache.write().await;
            cache.remove(task_id).is_some()
        };
        if removed {
            self.commit().await?;
        }
        Ok(())
    }

    async fn delete_all_tasks(&self) -> Result<()> {
        debug!("deleting all local tasks");
        self.cache.write().await.clear();
        self.commit().await
    }

    fn observe_tasks(&self) -> watch::Receiver<Loadable<Vec<Task>>> {
        self.streams.subscribe_all()
    }

    async fn observe_task(&self, task_id: &str) -> watch::Receiver<Loadable<Task>> {
        let current = self.get_task(task_id).await.into();
        self.streams.subscribe_task(task_id, current).await
    }

    async fn refresh_tasks(&self) -> Result<()> {
        self.streams.publish(&self.snapshot().await).await;
        Ok(())
    }

    async fn refresh_task(&self, task_id: &str) -> Result<()> {
        let current = self.get_task(task_id).await.into();
        self.streams.publish_task(task_id, current).await;
        Ok(())
    }
}
