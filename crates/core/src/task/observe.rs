//! Observation streams for task stores
//!
//! Both stores publish snapshots through a `TaskStreams` hub: one watch
//! channel for the full list and lazily-created channels per task id.
//! Watch channels keep the latest value, which gives new observers the
//! replay-latest behavior the stores promise. Senders are retained in
//! the hub so a stream stays current across observer churn.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use super::model::{Loadable, Task};
use crate::Error;

pub(crate) struct TaskStreams {
    all: watch::Sender<Loadable<Vec<Task>>>,
    by_id: RwLock<HashMap<String, watch::Sender<Loadable<Task>>>>,
}

impl TaskStreams {
    pub(crate) fn new() -> Self {
        let (all, _) = watch::channel(Loadable::Loading);
        Self {
            all,
            by_id: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn subscribe_all(&self) -> watch::Receiver<Loadable<Vec<Task>>> {
        self.all.subscribe()
    }

    /// Subscribe to one task id, seeding the channel with `current` if
    /// nobody has observed this id before.
    pub(crate) async fn subscribe_task(
        &self,
        task_id: &str,
        current: Loadable<Task>,
    ) -> watch::Receiver<Loadable<Task>> {
        let mut by_id = self.by_id.write().await;
        by_id
            .entry(task_id.to_string())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe()
    }

    /// Publish a full snapshot: the list stream gets the whole slice,
    /// every per-id stream gets its task or a not-found failure.
    ///
    /// `tasks` must already be ordered by id.
    pub(crate) async fn publish(&self, tasks: &[Task]) {
        self.all.send_replace(Loadable::Loaded(tasks.to_vec()));

        let by_id = self.by_id.read().await;
        for (task_id, sender) in by_id.iter() {
            let snapshot = match tasks.iter().find(|t| &t.id == task_id) {
                Some(task) => Loadable::Loaded(task.clone()),
                None => Loadable::Failed(Arc::new(Error::TaskNotFound(task_id.clone()))),
            };
            sender.send_replace(snapshot);
        }
    }

    /// Publish a single-task snapshot, if that id has observers.
    pub(crate) async fn publish_task(&self, task_id: &str, snapshot: Loadable<Task>) {
        if let Some(sender) = self.by_id.read().await.get(task_id) {
            sender.send_replace(snapshot);
        }
    }

    /// Publish a failure on the list stream (simulated outage).
    pub(crate) fn publish_failure(&self, err: Arc<Error>) {
        self.all.send_replace(Loadable::Failed(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_stream_starts_loading_and_replays_latest() {
        let streams = TaskStreams::new();

        let early = streams.subscribe_all();
        assert!(matches!(*early.borrow(), Loadable::Loading));

        let task = Task::new("a", "").with_id("1");
        streams.publish(std::slice::from_ref(&task)).await;

        // A late observer still sees the published snapshot.
        let late = streams.subscribe_all();
        let seen = late.borrow().loaded().cloned();
        assert_eq!(seen, Some(vec![task]));
    }

    #[tokio::test]
    async fn test_per_id_stream_tracks_publishes() {
        let streams = TaskStreams::new();
        let task = Task::new("a", "").with_id("1");

        let rx = streams
            .subscribe_task("1", Loadable::Loaded(task.clone()))
            .await;
        assert_eq!(rx.borrow().loaded(), Some(&task));

        // Publishing a snapshot without task 1 fails its stream.
        streams.publish(&[]).await;
        assert!(rx
            .borrow()
            .failure()
            .is_some_and(Error::is_not_found));
    }

    #[tokio::test]
    async fn test_publish_failure_reaches_list_observers() {
        let streams = TaskStreams::new();
        let rx = streams.subscribe_all();

        streams.publish_failure(Arc::new(Error::SourceUnavailable("down".into())));
        assert!(matches!(*rx.borrow(), Loadable::Failed(_)));
    }
}
