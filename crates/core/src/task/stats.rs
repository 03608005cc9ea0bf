//! Task statistics

use super::model::Task;

/// Share of active and completed tasks, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub active_tasks_percent: f32,
    pub completed_tasks_percent: f32,
}

/// Compute the active/completed split of a task list. An empty list
/// yields zero for both.
pub fn get_active_and_completed_stats(tasks: &[Task]) -> Stats {
    if tasks.is_empty() {
        return Stats {
            active_tasks_percent: 0.0,
            completed_tasks_percent: 0.0,
        };
    }

    let total = tasks.len() as f32;
    let active = tasks.iter().filter(|t| t.is_active()).count() as f32;
    Stats {
        active_tasks_percent: 100.0 * active / total,
        completed_tasks_percent: 100.0 * (total - active) / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_active() {
        let tasks = vec![Task::new("title", "description")];
        let stats = get_active_and_completed_stats(&tasks);
        assert_eq!(stats.active_tasks_percent, 100.0);
        assert_eq!(stats.completed_tasks_percent, 0.0);
    }

    #[test]
    fn test_all_completed() {
        let tasks = vec![Task::new("title", "description").completed()];
        let stats = get_active_and_completed_stats(&tasks);
        assert_eq!(stats.active_tasks_percent, 0.0);
        assert_eq!(stats.completed_tasks_percent, 100.0);
    }

    #[test]
    fn test_two_fifths_completed() {
        let tasks = vec![
            Task::new("t", "d").completed(),
            Task::new("t", "d").completed(),
            Task::new("t", "d"),
            Task::new("t", "d"),
            Task::new("t", "d"),
        ];
        let stats = get_active_and_completed_stats(&tasks);
        assert_eq!(stats.active_tasks_percent, 60.0);
        assert_eq!(stats.completed_tasks_percent, 40.0);
    }

    #[test]
    fn test_empty_list_is_all_zero() {
        let stats = get_active_and_completed_stats(&[]);
        assert_eq!(stats.active_tasks_percent, 0.0);
        assert_eq!(stats.completed_tasks_percent, 0.0);
    }
}
