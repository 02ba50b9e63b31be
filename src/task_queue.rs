//! FIFO task queue owned by a single robot.
//!
//! A queue is never shared between robots, so it carries no locking: the
//! engine hands each robot thread exclusive access for the whole run.

use std::collections::VecDeque;
use std::time::Duration;

use crate::robot::scaled_eta;
use crate::types::Task;

#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Create an empty task queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail.
    pub fn push(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Remove and return the head (first assigned) task.
    pub fn pop(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Tasks in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.queue.iter()
    }

    /// Sum of the queued tasks' etas.
    pub fn total_eta(&self) -> Duration {
        Duration::from_millis(self.queue.iter().map(Task::eta_ms).sum())
    }

    /// Sum of the sleeps a robot will actually take for these tasks at `time_scale`.
    pub fn scaled_work(&self, time_scale: f64) -> Duration {
        self.queue
            .iter()
            .map(|task| scaled_eta(task.eta_ms(), time_scale))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(description: &str, eta_ms: u64) -> Task {
        Task::new(description, eta_ms, None).expect("valid task")
    }

    #[test]
    fn pops_in_assignment_order() {
        let mut queue = TaskQueue::new();
        queue.push(task("first", 1));
        queue.push(task("second", 2));
        queue.push(task("third", 3));

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|t| t.description().to_string())
            .collect();
        assert_eq!(order, ["first", "second", "third"]);
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn total_eta_sums_queued_tasks() {
        let mut queue = TaskQueue::new();
        queue.push(task("a", 100));
        queue.push(task("b", 50));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.total_eta(), Duration::from_millis(150));
        queue.pop();
        assert_eq!(queue.total_eta(), Duration::from_millis(50));
    }

    #[test]
    fn empty_queue_has_zero_eta() {
        let queue = TaskQueue::new();
        assert_eq!(queue.total_eta(), Duration::ZERO);
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn scaled_work_matches_robot_sleeps() {
        let mut queue = TaskQueue::new();
        queue.push(task("a", 1000));
        queue.push(task("b", 500));
        assert_eq!(queue.scaled_work(1.0), Duration::from_millis(1500));
        assert_eq!(queue.scaled_work(0.5), Duration::from_millis(750));
        // Scales the robots treat as "no sleep" report no work either.
        assert_eq!(queue.scaled_work(-1.0), Duration::ZERO);
        assert_eq!(queue.scaled_work(f64::NAN), Duration::ZERO);
        assert_eq!(queue.scaled_work(1e20), Duration::MAX);
    }
}
