//! Robot model and the per-robot run loop.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::{BotError, Result};
use crate::task_queue::TaskQueue;
use crate::types::{Category, Task};

/// Lifecycle of a single robot's run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
}

#[derive(Clone, Debug)]
pub struct Robot {
    category: Category,
    name: String,
    queue: TaskQueue,
    state: RunState,
    tasks_completed: usize,
    elapsed: Duration,
    /// Panic before starting the next task once this many have been credited.
    #[cfg(test)]
    fail_after: Option<usize>,
}

impl Robot {
    /// Build an idle robot from free-form category text and a name.
    pub fn new(category: &str, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BotError::EmptyName);
        }
        let category = category.parse::<Category>()?;
        Ok(Self::with_category(category, name))
    }

    fn with_category(category: Category, name: String) -> Self {
        Self {
            category,
            name,
            queue: TaskQueue::new(),
            state: RunState::Idle,
            tasks_completed: 0,
            elapsed: Duration::ZERO,
            #[cfg(test)]
            fail_after: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn tasks_completed(&self) -> usize {
        self.tasks_completed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Queue a task; only meaningful before the run starts.
    pub fn assign(&mut self, task: Task) {
        debug_assert_eq!(self.state, RunState::Idle, "task assigned after run start");
        self.queue.push(task);
    }

    /// Drain the queue head-first, sleeping each task's eta scaled by `time_scale`.
    ///
    /// Elapsed time covers the whole drain, sleeps included, and is local to
    /// this robot.
    pub fn run_tasks(&mut self, time_scale: f64) {
        if self.state != RunState::Idle {
            debug!("{} already ran; state={:?}", self.name, self.state);
            return;
        }
        self.state = RunState::Running;
        if self.queue.is_empty() {
            debug!("{} has nothing queued", self.name);
        }
        let start = Instant::now();
        while let Some(task) = self.queue.pop() {
            self.process_task(&task, time_scale);
        }
        self.elapsed = start.elapsed();
        self.state = RunState::Done;
        debug!(
            "{} done: completed={} elapsed={:.3}s",
            self.name,
            self.tasks_completed,
            self.elapsed.as_secs_f64()
        );
    }

    fn process_task(&mut self, task: &Task, time_scale: f64) {
        #[cfg(test)]
        if self.fail_after == Some(self.tasks_completed) {
            panic!("{} failed before Task#{}", self.name, task.id());
        }
        info!("{} is beginning work on Task#{}...", self.name, task.id());
        let work = scaled_eta(task.eta_ms(), time_scale);
        if !work.is_zero() {
            // Blocks only this robot's thread.
            thread::sleep(work);
        }
        info!("{} has completed work on Task#{}!", self.name, task.id());
        if task.credits(self.category) {
            self.tasks_completed += 1;
        } else {
            debug!(
                "{} gets no credit for {:?} (Task#{}, requires {:?})",
                self.name,
                task.description(),
                task.id(),
                task.required()
            );
        }
    }

    /// Test-only hook to build a finished robot without sleeping.
    #[cfg(test)]
    pub(crate) fn finished_for_test(
        category: Category,
        name: &str,
        tasks_completed: usize,
        elapsed: Duration,
    ) -> Self {
        let mut robot = Self::with_category(category, name.to_string());
        robot.tasks_completed = tasks_completed;
        robot.elapsed = elapsed;
        robot.state = RunState::Done;
        robot
    }

    /// Test-only hook making the run panic once `credited` tasks are complete.
    #[cfg(test)]
    pub(crate) fn fail_after_for_test(&mut self, credited: usize) {
        self.fail_after = Some(credited);
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.category, self.name)
    }
}

/// Convert an eta in milliseconds to the actual sleep.
///
/// Non-finite or non-positive scales sleep zero; products too large for a
/// `Duration` saturate at `Duration::MAX`.
pub fn scaled_eta(eta_ms: u64, time_scale: f64) -> Duration {
    if !time_scale.is_finite() || time_scale <= 0.0 {
        return Duration::ZERO;
    }
    let secs = Duration::from_millis(eta_ms).as_secs_f64() * time_scale;
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
