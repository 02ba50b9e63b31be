//! Simulation limits and run knobs.

use crate::error::{BotError, Result};

/// Hard cap on robots per session.
pub const MAX_ROBOTS: usize = 10;
/// Tasks drawn for each robot.
pub const TASKS_PER_ROBOT: usize = 5;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub max_robots: usize,
    pub tasks_per_robot: usize,
    /// Multiplier on each task's sleep; the task's eta itself is never changed.
    pub time_scale: f64,
    /// Seed for queue generation; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_robots: MAX_ROBOTS,
            tasks_per_robot: TASKS_PER_ROBOT,
            time_scale: 1.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Accept a robot count in `1..=max_robots`.
    pub fn check_robot_count(&self, count: usize) -> Result<usize> {
        if (1..=self.max_robots).contains(&count) {
            Ok(count)
        } else {
            Err(BotError::RobotCountOutOfRange {
                count,
                max: self.max_robots,
            })
        }
    }
}

/// Accept a finite, non-negative sleep multiplier.
pub fn check_time_scale(time_scale: f64) -> Result<f64> {
    if time_scale.is_finite() && time_scale >= 0.0 {
        Ok(time_scale)
    } else {
        Err(BotError::InvalidTimeScale(time_scale))
    }
}
