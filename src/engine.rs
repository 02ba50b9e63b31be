//! Parallel execution: one OS thread per robot, joined before anything is reported.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::error::{BotError, Result};
use crate::robot::{Robot, RunState};

/// Outcome of running a batch of robots.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Wall time from the first spawn until the last join.
    pub wall: Duration,
    /// Names of robots whose thread panicked; their stats are whatever was recorded before.
    pub failed: Vec<String>,
}

/// Run every robot's queue concurrently and block until all of them are done.
///
/// Each thread gets exclusive `&mut` access to its own robot, so there is no
/// shared state between threads. A panic in one robot's thread is caught at
/// its join and reported; the other robots are unaffected.
pub fn run_all(robots: &mut [Robot], time_scale: f64) -> Result<RunReport> {
    info!("starting {} robot(s)", robots.len());
    let start = Instant::now();
    let failed = thread::scope(|scope| -> Result<Vec<String>> {
        let mut handles = Vec::with_capacity(robots.len());
        for robot in robots.iter_mut() {
            let name = robot.name().to_string();
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, move || robot.run_tasks(time_scale))
                .map_err(BotError::Spawn)?;
            handles.push((name, handle));
        }

        let mut failed = Vec::new();
        for (name, handle) in handles {
            if handle.join().is_err() {
                error!("robot {name} panicked mid-queue");
                failed.push(name);
            } else {
                debug!("robot {name} joined");
            }
        }
        Ok(failed)
    })?;
    let wall = start.elapsed();
    let unfinished = robots
        .iter()
        .filter(|robot| robot.state() != RunState::Done)
        .count();
    if unfinished > 0 {
        debug!("{unfinished} robot(s) stopped before draining their queue");
    }
    info!(
        "all robots finished in {:.2}s ({} failed)",
        wall.as_secs_f64(),
        failed.len()
    );
    Ok(RunReport { wall, failed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard;
    use crate::types::{Category, Task};

    fn robot_with(category: &str, name: &str, etas: &[(u64, Option<Category>)]) -> Robot {
        let mut robot = Robot::new(category, name).unwrap();
        for &(eta, required) in etas {
            robot.assign(Task::new("chore", eta, required).unwrap());
        }
        robot
    }

    #[test]
    fn robots_run_in_parallel_not_in_sequence() {
        let mut robots: Vec<Robot> = (0..4)
            .map(|i| robot_with("Bipedal", &format!("bot-{i}"), &[(100, None), (100, None)]))
            .collect();

        let report = run_all(&mut robots, 1.0).unwrap();

        // Sequential execution would take ~800ms; parallel ~200ms.
        assert!(report.wall >= Duration::from_millis(200));
        assert!(report.wall < Duration::from_millis(600), "wall {:?}", report.wall);
        assert!(report.failed.is_empty());
        for robot in &robots {
            assert_eq!(robot.state(), RunState::Done);
            assert_eq!(robot.tasks_completed(), 2);
        }
    }

    #[test]
    fn wall_time_tracks_the_longest_queue() {
        let mut robots = vec![
            robot_with("Radial", "short", &[(20, None)]),
            robot_with("Radial", "long", &[(150, None), (100, None)]),
        ];
        let report = run_all(&mut robots, 1.0).unwrap();

        assert!(report.wall >= Duration::from_millis(250));
        assert!(robots[0].elapsed() < robots[1].elapsed());
        assert!(robots[0].elapsed() < Duration::from_millis(150));
    }

    #[test]
    fn credit_is_per_robot_category() {
        let mut robots = vec![
            robot_with(
                "Bipedal",
                "a",
                &[(10, Some(Category::Bipedal)), (5, Some(Category::Unipedal))],
            ),
            robot_with(
                "Unipedal",
                "b",
                &[(10, Some(Category::Bipedal)), (5, Some(Category::Unipedal))],
            ),
        ];
        run_all(&mut robots, 1.0).unwrap();
        assert_eq!(robots[0].tasks_completed(), 1);
        assert_eq!(robots[1].tasks_completed(), 1);
    }

    #[test]
    fn empty_queues_finish_immediately() {
        let mut robots = vec![
            Robot::new("Arachnid", "x").unwrap(),
            Robot::new("Aeronautical", "y").unwrap(),
        ];
        let report = run_all(&mut robots, 1.0).unwrap();
        assert!(report.wall < Duration::from_millis(100));
        for robot in &robots {
            assert_eq!(robot.state(), RunState::Done);
            assert!(robot.elapsed() < Duration::from_millis(50));
        }
    }

    #[test]
    fn panicking_robot_is_reported_and_siblings_finish() {
        let mut robots = vec![
            robot_with("Bipedal", "steady-a", &[(20, None), (20, None)]),
            robot_with("Radial", "faulty", &[(5, None), (5, None), (5, None)]),
            robot_with("Arachnid", "steady-b", &[(20, None), (20, None)]),
        ];
        robots[1].fail_after_for_test(1);

        let report = run_all(&mut robots, 1.0).unwrap();

        assert_eq!(report.failed, ["faulty"]);
        for idx in [0, 2] {
            assert_eq!(robots[idx].state(), RunState::Done);
            assert_eq!(robots[idx].tasks_completed(), 2);
        }
        // The failed robot keeps its partial stats and never records an elapsed time.
        assert_eq!(robots[1].state(), RunState::Running);
        assert_eq!(robots[1].tasks_completed(), 1);
        assert_eq!(robots[1].elapsed(), Duration::ZERO);

        let rows = leaderboard::rank(&robots);
        assert_eq!(rows.len(), 3);
        let faulty = rows.iter().find(|r| r.name == "faulty").unwrap();
        assert_eq!(faulty.throughput, 0);
        assert_eq!(faulty.position, 3);
    }

    #[test]
    fn no_robots_is_a_no_op() {
        let report = run_all(&mut [], 1.0).unwrap();
        assert!(report.failed.is_empty());
    }

    #[test]
    fn time_scale_shortens_sleeps() {
        let mut robots = vec![robot_with("Radial", "fast", &[(10_000, None)])];
        let report = run_all(&mut robots, 0.001).unwrap();
        assert!(report.wall < Duration::from_secs(1));
        assert_eq!(robots[0].tasks_completed(), 1);
    }
}
