//! Session, scripted-run, and benchmark runners for BOT-O-MAT.

use std::io::{self, BufRead, Write};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{assign_tasks, shuffled_catalog};
use crate::config::SimConfig;
use crate::engine::{self, RunReport};
use crate::error::Result;
use crate::leaderboard::{self, LeaderboardRow};
use crate::prompt::Prompter;
use crate::robot::Robot;
use crate::types::Category;

/// Best-effort CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    // SAFETY: rusage is plain old data; getrusage fills it or reports failure.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    let secs = |tv: libc::timeval| tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0;
    Some((secs(usage.ru_utime), secs(usage.ru_stime)))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

fn rng_for(config: &SimConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Fill every robot's queue from a freshly shuffled catalog.
pub fn prepare(robots: &mut [Robot], config: &SimConfig) -> Result<()> {
    let mut rng = rng_for(config);
    let catalog = shuffled_catalog(&mut rng);
    assign_tasks(robots, &catalog, config.tasks_per_robot, &mut rng)?;
    debug!(
        "assigned {} task(s) to each of {} robot(s)",
        config.tasks_per_robot,
        robots.len()
    );
    Ok(())
}

/// Run the prepared robots to completion and rank them.
pub fn execute(
    robots: &mut [Robot],
    config: &SimConfig,
) -> Result<(Vec<LeaderboardRow>, RunReport)> {
    let report = engine::run_all(robots, config.time_scale)?;
    for name in &report.failed {
        warn!("robot {name} did not finish its queue; its stats are partial");
    }
    Ok((leaderboard::rank(robots), report))
}

/// Print each robot followed by its queued tasks.
pub fn write_assignments<W: Write>(out: &mut W, robots: &[Robot]) -> io::Result<()> {
    writeln!(out, "Below are the robots and their assigned tasks:")?;
    for robot in robots {
        writeln!(out, "{robot}")?;
        for task in robot.queue().iter() {
            writeln!(out, "{task}")?;
        }
        writeln!(out, "\n")?;
    }
    Ok(())
}

/// Interactive session; repeats while the user answers `y`.
pub fn play<R: BufRead, W: Write>(input: R, output: W, config: &SimConfig) -> Result<()> {
    let mut prompter = Prompter::new(input, output);
    loop {
        {
            let out = prompter.output();
            writeln!(out, "Welcome to BOT-O-MAT!\n---------------------")?;
            writeln!(
                out,
                "In this CLI program, several bots will simulate chores from a list of tasks."
            )?;
            writeln!(out, "You must first select the desired number of robots.")?;
        }
        let count = prompter.robot_count(config)?;
        writeln!(prompter.output(), "\nPerfect, time to initialize the bots!")?;
        prompter.list_categories()?;
        let mut robots = prompter.robots(count)?;

        prepare(&mut robots, config)?;
        write_assignments(prompter.output(), &robots)?;
        prompter.pause("Press enter to continue and begin work...")?;

        let (rows, _) = execute(&mut robots, config)?;
        prompter.pause("\nPress enter to view the results screen...")?;
        write!(prompter.output(), "{}", leaderboard::render_table(&rows))?;

        if !prompter.play_again()? {
            return Ok(());
        }
    }
}

/// Non-interactive run over robots given on the command line.
pub fn run_scripted<W: Write>(
    mut robots: Vec<Robot>,
    config: &SimConfig,
    json: bool,
    out: &mut W,
) -> Result<Vec<LeaderboardRow>> {
    config.check_robot_count(robots.len())?;
    prepare(&mut robots, config)?;
    if !json {
        write_assignments(out, &robots)?;
    }
    let (rows, report) = execute(&mut robots, config)?;
    info!("run finished in {:.2}s", report.wall.as_secs_f64());
    if json {
        let text = serde_json::to_string_pretty(&rows).map_err(io::Error::from)?;
        writeln!(out, "{text}")?;
    } else {
        write!(out, "{}", leaderboard::render_table(&rows))?;
    }
    Ok(rows)
}

/// Aggregated figures from a single benchmark run.
#[derive(Debug)]
pub struct BenchResult {
    pub robots: usize,
    pub total_tasks: usize,
    pub time_scale: f64,
    /// Scaled sleep summed over every robot: the sequential lower bound.
    pub sum_work_ms: f64,
    /// Scaled sleep of the longest single queue: the parallel lower bound.
    pub longest_queue_ms: f64,
    pub elapsed_ms: f64,
    pub cpu_user_s: Option<f64>,
    pub cpu_sys_s: Option<f64>,
}

impl BenchResult {
    pub const CSV_HEADER: &'static str = "robots,total_tasks,time_scale,sum_work_ms,longest_queue_ms,elapsed_ms,parallel_speedup,cpu_user_s,cpu_sys_s";

    /// How much faster than back-to-back execution the run was.
    pub fn speedup(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            self.sum_work_ms / self.elapsed_ms
        } else {
            0.0
        }
    }

    pub fn csv_line(&self) -> String {
        let fmt_cpu = |value: Option<f64>| {
            value
                .map(|v| format!("{v:.4}"))
                .unwrap_or_else(|| "NA".to_string())
        };
        format!(
            "{},{},{},{:.2},{:.2},{:.2},{:.2},{},{}",
            self.robots,
            self.total_tasks,
            self.time_scale,
            self.sum_work_ms,
            self.longest_queue_ms,
            self.elapsed_ms,
            self.speedup(),
            fmt_cpu(self.cpu_user_s),
            fmt_cpu(self.cpu_sys_s)
        )
    }
}

/// Run `robots` generated robots (categories cycled) and measure wall time against queue totals.
pub fn benchmark_once(robots: usize, config: &SimConfig) -> Result<BenchResult> {
    config.check_robot_count(robots)?;
    let mut fleet = Vec::with_capacity(robots);
    for idx in 0..robots {
        let category = Category::ALL[idx % Category::ALL.len()];
        fleet.push(Robot::new(category.label(), format!("bench-{idx}"))?);
    }
    prepare(&mut fleet, config)?;

    let scaled_ms =
        |robot: &Robot| robot.queue().scaled_work(config.time_scale).as_secs_f64() * 1000.0;
    let sum_work_ms: f64 = fleet.iter().map(scaled_ms).sum();
    let longest_queue_ms = fleet.iter().map(scaled_ms).fold(0.0, f64::max);
    let total_tasks = fleet.iter().map(|r| r.queue().len()).sum();

    let cpu_start = cpu_times_seconds();
    let report = engine::run_all(&mut fleet, config.time_scale)?;
    let (cpu_user_s, cpu_sys_s) = match (cpu_start, cpu_times_seconds()) {
        (Some((user_start, sys_start)), Some((user_end, sys_end))) => {
            (Some(user_end - user_start), Some(sys_end - sys_start))
        }
        _ => (None, None),
    };

    Ok(BenchResult {
        robots,
        total_tasks,
        time_scale: config.time_scale,
        sum_work_ms,
        longest_queue_ms,
        elapsed_ms: report.wall.as_secs_f64() * 1000.0,
        cpu_user_s,
        cpu_sys_s,
    })
}

/// Run a single benchmark and print it as CSV.
pub fn run_benchmark<W: Write>(
    robots: usize,
    config: &SimConfig,
    out: &mut W,
) -> Result<BenchResult> {
    let result = benchmark_once(robots, config)?;
    writeln!(out, "{}", BenchResult::CSV_HEADER)?;
    writeln!(out, "{}", result.csv_line())?;
    Ok(result)
}
