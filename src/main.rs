mod catalog;
mod config;
mod engine;
mod error;
mod leaderboard;
mod logging;
mod prompt;
mod robot;
mod sim;
mod task_queue;
mod types;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::SimConfig;
use crate::error::BotError;
use crate::robot::Robot;

#[derive(Parser, Debug)]
#[command(name = "bot_o_mat")]
#[command(version)]
#[command(about = "Simulate robots working through chore queues in parallel and rank their throughput")]
struct Args {
    /// Seed for task assignment (random if not specified)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Multiplier applied to every task's sleep (e.g. 0.01 for a quick run)
    #[arg(long, global = true, default_value = "1.0", value_parser = parse_time_scale)]
    time_scale: f64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Play,

    /// Run robots given on the command line without prompting
    Run {
        /// Robot as <type>:<name>, e.g. Bipedal:Rosie (repeatable)
        #[arg(short, long = "robot", value_parser = parse_robot, required = true)]
        robots: Vec<Robot>,

        /// Print the leaderboard as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare parallel wall time against the queued work
    Bench {
        /// Number of generated robots
        #[arg(short, long, default_value_t = 4)]
        robots: usize,
    },
}

fn parse_robot(arg: &str) -> Result<Robot, BotError> {
    let (category, name) = arg
        .split_once(':')
        .ok_or_else(|| BotError::InvalidRobotSpec(arg.to_string()))?;
    Robot::new(category, name)
}

fn parse_time_scale(arg: &str) -> Result<f64, BotError> {
    let value = arg
        .trim()
        .parse::<f64>()
        .map_err(|_| BotError::InvalidTimeScale(f64::NAN))?;
    config::check_time_scale(value)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = SimConfig {
        time_scale: args.time_scale,
        seed: args.seed,
        ..SimConfig::default()
    };

    let json = matches!(args.command, Some(Command::Run { json: true, .. }));
    if json {
        logging::init_quiet();
    } else {
        logging::init(args.verbose);
    }

    let result = match args.command {
        None | Some(Command::Play) => sim::play(io::stdin().lock(), io::stdout(), &config),
        Some(Command::Run { robots, json }) => {
            sim::run_scripted(robots, &config, json, &mut io::stdout()).map(|_| ())
        }
        Some(Command::Bench { robots }) => {
            sim::run_benchmark(robots, &config, &mut io::stdout()).map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn parse_robot_splits_on_first_colon() {
        let robot = parse_robot("bipedal:R2:D2").unwrap();
        assert_eq!(robot.category(), Category::Bipedal);
        assert_eq!(robot.name(), "R2:D2");
    }

    #[test]
    fn parse_robot_rejects_malformed_specs() {
        assert!(matches!(parse_robot("Rosie"), Err(BotError::InvalidRobotSpec(_))));
        assert!(matches!(parse_robot("Wheeled:Rosie"), Err(BotError::UnknownCategory(_))));
        assert!(matches!(parse_robot("Radial:"), Err(BotError::EmptyName)));
    }

    #[test]
    fn cli_parses_run_subcommand() {
        let args = Args::try_parse_from([
            "bot_o_mat",
            "--seed",
            "4",
            "run",
            "-r",
            "Radial:Wheels",
            "--robot",
            "Arachnid:Webs",
            "--time-scale",
            "0.01",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.time_scale, 0.01);
        match args.command {
            Some(Command::Run { robots, json }) => {
                assert_eq!(robots.len(), 2);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unusable_time_scales() {
        for bad in ["-1", "NaN", "inf", "fast"] {
            let parsed = Args::try_parse_from(["bot_o_mat", "bench", "--time-scale", bad]);
            assert!(parsed.is_err(), "{bad}");
        }
        let args = Args::try_parse_from(["bot_o_mat", "bench", "--time-scale", "0"]).unwrap();
        assert_eq!(args.time_scale, 0.0);
    }

    #[test]
    fn cli_requires_at_least_one_robot_for_run() {
        assert!(Args::try_parse_from(["bot_o_mat", "run"]).is_err());
    }
}
