//! Throughput ranking and leaderboard formatting.
//!
//! Throughput is completed tasks per minute of the robot's own elapsed time.
//! A robot with no measurable elapsed time scores zero. Ordering is a stable
//! descending sort, so equal scores keep the input order.

use std::time::Duration;

use serde::Serialize;

use crate::robot::Robot;

pub const HEADERS: [&str; 5] = [
    "Name",
    "Type",
    "Tasks Completed",
    "Time Taken (s)",
    "Est. Throughput (tasks/min)",
];

/// Columns right-aligned in the rendered table.
const NUMERIC_COLUMNS: [bool; 5] = [false, false, true, true, true];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub position: usize,
    pub name: String,
    pub category: String,
    pub tasks_completed: usize,
    /// Elapsed seconds rounded to two decimals.
    pub elapsed_secs: f64,
    /// Whole tasks per minute, truncated.
    pub throughput: u64,
}

impl LeaderboardRow {
    /// Table cells; the position is folded into the name column as `"<n>. <name>"`.
    pub fn cells(&self) -> [String; 5] {
        [
            format!("{}. {}", self.position, self.name),
            self.category.clone(),
            self.tasks_completed.to_string(),
            format!("{:.2}", self.elapsed_secs),
            self.throughput.to_string(),
        ]
    }
}

/// Completed tasks per minute; zero when `elapsed` is not strictly positive.
pub fn throughput(tasks_completed: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    let score = tasks_completed as f64 / (secs / 60.0);
    if score.is_finite() { score } else { 0.0 }
}

/// Rank finished robots by descending throughput.
pub fn rank(robots: &[Robot]) -> Vec<LeaderboardRow> {
    let mut scored: Vec<(f64, &Robot)> = robots
        .iter()
        .map(|robot| (throughput(robot.tasks_completed(), robot.elapsed()), robot))
        .collect();
    // sort_by is stable: ties keep input order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (score, robot))| LeaderboardRow {
            position: idx + 1,
            name: robot.name().to_string(),
            category: robot.category().to_string(),
            tasks_completed: robot.tasks_completed(),
            elapsed_secs: (robot.elapsed().as_secs_f64() * 100.0).round() / 100.0,
            throughput: score as u64,
        })
        .collect()
}

/// Render rows as a heavy-outline text table.
pub fn render_table(rows: &[LeaderboardRow]) -> String {
    let body: Vec<[String; 5]> = rows.iter().map(LeaderboardRow::cells).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "━".repeat(w + 2)).collect();
        format!("{left}{}{right}\n", segments.join(mid))
    };
    let line = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter().zip(NUMERIC_COLUMNS))
            .map(|(cell, (&width, numeric))| {
                if numeric {
                    format!(" {cell:>width$} ")
                } else {
                    format!(" {cell:<width$} ")
                }
            })
            .collect();
        format!("┃{}┃\n", padded.join("┃"))
    };

    let mut out = rule("┏", "┳", "┓");
    out.push_str(&line(&HEADERS[..]));
    out.push_str(&rule("┣", "╋", "┫"));
    for cells in &body {
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        out.push_str(&line(&refs));
    }
    out.push_str(&rule("┗", "┻", "┛"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn finished(name: &str, completed: usize, elapsed_ms: u64) -> Robot {
        Robot::finished_for_test(
            Category::Bipedal,
            name,
            completed,
            Duration::from_millis(elapsed_ms),
        )
    }

    #[test]
    fn throughput_is_tasks_per_minute() {
        assert_eq!(throughput(3, Duration::from_secs(60)), 3.0);
        assert_eq!(throughput(1, Duration::from_secs(30)), 2.0);
        assert_eq!(throughput(0, Duration::from_secs(10)), 0.0);
    }

    #[test]
    fn zero_elapsed_scores_zero() {
        assert_eq!(throughput(0, Duration::ZERO), 0.0);
        assert_eq!(throughput(5, Duration::ZERO), 0.0);
    }

    #[test]
    fn ranks_by_descending_throughput() {
        let robots = vec![
            finished("slow", 1, 60_000),
            finished("fast", 4, 30_000),
            finished("mid", 3, 60_000),
        ];
        let rows = rank(&robots);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["fast", "mid", "slow"]);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].throughput, 8);
        assert_eq!(rows[2].position, 3);
    }

    #[test]
    fn ties_keep_input_order() {
        let robots = vec![
            finished("first", 2, 60_000),
            finished("second", 1, 30_000),
            finished("idle-a", 0, 0),
            finished("idle-b", 0, 0),
        ];
        let rows = rank(&robots);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "idle-a", "idle-b"]);
        assert_eq!(rows[3].throughput, 0);
    }

    #[test]
    fn ranking_is_idempotent() {
        let robots = vec![
            finished("a", 2, 12_345),
            finished("b", 5, 40_000),
            finished("c", 0, 0),
        ];
        assert_eq!(rank(&robots), rank(&robots));
    }

    #[test]
    fn row_rounds_time_and_truncates_throughput() {
        let robots = vec![finished("r", 2, 45_678)];
        let row = &rank(&robots)[0];
        assert_eq!(row.elapsed_secs, 45.68);
        // 2 / (45.678 / 60) = 2.627...
        assert_eq!(row.throughput, 2);
        assert_eq!(
            row.cells(),
            ["1. r", "BIPEDAL", "2", "45.68", "2"].map(String::from)
        );
    }

    #[test]
    fn table_has_headers_and_one_line_per_row() {
        let robots = vec![finished("Alpha", 3, 10_000), finished("Beta", 1, 10_000)];
        let table = render_table(&rank(&robots));
        let lines: Vec<&str> = table.lines().collect();
        // top rule, header, separator, two rows, bottom rule
        assert_eq!(lines.len(), 6);
        for header in HEADERS {
            assert!(lines[1].contains(header));
        }
        assert!(lines[3].contains("1. Alpha"));
        assert!(lines[4].contains("2. Beta"));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn rows_serialize_to_json() {
        let rows = rank(&[finished("Json", 1, 60_000)]);
        let value = serde_json::to_value(&rows).unwrap();
        assert_eq!(value[0]["name"], "Json");
        assert_eq!(value[0]["category"], "BIPEDAL");
        assert_eq!(value[0]["throughput"], 1);
        assert_eq!(value[0]["position"], 1);
    }
}
