//! Interactive input collection for the play-again session.
//!
//! Generic over the reader and writer so sessions can be scripted in tests.

use std::io::{self, BufRead, Write};

use crate::config::SimConfig;
use crate::error::Result;
use crate::robot::Robot;
use crate::types::Category;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `question` and read one line without its line ending.
    ///
    /// End of input is an error: every caller would otherwise re-prompt forever.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Ask until the answer is a whole number in `1..=max_robots`.
    pub fn robot_count(&mut self, config: &SimConfig) -> Result<usize> {
        loop {
            let answer = self.ask("Enter the desired number of bots to create: ")?;
            // Anything unparsable counts as zero, like an empty answer.
            let count = answer.trim().parse::<usize>().unwrap_or(0);
            match config.check_robot_count(count) {
                Ok(count) => return Ok(count),
                Err(_) if count < 1 => {
                    writeln!(self.output, "Invalid, need to create at least one robot.")?
                }
                Err(_) => writeln!(
                    self.output,
                    "Invalid, creating an excessive number of robots is strongly discouraged."
                )?,
            }
        }
    }

    /// Print the supported categories.
    pub fn list_categories(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Robots are created based on both a name and type. The supported types are: "
        )?;
        writeln!(self.output, "Robot Types\n-----------")?;
        for category in Category::ALL {
            writeln!(self.output, "{}", category.label())?;
        }
        Ok(())
    }

    /// Collect `count` robots, reporting each rejected entry and asking again.
    pub fn robots(&mut self, count: usize) -> Result<Vec<Robot>> {
        let mut robots = Vec::with_capacity(count);
        while robots.len() < count {
            let number = robots.len() + 1;
            let name = self.ask(&format!("\nSelect a name for Robot#{number}: "))?;
            let category = self.ask(&format!(
                "Select a robot type from the list above for Robot#{number}: "
            ))?;
            match Robot::new(&category, name) {
                Ok(robot) => robots.push(robot),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
        Ok(robots)
    }

    pub fn pause(&mut self, message: &str) -> Result<()> {
        self.ask(message).map(|_| ())
    }

    /// `true` only for an answer of `y` or `Y`.
    pub fn play_again(&mut self) -> Result<bool> {
        let answer = self.ask("\nRobots finished their duty! Enter 'Y' to play again: ")?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}
