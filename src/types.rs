//! Robot categories and the task model shared across the system.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::index;

use crate::error::{BotError, Result};

/// Six-digit task identifier. Uniqueness is best-effort only.
pub type TaskId = String;

const ID_DIGITS: &[u8; 10] = b"0123456789";
/// Digits drawn after the leading one.
const ID_TAIL_LEN: usize = 5;

/// Closed set of robot kinds; also used to restrict which robots earn credit for a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Unipedal,
    Bipedal,
    Quadrupedal,
    Arachnid,
    Radial,
    Aeronautical,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unipedal,
        Category::Bipedal,
        Category::Quadrupedal,
        Category::Arachnid,
        Category::Radial,
        Category::Aeronautical,
    ];

    /// Human-facing label, e.g. `Quadrupedal`.
    pub fn label(self) -> &'static str {
        match self {
            Category::Unipedal => "Unipedal",
            Category::Bipedal => "Bipedal",
            Category::Quadrupedal => "Quadrupedal",
            Category::Arachnid => "Arachnid",
            Category::Radial => "Radial",
            Category::Aeronautical => "Aeronautical",
        }
    }

    /// Upper-case tag used in listings and the leaderboard, e.g. `QUADRUPEDAL`.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Unipedal => "UNIPEDAL",
            Category::Bipedal => "BIPEDAL",
            Category::Quadrupedal => "QUADRUPEDAL",
            Category::Arachnid => "ARACHNID",
            Category::Radial => "RADIAL",
            Category::Aeronautical => "AERONAUTICAL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = BotError;

    /// Case-insensitive: input is normalised to a capitalised label before matching.
    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        let normalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => return Err(BotError::UnknownCategory(input.to_string())),
        };
        Category::ALL
            .into_iter()
            .find(|category| category.label() == normalized)
            .ok_or_else(|| BotError::UnknownCategory(input.to_string()))
    }
}

/// Unit of work assigned to robots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    description: String,
    eta_ms: u64,
    required: Option<Category>,
    id: TaskId,
}

impl Task {
    /// Construct a task with an identifier drawn from the thread-local generator.
    #[cfg(test)]
    pub fn new(
        description: impl Into<String>,
        eta_ms: u64,
        required: Option<Category>,
    ) -> Result<Self> {
        Self::with_rng(description, eta_ms, required, &mut rand::thread_rng())
    }

    /// Construct a task, drawing its identifier from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        description: impl Into<String>,
        eta_ms: u64,
        required: Option<Category>,
        rng: &mut R,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(BotError::EmptyDescription);
        }
        if eta_ms < 1 {
            return Err(BotError::InvalidEta(eta_ms));
        }
        Ok(Self {
            description,
            eta_ms,
            required,
            id: generate_id(rng),
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn eta_ms(&self) -> u64 {
        self.eta_ms
    }

    pub fn required(&self) -> Option<Category> {
        self.required
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether a robot of `category` earns completion credit for this task.
    pub fn credits(&self, category: Category) -> bool {
        self.required.is_none_or(|required| required == category)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task: {}. ID#{}. ETA: {}.",
            self.description, self.id, self.eta_ms
        )
    }
}

/// Leading digit in 1..=9, then five distinct digits sampled without replacement.
fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> TaskId {
    let mut id = String::with_capacity(ID_TAIL_LEN + 1);
    id.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for idx in index::sample(rng, ID_DIGITS.len(), ID_TAIL_LEN) {
        id.push(char::from(ID_DIGITS[idx]));
    }
    id
}
