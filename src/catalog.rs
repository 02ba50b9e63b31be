//! Chore catalog and random queue population.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::Result;
use crate::robot::Robot;
use crate::types::{Category, Task};

/// A catalog line: description, eta in milliseconds, and the category that earns credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub description: &'static str,
    pub eta_ms: u64,
    pub required: Option<Category>,
}

const fn entry(description: &'static str, eta_ms: u64, required: Option<Category>) -> CatalogEntry {
    CatalogEntry {
        description,
        eta_ms,
        required,
    }
}

pub const CHORES: [CatalogEntry; 14] = [
    entry("Do the dishes", 1000, Some(Category::Unipedal)),
    entry("Sweep the house", 3000, None),
    entry("Do the laundry", 10000, None),
    entry("Take out the recycling", 4000, Some(Category::Bipedal)),
    entry("Make a sandwich", 7000, None),
    entry("Mow the lawn", 20000, None),
    entry("Rake the leaves", 18000, None),
    entry("Give the dog a bath", 14500, Some(Category::Quadrupedal)),
    entry("Bake some cookies", 8000, None),
    entry("Wash the car", 20000, Some(Category::Radial)),
    entry("Buy some groceries", 30000, Some(Category::Bipedal)),
    entry("Look for good Black Friday deals", 10000, None),
    entry("Chase the house dog", 1000, Some(Category::Arachnid)),
    entry("Fly around the woods", 10000, Some(Category::Aeronautical)),
];

impl CatalogEntry {
    /// Instantiate a fresh task (new identifier) from this entry.
    pub fn to_task<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Task> {
        Task::with_rng(self.description, self.eta_ms, self.required, rng)
    }
}

/// The chore catalog in shuffled order.
pub fn shuffled_catalog<R: Rng + ?Sized>(rng: &mut R) -> Vec<CatalogEntry> {
    let mut catalog = CHORES.to_vec();
    catalog.shuffle(rng);
    catalog
}

/// Give every robot `per_robot` tasks drawn uniformly, with replacement, from `catalog`.
pub fn assign_tasks<R: Rng + ?Sized>(
    robots: &mut [Robot],
    catalog: &[CatalogEntry],
    per_robot: usize,
    rng: &mut R,
) -> Result<()> {
    for robot in robots.iter_mut() {
        for _ in 0..per_robot {
            let Some(picked) = catalog.choose(rng) else {
                return Ok(());
            };
            robot.assign(picked.to_task(rng)?);
        }
    }
    Ok(())
}
