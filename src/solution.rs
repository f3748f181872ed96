//! Search results returned by the GLS driver.

use crate::tour::Tour;
use serde::{Deserialize, Serialize};

/// Outcome of one guided local search run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best tour found, measured on the true distances
    pub best_tour: Tour,
    /// True cost of `best_tour`
    pub best_cost: f64,
    /// Wall-clock time of the run in seconds
    pub elapsed_time: f64,
    /// Number of perturbation rounds completed
    pub iterations: usize,
    /// Node the nearest-neighbor construction started from
    pub start_node: usize,
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search result (start node {})", self.start_node)?;
        writeln!(f, "  Cost: {:.2}", self.best_cost)?;
        writeln!(f, "  Time: {:.4}s", self.elapsed_time)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Tour: {:?}", self.best_tour.as_slice())
    }
}
