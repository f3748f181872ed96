//! Guided Local Search driver.
//!
//! `INIT`: nearest-neighbor tour from the start node, then a full descent.
//! `ITERATING`: perturbation rounds on a working tour until the iteration or
//! time budget runs out, keeping the best tour by true cost.
//! `DONE`: the best tour is returned as a [`SearchResult`].

use crate::error::{GlsError, Result};
use crate::heuristics::construction::NearestNeighborHeuristic;
use crate::heuristics::deadline::Deadline;
use crate::heuristics::guide::EdgeGuide;
use crate::heuristics::local_search::{LocalSearch, DEFAULT_ITERATION_CAP};
use crate::heuristics::penalty::PenaltyMatrix;
use crate::heuristics::perturbation::Perturbation;
use crate::instance::DistanceMatrix;
use crate::solution::SearchResult;
use serde::{Deserialize, Serialize};

/// GLS configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlsConfig {
    /// Wall-clock budget in seconds
    pub time_limit: f64,
    /// Maximum number of perturbation rounds
    pub iter_limit: usize,
    /// Edges penalized per perturbation round
    pub perturbation_moves: usize,
    /// Iteration cap of every local search call
    pub local_search_cap: usize,
}

impl GlsConfig {
    /// General-purpose solving parameters (30 penalized edges per round)
    pub fn library() -> Self {
        GlsConfig {
            time_limit: 60.0,
            iter_limit: 1000,
            perturbation_moves: 30,
            local_search_cap: DEFAULT_ITERATION_CAP,
        }
    }

    /// Fast scoring parameters used when evaluating candidate guides (5 edges per round)
    pub fn evaluator() -> Self {
        GlsConfig {
            perturbation_moves: 5,
            ..Self::library()
        }
    }
}

impl Default for GlsConfig {
    fn default() -> Self {
        Self::library()
    }
}

/// Check that an instance can be searched at all
pub fn check_instance(distances: &DistanceMatrix) -> Result<()> {
    let n = distances.n();
    if n < 3 {
        return Err(GlsError::TooFewNodes(n));
    }
    Ok(())
}

/// Guided Local Search over a pluggable edge guide
pub struct GuidedLocalSearch<G> {
    pub config: GlsConfig,
    guide: G,
}

impl<G: EdgeGuide> GuidedLocalSearch<G> {
    pub fn new(guide: G, config: GlsConfig) -> Self {
        GuidedLocalSearch { config, guide }
    }

    /// Run one search from `start`.
    ///
    /// Precondition violations are reported before any search work. A failing
    /// guide aborts the run with [`GlsError::Guide`]. Running out of time is not
    /// an error: the best tour so far is returned.
    pub fn run(&self, distances: &DistanceMatrix, start: usize) -> Result<SearchResult> {
        check_instance(distances)?;
        let n = distances.n();
        if start >= n {
            return Err(GlsError::StartNodeOutOfRange { start, n });
        }

        let deadline = Deadline::after_secs(self.config.time_limit);
        let local_search = LocalSearch::with_standard_operators(self.config.local_search_cap);
        let perturbation = Perturbation::new(self.config.perturbation_moves);

        log::debug!(
            "gls: start n={} start_node={} guide={} time_limit_s={} iter_limit={}",
            n,
            start,
            self.guide.name(),
            self.config.time_limit,
            self.config.iter_limit
        );

        let mut best_tour = NearestNeighborHeuristic::new(start).construct(distances);
        local_search.run(distances.matrix(), &mut best_tour, None, &deadline);
        let mut best_cost = best_tour.cost(distances.matrix());

        let mut penalties = PenaltyMatrix::new(n);
        let mut current = best_tour.clone();
        let mut iteration = 0;

        while iteration < self.config.iter_limit && !deadline.expired() {
            perturbation.perturb(
                distances,
                &self.guide,
                &mut penalties,
                &mut current,
                &local_search,
                &deadline,
            )?;

            let cost = current.cost(distances.matrix());
            if cost < best_cost {
                log::debug!(
                    "gls: iteration={} start_node={} improved {:.4} -> {:.4}",
                    iteration,
                    start,
                    best_cost,
                    cost
                );
                best_tour = current.clone();
                best_cost = cost;
            }
            iteration += 1;
        }

        let elapsed_time = deadline.elapsed_secs();
        log::debug!(
            "gls: done start_node={} best_cost={:.4} iterations={} elapsed_s={:.3}",
            start,
            best_cost,
            iteration,
            elapsed_time
        );

        Ok(SearchResult {
            best_tour,
            best_cost,
            elapsed_time,
            iterations: iteration,
            start_node: start,
        })
    }
}
