//! Multi-start GLS: independent runs from distinct start nodes on a rayon
//! pool, sharing the read-only distance matrix and guide.

use crate::error::{GlsError, Result};
use crate::heuristics::gls::{check_instance, GlsConfig, GuidedLocalSearch};
use crate::heuristics::guide::EdgeGuide;
use crate::instance::DistanceMatrix;
use crate::solution::SearchResult;
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How start nodes are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartNodes {
    /// Evenly spaced: `k * n / n_starts`
    #[default]
    Spread,
    /// Distinct nodes sampled from a seeded generator
    Random { seed: u64 },
}

impl StartNodes {
    pub fn select(&self, n: usize, n_starts: usize) -> Result<Vec<usize>> {
        if n_starts == 0 || n_starts > n {
            return Err(GlsError::InvalidStartCount { requested: n_starts, n });
        }

        let starts = match *self {
            StartNodes::Spread => (0..n_starts).map(|k| k * n / n_starts).collect(),
            StartNodes::Random { seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                sample(&mut rng, n, n_starts).into_vec()
            }
        };
        Ok(starts)
    }
}

/// Multi-start configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiStartConfig {
    /// Number of independent runs
    pub n_starts: usize,
    /// Worker threads (`None` lets rayon decide)
    pub threads: Option<usize>,
    pub start_nodes: StartNodes,
    /// Configuration of every run
    pub gls: GlsConfig,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        MultiStartConfig {
            n_starts: 4,
            threads: None,
            start_nodes: StartNodes::Spread,
            gls: GlsConfig::default(),
        }
    }
}

/// Runs several GLS searches concurrently and keeps the best
pub struct MultiStart<G> {
    pub config: MultiStartConfig,
    search: GuidedLocalSearch<G>,
}

impl<G: EdgeGuide> MultiStart<G> {
    pub fn new(guide: G, config: MultiStartConfig) -> Self {
        MultiStart {
            search: GuidedLocalSearch::new(guide, config.gls),
            config,
        }
    }

    /// Run one search per start node and return the best result.
    ///
    /// Ties go to the earliest start node in selection order. Failed workers are
    /// ignored as long as one worker succeeds; otherwise the first error in
    /// start-node order is returned.
    pub fn run(&self, distances: &DistanceMatrix) -> Result<SearchResult> {
        check_instance(distances)?;
        let starts = self.config.start_nodes.select(distances.n(), self.config.n_starts)?;
        self.run_from(distances, &starts)
    }

    /// Run one search per given start node
    pub fn run_from(&self, distances: &DistanceMatrix, starts: &[usize]) -> Result<SearchResult> {
        check_instance(distances)?;
        if starts.is_empty() {
            return Err(GlsError::InvalidStartCount { requested: 0, n: distances.n() });
        }

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| GlsError::ThreadPool(e.to_string()))?;

        log::info!(
            "multi_start: start n={} starts={} threads={}",
            distances.n(),
            starts.len(),
            pool.current_num_threads()
        );
        let batch_start = Instant::now();

        let results: Vec<Result<SearchResult>> = pool.install(|| {
            starts
                .par_iter()
                .map(|&start| {
                    let result = self.search.run(distances, start);
                    match &result {
                        Ok(r) => log::debug!(
                            "multi_start.run: done start_node={} cost={:.4}",
                            start,
                            r.best_cost
                        ),
                        Err(e) => {
                            log::warn!("multi_start.run: failed start_node={}: {}", start, e)
                        }
                    }
                    result
                })
                .collect()
        });

        let mut best: Option<SearchResult> = None;
        let mut first_error: Option<GlsError> = None;

        for result in results {
            match result {
                Ok(candidate) => {
                    if best.as_ref().map_or(true, |b| candidate.best_cost < b.best_cost) {
                        best = Some(candidate);
                    }
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match (best, first_error) {
            (Some(best), _) => {
                log::info!(
                    "multi_start: complete best_cost={:.4} start_node={} elapsed_s={:.3}",
                    best.best_cost,
                    best.start_node,
                    batch_start.elapsed().as_secs_f64()
                );
                Ok(best)
            }
            (None, Some(e)) => Err(e),
            (None, None) => Err(GlsError::InvalidStartCount { requested: 0, n: distances.n() }),
        }
    }
}
