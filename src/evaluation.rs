//! Evaluation wrapper for scoring candidate edge guides.
//!
//! Guides under evaluation are untrusted. Whatever goes wrong inside a run,
//! whether an invalid instance, a guide error, or a panic anywhere in the
//! search, is turned into a failed [`Evaluation`] with infinite cost and time
//! so a caller scoring many guides in a loop is never interrupted.

use crate::heuristics::gls::GlsConfig;
use crate::heuristics::guide::EdgeGuide;
use crate::heuristics::multi_start::{MultiStart, MultiStartConfig};
use crate::instance::DistanceMatrix;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// How an evaluation is turned into a scalar fitness (higher is better)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ScoreMode {
    /// `-cost`
    #[default]
    Cost,
    /// `-(cost + time_weight * elapsed_time)`
    TimeAware { time_weight: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub search: MultiStartConfig,
    pub score: ScoreMode,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            search: MultiStartConfig {
                n_starts: 1,
                gls: GlsConfig::evaluator(),
                ..MultiStartConfig::default()
            },
            score: ScoreMode::Cost,
        }
    }
}

/// Result of evaluating one guide on one instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Best tour cost over all starts
    pub cost: f64,
    /// Wall-clock time of the whole evaluation in seconds
    pub elapsed_time: f64,
}

impl Evaluation {
    /// Sentinel for a run that failed
    pub fn failed() -> Self {
        Evaluation {
            cost: f64::INFINITY,
            elapsed_time: f64::INFINITY,
        }
    }

    pub fn is_failed(&self) -> bool {
        !self.cost.is_finite()
    }

    /// Scalar fitness; failed evaluations score `-inf`
    pub fn fitness(&self, mode: ScoreMode) -> f64 {
        match mode {
            ScoreMode::Cost => -self.cost,
            ScoreMode::TimeAware { time_weight } => {
                -(self.cost + time_weight * self.elapsed_time)
            }
        }
    }
}

/// Score `guide` on `distances`. Never panics and never returns an error.
pub fn evaluate<G: EdgeGuide>(
    distances: &DistanceMatrix,
    guide: G,
    config: &EvaluationConfig,
) -> Evaluation {
    let search = MultiStart::new(guide, config.search);
    let start = Instant::now();
    let outcome = catch_unwind(AssertUnwindSafe(|| search.run(distances)));
    let elapsed_time = start.elapsed().as_secs_f64();

    match outcome {
        Ok(Ok(result)) => Evaluation {
            cost: result.best_cost,
            elapsed_time,
        },
        Ok(Err(e)) => {
            log::warn!("evaluation failed: {}", e);
            Evaluation::failed()
        }
        Err(_) => {
            log::warn!("evaluation failed: search panicked");
            Evaluation::failed()
        }
    }
}
