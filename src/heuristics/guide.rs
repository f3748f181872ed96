//! Edge guidance: the pluggable strategy that turns the true distances, the
//! current tour and the penalty counters into a guide matrix.
//!
//! Guides are treated as untrusted code. [`compute_guide`] is the only place
//! the engine calls them; it catches panics and validates the returned matrix
//! so a faulty guide surfaces as a [`GuideError`] instead of aborting a batch.

use crate::error::GuideError;
use crate::heuristics::penalty::PenaltyMatrix;
use crate::instance::{DistanceMatrix, GuideMatrix};
use crate::tour::Tour;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Strategy producing a guide matrix for one perturbation round.
///
/// Contract: the returned matrix has the same dimension as `distances` and
/// every entry is finite and `>= 0`. Entries where the guide exceeds the true
/// distance are candidates for penalization, largest gap first.
pub trait EdgeGuide: Send + Sync {
    fn guide(
        &self,
        distances: &DistanceMatrix,
        tour: &Tour,
        penalties: &PenaltyMatrix,
    ) -> Result<GuideMatrix, GuideError>;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> EdgeGuide for F
where
    F: Fn(&DistanceMatrix, &Tour, &PenaltyMatrix) -> Result<GuideMatrix, GuideError> + Send + Sync,
{
    fn guide(
        &self,
        distances: &DistanceMatrix,
        tour: &Tour,
        penalties: &PenaltyMatrix,
    ) -> Result<GuideMatrix, GuideError> {
        self(distances, tour, penalties)
    }
}

/// Classic GLS guidance for the TSP.
///
/// Every off-diagonal entry is raised by the penalty term `lambda * p(a, b)`, where
/// `lambda = alpha * cost(tour) / n` is `alpha` times the average edge length of the
/// current tour. Edges of the current tour additionally carry the GLS utility
/// `weight * d(a, b) / (1 + p(a, b))`, so long tour edges that have rarely been
/// penalized show the largest gap and are selected first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityGuide {
    /// Scale of the utility bump on tour edges
    pub weight: f32,
    /// Penalty factor relative to the average tour edge length
    pub alpha: f32,
}

impl UtilityGuide {
    pub fn new(weight: f32, alpha: f32) -> Self {
        UtilityGuide { weight, alpha }
    }

    /// Cost added per penalty count on `tour`
    pub fn lambda(&self, distances: &DistanceMatrix, tour: &Tour) -> f32 {
        if tour.is_empty() {
            return 0.0;
        }
        let average = tour.cost(distances.matrix()) / tour.len() as f64;
        self.alpha * average as f32
    }
}

impl Default for UtilityGuide {
    fn default() -> Self {
        Self::new(1.0, 0.1)
    }
}

impl EdgeGuide for UtilityGuide {
    fn guide(
        &self,
        distances: &DistanceMatrix,
        tour: &Tour,
        penalties: &PenaltyMatrix,
    ) -> Result<GuideMatrix, GuideError> {
        let n = distances.n();
        let lambda = self.lambda(distances, tour);
        let mut guide = distances.matrix().clone();

        for a in 0..n {
            for b in 0..n {
                if a != b {
                    let p = penalties.get(a, b) as f32;
                    guide.set(a, b, distances.distance(a, b) + lambda * p);
                }
            }
        }

        for k in 0..tour.len() {
            let a = tour.node_at(k);
            let b = tour.node_at(k + 1);
            let utility = distances.distance(a, b) / (1.0 + penalties.get(a, b) as f32);
            let value = guide.get(a, b) + self.weight * utility;
            guide.set(a, b, value);
            guide.set(b, a, value);
        }

        Ok(guide)
    }

    fn name(&self) -> &str {
        "utility"
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Check the guide contract: matching dimension, finite, non-negative
pub fn validate_guide(guide: &GuideMatrix, n: usize) -> Result<(), GuideError> {
    if guide.n() != n || guide.as_slice().len() != n * n {
        return Err(GuideError::ShapeMismatch {
            expected: n,
            actual: guide.n(),
        });
    }

    for (idx, &value) in guide.as_slice().iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        if !value.is_finite() {
            return Err(GuideError::NonFinite { row, col });
        }
        if value < 0.0 {
            return Err(GuideError::Negative { row, col, value });
        }
    }

    Ok(())
}

/// Invoke `guide` behind a panic barrier and validate its output
pub fn compute_guide<G: EdgeGuide + ?Sized>(
    guide: &G,
    distances: &DistanceMatrix,
    tour: &Tour,
    penalties: &PenaltyMatrix,
) -> Result<GuideMatrix, GuideError> {
    let matrix = catch_unwind(AssertUnwindSafe(|| guide.guide(distances, tour, penalties)))
        .map_err(|payload| GuideError::Panicked(panic_message(payload.as_ref())))??;

    validate_guide(&matrix, distances.n())?;
    Ok(matrix)
}
