//! One GLS perturbation round.
//!
//! The guide is computed once per round. Edges are then picked by largest
//! `guide - distance` gap, penalized, and the tour is repaired locally around
//! both endpoints against the guide matrix. The round ends with a full
//! descent on the true distances.

use crate::error::GuideError;
use crate::heuristics::deadline::Deadline;
use crate::heuristics::guide::{compute_guide, EdgeGuide};
use crate::heuristics::local_search::LocalSearch;
use crate::heuristics::penalty::PenaltyMatrix;
use crate::instance::{DistanceMatrix, Matrix};
use crate::tour::Tour;

/// What a perturbation round did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerturbationOutcome {
    /// Edges penalized this round
    pub penalized: usize,
    /// Accumulated guide-cost delta of the anchored repairs
    pub guided_delta: f64,
    /// Delta of the closing descent on the true distances
    pub repair_delta: f64,
}

/// Perturbation step of guided local search
pub struct Perturbation {
    /// Number of edges penalized per round
    pub moves: usize,
}

impl Perturbation {
    pub fn new(moves: usize) -> Self {
        Perturbation { moves }
    }

    /// Element-wise `guide - distance`, diagonal excluded
    fn gap_matrix(guide: &Matrix<f32>, distances: &DistanceMatrix) -> Matrix<f32> {
        let n = distances.n();
        let mut gap = Matrix::filled(n, 0.0f32);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    gap.set(i, j, guide.get(i, j) - distances.distance(i, j));
                }
            }
        }
        gap
    }

    /// Largest strictly positive gap, first in row-major order on ties
    fn most_suspicious_edge(gap: &Matrix<f32>) -> Option<(usize, usize)> {
        let n = gap.n();
        let mut best = None;
        let mut best_gap = 0.0f32;
        for (idx, &value) in gap.as_slice().iter().enumerate() {
            if value > best_gap {
                best_gap = value;
                best = Some((idx / n, idx % n));
            }
        }
        best
    }

    /// Run one round on `tour`, updating `penalties` in place.
    ///
    /// Fails only if the guide does. Anchors at tour positions `0` and `n - 1`
    /// are skipped.
    pub fn perturb<G: EdgeGuide + ?Sized>(
        &self,
        distances: &DistanceMatrix,
        guide: &G,
        penalties: &mut PenaltyMatrix,
        tour: &mut Tour,
        local_search: &LocalSearch,
        deadline: &Deadline,
    ) -> Result<PerturbationOutcome, GuideError> {
        let n = distances.n();
        let guide_matrix = compute_guide(guide, distances, tour, penalties)?;
        let mut gap = Self::gap_matrix(&guide_matrix, distances);
        let mut outcome = PerturbationOutcome::default();

        for _ in 0..self.moves {
            if deadline.expired() {
                break;
            }
            let Some((u, v)) = Self::most_suspicious_edge(&gap) else {
                break;
            };

            penalties.increment(u, v);
            gap.set(u, v, 0.0);
            gap.set(v, u, 0.0);
            outcome.penalized += 1;

            for node in [u, v] {
                match tour.position_of(node) {
                    Some(pos) if pos != 0 && pos != n - 1 => {
                        outcome.guided_delta +=
                            local_search.run(&guide_matrix, tour, Some(pos), deadline);
                    }
                    _ => {}
                }
            }
        }

        outcome.repair_delta = local_search.run(distances.matrix(), tour, None, deadline);
        debug_assert!(tour.is_permutation());

        Ok(outcome)
    }
}

impl Default for Perturbation {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::guide::UtilityGuide;
    use crate::instance::GuideMatrix;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    type GuideResult = Result<GuideMatrix, GuideError>;

    fn random_instance(n: usize, seed: u64) -> DistanceMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen::<f64>() * 100.0, rng.gen::<f64>() * 100.0))
            .collect();
        DistanceMatrix::from_coords(&coords).unwrap()
    }

    /// Locally optimal tour on the true distances
    fn descended_tour(distances: &DistanceMatrix, ls: &LocalSearch) -> Tour {
        let mut tour = Tour::identity(distances.n());
        ls.improve(distances.matrix(), &mut tour);
        tour
    }

    /// Guide equal to the distances except for one inflated edge
    fn inflate(d: &DistanceMatrix, a: usize, b: usize) -> GuideMatrix {
        let mut g = d.matrix().clone();
        g.set(a, b, d.distance(a, b) + 1000.0);
        g.set(b, a, d.distance(a, b) + 1000.0);
        g
    }

    #[test]
    fn test_most_suspicious_edge() {
        let mut gap = Matrix::filled(3, 0.0f32);
        assert_eq!(Perturbation::most_suspicious_edge(&gap), None);

        gap.set(0, 2, 1.5);
        gap.set(2, 1, 1.5);
        gap.set(1, 0, -4.0);
        assert_eq!(Perturbation::most_suspicious_edge(&gap), Some((0, 2)));
    }

    #[test]
    fn test_round_penalizes_and_keeps_permutation() {
        let distances = random_instance(20, 9);
        let ls = LocalSearch::default();
        let mut tour = descended_tour(&distances, &ls);
        let mut penalties = PenaltyMatrix::new(20);
        let guide = UtilityGuide::default();

        let outcome = Perturbation::new(5)
            .perturb(&distances, &guide, &mut penalties, &mut tour, &ls, &Deadline::unlimited())
            .unwrap();

        assert_eq!(outcome.penalized, 5);
        assert_eq!(penalties.total(), 10);
        assert!(penalties.is_symmetric());
        assert!(tour.is_permutation());
        assert!(outcome.repair_delta <= 0.0);
    }

    #[test]
    fn test_penalties_never_decrease_across_rounds() {
        let distances = random_instance(25, 4);
        let ls = LocalSearch::default();
        let mut tour = Tour::identity(25);
        let mut penalties = PenaltyMatrix::new(25);
        let perturbation = Perturbation::new(8);
        let guide = UtilityGuide::default();

        for _ in 0..10 {
            let before = penalties.clone();
            perturbation
                .perturb(&distances, &guide, &mut penalties, &mut tour, &ls, &Deadline::unlimited())
                .unwrap();

            for i in 0..25 {
                for j in 0..25 {
                    assert!(penalties.get(i, j) >= before.get(i, j));
                }
            }
            assert!(penalties.is_symmetric());
            assert!(tour.is_permutation());
        }
    }

    #[test]
    fn test_endpoints_at_tour_ends_are_not_repaired() {
        let distances = random_instance(12, 5);
        let ls = LocalSearch::default();
        let mut tour = descended_tour(&distances, &ls);
        let before = tour.clone();
        let (first, last) = (tour.node_at(0), tour.node_at(11));
        let mut penalties = PenaltyMatrix::new(12);

        let closing_edge = move |d: &DistanceMatrix, _: &Tour, _: &PenaltyMatrix| -> GuideResult {
            Ok(inflate(d, first, last))
        };
        let deadline = Deadline::unlimited();
        let outcome = Perturbation::new(1)
            .perturb(&distances, &closing_edge, &mut penalties, &mut tour, &ls, &deadline)
            .unwrap();

        assert_eq!(outcome.penalized, 1);
        assert_eq!(penalties.get(first, last), 1);
        assert_eq!(penalties.get(last, first), 1);
        assert_eq!(outcome.guided_delta, 0.0);
        assert_eq!(outcome.repair_delta, 0.0);
        assert_eq!(tour, before);
    }

    #[test]
    fn test_anchored_repair_uses_guide_costs() {
        let distances = random_instance(12, 5);
        let ls = LocalSearch::default();
        let mut tour = descended_tour(&distances, &ls);
        let (a, b) = (tour.node_at(4), tour.node_at(5));
        let mut penalties = PenaltyMatrix::new(12);

        // the tour is already a local optimum on the true distances, so any
        // guided improvement can only come from the inflated guide entry
        let mut untouched = tour.clone();
        assert_eq!(ls.repair(distances.matrix(), &mut untouched, 4), 0.0);

        let inner_edge = move |d: &DistanceMatrix, _: &Tour, _: &PenaltyMatrix| -> GuideResult {
            Ok(inflate(d, a, b))
        };
        let deadline = Deadline::unlimited();
        let outcome = Perturbation::new(1)
            .perturb(&distances, &inner_edge, &mut penalties, &mut tour, &ls, &deadline)
            .unwrap();

        assert_eq!(outcome.penalized, 1);
        assert_eq!(penalties.get(a, b), 1);
        assert!(outcome.guided_delta < -500.0, "guided delta {}", outcome.guided_delta);
        assert!(outcome.repair_delta <= 0.0);
        assert!(tour.is_permutation());
    }

    #[test]
    fn test_zero_gap_guide_penalizes_nothing() {
        let distances = random_instance(10, 2);
        let ls = LocalSearch::default();
        let mut tour = Tour::identity(10);
        let mut penalties = PenaltyMatrix::new(10);
        let identity = |d: &DistanceMatrix, _: &Tour, _: &PenaltyMatrix| -> GuideResult {
            Ok(d.matrix().clone())
        };

        let outcome = Perturbation::new(5)
            .perturb(&distances, &identity, &mut penalties, &mut tour, &ls, &Deadline::unlimited())
            .unwrap();

        assert_eq!(outcome.penalized, 0);
        assert_eq!(penalties.total(), 0);
    }

    #[test]
    fn test_guide_error_leaves_tour_untouched() {
        let distances = random_instance(10, 2);
        let ls = LocalSearch::default();
        let mut tour = Tour::identity(10);
        let mut penalties = PenaltyMatrix::new(10);
        let failing = |_: &DistanceMatrix, _: &Tour, _: &PenaltyMatrix| -> GuideResult {
            Err(GuideError::failed("nope"))
        };

        let result = Perturbation::new(5).perturb(
            &distances,
            &failing,
            &mut penalties,
            &mut tour,
            &ls,
            &Deadline::unlimited(),
        );

        assert!(result.is_err());
        assert_eq!(tour, Tour::identity(10));
        assert_eq!(penalties.total(), 0);
    }
}
