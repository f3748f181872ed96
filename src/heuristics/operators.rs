//! Best-improvement move scanners for 2-opt and single-node relocation.
//!
//! Scanners are stateless and evaluate moves against whatever cost matrix
//! they are handed: the true distances or a guide matrix. An anchored scan
//! only considers moves whose first position is the anchor.

use crate::instance::Matrix;
use crate::tour::{Move, Tour};

/// Minimum improvement for a move to be accepted
pub const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// A neighborhood that can propose its best improving move
pub trait MoveOperator {
    /// Best strictly improving move, or `None` if no move beats `-IMPROVEMENT_EPSILON`.
    /// `anchor` restricts the scan to moves starting at that tour position.
    fn best_move(&self, costs: &Matrix<f32>, tour: &Tour, anchor: Option<usize>) -> Option<Move>;
    fn name(&self) -> &str;
}

/// 2-opt: reverse a contiguous segment of the tour
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOpt;

/// Relocate: move one node to another position
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocate;

impl MoveOperator for TwoOpt {
    fn best_move(&self, costs: &Matrix<f32>, tour: &Tour, anchor: Option<usize>) -> Option<Move> {
        best_two_opt(costs, tour, anchor)
    }

    fn name(&self) -> &str {
        "2-Opt"
    }
}

impl MoveOperator for Relocate {
    fn best_move(&self, costs: &Matrix<f32>, tour: &Tour, anchor: Option<usize>) -> Option<Move> {
        best_relocate(costs, tour, anchor)
    }

    fn name(&self) -> &str {
        "Relocate"
    }
}

#[inline]
fn c(costs: &Matrix<f32>, a: usize, b: usize) -> f64 {
    costs.get(a, b) as f64
}

/// Scan for the best segment reversal `tour[i..=j]` with `1 <= i < j < n`.
///
/// The delta `c(prev, t[j]) + c(t[i], next) - c(prev, t[i]) - c(t[j], next)` is exact for
/// symmetric cost matrices. Anchors outside `1..n-1` yield no move.
pub fn best_two_opt(costs: &Matrix<f32>, tour: &Tour, anchor: Option<usize>) -> Option<Move> {
    let t = tour.as_slice();
    let n = t.len();
    if n < 3 {
        return None;
    }

    let range = match anchor {
        None => 1..n - 1,
        Some(a) if a >= 1 && a < n - 1 => a..a + 1,
        Some(_) => return None,
    };

    let mut best: Option<(usize, usize)> = None;
    let mut best_delta = 0.0;

    for i in range {
        let node_i = t[i];
        let prev = t[i - 1];
        for j in i + 1..n {
            let node_j = t[j];
            let next = t[(j + 1) % n];
            if prev == node_j || next == node_i || prev == next {
                continue;
            }

            let delta = c(costs, prev, node_j) + c(costs, node_i, next)
                - c(costs, prev, node_i)
                - c(costs, node_j, next);

            if delta < best_delta {
                best_delta = delta;
                best = Some((i, j));
            }
        }
    }

    match best {
        Some((i, j)) if best_delta < -IMPROVEMENT_EPSILON => {
            Some(Move::TwoOpt { i, j, delta: best_delta })
        }
        _ => None,
    }
}

/// Scan for the best relocation of the node at position `i` (`1 <= i < n`) to just after
/// position `j`, with `j != i` and `j != i - 1`.
pub fn best_relocate(costs: &Matrix<f32>, tour: &Tour, anchor: Option<usize>) -> Option<Move> {
    let t = tour.as_slice();
    let n = t.len();
    if n < 3 {
        return None;
    }

    let range = match anchor {
        None => 1..n,
        Some(a) if a >= 1 && a < n => a..a + 1,
        Some(_) => return None,
    };

    let mut best: Option<(usize, usize)> = None;
    let mut best_delta = 0.0;

    for i in range {
        let node = t[i];
        let prev = t[i - 1];
        let next = t[(i + 1) % n];
        // gain from closing the gap left by `node`
        let removal = c(costs, prev, next) - c(costs, prev, node) - c(costs, node, next);

        for j in 0..n {
            if j == i || j + 1 == i {
                continue;
            }
            let prev_insert = t[j];
            let next_insert = t[(j + 1) % n];

            let delta = removal - c(costs, prev_insert, next_insert)
                + c(costs, prev_insert, node)
                + c(costs, node, next_insert);

            if delta < best_delta {
                best_delta = delta;
                best = Some((i, j));
            }
        }
    }

    match best {
        Some((i, j)) if best_delta < -IMPROVEMENT_EPSILON => {
            Some(Move::Relocate { i, j, delta: best_delta })
        }
        _ => None,
    }
}
