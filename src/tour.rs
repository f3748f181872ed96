//! Tour representation and the two elementary tour rewrites.
//!
//! A tour is a permutation of `0..n` read as a closed cycle. Every mutation
//! offered here is a pure reordering, so the permutation invariant holds by
//! construction.

use crate::instance::Matrix;
use serde::{Deserialize, Serialize};

/// A closed tour over node indices `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour {
    nodes: Vec<usize>,
}

impl Tour {
    /// Wrap a node sequence. Returns `None` unless it is a permutation of `0..len`.
    pub fn new(nodes: Vec<usize>) -> Option<Self> {
        let tour = Tour { nodes };
        if tour.is_permutation() {
            Some(tour)
        } else {
            None
        }
    }

    /// The tour `0, 1, ..., n - 1`
    pub fn identity(n: usize) -> Self {
        Tour { nodes: (0..n).collect() }
    }

    pub(crate) fn from_nodes_unchecked(nodes: Vec<usize>) -> Self {
        debug_assert!(Tour { nodes: nodes.clone() }.is_permutation());
        Tour { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.nodes
    }

    /// Node at a given position (circular)
    #[inline]
    pub fn node_at(&self, pos: usize) -> usize {
        self.nodes[pos % self.nodes.len()]
    }

    /// Get the position of a node in the tour
    pub fn position_of(&self, node: usize) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// Check that every node of `0..len` appears exactly once
    pub fn is_permutation(&self) -> bool {
        let n = self.nodes.len();
        let mut seen = vec![false; n];
        for &node in &self.nodes {
            if node >= n || seen[node] {
                return false;
            }
            seen[node] = true;
        }
        true
    }

    /// Sum of edge costs around the cycle, including the closing edge
    pub fn cost(&self, costs: &Matrix<f32>) -> f64 {
        let n = self.nodes.len();
        if n < 2 {
            return 0.0;
        }

        let mut total = 0.0;
        for i in 0..n - 1 {
            total += costs.get(self.nodes[i], self.nodes[i + 1]) as f64;
        }
        total += costs.get(self.nodes[n - 1], self.nodes[0]) as f64;

        total
    }

    /// Reverse the segment `i..=j` (a 2-opt move)
    pub fn apply_two_opt(&mut self, i: usize, j: usize) {
        debug_assert!(i <= j && j < self.nodes.len());
        self.nodes[i..=j].reverse();
    }

    /// Move the node at position `i` so that it follows the node currently at position `j`
    pub fn apply_relocate(&mut self, i: usize, j: usize) {
        debug_assert!(i != j && i < self.nodes.len() && j < self.nodes.len());
        if i < j {
            self.nodes[i..=j].rotate_left(1);
        } else {
            self.nodes[j + 1..=i].rotate_right(1);
        }
    }

    /// Normal form of the cycle: rotated to start at node 0 and oriented so the
    /// second node is the smaller of node 0's two neighbours.
    /// Two tours describe the same undirected cycle iff their canonical forms are equal.
    pub fn canonical(&self) -> Vec<usize> {
        let n = self.nodes.len();
        let Some(start) = self.position_of(0) else {
            return self.nodes.clone();
        };
        let forward: Vec<usize> = (0..n).map(|k| self.nodes[(start + k) % n]).collect();
        if n < 3 {
            return forward;
        }
        let backward: Vec<usize> = (0..n).map(|k| self.nodes[(start + n - k) % n]).collect();
        if forward[1] <= backward[1] {
            forward
        } else {
            backward
        }
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.nodes
    }
}

/// An improving move found by a move operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    /// Reverse positions `i..=j`
    TwoOpt { i: usize, j: usize, delta: f64 },
    /// Move the node at position `i` after position `j`
    Relocate { i: usize, j: usize, delta: f64 },
}

impl Move {
    /// Cost change the move produces on the matrix it was evaluated against
    pub fn delta(&self) -> f64 {
        match *self {
            Move::TwoOpt { delta, .. } | Move::Relocate { delta, .. } => delta,
        }
    }

    /// Apply the move in place and return its realized delta
    pub fn apply(&self, tour: &mut Tour) -> f64 {
        match *self {
            Move::TwoOpt { i, j, delta } => {
                tour.apply_two_opt(i, j);
                delta
            }
            Move::Relocate { i, j, delta } => {
                tour.apply_relocate(i, j);
                delta
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_costs(n: usize) -> Matrix<f32> {
        let mut m = Matrix::filled(n, 0.0);
        for i in 0..n {
            for j in 0..n {
                m.set(i, j, (i as f32 - j as f32).abs());
            }
        }
        m
    }

    #[test]
    fn test_rejects_non_permutations() {
        assert!(Tour::new(vec![0, 1, 2]).is_some());
        assert!(Tour::new(vec![0, 1, 1]).is_none());
        assert!(Tour::new(vec![0, 1, 3]).is_none());
    }

    #[test]
    fn test_cost_includes_closing_edge() {
        let tour = Tour::identity(4);
        assert_eq!(tour.cost(&line_costs(4)), 6.0);
    }

    #[test]
    fn test_relocate_forward_and_backward() {
        let mut tour = Tour::identity(6);
        tour.apply_relocate(1, 4);
        assert_eq!(tour.as_slice(), &[0, 2, 3, 4, 1, 5]);

        let mut tour = Tour::identity(6);
        tour.apply_relocate(4, 1);
        assert_eq!(tour.as_slice(), &[0, 1, 4, 2, 3, 5]);

        let mut tour = Tour::identity(6);
        tour.apply_relocate(2, 5);
        assert_eq!(tour.as_slice(), &[0, 1, 3, 4, 5, 2]);
        assert!(tour.is_permutation());
    }

    #[test]
    fn test_two_opt_reverses_segment() {
        let mut tour = Tour::identity(6);
        tour.apply_two_opt(1, 4);
        assert_eq!(tour.as_slice(), &[0, 4, 3, 2, 1, 5]);
        assert!(tour.is_permutation());
    }

    #[test]
    fn test_canonical_ignores_rotation_and_direction() {
        let a = Tour::new(vec![2, 3, 4, 0, 1]).unwrap();
        let b = Tour::new(vec![1, 0, 4, 3, 2]).unwrap();
        assert_eq!(a.canonical(), vec![0, 1, 2, 3, 4]);
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a.canonical(), Tour::new(vec![0, 2, 1, 3, 4]).unwrap().canonical());
    }

    #[test]
    fn test_move_apply_returns_delta() {
        let mut tour = Tour::identity(5);
        let mv = Move::TwoOpt { i: 1, j: 3, delta: -2.5 };
        assert_eq!(mv.apply(&mut tour), -2.5);
        assert_eq!(tour.as_slice(), &[0, 3, 2, 1, 4]);
    }
}
