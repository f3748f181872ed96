use crate::instance::Matrix;

/// Per-edge penalty counters for one GLS run.
///
/// Counters only ever grow, and both orientations of an edge are always
/// incremented together, so the matrix stays symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyMatrix {
    counts: Matrix<u32>,
}

impl PenaltyMatrix {
    /// Creates a new penalty matrix for `n` nodes, initialized to zero.
    pub fn new(n: usize) -> Self {
        PenaltyMatrix {
            counts: Matrix::filled(n, 0),
        }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.counts.n()
    }

    /// Penalty of the edge `(i, j)`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.counts.get(i, j)
    }

    /// Penalize the undirected edge `{i, j}` once
    pub fn increment(&mut self, i: usize, j: usize) {
        let value = self.counts.get(i, j).saturating_add(1);
        self.counts.set(i, j, value);
        self.counts.set(j, i, value);
    }

    /// Sum over all entries (each undirected edge counted twice)
    pub fn total(&self) -> u64 {
        self.counts.as_slice().iter().map(|&c| c as u64).sum()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.n();
        (0..n).all(|i| (i + 1..n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Raw counters
    pub fn matrix(&self) -> &Matrix<u32> {
        &self.counts
    }
}
