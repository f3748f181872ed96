//! Cost matrices for TSP instances.
//!
//! All matrices are square and stored as flat row-major buffers. The
//! [`DistanceMatrix`] is validated once at construction and is read-only
//! afterwards, so it can be shared across worker threads without locking.

use crate::error::{GlsError, Result};
use serde::{Deserialize, Serialize};

/// Square matrix stored as a flat row-major buffer.
///
/// Only [`DistanceMatrix`] is (de)serialized, through validated nested rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    n: usize,
    data: Vec<T>,
}

/// Penalized cost matrix produced by an edge guide for one perturbation round
pub type GuideMatrix = Matrix<f32>;

impl<T: Copy> Matrix<T> {
    /// Create an `n x n` matrix filled with `value`
    pub fn filled(n: usize, value: T) -> Self {
        Matrix { n, data: vec![value; n * n] }
    }

    /// Build a matrix from a flat row-major buffer.
    /// Returns `None` if the buffer length is not `n * n`.
    pub fn from_flat(n: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != n * n {
            return None;
        }
        Some(Matrix { n, data })
    }

    /// Dimension of the matrix
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[i * self.n + j] = value;
    }

    /// Row `i` as a slice
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Raw row-major buffer
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// Immutable `n x n` matrix of non-negative finite travel costs.
///
/// Invariants: square, zero diagonal, every entry finite and `>= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct DistanceMatrix {
    costs: Matrix<f32>,
}

impl DistanceMatrix {
    /// Build a distance matrix from nested rows
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(GlsError::invalid_matrix(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            data.extend(row);
        }
        Self::from_flat(n, data)
    }

    /// Build a distance matrix from a flat row-major buffer
    pub fn from_flat(n: usize, data: Vec<f32>) -> Result<Self> {
        let costs = Matrix::from_flat(n, data).ok_or_else(|| {
            GlsError::invalid_matrix(format!("buffer is not square for n = {}", n))
        })?;

        for i in 0..n {
            for j in 0..n {
                let d = costs.get(i, j);
                if !d.is_finite() {
                    return Err(GlsError::invalid_matrix(format!(
                        "entry ({}, {}) is not finite",
                        i, j
                    )));
                }
                if d < 0.0 {
                    return Err(GlsError::invalid_matrix(format!(
                        "entry ({}, {}) is negative: {}",
                        i, j, d
                    )));
                }
            }
            if costs.get(i, i) != 0.0 {
                return Err(GlsError::invalid_matrix(format!(
                    "diagonal entry ({}, {}) is not zero",
                    i, i
                )));
            }
        }

        Ok(DistanceMatrix { costs })
    }

    /// Compute the Euclidean distance matrix of 2D points
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self> {
        let n = coords.len();
        let mut costs = Matrix::filled(n, 0.0f32);

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let dx = coords[i].0 - coords[j].0;
                    let dy = coords[i].1 - coords[j].1;
                    costs.set(i, j, (dx * dx + dy * dy).sqrt() as f32);
                }
            }
        }

        Self::from_flat(n, costs.data)
    }

    /// Number of nodes
    #[inline]
    pub fn n(&self) -> usize {
        self.costs.n()
    }

    /// Get the distance between two nodes
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f32 {
        self.costs.get(i, j)
    }

    /// Underlying matrix, usable wherever a cost matrix is expected
    #[inline]
    pub fn matrix(&self) -> &Matrix<f32> {
        &self.costs
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.n();
        (0..n).all(|i| (i + 1..n).all(|j| self.costs.get(i, j) == self.costs.get(j, i)))
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.n();
        let mut count = 0usize;
        let mut sum = 0.0f64;
        let mut min_distance = f64::INFINITY;
        let mut max_distance = 0.0f64;

        for i in 0..n {
            for j in i + 1..n {
                let d = self.distance(i, j) as f64;
                sum += d;
                min_distance = min_distance.min(d);
                max_distance = max_distance.max(d);
                count += 1;
            }
        }

        InstanceStatistics {
            dimension: n,
            symmetric: self.is_symmetric(),
            avg_distance: if count > 0 { sum / count as f64 } else { 0.0 },
            min_distance: if count > 0 { min_distance } else { 0.0 },
            max_distance,
        }
    }
}

impl TryFrom<Vec<Vec<f32>>> for DistanceMatrix {
    type Error = GlsError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f32>> {
    fn from(matrix: DistanceMatrix) -> Self {
        let n = matrix.n();
        (0..n).map(|i| matrix.costs.row(i).to_vec()).collect()
    }
}

/// Statistics about a distance matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub dimension: usize,
    pub symmetric: bool,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance")?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(f, "  Symmetric: {}", self.symmetric)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
