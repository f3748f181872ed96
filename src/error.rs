//! Error types for the GLS engine.
//!
//! Guide failures and instance validation are the only errors surfaced to
//! callers. Local-search logic never produces an error value.

use thiserror::Error;

/// Failure raised while obtaining a guide matrix from an
/// [`EdgeGuide`](crate::heuristics::guide::EdgeGuide).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuideError {
    #[error("guide function failed: {0}")]
    Failed(String),
    #[error("guide function panicked: {0}")]
    Panicked(String),
    #[error("guide matrix has dimension {actual}, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("guide matrix entry ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
    #[error("guide matrix entry ({row}, {col}) is negative: {value}")]
    Negative { row: usize, col: usize, value: f32 },
}

impl GuideError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Error)]
pub enum GlsError {
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),
    #[error("instance has {0} nodes, at least 3 are required")]
    TooFewNodes(usize),
    #[error("start node {start} is out of range for {n} nodes")]
    StartNodeOutOfRange { start: usize, n: usize },
    #[error("cannot draw {requested} distinct start nodes from {n} nodes")]
    InvalidStartCount { requested: usize, n: usize },
    #[error(transparent)]
    Guide(#[from] GuideError),
    #[error("thread pool: {0}")]
    ThreadPool(String),
}

impl GlsError {
    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GlsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_error_converts_into_gls_error() {
        let err: GlsError = GuideError::failed("boom").into();
        assert!(matches!(err, GlsError::Guide(GuideError::Failed(_))));
        assert_eq!(err.to_string(), "guide function failed: boom");
    }
}
