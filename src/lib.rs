//! GLS-TSP Library
//!
//! A Guided Local Search engine for the Traveling Salesman Problem, built as
//! an evaluation harness for pluggable edge-guidance heuristics.
//!
//! # Features
//!
//! - Nearest-neighbor construction
//! - Best-improvement 2-opt and relocate local search, full or anchored at one position
//! - Edge penalties driven by an external [`EdgeGuide`](heuristics::guide::EdgeGuide)
//! - Time- and iteration-bounded GLS driver
//! - Multi-start search on a thread pool
//! - Failure-tolerant evaluation of untrusted guides
//!
//! # Example
//!
//! ```no_run
//! use gls_tsp::instance::DistanceMatrix;
//! use gls_tsp::heuristics::gls::{GlsConfig, GuidedLocalSearch};
//! use gls_tsp::heuristics::guide::UtilityGuide;
//!
//! let coords = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 2.0)];
//! let distances = DistanceMatrix::from_coords(&coords).unwrap();
//!
//! let gls = GuidedLocalSearch::new(UtilityGuide::default(), GlsConfig::evaluator());
//! let result = gls.run(&distances, 0).unwrap();
//!
//! println!("Tour cost: {:.2}", result.best_cost);
//! ```

pub mod error;
pub mod evaluation;
pub mod heuristics;
pub mod instance;
pub mod solution;
pub mod tour;

pub use error::{GlsError, GuideError};
pub use instance::DistanceMatrix;
pub use solution::SearchResult;
pub use tour::Tour;
