//! Heuristics module for the GLS engine.
//!
//! Construction, move operators, local search, and the guided local search
//! layers built on top of them.

pub mod construction;
pub mod deadline;
pub mod gls;
pub mod guide;
pub mod local_search;
pub mod multi_start;
pub mod operators;
pub mod penalty;
pub mod perturbation;

pub use construction::*;
pub use deadline::*;
pub use gls::*;
pub use guide::*;
pub use local_search::*;
pub use multi_start::*;
pub use operators::*;
pub use penalty::*;
pub use perturbation::*;
