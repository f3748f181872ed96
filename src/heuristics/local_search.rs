//! Local search driver.
//!
//! Each iteration applies the best move of every operator once, in order,
//! and stops as soon as an iteration yields no improvement. The iteration
//! cap only guards against oscillation.

use crate::heuristics::deadline::Deadline;
use crate::heuristics::operators::{MoveOperator, Relocate, TwoOpt};
use crate::instance::Matrix;
use crate::tour::Tour;

/// Default safety bound on local search iterations
pub const DEFAULT_ITERATION_CAP: usize = 1000;

/// Best-improvement descent over a list of move operators
pub struct LocalSearch {
    operators: Vec<Box<dyn MoveOperator + Send + Sync>>,
    /// Maximum number of iterations per call
    pub max_iterations: usize,
}

impl LocalSearch {
    pub fn new(max_iterations: usize) -> Self {
        LocalSearch {
            operators: Vec::new(),
            max_iterations,
        }
    }

    /// 2-opt followed by relocate
    pub fn with_standard_operators(max_iterations: usize) -> Self {
        let operators: Vec<Box<dyn MoveOperator + Send + Sync>> =
            vec![Box::new(TwoOpt), Box::new(Relocate)];

        LocalSearch {
            operators,
            max_iterations,
        }
    }

    pub fn add_operator<M: MoveOperator + Send + Sync + 'static>(&mut self, op: M) {
        self.operators.push(Box::new(op));
    }

    /// Full descent over the whole tour. Returns the accumulated delta (`<= 0`).
    pub fn improve(&self, costs: &Matrix<f32>, tour: &mut Tour) -> f64 {
        self.run(costs, tour, None, &Deadline::unlimited())
    }

    /// Descent restricted to moves starting at tour position `anchor`
    pub fn repair(&self, costs: &Matrix<f32>, tour: &mut Tour, anchor: usize) -> f64 {
        self.run(costs, tour, Some(anchor), &Deadline::unlimited())
    }

    /// Run the descent, checking `deadline` between iterations.
    pub fn run(
        &self,
        costs: &Matrix<f32>,
        tour: &mut Tour,
        anchor: Option<usize>,
        deadline: &Deadline,
    ) -> f64 {
        let mut total_delta = 0.0;

        for _ in 0..self.max_iterations {
            let mut delta = 0.0;
            for op in &self.operators {
                if let Some(mv) = op.best_move(costs, tour, anchor) {
                    delta += mv.apply(tour);
                }
            }
            debug_assert!(tour.is_permutation());

            total_delta += delta;
            if delta >= 0.0 || deadline.expired() {
                break;
            }
        }

        total_delta
    }
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self::with_standard_operators(DEFAULT_ITERATION_CAP)
    }
}
