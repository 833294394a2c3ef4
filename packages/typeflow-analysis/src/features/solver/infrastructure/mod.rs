//! Reference solver implementation.

pub mod propagation;

pub use propagation::PropagationSolver;
