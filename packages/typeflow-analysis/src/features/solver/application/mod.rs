//! Budget enforcement around any solver implementation.

pub mod bounded;

pub use bounded::BoundedSolver;
