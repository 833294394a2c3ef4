//! Solver: bounded per-seed propagation.
//!
//! Layering mirrors the rest of the crate: the domain holds cancellation,
//! state and outcomes; the port is the `Solver` trait; the application layer
//! adds budget enforcement; the infrastructure layer provides the reference
//! worklist engine.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::BoundedSolver;
pub use domain::{AccessPath, CancellationToken, PropagationPoint, SeedResult, SolveOutcome, SolverState};
pub use infrastructure::PropagationSolver;
pub use ports::{Solver, SolverFailure};
