//! Solver domain: cancellation, per-seed state, tagged outcomes.

pub mod cancel;
pub mod result;
pub mod state;

pub use cancel::CancellationToken;
pub use result::{SeedResult, SolveOutcome};
pub use state::{AccessPath, PropagationPoint, SolverState};
