//! Solver capability seam.
//!
//! The orchestrator is generic over this trait; the reference engine lives
//! in the infrastructure layer and tests substitute scripted doubles (a
//! solver that spins until cancelled, a solver that always fails) to pin
//! down timeout and error behavior deterministically.

use crate::features::seeds::domain::Seed;
use crate::features::solver::domain::{CancellationToken, SolverState};
use crate::features::typestate::domain::TypestateMachine;
use thiserror::Error;
use typeflow_model::Program;

/// Internal solver failure. Timeouts are NOT failures; a solver that sees
/// its token cancelled returns `Ok` with whatever it accumulated.
#[derive(Debug, Error)]
pub enum SolverFailure {
    #[error("seed references unknown statement: {seed}")]
    SeedOutOfModel { seed: String },

    #[error("solver invariant violated for {seed}: {message}")]
    Internal { seed: String, message: String },
}

impl SolverFailure {
    pub fn seed_out_of_model(seed: impl Into<String>) -> Self {
        Self::SeedOutOfModel { seed: seed.into() }
    }

    pub fn internal(seed: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            seed: seed.into(),
            message: message.into(),
        }
    }
}

/// One bounded, cooperative solve.
pub trait Solver: Send + Sync {
    /// Propagate `seed` through `program`, driving `machine`, polling
    /// `token` at every worklist iteration. Must return promptly once the
    /// token is cancelled, keeping all state accumulated so far.
    fn solve(
        &self,
        program: &Program,
        machine: &TypestateMachine,
        seed: &Seed,
        token: &CancellationToken,
    ) -> Result<SolverState, SolverFailure>;
}
