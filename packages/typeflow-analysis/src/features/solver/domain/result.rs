/*
 * Seed Results
 *
 * The tagged outcome of one bounded solve. Timeout and solver failure are
 * data here, not control flow: a timed-out solve keeps its partial state,
 * and a failed solve carries the failure message with an empty state.
 */

use crate::features::seeds::domain::Seed;
use crate::features::solver::domain::SolverState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a bounded solve ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SolveOutcome {
    /// Fixpoint reached within budget.
    Completed,
    /// Budget expired; accumulated state is a sound partial result.
    TimedOut,
    /// The solver itself failed; state is empty.
    SolverError { message: String },
}

impl SolveOutcome {
    pub fn solver_error(message: impl Into<String>) -> Self {
        Self::SolverError {
            message: message.into(),
        }
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::TimedOut => write!(f, "timed-out"),
            Self::SolverError { message } => write!(f, "solver-error({})", message),
        }
    }
}

/// One seed's bounded solve, done.
#[derive(Debug, Clone)]
pub struct SeedResult {
    pub seed: Seed,
    pub outcome: SolveOutcome,
    /// Wall-clock duration of the solve in milliseconds.
    pub analysis_time_ms: u64,
    pub state: SolverState,
}

impl SeedResult {
    pub fn completed(&self) -> bool {
        self.outcome == SolveOutcome::Completed
    }

    pub fn timed_out(&self) -> bool {
        self.outcome == SolveOutcome::TimedOut
    }

    pub fn solver_error(&self) -> Option<&str> {
        match &self.outcome {
            SolveOutcome::SolverError { message } => Some(message),
            _ => None,
        }
    }
}
