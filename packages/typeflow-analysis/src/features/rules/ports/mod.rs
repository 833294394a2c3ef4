//! Rule capability: a seed predicate paired with a typestate automaton.
//!
//! Rules are resolved by string identifier through the static registry in the
//! infrastructure layer; resolution failures are fatal configuration errors.

use crate::features::seeds::domain::Direction;
use crate::features::typestate::domain::TypestateMachine;
use typeflow_model::Statement;

/// What a rule asks the factory to seed at a matched statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSpec {
    /// Initial tracked value (a variable at the matched statement).
    pub value: String,
    pub direction: Direction,
}

impl SeedSpec {
    pub fn forward(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            direction: Direction::Forward,
        }
    }

    pub fn backward(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            direction: Direction::Backward,
        }
    }
}

/// A typestate/query rule: decides which statements seed an analysis and
/// supplies the automaton their results classify against.
pub trait Rule: Send + Sync {
    /// Registry identifier.
    fn name(&self) -> &'static str;

    /// Automaton driven by the solver and consulted by the classifier.
    fn machine(&self) -> &TypestateMachine;

    /// Seed predicate: `Some` iff `stmt` anchors an analysis task.
    fn match_seed(&self, stmt: &Statement) -> Option<SeedSpec>;
}
