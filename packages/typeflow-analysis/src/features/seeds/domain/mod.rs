//! Seeds: the unit of analysis work.
//!
//! A seed anchors one independent bounded analysis task. Identity is
//! structural (statement + method + direction + initial value), never pointer
//! identity, so seeds survive as stable keys of the run's result mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use typeflow_model::{Method, Statement, StmtId};

/// Query direction of a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Track the value from its origin onward (typestate rules).
    Forward,
    /// Resolve the value back to its allocation first (alias queries).
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "Forward"),
            Direction::Backward => write!(f, "Backward"),
        }
    }
}

/// One analysis task: a program point, an initial value and a direction,
/// tagged with the rule that produced it. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed {
    pub stmt: StmtId,
    /// Statement position inside the enclosing method.
    pub index: usize,
    /// Rendered statement, echoed into the report.
    pub stmt_repr: String,
    /// Fully qualified enclosing method.
    pub method: String,
    /// Declaring class of the enclosing method.
    pub class: String,
    pub direction: Direction,
    /// Initial tracked value (a variable name at the seed statement).
    pub value: String,
    /// Registry identifier of the rule that emitted this seed.
    pub rule: String,
}

impl Seed {
    pub fn new(
        stmt: &Statement,
        method: &Method,
        rule: impl Into<String>,
        value: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            stmt: stmt.id,
            index: stmt.index,
            stmt_repr: stmt.to_string(),
            method: method.name.clone(),
            class: method.class.clone(),
            direction,
            value: value.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} @ {}:{})",
            self.direction, self.value, self.method, self.index
        )
    }
}
