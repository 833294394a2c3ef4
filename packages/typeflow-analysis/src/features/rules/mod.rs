//! Rules: seed matchers paired with typestate automata.
//!
//! A rule decides where analysis demand originates (`match_seed`) and which
//! automaton judges the propagated value (`machine`). Rules are resolved by
//! string identifier through the static registry in the infrastructure
//! layer.

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{available_rules, resolve};
pub use ports::{Rule, SeedSpec};
