//! Typestate domain model.

mod automaton;

pub use automaton::{State, Transition, TypestateMachine};
