//! Typestate feature: the finite automaton the classifier and solver consume.

pub mod domain;

pub use domain::{State, Transition, TypestateMachine};
