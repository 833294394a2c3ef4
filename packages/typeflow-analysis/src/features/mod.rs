//! Feature modules, one vertical slice per analysis concern.

pub mod reporting;
pub mod rules;
pub mod seeds;
pub mod solver;
pub mod typestate;
