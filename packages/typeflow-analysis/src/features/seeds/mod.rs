//! Seeds: where analysis demand originates.

pub mod application;
pub mod domain;

pub use application::SeedFactory;
pub use domain::{Direction, Seed};
