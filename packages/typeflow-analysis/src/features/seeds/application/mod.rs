//! Seed discovery over a program snapshot.

pub mod factory;

pub use factory::SeedFactory;
