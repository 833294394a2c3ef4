//! Pipeline: orchestration, classification, run results.

pub mod classifier;
pub mod orchestrator;
pub mod result;

pub use orchestrator::Orchestrator;
pub use result::{AnalysisRun, RunStats};
