/*
 * Typeflow Analysis - Demand-Driven Typestate Orchestration
 *
 * Feature-First Hexagonal Architecture:
 * - features/  : Vertical slices (typestate → rules → seeds → solver → reporting)
 * - pipeline/  : Orchestration (scheduling, classification, run results)
 * - config/    : Run configuration
 *
 * A run takes one immutable program snapshot and one rule, discovers seeds
 * in reachable application code, solves every seed under its own wall-clock
 * budget, classifies the propagation existentially against the rule's
 * automaton, and appends schema-stable records to the report sink.
 *
 * Per-seed work is isolated: timeouts and solver failures are tagged
 * outcomes in the emitted records, never run aborts.
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Feature modules (typestate, rules, seeds, solver, reporting)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::AnalysisConfig;
pub use errors::{AnalysisError, AnalysisResult};
pub use features::reporting::{ClassificationRecord, CsvReportSink, REPORT_COLUMNS, REPORT_HEADER};
pub use features::rules::{available_rules, resolve, Rule, SeedSpec};
pub use features::seeds::{Direction, Seed, SeedFactory};
pub use features::solver::{
    AccessPath, BoundedSolver, CancellationToken, PropagationSolver, SeedResult, SolveOutcome,
    Solver, SolverFailure, SolverState,
};
pub use features::typestate::{State, Transition, TypestateMachine};
pub use pipeline::{AnalysisRun, Orchestrator, RunStats};
