/*
 * Analysis Error Types
 *
 * Error taxonomy for the orchestration pipeline:
 * - configuration / program-model errors are fatal and abort before any seed
 *   is processed,
 * - per-seed failures (timeout, solver error) are NOT errors here — they are
 *   recovered into tagged SeedResult outcomes,
 * - report I/O failures are logged and non-fatal (best-effort sink).
 */

use std::path::PathBuf;
use thiserror::Error;
use typeflow_model::ModelError;

/// Errors surfaced by the orchestration pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The configured rule identifier resolves to nothing in the registry.
    #[error("Unknown rule '{rule}' (available: {available})")]
    UnknownRule { rule: String, available: String },

    /// The program model declares no entry point; nothing is analyzable.
    #[error("Program model has no entry point method")]
    MissingEntryPoint,

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Program model construction failed.
    #[error("Program model error: {0}")]
    Model(#[from] ModelError),

    /// Loading a program document failed.
    #[error("Failed to load program from {path}: {message}")]
    ProgramLoad { path: PathBuf, message: String },

    /// Writing to the report destination failed.
    #[error("Report write failed for {path}: {source}")]
    ReportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn unknown_rule(rule: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownRule {
            rule: rule.into(),
            available: available.join(", "),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn program_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProgramLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn report_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportIo {
            path: path.into(),
            source,
        }
    }

    /// Error category for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownRule { .. } | Self::InvalidConfig { .. } => "configuration",
            Self::MissingEntryPoint | Self::Model(_) | Self::ProgramLoad { .. } => "program-model",
            Self::ReportIo { .. } => "report-io",
        }
    }

    /// Fatal errors abort the run before (or instead of) seed processing.
    /// Report I/O is best-effort and never fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ReportIo { .. })
    }
}

/// Result alias for pipeline operations.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
