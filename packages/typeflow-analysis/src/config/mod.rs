/*
 * Analysis Configuration
 *
 * Plain data with defaults, fluent builders and a validate() gate. The
 * orchestrator validates once at construction; after that the config is
 * read-only for the whole run.
 */

use crate::errors::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ANALYSIS_NAME: &str = "typeflow";
pub const DEFAULT_BUDGET_MS: u64 = 30_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Echoed into the report's `Analysis` column.
    pub analysis_name: String,
    /// Registry identifier of the rule to run.
    pub rule: String,
    /// Optional label for the `Rule` column; falls back to `rule`.
    pub rule_label: Option<String>,
    /// Per-seed wall-clock budget in milliseconds.
    pub budget_ms: u64,
    /// Report destination; `None` keeps results in memory only.
    pub output_file: Option<PathBuf>,
    /// Scheduling width; `1` is the sequential reference behavior.
    pub workers: usize,
    /// Extra class-name prefixes promoted to application classes.
    pub application_patterns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_name: DEFAULT_ANALYSIS_NAME.to_string(),
            rule: String::new(),
            rule_label: None,
            budget_ms: DEFAULT_BUDGET_MS,
            output_file: None,
            workers: 1,
            application_patterns: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            ..Self::default()
        }
    }

    /// Preset sized for batch runs: three quarters of the available cores.
    pub fn parallel(rule: impl Into<String>) -> Self {
        Self {
            workers: (num_cpus::get() * 3 / 4).max(1),
            ..Self::new(rule)
        }
    }

    pub fn with_analysis_name(mut self, name: impl Into<String>) -> Self {
        self.analysis_name = name.into();
        self
    }

    pub fn with_rule_label(mut self, label: impl Into<String>) -> Self {
        self.rule_label = Some(label.into());
        self
    }

    pub fn with_budget_ms(mut self, budget_ms: u64) -> Self {
        self.budget_ms = budget_ms;
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_application_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.application_patterns.push(pattern.into());
        self
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    pub fn rule_label(&self) -> &str {
        self.rule_label.as_deref().unwrap_or(&self.rule)
    }

    /// A zero budget is allowed: it expires every solve at the first poll,
    /// which is the deterministic way to exercise timeout handling.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.rule.trim().is_empty() {
            return Err(AnalysisError::invalid_config("rule must not be empty"));
        }
        if self.workers == 0 {
            return Err(AnalysisError::invalid_config(
                "workers must be at least 1",
            ));
        }
        if self.analysis_name.trim().is_empty() {
            return Err(AnalysisError::invalid_config(
                "analysis_name must not be empty",
            ));
        }
        Ok(())
    }
}
