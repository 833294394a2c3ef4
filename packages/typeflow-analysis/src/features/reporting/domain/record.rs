/*
 * Classification Records
 *
 * The flat, schema-stable row emitted per seed. The column set is fixed;
 * downstream tooling splits on `;`, so free-text fields are sanitized to
 * never contain the delimiter or a line break.
 *
 * A solver-error outcome is visible on the record struct (serde), not in
 * the CSV: the row carries `false` flags and the counts of the empty state.
 */

use crate::features::solver::domain::{SeedResult, SolveOutcome};
use serde::{Deserialize, Serialize};

/// Report header, written exactly once per destination file.
pub const REPORT_HEADER: &str = "Analysis;Rule;Seed;SeedStatement;SeedMethod;SeedClass;Is_In_Error;Timedout;AnalysisTimes;PropagationCount;VisitedMethod;ReachableMethods;CallRecursion;FieldLoop;MaxAccessPath";

/// Number of `;`-separated columns in the header and every row.
pub const REPORT_COLUMNS: usize = 15;

/// One classified seed, ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub analysis: String,
    pub rule: String,
    pub seed: String,
    pub seed_statement: String,
    pub seed_method: String,
    pub seed_class: String,
    pub is_in_error: bool,
    pub timed_out: bool,
    /// Wall-clock solve duration in milliseconds.
    pub analysis_times: u64,
    pub propagation_count: usize,
    pub visited_methods: usize,
    pub reachable_methods: usize,
    pub call_recursion: bool,
    pub field_loop: bool,
    pub max_access_path: usize,
    /// Full outcome tag; not a CSV column.
    pub outcome: SolveOutcome,
}

impl ClassificationRecord {
    /// Flatten one finished solve. `is_in_error` comes from the classifier;
    /// `reachable_methods` from the run-wide snapshot.
    pub fn from_result(
        analysis: impl Into<String>,
        rule: impl Into<String>,
        result: &SeedResult,
        is_in_error: bool,
        reachable_methods: usize,
    ) -> Self {
        Self {
            analysis: analysis.into(),
            rule: rule.into(),
            seed: result.seed.to_string(),
            seed_statement: result.seed.stmt_repr.clone(),
            seed_method: result.seed.method.clone(),
            seed_class: result.seed.class.clone(),
            is_in_error,
            timed_out: result.timed_out(),
            analysis_times: result.analysis_time_ms,
            propagation_count: result.state.propagation_count(),
            visited_methods: result.state.visited_method_count(),
            reachable_methods,
            call_recursion: result.state.has_call_recursion(),
            field_loop: result.state.has_field_recursion(),
            max_access_path: result.state.max_access_path(),
            outcome: result.outcome.clone(),
        }
    }

    /// Render the `;`-delimited row, without trailing newline.
    pub fn to_csv_row(&self) -> String {
        [
            sanitize(&self.analysis),
            sanitize(&self.rule),
            sanitize(&self.seed),
            sanitize(&self.seed_statement),
            sanitize(&self.seed_method),
            sanitize(&self.seed_class),
            self.is_in_error.to_string(),
            self.timed_out.to_string(),
            self.analysis_times.to_string(),
            self.propagation_count.to_string(),
            self.visited_methods.to_string(),
            self.reachable_methods.to_string(),
            self.call_recursion.to_string(),
            self.field_loop.to_string(),
            self.max_access_path.to_string(),
        ]
        .join(";")
    }
}

/// Delimiter and line breaks can never appear inside a field.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ';' => ',',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
