/*
 * Run Results
 *
 * The in-memory product of one orchestrated run: the per-seed records,
 * keyed by seed identity, plus run-wide counters. The report file is a
 * projection of this; a failed sink write loses nothing here.
 */

use crate::features::reporting::domain::ClassificationRecord;
use crate::features::seeds::domain::Seed;
use serde::{Deserialize, Serialize};

/// Run-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub seeds: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub solver_errors: usize,
    pub in_error: usize,
    pub reachable_methods: usize,
    pub total_time_ms: u64,
}

impl RunStats {
    pub fn summarize(
        records: &[(Seed, ClassificationRecord)],
        reachable_methods: usize,
        total_time_ms: u64,
    ) -> Self {
        use crate::features::solver::domain::SolveOutcome;

        let mut stats = Self {
            seeds: records.len(),
            reachable_methods,
            total_time_ms,
            ..Self::default()
        };
        for (_, record) in records {
            match &record.outcome {
                SolveOutcome::Completed => stats.completed += 1,
                SolveOutcome::TimedOut => stats.timed_out += 1,
                SolveOutcome::SolverError { .. } => stats.solver_errors += 1,
            }
            if record.is_in_error {
                stats.in_error += 1;
            }
        }
        stats
    }
}

/// Everything one run produced, in seed discovery order.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub records: Vec<(Seed, ClassificationRecord)>,
    pub stats: RunStats,
}

impl AnalysisRun {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lookup by seed identity (structural equality).
    pub fn record_for(&self, seed: &Seed) -> Option<&ClassificationRecord> {
        self.records
            .iter()
            .find(|(s, _)| s == seed)
            .map(|(_, r)| r)
    }

    pub fn seeds(&self) -> impl Iterator<Item = &Seed> {
        self.records.iter().map(|(s, _)| s)
    }
}
