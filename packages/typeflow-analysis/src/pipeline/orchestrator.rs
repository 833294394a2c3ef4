/*
 * Analysis Orchestrator
 *
 * End-to-end per-rule run: resolve the rule once, snapshot class
 * classification and reachability once, discover seeds, solve each seed
 * under its own budget, classify, and emit records.
 *
 * Seeds are isolated units: solves share nothing mutable, so scheduling is
 * either the in-order sequential loop (workers <= 1) or an order-preserving
 * rayon map over the same seed vector. Fatal errors (unknown rule, missing
 * entry point, invalid config) abort before any seed work; per-seed trouble
 * is data in the records; sink failures are logged and non-fatal.
 */

use crate::config::AnalysisConfig;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::features::reporting::domain::ClassificationRecord;
use crate::features::reporting::infrastructure::CsvReportSink;
use crate::features::rules::infrastructure::registry;
use crate::features::rules::ports::Rule;
use crate::features::seeds::application::SeedFactory;
use crate::features::seeds::domain::Seed;
use crate::features::solver::application::BoundedSolver;
use crate::features::solver::infrastructure::PropagationSolver;
use crate::features::solver::ports::Solver;
use crate::pipeline::classifier;
use crate::pipeline::result::{AnalysisRun, RunStats};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use typeflow_model::{ClassificationSnapshot, Program};

pub struct Orchestrator<S> {
    config: AnalysisConfig,
    rule: Arc<dyn Rule>,
    bounded: BoundedSolver<S>,
    sink: Option<CsvReportSink>,
}

impl Orchestrator<PropagationSolver> {
    /// Orchestrator over the reference propagation engine.
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        Self::with_solver(config, PropagationSolver::new())
    }
}

impl<S: Solver> Orchestrator<S> {
    /// Validates the config and resolves the rule up front; both failures
    /// are fatal before any program is even loaded.
    pub fn with_solver(config: AnalysisConfig, solver: S) -> AnalysisResult<Self> {
        config.validate()?;
        let rule = registry::resolve(&config.rule)?;
        let bounded = BoundedSolver::new(solver, config.budget());
        let sink = config.output_file.as_ref().map(CsvReportSink::new);
        Ok(Self {
            config,
            rule,
            bounded,
            sink,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Run the full pipeline over one program snapshot.
    pub fn run(&self, program: &Program) -> AnalysisResult<AnalysisRun> {
        let started = Instant::now();

        if program.entry().is_none() {
            return Err(AnalysisError::MissingEntryPoint);
        }

        // One-shot reclassification and reachability, read-only afterwards.
        let classes = ClassificationSnapshot::compute(program, &self.config.application_patterns);
        let reachable = program.reachable_method_count();

        let seeds: Vec<Seed> = SeedFactory::new(program, &classes, self.rule.as_ref())
            .seeds()
            .collect();
        tracing::info!(
            "Discovered {} seeds for rule '{}' ({} reachable methods, {} application classes)",
            seeds.len(),
            self.rule.name(),
            reachable,
            classes.application_count()
        );

        let records: Vec<(Seed, ClassificationRecord)> =
            if cfg!(feature = "parallel") && self.config.workers > 1 {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.config.workers)
                    .build()
                    .map_err(|e| {
                        AnalysisError::invalid_config(format!("worker pool: {}", e))
                    })?;
                pool.install(|| {
                    seeds
                        .par_iter()
                        .map(|seed| self.process_seed(program, seed, reachable))
                        .collect()
                })
            } else {
                seeds
                    .iter()
                    .map(|seed| self.process_seed(program, seed, reachable))
                    .collect()
            };

        if let Some(sink) = &self.sink {
            let rows: Vec<ClassificationRecord> =
                records.iter().map(|(_, record)| record.clone()).collect();
            if let Err(err) = sink.append(&rows) {
                tracing::error!(
                    "Report append to {} failed ({}); records kept in memory",
                    sink.path().display(),
                    err
                );
            }
        }

        let stats = RunStats::summarize(&records, reachable, started.elapsed().as_millis() as u64);
        tracing::info!(
            "Run complete: {} seeds, {} in error, {} timed out, {} solver errors in {}ms",
            stats.seeds,
            stats.in_error,
            stats.timed_out,
            stats.solver_errors,
            stats.total_time_ms
        );

        Ok(AnalysisRun { records, stats })
    }

    fn process_seed(
        &self,
        program: &Program,
        seed: &Seed,
        reachable: usize,
    ) -> (Seed, ClassificationRecord) {
        let machine = self.rule.machine();
        let result = self.bounded.solve_seed(program, machine, seed);
        let in_error = classifier::is_in_error_state(&result.state, machine);
        let record = ClassificationRecord::from_result(
            &self.config.analysis_name,
            self.config.rule_label(),
            &result,
            in_error,
            reachable,
        );
        (result.seed, record)
    }
}
