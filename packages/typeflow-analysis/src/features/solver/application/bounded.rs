/*
 * Bounded Solver
 *
 * Wraps any Solver with per-seed budget enforcement and outcome tagging.
 * Every seed gets a fresh CancellationToken so one expired budget can never
 * leak into the next solve. Solver failures are recovered into a tagged
 * outcome with an empty state; they never abort the run.
 */

use crate::features::seeds::domain::Seed;
use crate::features::solver::domain::{CancellationToken, SeedResult, SolveOutcome, SolverState};
use crate::features::solver::ports::Solver;
use crate::features::typestate::domain::TypestateMachine;
use std::time::{Duration, Instant};
use typeflow_model::Program;

pub struct BoundedSolver<S> {
    solver: S,
    budget: Duration,
}

impl<S: Solver> BoundedSolver<S> {
    pub fn new(solver: S, budget: Duration) -> Self {
        Self { solver, budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run one seed to completion, timeout or failure. Never panics, never
    /// blocks past the budget by more than one worklist iteration.
    pub fn solve_seed(
        &self,
        program: &Program,
        machine: &TypestateMachine,
        seed: &Seed,
    ) -> SeedResult {
        let token = CancellationToken::with_budget(self.budget);
        let started = Instant::now();

        match self.solver.solve(program, machine, seed, &token) {
            Ok(state) => {
                let outcome = if token.is_cancelled() {
                    tracing::debug!(
                        "Seed {} hit its {}ms budget with {} propagations accumulated",
                        seed,
                        self.budget.as_millis(),
                        state.propagation_count()
                    );
                    SolveOutcome::TimedOut
                } else {
                    SolveOutcome::Completed
                };
                SeedResult {
                    seed: seed.clone(),
                    outcome,
                    analysis_time_ms: started.elapsed().as_millis() as u64,
                    state,
                }
            }
            Err(failure) => {
                tracing::warn!("Solver failed for seed {}: {}", seed, failure);
                SeedResult {
                    seed: seed.clone(),
                    outcome: SolveOutcome::solver_error(failure.to_string()),
                    analysis_time_ms: started.elapsed().as_millis() as u64,
                    state: SolverState::default(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::seeds::domain::Direction;
    use crate::features::solver::ports::SolverFailure;
    use crate::features::typestate::domain::State;
    use typeflow_model::{MethodDef, ProgramBuilder, StmtKind};

    /// Spins until the token fires, accumulating one propagation per spin.
    struct SpinUntilCancelled;

    impl Solver for SpinUntilCancelled {
        fn solve(
            &self,
            _program: &Program,
            machine: &TypestateMachine,
            seed: &Seed,
            token: &CancellationToken,
        ) -> Result<SolverState, SolverFailure> {
            use crate::features::solver::domain::PropagationPoint;
            use crate::features::typestate::domain::Transition;

            let mut state = SolverState::new();
            let mut spin = 0u32;
            while !token.is_cancelled() {
                state.record(
                    PropagationPoint::new(typeflow_model::StmtId(spin), &seed.value),
                    Transition::identity(machine.initial_state()),
                );
                spin = spin.wrapping_add(1);
            }
            Ok(state)
        }
    }

    /// Completes instantly without touching the token.
    struct InstantSolver;

    impl Solver for InstantSolver {
        fn solve(
            &self,
            _program: &Program,
            _machine: &TypestateMachine,
            _seed: &Seed,
            _token: &CancellationToken,
        ) -> Result<SolverState, SolverFailure> {
            Ok(SolverState::new())
        }
    }

    struct FailingSolver;

    impl Solver for FailingSolver {
        fn solve(
            &self,
            _program: &Program,
            _machine: &TypestateMachine,
            seed: &Seed,
            _token: &CancellationToken,
        ) -> Result<SolverState, SolverFailure> {
            Err(SolverFailure::internal(seed.to_string(), "scripted failure"))
        }
    }

    fn fixture() -> (Program, TypestateMachine, Seed) {
        let program = ProgramBuilder::new()
            .entry("com.app.Main.main")
            .method(
                MethodDef::new("com.app.Main.main", "com.app.Main")
                    .stmt(StmtKind::alloc("f", "java.io.FileWriter")),
            )
            .application_class("com.app.Main")
            .build()
            .unwrap();
        let machine = TypestateMachine::new("File", State::new("Opened"));
        let method = program.method("com.app.Main.main").unwrap();
        let seed = Seed::new(
            &method.statements[0],
            method,
            "file-close",
            "f",
            Direction::Forward,
        );
        (program, machine, seed)
    }

    #[test]
    fn test_zero_budget_tags_timeout_with_partial_state() {
        let (program, machine, seed) = fixture();
        let bounded = BoundedSolver::new(SpinUntilCancelled, Duration::ZERO);

        let result = bounded.solve_seed(&program, &machine, &seed);
        assert!(result.timed_out());
        // Zero budget means the very first poll fires; partial state may be
        // empty but must never be fabricated.
        assert_eq!(result.state.propagation_count(), 0);
    }

    #[test]
    fn test_short_budget_keeps_partial_accumulation() {
        let (program, machine, seed) = fixture();
        let bounded = BoundedSolver::new(SpinUntilCancelled, Duration::from_millis(5));

        let result = bounded.solve_seed(&program, &machine, &seed);
        assert!(result.timed_out());
        assert!(result.state.propagation_count() > 0);
    }

    #[test]
    fn test_fast_solve_completes() {
        let (program, machine, seed) = fixture();
        let bounded = BoundedSolver::new(InstantSolver, Duration::from_secs(3600));

        let result = bounded.solve_seed(&program, &machine, &seed);
        assert!(result.completed());
        assert!(!result.timed_out());
    }

    #[test]
    fn test_failure_recovered_as_tagged_outcome() {
        let (program, machine, seed) = fixture();
        let bounded = BoundedSolver::new(FailingSolver, Duration::from_secs(3600));

        let result = bounded.solve_seed(&program, &machine, &seed);
        assert!(result.solver_error().is_some());
        assert!(result.solver_error().unwrap().contains("scripted failure"));
        assert!(result.state.is_empty());
        assert!(!result.timed_out());
    }
}
