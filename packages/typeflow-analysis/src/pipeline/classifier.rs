/*
 * Error Classification
 *
 * Existential over the propagation set: a seed is in error when ANY recorded
 * transition lands in an error-marked state. Membership is checked per
 * triple, so the verdict cannot depend on the order the solver recorded
 * them in.
 *
 * A value that enters an error state and later leaves it still classifies
 * as in-error. That over-approximation is intentional and pinned by test.
 */

use crate::features::solver::domain::SolverState;
use crate::features::typestate::domain::TypestateMachine;

/// Existential error check over everything the solve reached.
pub fn is_in_error_state(state: &SolverState, machine: &TypestateMachine) -> bool {
    state.triples().any(|(_, t)| machine.is_error_state(&t.to))
}
