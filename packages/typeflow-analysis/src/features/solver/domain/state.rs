/*
 * Solver State
 *
 * Per-seed accumulation: every (program point, tracked value, transition)
 * triple the solve reached, plus the scalar diagnostics echoed into the
 * report (visited methods, recursion flags, deepest access path).
 *
 * One SolverState per seed, owned by exactly one solve. Timeouts leave a
 * valid partial state; nothing here is shared across seeds.
 */

use crate::features::typestate::domain::Transition;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use typeflow_model::StmtId;

/// Tracked value: a base variable plus a (possibly empty) field chain.
/// `x` tracks the object in variable `x`; `x.f.g` tracks the object reached
/// by loading `f` then `g` from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessPath {
    pub base: String,
    pub fields: Vec<String>,
}

impl AccessPath {
    pub fn var(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            fields: Vec::new(),
        }
    }

    /// Depth of the field chain. Plain variables have depth 0.
    pub fn depth(&self) -> usize {
        self.fields.len()
    }

    pub fn is_var(&self) -> bool {
        self.fields.is_empty()
    }

    /// Same object, reached through a different base variable.
    pub fn rebased(&self, base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            fields: self.fields.clone(),
        }
    }

    /// Path after `base.field = <this>`: the object gains the new outer
    /// field in front of the existing chain.
    pub fn prefixed(&self, base: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.push(field);
        fields.extend(self.fields.iter().cloned());
        Self {
            base: base.into(),
            fields,
        }
    }

    /// Path after loading the outermost field: `target = base.field`.
    pub fn popped(&self, target: impl Into<String>) -> Self {
        Self {
            base: target.into(),
            fields: self.fields[1..].to_vec(),
        }
    }

    pub fn outer_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// True when extending with `field` would repeat a field already on the
    /// chain, the shape a recursive data structure produces.
    pub fn would_loop(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for field in &self.fields {
            write!(f, ".{}", field)?;
        }
        Ok(())
    }
}

/// A reached (statement, value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropagationPoint {
    pub stmt: StmtId,
    /// Rendered access path of the tracked value at this point.
    pub value: String,
}

impl PropagationPoint {
    pub fn new(stmt: StmtId, value: impl Into<String>) -> Self {
        Self {
            stmt,
            value: value.into(),
        }
    }
}

/// Everything one solve accumulated.
#[derive(Debug, Clone, Default)]
pub struct SolverState {
    reached: FxHashMap<PropagationPoint, Vec<Transition>>,
    visited_methods: FxHashSet<String>,
    call_recursion: bool,
    field_recursion: bool,
    max_access_path: usize,
}

impl SolverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition at a point. Returns false when the exact triple
    /// was already present (the fixpoint check).
    pub fn record(&mut self, point: PropagationPoint, transition: Transition) -> bool {
        let at_point = self.reached.entry(point).or_default();
        if at_point.contains(&transition) {
            return false;
        }
        at_point.push(transition);
        true
    }

    pub fn visit_method(&mut self, method: impl Into<String>) {
        self.visited_methods.insert(method.into());
    }

    pub fn mark_call_recursion(&mut self) {
        self.call_recursion = true;
    }

    pub fn mark_field_recursion(&mut self) {
        self.field_recursion = true;
    }

    pub fn note_access_depth(&mut self, depth: usize) {
        self.max_access_path = self.max_access_path.max(depth);
    }

    /// Number of distinct (point, transition) triples.
    pub fn propagation_count(&self) -> usize {
        self.reached.values().map(Vec::len).sum()
    }

    pub fn visited_method_count(&self) -> usize {
        self.visited_methods.len()
    }

    pub fn visited_methods(&self) -> &FxHashSet<String> {
        &self.visited_methods
    }

    pub fn has_call_recursion(&self) -> bool {
        self.call_recursion
    }

    pub fn has_field_recursion(&self) -> bool {
        self.field_recursion
    }

    pub fn max_access_path(&self) -> usize {
        self.max_access_path
    }

    pub fn is_empty(&self) -> bool {
        self.reached.is_empty()
    }

    /// All recorded triples, in no particular order.
    pub fn triples(&self) -> impl Iterator<Item = (&PropagationPoint, &Transition)> {
        self.reached
            .iter()
            .flat_map(|(point, transitions)| transitions.iter().map(move |t| (point, t)))
    }

    /// Transitions recorded at one point.
    pub fn transitions_at(&self, point: &PropagationPoint) -> &[Transition] {
        self.reached.get(point).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::typestate::domain::State;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_access_path_display() {
        let path = AccessPath::var("x").prefixed("box", "inner");
        assert_eq!(path.to_string(), "box.inner");

        let deep = path.prefixed("outer", "slot");
        assert_eq!(deep.to_string(), "outer.slot.inner");
        assert_eq!(deep.depth(), 2);
    }

    #[test]
    fn test_access_path_pop_reverses_prefix() {
        let path = AccessPath::var("x").prefixed("b", "f");
        let loaded = path.popped("t");
        assert_eq!(loaded, AccessPath::var("t"));
    }

    #[test]
    fn test_access_path_loop_detection() {
        let path = AccessPath::var("n").prefixed("list", "next");
        assert!(path.would_loop("next"));
        assert!(!path.would_loop("prev"));
    }

    #[test]
    fn test_record_dedups_triples() {
        let mut state = SolverState::new();
        let point = PropagationPoint::new(StmtId(3), "f");
        let t = Transition::identity(State::new("Opened"));

        assert!(state.record(point.clone(), t.clone()));
        assert!(!state.record(point.clone(), t.clone()));
        assert_eq!(state.propagation_count(), 1);

        let other = Transition::event(State::new("Opened"), "close", State::new("Closed"));
        assert!(state.record(point, other));
        assert_eq!(state.propagation_count(), 2);
    }

    #[test]
    fn test_scalar_diagnostics() {
        let mut state = SolverState::new();
        state.visit_method("a");
        state.visit_method("b");
        state.visit_method("a");
        assert_eq!(state.visited_method_count(), 2);

        assert!(!state.has_call_recursion());
        state.mark_call_recursion();
        assert!(state.has_call_recursion());

        state.note_access_depth(1);
        state.note_access_depth(3);
        state.note_access_depth(2);
        assert_eq!(state.max_access_path(), 3);
    }
}
