/*
 * Typestate Automaton
 *
 * Finite-state abstraction of an object's valid usage sequence. States are
 * named, transitions are keyed by (state, event) where an event is the short
 * name of an invoked method, and a designated subset of states are error
 * states (protocol violations).
 *
 * The automaton is consumed two ways:
 * - the solver drives it while propagating a tracked value (next_state),
 * - the classifier asks whether any recorded transition reached an error
 *   state (is_error_state).
 */

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Automaton state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub name: String,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One recorded transition weight: the automaton step taken (or held) at a
/// reached program point. Event-free propagation records identity weights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: State,
    /// Event that fired, `None` for identity (plain dataflow) steps.
    pub event: Option<String>,
    pub to: State,
}

impl Transition {
    pub fn event(from: State, event: impl Into<String>, to: State) -> Self {
        Self {
            from,
            event: Some(event.into()),
            to,
        }
    }

    /// Identity weight: the value flowed through a point without an event.
    pub fn identity(state: State) -> Self {
        Self {
            from: state.clone(),
            event: None,
            to: state,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.event.is_none()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.event {
            Some(ev) => write!(f, "{} --{}--> {}", self.from, ev, self.to),
            None => write!(f, "{} --> {}", self.from, self.to),
        }
    }
}

/// Finite typestate automaton.
#[derive(Debug, Clone)]
pub struct TypestateMachine {
    pub name: String,
    initial: State,
    error_states: FxHashSet<State>,
    transitions: FxHashMap<(State, String), State>,
}

impl TypestateMachine {
    pub fn new(name: impl Into<String>, initial: State) -> Self {
        Self {
            name: name.into(),
            initial,
            error_states: FxHashSet::default(),
            transitions: FxHashMap::default(),
        }
    }

    pub fn add_transition(&mut self, from: State, event: impl Into<String>, to: State) {
        self.transitions.insert((from, event.into()), to);
    }

    pub fn add_error_state(&mut self, state: State) {
        self.error_states.insert(state);
    }

    pub fn initial_state(&self) -> State {
        self.initial.clone()
    }

    /// Transition lookup. `None` means the automaton defines no step for this
    /// event in this state; the value keeps its current state (identity).
    pub fn next_state(&self, from: &State, event: &str) -> Option<State> {
        self.transitions
            .get(&(from.clone(), event.to_string()))
            .cloned()
    }

    pub fn is_error_state(&self, state: &State) -> bool {
        self.error_states.contains(state)
    }

    /// Events the automaton reacts to in any state.
    pub fn known_events(&self) -> FxHashSet<&str> {
        self.transitions.keys().map(|(_, ev)| ev.as_str()).collect()
    }

    /// Structural sanity checks. Returns an error description when the
    /// automaton cannot classify anything meaningfully.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("automaton has no name".to_string());
        }
        if self.transitions.is_empty() {
            return Err(format!("automaton '{}' has no transitions", self.name));
        }
        for error in &self.error_states {
            let reachable = self.transitions.values().any(|to| to == error);
            if !reachable && *error != self.initial {
                return Err(format!(
                    "error state '{}' of '{}' is not a destination of any transition",
                    error, self.name
                ));
            }
        }
        Ok(())
    }
}
