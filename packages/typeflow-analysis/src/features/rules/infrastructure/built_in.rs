/*
 * Built-in Rules
 *
 * Standard typestate rules for common resources:
 * - FileCloseRule: file stream open/close lifecycle
 * - LockReleaseRule: lock acquire/release pairing
 * - ConnectionAuthRule: connection authentication ordering
 * - QueryMarkerRule: backward demand queries at queryFor() markers
 *
 * These rules are used out-of-the-box without configuration. Misuse is
 * modeled with explicit transitions into a designated Error state so the
 * classifier only has to test error-state membership.
 */

use crate::features::rules::ports::{Rule, SeedSpec};
use crate::features::typestate::domain::{State, TypestateMachine};
use typeflow_model::{Statement, StmtKind};

/// Allocation classes that seed the file rule.
const FILE_CLASS_PREFIX: &str = "java.io.File";

/// Marker callee recognized by the backward query rule.
const QUERY_MARKER: &str = "queryFor";

/// File automaton, shared by the file rule and the backward marker rule.
///
/// States: Opened (initial, at allocation) → Closed, Error
///
/// Transitions:
/// - Opened --read()/write()/flush()--> Opened
/// - Opened --close()--> Closed
/// - Closed --read()/write()/flush()--> Error (use after close)
/// - Closed --close()--> Error (double close)
///
/// Unknown events hold the current state; Error is absorbing.
fn file_machine() -> TypestateMachine {
    let opened = State::new("Opened");
    let closed = State::new("Closed");
    let error = State::new("Error");

    let mut machine = TypestateMachine::new("File", opened.clone());
    for event in ["read", "write", "flush"] {
        machine.add_transition(opened.clone(), event, opened.clone());
        machine.add_transition(closed.clone(), event, error.clone());
    }
    machine.add_transition(opened.clone(), "close", closed.clone());
    machine.add_transition(closed.clone(), "close", error.clone());
    machine.add_error_state(error);
    machine
}

/// Lock automaton.
///
/// States: Unlocked (initial, at allocation) ⇄ Locked, Error
///
/// Transitions:
/// - Unlocked --lock()/acquire()--> Locked
/// - Locked --unlock()/release()--> Unlocked
/// - Locked --lock()/acquire()--> Error (double acquire)
/// - Unlocked --unlock()/release()--> Error (release without hold)
fn lock_machine() -> TypestateMachine {
    let unlocked = State::new("Unlocked");
    let locked = State::new("Locked");
    let error = State::new("Error");

    let mut machine = TypestateMachine::new("Lock", unlocked.clone());
    for event in ["lock", "acquire"] {
        machine.add_transition(unlocked.clone(), event, locked.clone());
        machine.add_transition(locked.clone(), event, error.clone());
    }
    for event in ["unlock", "release"] {
        machine.add_transition(locked.clone(), event, unlocked.clone());
        machine.add_transition(unlocked.clone(), event, error.clone());
    }
    machine.add_error_state(error);
    machine
}

/// Connection automaton.
///
/// States: Disconnected (initial, at allocation) → Connected → Authenticated
///
/// Transitions:
/// - Disconnected --connect()--> Connected
/// - Connected --authenticate()--> Authenticated
/// - Authenticated --send()/receive()/query()/execute()--> Authenticated
/// - Connected --send()/receive()/query()/execute()--> Error (use before auth)
/// - Disconnected --send()/receive()/query()/execute()--> Error
/// - Connected/Authenticated --disconnect()--> Disconnected
fn connection_machine() -> TypestateMachine {
    let disconnected = State::new("Disconnected");
    let connected = State::new("Connected");
    let authenticated = State::new("Authenticated");
    let error = State::new("Error");

    let mut machine = TypestateMachine::new("Connection", disconnected.clone());
    machine.add_transition(disconnected.clone(), "connect", connected.clone());
    machine.add_transition(connected.clone(), "authenticate", authenticated.clone());
    for event in ["send", "receive", "query", "execute"] {
        machine.add_transition(authenticated.clone(), event, authenticated.clone());
        machine.add_transition(connected.clone(), event, error.clone());
        machine.add_transition(disconnected.clone(), event, error.clone());
    }
    machine.add_transition(connected.clone(), "disconnect", disconnected.clone());
    machine.add_transition(authenticated, "disconnect", disconnected);
    machine.add_error_state(error);
    machine
}

// ============================================================
// File rule
// ============================================================

/// Forward rule that tracks `java.io.File*` streams from their allocation
/// and flags use-after-close and double-close.
pub struct FileCloseRule {
    machine: TypestateMachine,
}

impl FileCloseRule {
    pub const NAME: &'static str = "file-close";

    pub fn new() -> Self {
        Self {
            machine: file_machine(),
        }
    }
}

impl Default for FileCloseRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for FileCloseRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn machine(&self) -> &TypestateMachine {
        &self.machine
    }

    fn match_seed(&self, stmt: &Statement) -> Option<SeedSpec> {
        match &stmt.kind {
            StmtKind::Alloc { target, class } if class.starts_with(FILE_CLASS_PREFIX) => {
                Some(SeedSpec::forward(target))
            }
            _ => None,
        }
    }
}

// ============================================================
// Lock rule
// ============================================================

/// Forward rule that tracks lock objects and flags double-acquire and
/// release-without-hold.
pub struct LockReleaseRule {
    machine: TypestateMachine,
}

impl LockReleaseRule {
    pub const NAME: &'static str = "lock-release";

    pub fn new() -> Self {
        Self {
            machine: lock_machine(),
        }
    }
}

impl Default for LockReleaseRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LockReleaseRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn machine(&self) -> &TypestateMachine {
        &self.machine
    }

    fn match_seed(&self, stmt: &Statement) -> Option<SeedSpec> {
        match &stmt.kind {
            StmtKind::Alloc { target, class } if class.ends_with("Lock") => {
                Some(SeedSpec::forward(target))
            }
            _ => None,
        }
    }
}

// ============================================================
// Connection rule
// ============================================================

/// Forward rule that tracks connection objects and flags data operations
/// issued before authentication.
pub struct ConnectionAuthRule {
    machine: TypestateMachine,
}

impl ConnectionAuthRule {
    pub const NAME: &'static str = "connection-auth";

    pub fn new() -> Self {
        Self {
            machine: connection_machine(),
        }
    }
}

impl Default for ConnectionAuthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ConnectionAuthRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn machine(&self) -> &TypestateMachine {
        &self.machine
    }

    fn match_seed(&self, stmt: &Statement) -> Option<SeedSpec> {
        match &stmt.kind {
            StmtKind::Alloc { target, class } if class.contains("Connection") => {
                Some(SeedSpec::forward(target))
            }
            _ => None,
        }
    }
}

// ============================================================
// Query marker rule
// ============================================================

/// Backward rule seeded at `queryFor(x)` marker calls. The argument's
/// allocation is resolved against the flow of the program and the file
/// automaton is replayed from there, so the marker reports protocol misuse
/// of whatever file-like value reaches it.
pub struct QueryMarkerRule {
    machine: TypestateMachine,
}

impl QueryMarkerRule {
    pub const NAME: &'static str = "query-marker";

    pub fn new() -> Self {
        Self {
            machine: file_machine(),
        }
    }
}

impl Default for QueryMarkerRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for QueryMarkerRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn machine(&self) -> &TypestateMachine {
        &self.machine
    }

    fn match_seed(&self, stmt: &Statement) -> Option<SeedSpec> {
        if stmt.event_name() != Some(QUERY_MARKER) {
            return None;
        }
        stmt.args().first().map(SeedSpec::backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::seeds::domain::Direction;
    use typeflow_model::StmtId;

    fn stmt(kind: StmtKind) -> Statement {
        Statement {
            id: StmtId(0),
            method: "com.app.Main.main".to_string(),
            index: 0,
            kind,
        }
    }

    #[test]
    fn test_file_rule_definition() {
        let rule = FileCloseRule::new();

        assert_eq!(rule.name(), "file-close");
        assert_eq!(rule.machine().initial_state(), State::new("Opened"));
        assert!(rule.machine().is_error_state(&State::new("Error")));
    }

    #[test]
    fn test_file_rule_transitions() {
        let machine = file_machine();

        let opened = State::new("Opened");
        let closed = State::new("Closed");

        // Valid transitions
        assert_eq!(machine.next_state(&opened, "write"), Some(opened.clone()));
        assert_eq!(machine.next_state(&opened, "close"), Some(closed.clone()));

        // Misuse transitions
        assert_eq!(
            machine.next_state(&closed, "write"),
            Some(State::new("Error"))
        );
        assert_eq!(
            machine.next_state(&closed, "close"),
            Some(State::new("Error"))
        );
    }

    #[test]
    fn test_file_rule_seeds_at_file_allocations() {
        let rule = FileCloseRule::new();

        let seed = rule
            .match_seed(&stmt(StmtKind::alloc("f", "java.io.FileWriter")))
            .unwrap();
        assert_eq!(seed.value, "f");
        assert_eq!(seed.direction, Direction::Forward);

        assert!(rule
            .match_seed(&stmt(StmtKind::alloc("s", "java.lang.StringBuilder")))
            .is_none());
        assert!(rule.match_seed(&stmt(StmtKind::call("f", "close"))).is_none());
    }

    #[test]
    fn test_lock_rule_double_acquire() {
        let machine = lock_machine();

        let locked = State::new("Locked");
        assert_eq!(
            machine.next_state(&locked, "acquire"),
            Some(State::new("Error"))
        );
        assert_eq!(
            machine.next_state(&State::new("Unlocked"), "release"),
            Some(State::new("Error"))
        );
    }

    #[test]
    fn test_lock_rule_seeds_at_lock_allocations() {
        let rule = LockReleaseRule::new();

        assert!(rule
            .match_seed(&stmt(StmtKind::alloc(
                "l",
                "java.util.concurrent.locks.ReentrantLock"
            )))
            .is_some());
        assert!(rule
            .match_seed(&stmt(StmtKind::alloc("f", "java.io.FileWriter")))
            .is_none());
    }

    #[test]
    fn test_connection_send_before_authenticate() {
        let machine = connection_machine();

        let connected = State::new("Connected");
        assert_eq!(
            machine.next_state(&connected, "send"),
            Some(State::new("Error"))
        );
        assert_eq!(
            machine.next_state(&State::new("Authenticated"), "send"),
            Some(State::new("Authenticated"))
        );
    }

    #[test]
    fn test_query_marker_seeds_backward_on_first_arg() {
        let rule = QueryMarkerRule::new();

        let seed = rule
            .match_seed(&stmt(StmtKind::call_static("queryFor", ["x"])))
            .unwrap();
        assert_eq!(seed.value, "x");
        assert_eq!(seed.direction, Direction::Backward);

        // Qualified marker callees match by short name.
        let qualified = rule
            .match_seed(&stmt(StmtKind::call_static(
                "com.app.Queries.queryFor",
                ["y"],
            )))
            .unwrap();
        assert_eq!(qualified.value, "y");

        // No argument, no seed.
        assert!(rule
            .match_seed(&stmt(StmtKind::call_static("queryFor", Vec::<String>::new())))
            .is_none());
        assert!(rule
            .match_seed(&stmt(StmtKind::alloc("f", "java.io.FileWriter")))
            .is_none());
    }

    #[test]
    fn test_all_machines_validate() {
        assert!(file_machine().validate().is_ok());
        assert!(lock_machine().validate().is_ok());
        assert!(connection_machine().validate().is_ok());
    }
}
