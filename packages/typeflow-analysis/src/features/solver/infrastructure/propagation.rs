/*
 * Propagation Solver
 *
 * Reference fixpoint engine. Forward solves propagate one tracked access
 * path over the interprocedural CFG with an explicit worklist, driving the
 * rule's automaton whenever the tracked value receives a library call.
 * Backward solves resolve the queried value to its allocation sites first
 * (assign chains, returned values, parameter passing, field stores), then
 * replay forward from each allocation through the same recording path.
 *
 * Aliasing is per-path: an assignment forks the tracked path, and events
 * fire on the receiving alias only. A sibling alias keeps the state it last
 * observed. This is the variable-state model, kept deliberately.
 *
 * The token is polled once per worklist pop; cancellation keeps everything
 * accumulated so far.
 */

use crate::features::seeds::domain::{Direction, Seed};
use crate::features::solver::domain::{
    AccessPath, CancellationToken, PropagationPoint, SolverState,
};
use crate::features::solver::ports::{Solver, SolverFailure};
use crate::features::typestate::domain::{State, Transition, TypestateMachine};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use typeflow_model::{Program, Statement, StmtId, StmtKind};

/// Field chains longer than this stop extending. Recursion through a
/// repeated field is flagged before the cap is ever reached.
const DEFAULT_MAX_FIELD_DEPTH: usize = 3;

pub struct PropagationSolver {
    max_field_depth: usize,
}

impl PropagationSolver {
    pub fn new() -> Self {
        Self {
            max_field_depth: DEFAULT_MAX_FIELD_DEPTH,
        }
    }

    pub fn with_max_field_depth(mut self, depth: usize) -> Self {
        self.max_field_depth = depth;
        self
    }
}

impl Default for PropagationSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for PropagationSolver {
    fn solve(
        &self,
        program: &Program,
        machine: &TypestateMachine,
        seed: &Seed,
        token: &CancellationToken,
    ) -> Result<SolverState, SolverFailure> {
        let origin = program
            .statement(seed.stmt)
            .ok_or_else(|| SolverFailure::seed_out_of_model(seed.to_string()))?;

        let mut engine = Propagation {
            program,
            machine,
            token,
            max_field_depth: self.max_field_depth,
            state: SolverState::new(),
            seen: FxHashSet::default(),
            worklist: VecDeque::new(),
            traversed_calls: FxHashMap::default(),
        };

        match seed.direction {
            Direction::Forward => {
                let path = AccessPath::var(&seed.value);
                if origin.defined_target() == Some(seed.value.as_str()) {
                    engine.start_at_definition(origin, path);
                } else {
                    engine.push(Task {
                        stmt: origin.id,
                        path,
                        state: machine.initial_state(),
                    });
                }
                engine.drain();
            }
            Direction::Backward => {
                let allocations = engine.resolve_allocations(origin, &seed.value);
                for (alloc, target) in allocations {
                    if let Some(stmt) = program.statement(alloc) {
                        engine.start_at_definition(stmt, AccessPath::var(target));
                    }
                }
                engine.drain();
            }
        }

        Ok(engine.state)
    }
}

/// One pending propagation: the tracked path arrives at a statement in a
/// given automaton state.
#[derive(Debug, Clone)]
struct Task {
    stmt: StmtId,
    path: AccessPath,
    state: State,
}

struct Propagation<'a> {
    program: &'a Program,
    machine: &'a TypestateMachine,
    token: &'a CancellationToken,
    max_field_depth: usize,
    state: SolverState,
    seen: FxHashSet<(StmtId, AccessPath, State)>,
    worklist: VecDeque<Task>,
    /// Call edges crossed so far, caller -> callees.
    traversed_calls: FxHashMap<String, FxHashSet<String>>,
}

impl<'a> Propagation<'a> {
    fn push(&mut self, task: Task) {
        let key = (task.stmt, task.path.clone(), task.state.clone());
        if self.seen.insert(key) {
            self.worklist.push_back(task);
        }
    }

    /// Seed the fixpoint at a statement that defines the tracked value.
    /// The definition point is recorded at the initial state; propagation
    /// continues at its successors, so a later re-definition of the same
    /// variable correctly kills the path instead of restarting it.
    fn start_at_definition(&mut self, origin: &Statement, path: AccessPath) {
        let initial = self.machine.initial_state();
        self.state.visit_method(&origin.method);
        self.state.record(
            PropagationPoint::new(origin.id, path.to_string()),
            Transition::identity(initial.clone()),
        );
        self.flow_to_successors(origin.id, path, initial);
    }

    fn drain(&mut self) {
        while let Some(task) = self.worklist.pop_front() {
            if self.token.is_cancelled() {
                #[cfg(feature = "trace")]
                tracing::trace!(
                    "cancelled with {} tasks pending, {} propagations recorded",
                    self.worklist.len() + 1,
                    self.state.propagation_count()
                );
                return;
            }
            self.step(task);
        }
    }

    fn step(&mut self, task: Task) {
        let Some(stmt) = self.program.statement(task.stmt) else {
            return;
        };
        self.state.visit_method(&stmt.method);
        self.state.note_access_depth(task.path.depth());

        #[cfg(feature = "trace")]
        tracing::trace!("{} [{}] at {}", task.path, task.state, stmt);

        match &stmt.kind {
            StmtKind::Alloc { target, .. } => {
                self.record_identity(stmt, &task);
                if *target == task.path.base {
                    // Re-allocation of the base variable: the tracked object
                    // is no longer reachable through this path.
                    return;
                }
                self.flow_to_successors(stmt.id, task.path, task.state);
            }

            StmtKind::Assign { target, source } => {
                if *source == task.path.base {
                    self.record_identity(stmt, &task);
                    if target != source {
                        self.flow_to_successors(
                            stmt.id,
                            task.path.rebased(target),
                            task.state.clone(),
                        );
                    }
                    self.flow_to_successors(stmt.id, task.path, task.state);
                } else if *target == task.path.base {
                    // Base overwritten by an untracked value.
                    self.record_identity(stmt, &task);
                } else {
                    self.record_identity(stmt, &task);
                    self.flow_to_successors(stmt.id, task.path, task.state);
                }
            }

            StmtKind::Invoke { target, receiver, args, .. } => {
                match self.program.icfg().call_target(stmt.id) {
                    Some(callee) => {
                        self.record_identity(stmt, &task);
                        self.pass_arguments(stmt, callee, args, &task);
                        let overwritten = target.as_deref() == Some(task.path.base.as_str());
                        if !overwritten {
                            self.flow_to_successors(stmt.id, task.path, task.state);
                        }
                    }
                    None => self.step_library_call(stmt, target, receiver, task),
                }
            }

            StmtKind::FieldLoad { target, base, field } => {
                self.record_identity(stmt, &task);
                if task.path.base == *base && task.path.outer_field() == Some(field.as_str()) {
                    self.flow_to_successors(stmt.id, task.path.popped(target), task.state.clone());
                }
                if *target != task.path.base {
                    self.flow_to_successors(stmt.id, task.path, task.state);
                }
            }

            StmtKind::FieldStore { base, field, source } => {
                self.record_identity(stmt, &task);
                if *source == task.path.base {
                    if task.path.would_loop(field) {
                        self.state.mark_field_recursion();
                    } else if task.path.depth() < self.max_field_depth {
                        let extended = task.path.prefixed(base, field);
                        self.state.note_access_depth(extended.depth());
                        self.flow_to_successors(stmt.id, extended, task.state.clone());
                    }
                }
                // Strong update: the stored-over field no longer reaches the
                // object along this exact path.
                let smashed = task.path.base == *base
                    && task.path.outer_field() == Some(field.as_str())
                    && *source != task.path.base;
                if !smashed {
                    self.flow_to_successors(stmt.id, task.path, task.state);
                }
            }

            StmtKind::Return { value } => {
                self.record_identity(stmt, &task);
                if value.as_deref() == Some(task.path.base.as_str()) {
                    self.flow_to_callers(stmt, &task);
                }
            }

            StmtKind::Nop => {
                self.record_identity(stmt, &task);
                self.flow_to_successors(stmt.id, task.path, task.state);
            }
        }
    }

    /// Library invocation: fires an automaton event when the tracked value
    /// is the receiver, holds the state otherwise.
    fn step_library_call(
        &mut self,
        stmt: &Statement,
        target: &Option<String>,
        receiver: &Option<String>,
        task: Task,
    ) {
        let is_receiver =
            receiver.as_deref() == Some(task.path.base.as_str()) && task.path.is_var();

        let next = if is_receiver {
            match stmt.event_name().and_then(|ev| {
                self.machine
                    .next_state(&task.state, ev)
                    .map(|to| (ev.to_string(), to))
            }) {
                Some((event, to)) => {
                    self.state.record(
                        PropagationPoint::new(stmt.id, task.path.to_string()),
                        Transition::event(task.state.clone(), event, to.clone()),
                    );
                    to
                }
                None => {
                    self.record_identity(stmt, &task);
                    task.state.clone()
                }
            }
        } else {
            self.record_identity(stmt, &task);
            task.state.clone()
        };

        // A call result overwrites its target binding.
        if target.as_deref() == Some(task.path.base.as_str()) {
            return;
        }
        self.flow_to_successors(stmt.id, task.path, next);
    }

    /// Map tracked arguments to callee parameters and enter the callee.
    fn pass_arguments(&mut self, call: &Statement, callee: &str, args: &[String], task: &Task) {
        let Some(entry) = self.program.icfg().entry_statement(callee) else {
            return;
        };
        let Some(callee_method) = self.program.method(callee) else {
            return;
        };
        for (i, arg) in args.iter().enumerate() {
            if *arg != task.path.base {
                continue;
            }
            let Some(param) = callee_method.params.get(i) else {
                continue;
            };
            self.note_call_edge(&call.method, callee);
            self.push(Task {
                stmt: entry,
                path: task.path.rebased(param),
                state: task.state.clone(),
            });
        }
    }

    /// Returned tracked value flows to every call site's target binding.
    fn flow_to_callers(&mut self, ret: &Statement, task: &Task) {
        let call_sites: Vec<StmtId> = self.program.icfg().call_sites_of(&ret.method).to_vec();
        for site in call_sites {
            let Some(call) = self.program.statement(site) else {
                continue;
            };
            if let Some(target) = call.defined_target() {
                self.flow_to_successors(site, task.path.rebased(target), task.state.clone());
            }
        }
    }

    fn record_identity(&mut self, stmt: &Statement, task: &Task) {
        self.state.record(
            PropagationPoint::new(stmt.id, task.path.to_string()),
            Transition::identity(task.state.clone()),
        );
    }

    fn flow_to_successors(&mut self, from: StmtId, path: AccessPath, state: State) {
        for succ in self.program.icfg().successors(from) {
            self.push(Task {
                stmt: *succ,
                path: path.clone(),
                state: state.clone(),
            });
        }
    }

    /// Recursion bookkeeping: crossing a call edge twice, or closing a cycle
    /// among crossed edges, flags the run.
    fn note_call_edge(&mut self, caller: &str, callee: &str) {
        let first_crossing = self
            .traversed_calls
            .entry(caller.to_string())
            .or_default()
            .insert(callee.to_string());
        if !first_crossing || self.calls_reach(callee, caller) {
            self.state.mark_call_recursion();
        }
    }

    fn calls_reach(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let mut stack = vec![from];
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        while let Some(method) = stack.pop() {
            if method == to {
                return true;
            }
            if let Some(callees) = self.traversed_calls.get(method) {
                for callee in callees {
                    if visited.insert(callee.as_str()) {
                        stack.push(callee.as_str());
                    }
                }
            }
        }
        false
    }

    // --------------------------------------------------------
    // Backward phase
    // --------------------------------------------------------

    /// Walk the dataflow backward from a marker statement to the allocation
    /// sites the queried variable may point to. Every visited point is
    /// recorded as a propagation at the initial state (no events fire until
    /// the forward replay).
    fn resolve_allocations(&mut self, origin: &Statement, value: &str) -> Vec<(StmtId, String)> {
        fn enqueue(
            queue: &mut VecDeque<(StmtId, String)>,
            seen: &mut FxHashSet<(StmtId, String)>,
            at: StmtId,
            var: String,
        ) {
            if seen.insert((at, var.clone())) {
                queue.push_back((at, var));
            }
        }

        let initial = self.machine.initial_state();
        let mut allocations: Vec<(StmtId, String)> = Vec::new();
        let mut queue: VecDeque<(StmtId, String)> = VecDeque::new();
        let mut seen: FxHashSet<(StmtId, String)> = FxHashSet::default();

        queue.push_back((origin.id, value.to_string()));
        seen.insert((origin.id, value.to_string()));

        while let Some((at, var)) = queue.pop_front() {
            if self.token.is_cancelled() {
                break;
            }
            let Some(stmt) = self.program.statement(at) else {
                continue;
            };
            self.state.visit_method(&stmt.method);
            self.state.record(
                PropagationPoint::new(at, var.clone()),
                Transition::identity(initial.clone()),
            );

            match &stmt.kind {
                StmtKind::Alloc { target, .. } if *target == var => {
                    allocations.push((at, target.clone()));
                }
                StmtKind::Assign { target, source } if *target == var => {
                    let preds = self.program.icfg().predecessors(at);
                    if preds.is_empty() {
                        // Copy of a parameter at method entry.
                        self.resolve_parameter(&stmt.method, source, |at, var| {
                            enqueue(&mut queue, &mut seen, at, var);
                        });
                    } else {
                        for pred in preds {
                            enqueue(&mut queue, &mut seen, *pred, source.clone());
                        }
                    }
                }
                StmtKind::Invoke { target: Some(t), .. } if *t == var => {
                    // Returned value: continue inside the callee at each of
                    // its return statements. Library calls are opaque
                    // origins and end the walk.
                    if let Some(callee) = self.program.icfg().call_target(at) {
                        self.note_call_edge(&stmt.method, callee);
                        for ret in self.program.icfg().return_statements(callee) {
                            if let Some(ret_stmt) = self.program.statement(*ret) {
                                if let Some(returned) = ret_stmt.returned_value() {
                                    enqueue(&mut queue, &mut seen, *ret, returned.to_string());
                                }
                            }
                        }
                    }
                }
                StmtKind::FieldLoad { target, base: _, field } if *target == var => {
                    // Heap step, field-based: any store to the same field
                    // may have produced this value.
                    for method in self.program.methods() {
                        for candidate in &method.statements {
                            if let StmtKind::FieldStore {
                                field: stored,
                                source,
                                ..
                            } = &candidate.kind
                            {
                                if stored == field {
                                    enqueue(
                                        &mut queue,
                                        &mut seen,
                                        candidate.id,
                                        source.clone(),
                                    );
                                }
                            }
                        }
                    }
                }
                _ => {
                    let preds = self.program.icfg().predecessors(at);
                    if preds.is_empty() {
                        // Method entry: map a parameter back to the
                        // argument at every call site.
                        self.resolve_parameter(&stmt.method, &var, |at, var| {
                            enqueue(&mut queue, &mut seen, at, var);
                        });
                    } else {
                        for pred in preds {
                            enqueue(&mut queue, &mut seen, *pred, var.clone());
                        }
                    }
                }
            }
        }

        allocations
    }

    fn resolve_parameter(
        &self,
        method_name: &str,
        var: &str,
        mut enqueue: impl FnMut(StmtId, String),
    ) {
        let Some(method) = self.program.method(method_name) else {
            return;
        };
        let Some(index) = method.param_index(var) else {
            return;
        };
        for site in self.program.icfg().call_sites_of(method_name) {
            let Some(call) = self.program.statement(*site) else {
                continue;
            };
            if let Some(arg) = call.args().get(index) {
                enqueue(*site, arg.clone());
            }
        }
    }
}
