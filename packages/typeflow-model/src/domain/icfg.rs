//! Interprocedural control-flow graph.
//!
//! Intra-method flow is linear (statement `i` falls through to `i + 1`);
//! interprocedural structure comes from call edges: an `Invoke` whose callee
//! names a program method is a call site with edges to the callee entry and
//! back from the callee's return statements. Invocations of anything else are
//! opaque library calls and stay intra-method.

use super::method::Method;
use super::statement::StmtId;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct InterproceduralCfg {
    succs: FxHashMap<StmtId, Vec<StmtId>>,
    preds: FxHashMap<StmtId, Vec<StmtId>>,
    /// Call site -> resolved program callee.
    call_targets: FxHashMap<StmtId, String>,
    /// Program method -> call sites invoking it, in statement-id order.
    call_sites: FxHashMap<String, Vec<StmtId>>,
    entry_stmts: FxHashMap<String, StmtId>,
    return_stmts: FxHashMap<String, Vec<StmtId>>,
    reachable: FxHashSet<String>,
}

impl InterproceduralCfg {
    pub(crate) fn build(
        methods: &[Method],
        index: &FxHashMap<String, usize>,
        entry: Option<&str>,
    ) -> Self {
        let mut cfg = Self::default();

        for method in methods {
            if let Some(first) = method.statements.first() {
                cfg.entry_stmts.insert(method.name.clone(), first.id);
            }
            for pair in method.statements.windows(2) {
                cfg.succs.entry(pair[0].id).or_default().push(pair[1].id);
                cfg.preds.entry(pair[1].id).or_default().push(pair[0].id);
            }
            for stmt in &method.statements {
                if stmt.is_return() {
                    cfg.return_stmts
                        .entry(method.name.clone())
                        .or_default()
                        .push(stmt.id);
                }
                if let Some(callee) = stmt.callee() {
                    if index.contains_key(callee) {
                        cfg.call_targets.insert(stmt.id, callee.to_string());
                        cfg.call_sites
                            .entry(callee.to_string())
                            .or_default()
                            .push(stmt.id);
                    }
                }
            }
        }

        if let Some(entry) = entry {
            cfg.reachable = cfg.compute_reachable(methods, index, entry);
        }

        cfg
    }

    fn compute_reachable(
        &self,
        methods: &[Method],
        index: &FxHashMap<String, usize>,
        entry: &str,
    ) -> FxHashSet<String> {
        let mut seen = FxHashSet::default();
        let mut worklist = vec![entry.to_string()];
        while let Some(name) = worklist.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(&mi) = index.get(&name) {
                for stmt in &methods[mi].statements {
                    if let Some(callee) = self.call_targets.get(&stmt.id) {
                        if !seen.contains(callee) {
                            worklist.push(callee.clone());
                        }
                    }
                }
            }
        }
        seen
    }

    /// Intra-method fallthrough successors.
    pub fn successors(&self, id: StmtId) -> &[StmtId] {
        self.succs.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Intra-method fallthrough predecessors.
    pub fn predecessors(&self, id: StmtId) -> &[StmtId] {
        self.preds.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolved program callee at a call site.
    pub fn call_target(&self, id: StmtId) -> Option<&str> {
        self.call_targets.get(&id).map(String::as_str)
    }

    /// Call sites that invoke `method`.
    pub fn call_sites_of(&self, method: &str) -> &[StmtId] {
        self.call_sites
            .get(method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First statement of a method body.
    pub fn entry_statement(&self, method: &str) -> Option<StmtId> {
        self.entry_stmts.get(method).copied()
    }

    /// Return statements of a method.
    pub fn return_statements(&self, method: &str) -> &[StmtId] {
        self.return_stmts
            .get(method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Methods reachable from the program entry over call edges. Empty when
    /// the program declares no entry.
    pub fn reachable_methods(&self) -> &FxHashSet<String> {
        &self.reachable
    }

    pub fn is_reachable(&self, method: &str) -> bool {
        self.reachable.contains(method)
    }
}
