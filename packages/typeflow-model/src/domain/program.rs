//! Program: the read-only whole-program view handed to the analysis.

use super::icfg::InterproceduralCfg;
use super::method::{ClassKind, Method, MethodDef};
use super::statement::{Statement, StmtId};
use crate::error::{ModelError, ModelResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Program document / fluent builder.
///
/// The same type backs both in-test construction and the JSON documents the
/// CLI loads: fields are plain data, `build()` does all derivation and
/// validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramBuilder {
    #[serde(default)]
    methods: Vec<MethodDef>,

    /// Fully qualified entry method name (`main`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry: Option<String>,

    /// Classes marked application at build time. Everything else defaults to
    /// library and can only be promoted by the pre-scan reclassification.
    #[serde(default)]
    application_classes: Vec<String>,

    /// Class-name prefixes the reclassification pass promotes to application.
    #[serde(default)]
    application_patterns: Vec<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    pub fn method(mut self, def: MethodDef) -> Self {
        self.methods.push(def);
        self
    }

    pub fn application_class(mut self, class: impl Into<String>) -> Self {
        self.application_classes.push(class.into());
        self
    }

    pub fn application_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.application_patterns.push(pattern.into());
        self
    }

    /// Parse a JSON program document.
    pub fn from_json(doc: &str) -> serde_json::Result<Self> {
        serde_json::from_str(doc)
    }

    /// Assign statement ids, validate, and derive the interprocedural CFG.
    ///
    /// Statement ids are assigned in definition order, so two builds of the
    /// same document produce identical programs.
    pub fn build(self) -> ModelResult<Program> {
        let mut index = FxHashMap::default();
        for (i, def) in self.methods.iter().enumerate() {
            if index.insert(def.name.clone(), i).is_some() {
                return Err(ModelError::duplicate_method(&def.name));
            }
        }

        if let Some(entry) = &self.entry {
            if !index.contains_key(entry) {
                return Err(ModelError::unknown_entry_point(entry));
            }
        }

        let mut methods = Vec::with_capacity(self.methods.len());
        let mut next_id: u32 = 0;
        for def in &self.methods {
            let mut statements = Vec::with_capacity(def.statements.len());
            for (idx, kind) in def.statements.iter().enumerate() {
                statements.push(Statement {
                    id: StmtId(next_id),
                    method: def.name.clone(),
                    index: idx,
                    kind: kind.clone(),
                });
                next_id += 1;
            }
            methods.push(Method {
                name: def.name.clone(),
                class: def.class.clone(),
                params: def.params.clone(),
                statements,
            });
        }

        // Arity check for calls that resolve to program methods.
        for method in &methods {
            for stmt in &method.statements {
                if let Some(callee) = stmt.callee() {
                    if let Some(&callee_idx) = index.get(callee) {
                        let expected = self.methods[callee_idx].params.len();
                        let got = stmt.args().len();
                        if got != expected {
                            return Err(ModelError::invalid_statement(
                                &method.name,
                                stmt.index,
                                format!(
                                    "call to {} passes {} argument(s), method takes {}",
                                    callee, got, expected
                                ),
                            ));
                        }
                    }
                }
            }
        }

        let mut classes: FxHashMap<String, ClassKind> = FxHashMap::default();
        for method in &methods {
            classes.entry(method.class.clone()).or_insert(ClassKind::Library);
        }
        for class in &self.application_classes {
            classes.insert(class.clone(), ClassKind::Application);
        }

        let mut stmts = FxHashMap::default();
        for (mi, method) in methods.iter().enumerate() {
            for (si, stmt) in method.statements.iter().enumerate() {
                stmts.insert(stmt.id, (mi, si));
            }
        }

        let icfg = InterproceduralCfg::build(&methods, &index, self.entry.as_deref());

        Ok(Program {
            methods,
            index,
            classes,
            entry: self.entry,
            application_patterns: self.application_patterns,
            stmts,
            icfg,
        })
    }
}

/// Immutable whole-program view: methods, class marks, statement lookup and
/// the interprocedural CFG. Shared read-only across concurrently executing
/// seed solves.
#[derive(Debug, Clone)]
pub struct Program {
    methods: Vec<Method>,
    index: FxHashMap<String, usize>,
    classes: FxHashMap<String, ClassKind>,
    entry: Option<String>,
    application_patterns: Vec<String>,
    stmts: FxHashMap<StmtId, (usize, usize)>,
    icfg: InterproceduralCfg,
}

impl Program {
    /// Methods in definition order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.index.get(name).map(|&i| &self.methods[i])
    }

    /// Entry method name, if the program declares one.
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn entry_method(&self) -> Option<&Method> {
        self.entry().and_then(|name| self.method(name))
    }

    pub fn statement(&self, id: StmtId) -> Option<&Statement> {
        self.stmts
            .get(&id)
            .map(|&(mi, si)| &self.methods[mi].statements[si])
    }

    /// Build-time classification of a class.
    pub fn class_kind(&self, class: &str) -> Option<ClassKind> {
        self.classes.get(class).copied()
    }

    /// All classes with their build-time marks (arbitrary order).
    pub fn classes(&self) -> impl Iterator<Item = (&str, ClassKind)> {
        self.classes.iter().map(|(c, k)| (c.as_str(), *k))
    }

    /// Class-name prefixes the reclassification pass promotes.
    pub fn application_patterns(&self) -> &[String] {
        &self.application_patterns
    }

    pub fn icfg(&self) -> &InterproceduralCfg {
        &self.icfg
    }

    /// Methods reachable from the entry over call edges. Snapshot this count
    /// once per run; it is constant for the program's lifetime.
    pub fn reachable_method_count(&self) -> usize {
        self.icfg.reachable_methods().len()
    }
}
