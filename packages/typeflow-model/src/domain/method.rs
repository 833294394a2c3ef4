//! Methods and class classification.

use super::statement::{Statement, StmtKind};
use serde::{Deserialize, Serialize};

/// Application/library classification of a class.
///
/// Only application-class statements are eligible seed sites; library classes
/// are scanned past. The marks recorded here are the build-time baseline; the
/// pre-scan reclassification pass may promote additional classes (see
/// [`super::ClassificationSnapshot`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Application,
    Library,
}

/// Method definition as written in a program document. Statement ids are
/// assigned when the enclosing [`super::ProgramBuilder`] is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Fully qualified method name, e.g. `com.app.Main.main`.
    pub name: String,
    /// Declaring class, e.g. `com.app.Main`.
    pub class: String,
    /// Parameter variable names, in call order.
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub statements: Vec<StmtKind>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            params: Vec::new(),
            statements: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    pub fn stmt(mut self, kind: StmtKind) -> Self {
        self.statements.push(kind);
        self
    }
}

/// A built method: identity plus its statement list with assigned ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub class: String,
    pub params: Vec<String>,
    pub statements: Vec<Statement>,
}

impl Method {
    /// Last path segment of the method name (`main` for `com.app.Main.main`).
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Position of `param` in the parameter list.
    pub fn param_index(&self, param: &str) -> Option<usize> {
        self.params.iter().position(|p| p == param)
    }
}
