//! Statements and statement identity.
//!
//! Statements are flat (no nested expressions): every operand is a plain
//! variable name. This keeps the model trivially serializable and makes
//! dataflow transfer functions table lookups rather than tree walks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique statement id, assigned by the program builder in
/// definition order. Ordering follows definition order, which is what makes
/// seed discovery deterministic across runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct StmtId(pub u32);

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Statement payload.
///
/// `Invoke.callee` is either the fully qualified name of a program method
/// (which creates a call edge in the ICFG) or an opaque library method name
/// (which the analysis treats as a typestate event on the receiver).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StmtKind {
    /// `target = new class()`
    Alloc { target: String, class: String },

    /// `target = source`
    Assign { target: String, source: String },

    /// `[target =] [receiver.]callee(args...)`
    Invoke {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<String>,
        callee: String,
        #[serde(default)]
        args: Vec<String>,
    },

    /// `target = base.field`
    FieldLoad {
        target: String,
        base: String,
        field: String,
    },

    /// `base.field = source`
    FieldStore {
        base: String,
        field: String,
        source: String,
    },

    /// `return [value]`
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },

    /// No-op, retained so statement indices can mirror source positions.
    Nop,
}

impl StmtKind {
    pub fn alloc(target: impl Into<String>, class: impl Into<String>) -> Self {
        Self::Alloc {
            target: target.into(),
            class: class.into(),
        }
    }

    pub fn assign(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Assign {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Receiver call with no arguments and no return target: `recv.callee()`.
    pub fn call(receiver: impl Into<String>, callee: impl Into<String>) -> Self {
        Self::Invoke {
            target: None,
            receiver: Some(receiver.into()),
            callee: callee.into(),
            args: Vec::new(),
        }
    }

    /// Static call: `callee(args...)`.
    pub fn call_static<I, A>(callee: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::Invoke {
            target: None,
            receiver: None,
            callee: callee.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Fully general invocation.
    pub fn invoke<I, A>(
        target: Option<&str>,
        receiver: Option<&str>,
        callee: impl Into<String>,
        args: I,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::Invoke {
            target: target.map(str::to_owned),
            receiver: receiver.map(str::to_owned),
            callee: callee.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn field_load(
        target: impl Into<String>,
        base: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::FieldLoad {
            target: target.into(),
            base: base.into(),
            field: field.into(),
        }
    }

    pub fn field_store(
        base: impl Into<String>,
        field: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self::FieldStore {
            base: base.into(),
            field: field.into(),
            source: source.into(),
        }
    }

    pub fn ret(value: Option<&str>) -> Self {
        Self::Return {
            value: value.map(str::to_owned),
        }
    }
}

/// One statement at a fixed position inside a method body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub id: StmtId,
    /// Fully qualified enclosing method name.
    pub method: String,
    /// Position within the method body.
    pub index: usize,
    pub kind: StmtKind,
}

impl Statement {
    /// Callee name for invocations.
    pub fn callee(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::Invoke { callee, .. } => Some(callee),
            _ => None,
        }
    }

    /// Receiver variable for receiver invocations.
    pub fn receiver(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::Invoke {
                receiver: Some(r), ..
            } => Some(r),
            _ => None,
        }
    }

    /// Invocation arguments (empty for non-invocations).
    pub fn args(&self) -> &[String] {
        match &self.kind {
            StmtKind::Invoke { args, .. } => args,
            _ => &[],
        }
    }

    /// Variable defined (written) by this statement, if any.
    pub fn defined_target(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::Alloc { target, .. }
            | StmtKind::Assign { target, .. }
            | StmtKind::FieldLoad { target, .. } => Some(target),
            StmtKind::Invoke {
                target: Some(t), ..
            } => Some(t),
            _ => None,
        }
    }

    /// Short event name used for typestate transitions: the last path
    /// segment of the callee (`java.io.FileWriter.close` -> `close`).
    pub fn event_name(&self) -> Option<&str> {
        self.callee()
            .map(|c| c.rsplit('.').next().unwrap_or(c))
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, StmtKind::Return { .. })
    }

    /// Returned variable, if this is `return x`.
    pub fn returned_value(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::Return { value: Some(v) } => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Alloc { target, class } => write!(f, "{} = new {}", target, class),
            StmtKind::Assign { target, source } => write!(f, "{} = {}", target, source),
            StmtKind::Invoke {
                target,
                receiver,
                callee,
                args,
            } => {
                if let Some(t) = target {
                    write!(f, "{} = ", t)?;
                }
                if let Some(r) = receiver {
                    write!(f, "{}.", r)?;
                }
                write!(f, "{}({})", callee, args.join(", "))
            }
            StmtKind::FieldLoad {
                target,
                base,
                field,
            } => write!(f, "{} = {}.{}", target, base, field),
            StmtKind::FieldStore {
                base,
                field,
                source,
            } => write!(f, "{}.{} = {}", base, field, source),
            StmtKind::Return { value } => match value {
                Some(v) => write!(f, "return {}", v),
                None => write!(f, "return"),
            },
            StmtKind::Nop => write!(f, "nop"),
        }
    }
}
