//! In-memory program model consumed by the typeflow analysis engine.
//!
//! The model is deliberately small: methods with flat statement lists, an
//! interprocedural CFG with linear intra-method edges plus call/return edges,
//! and an application/library classification of classes. Programs are defined
//! through [`ProgramBuilder`] (also deserializable from JSON documents) and
//! are immutable once built — the analysis side only ever borrows them.
//!
//! ## Usage
//!
//! ```rust
//! use typeflow_model::{MethodDef, ProgramBuilder, StmtKind};
//!
//! let program = ProgramBuilder::new()
//!     .entry("com.app.Main.main")
//!     .method(
//!         MethodDef::new("com.app.Main.main", "com.app.Main")
//!             .stmt(StmtKind::alloc("f", "java.io.FileWriter"))
//!             .stmt(StmtKind::call("f", "close"))
//!             .stmt(StmtKind::ret(None)),
//!     )
//!     .application_class("com.app.Main")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(program.method_count(), 1);
//! assert_eq!(program.reachable_method_count(), 1);
//! ```

pub mod domain;
pub mod error;

pub use error::{ModelError, ModelResult};

pub use domain::{
    ClassKind, ClassificationSnapshot, InterproceduralCfg, Method, MethodDef, Program,
    ProgramBuilder, Statement, StmtId, StmtKind,
};
