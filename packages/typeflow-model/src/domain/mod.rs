//! Domain model: statements, methods, programs, the interprocedural CFG and
//! the application-class classification snapshot.

mod classification;
mod icfg;
mod method;
mod program;
mod statement;

pub use classification::ClassificationSnapshot;
pub use icfg::InterproceduralCfg;
pub use method::{ClassKind, Method, MethodDef};
pub use program::{Program, ProgramBuilder};
pub use statement::{Statement, StmtId, StmtKind};
