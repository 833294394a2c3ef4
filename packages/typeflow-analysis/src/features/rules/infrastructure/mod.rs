//! Rule implementations and the static registry.

pub mod built_in;
pub mod registry;

pub use built_in::{ConnectionAuthRule, FileCloseRule, LockReleaseRule, QueryMarkerRule};
pub use registry::{available_rules, resolve};
