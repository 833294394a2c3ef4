//! Report row schema.

pub mod record;

pub use record::{ClassificationRecord, REPORT_COLUMNS, REPORT_HEADER};
