//! Reporting: schema-stable records and the append-only sink.

pub mod domain;
pub mod infrastructure;

pub use domain::{ClassificationRecord, REPORT_COLUMNS, REPORT_HEADER};
pub use infrastructure::CsvReportSink;
