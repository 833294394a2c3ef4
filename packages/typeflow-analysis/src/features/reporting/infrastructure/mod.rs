//! Report destinations.

pub mod csv_sink;

pub use csv_sink::CsvReportSink;
