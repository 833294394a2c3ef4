/*
 * CSV Report Sink
 *
 * Append-only `;`-delimited destination. The header is written exactly once
 * per file: a batch that finds the file already present appends rows only,
 * so repeated runs against the same destination accumulate rows under a
 * single header.
 *
 * Writes are best-effort from the pipeline's point of view: the orchestrator
 * logs a failed append and keeps the records in memory.
 */

use crate::errors::{AnalysisError, AnalysisResult};
use crate::features::reporting::domain::{ClassificationRecord, REPORT_HEADER};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct CsvReportSink {
    path: PathBuf,
    /// Serializes header check + append so concurrent batches through one
    /// sink cannot interleave rows or double-write the header.
    lock: Mutex<()>,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one batch. Writes the header first when the destination does
    /// not exist yet; an empty batch on a fresh destination still creates
    /// the header-only file.
    pub fn append(&self, records: &[ClassificationRecord]) -> AnalysisResult<()> {
        let _guard = self.lock.lock();

        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AnalysisError::report_io(&self.path, e))?;

        let mut out = String::new();
        if write_header {
            out.push_str(REPORT_HEADER);
            out.push('\n');
        }
        for record in records {
            out.push_str(&record.to_csv_row());
            out.push('\n');
        }

        file.write_all(out.as_bytes())
            .map_err(|e| AnalysisError::report_io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::seeds::domain::{Direction, Seed};
    use crate::features::solver::domain::{SeedResult, SolveOutcome, SolverState};
    use typeflow_model::{MethodDef, ProgramBuilder, StmtKind};

    fn sample_record() -> ClassificationRecord {
        let program = ProgramBuilder::new()
            .entry("com.app.Main.main")
            .method(
                MethodDef::new("com.app.Main.main", "com.app.Main")
                    .stmt(StmtKind::alloc("f", "java.io.FileWriter")),
            )
            .application_class("com.app.Main")
            .build()
            .unwrap();
        let method = program.method("com.app.Main.main").unwrap();
        let seed = Seed::new(
            &method.statements[0],
            method,
            "file-close",
            "f",
            Direction::Forward,
        );
        let result = SeedResult {
            seed,
            outcome: SolveOutcome::Completed,
            analysis_time_ms: 1,
            state: SolverState::new(),
        };
        ClassificationRecord::from_result("typeflow", "file-close", &result, false, 1)
    }

    #[test]
    fn test_fresh_destination_gets_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let sink = CsvReportSink::new(&path);

        sink.append(&[sample_record(), sample_record()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], REPORT_HEADER);
    }

    #[test]
    fn test_empty_batch_creates_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let sink = CsvReportSink::new(&path);

        sink.append(&[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", REPORT_HEADER));
    }

    #[test]
    fn test_header_written_once_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let sink = CsvReportSink::new(&path);

        sink.append(&[sample_record()]).unwrap();
        sink.append(&[sample_record()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let headers = content
            .lines()
            .filter(|l| *l == REPORT_HEADER)
            .count();
        assert_eq!(headers, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_fresh_sink_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        CsvReportSink::new(&path).append(&[sample_record()]).unwrap();
        CsvReportSink::new(&path).append(&[sample_record()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.lines().next().unwrap(), REPORT_HEADER);
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let sink = CsvReportSink::new(dir.path());
        let err = sink.append(&[sample_record()]).unwrap_err();
        assert!(!err.is_fatal());
    }
}
