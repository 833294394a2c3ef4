/*
 * End-to-End Orchestration Tests
 *
 * Complete runs over small in-memory programs: seed discovery through
 * solving, classification, and the report file on disk. Budgets are either
 * generous (nothing here is slow) or exactly zero, so timeout behavior is
 * deterministic.
 */

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use typeflow_analysis::{AnalysisConfig, AnalysisRun, Orchestrator, REPORT_COLUMNS, REPORT_HEADER};
use typeflow_model::{MethodDef, Program, ProgramBuilder, StmtKind};

// ============================================================================
// Fixtures
// ============================================================================

/// Three file allocations in one entry method: `f` writes after close,
/// `g` and `h` close and stop.
fn mixed_program() -> Program {
    ProgramBuilder::new()
        .entry("com.app.Main.main")
        .method(
            MethodDef::new("com.app.Main.main", "com.app.Main")
                .stmt(StmtKind::alloc("f", "java.io.FileWriter"))
                .stmt(StmtKind::call("f", "java.io.FileWriter.close"))
                .stmt(StmtKind::call("f", "java.io.FileWriter.write"))
                .stmt(StmtKind::alloc("g", "java.io.FileWriter"))
                .stmt(StmtKind::call("g", "java.io.FileWriter.write"))
                .stmt(StmtKind::call("g", "java.io.FileWriter.close"))
                .stmt(StmtKind::alloc("h", "java.io.FileWriter"))
                .stmt(StmtKind::call("h", "java.io.FileWriter.close"))
                .stmt(StmtKind::ret(None)),
        )
        .application_class("com.app.Main")
        .build()
        .unwrap()
}

/// No statement matches any file rule; the only allocation is a collection.
fn seedless_program() -> Program {
    ProgramBuilder::new()
        .entry("com.app.Main.main")
        .method(
            MethodDef::new("com.app.Main.main", "com.app.Main")
                .stmt(StmtKind::alloc("list", "java.util.ArrayList"))
                .stmt(StmtKind::call("list", "java.util.ArrayList.add"))
                .stmt(StmtKind::ret(None)),
        )
        .application_class("com.app.Main")
        .build()
        .unwrap()
}

/// One marker call on a misused file: `x` is closed, read again, then handed
/// to the query marker.
fn marker_program() -> Program {
    ProgramBuilder::new()
        .entry("com.app.Main.main")
        .method(
            MethodDef::new("com.app.Main.main", "com.app.Main")
                .stmt(StmtKind::alloc("x", "java.io.FileWriter"))
                .stmt(StmtKind::call("x", "java.io.FileWriter.close"))
                .stmt(StmtKind::call("x", "java.io.FileWriter.read"))
                .stmt(StmtKind::call_static("analysis.Queries.queryFor", ["x"]))
                .stmt(StmtKind::ret(None)),
        )
        .application_class("com.app.Main")
        .build()
        .unwrap()
}

/// `main` seeds a file and passes it into a two-method call cycle.
fn cyclic_program() -> Program {
    ProgramBuilder::new()
        .entry("com.app.Main.main")
        .method(
            MethodDef::new("com.app.Main.main", "com.app.Main")
                .stmt(StmtKind::alloc("f", "java.io.FileWriter"))
                .stmt(StmtKind::invoke(None, None, "com.app.Main.ping", ["f"]))
                .stmt(StmtKind::ret(None)),
        )
        .method(
            MethodDef::new("com.app.Main.ping", "com.app.Main")
                .param("p")
                .stmt(StmtKind::invoke(None, None, "com.app.Main.pong", ["p"]))
                .stmt(StmtKind::ret(None)),
        )
        .method(
            MethodDef::new("com.app.Main.pong", "com.app.Main")
                .param("q")
                .stmt(StmtKind::invoke(None, None, "com.app.Main.ping", ["q"]))
                .stmt(StmtKind::ret(None)),
        )
        .application_class("com.app.Main")
        .build()
        .unwrap()
}

fn run_rule(program: &Program, config: AnalysisConfig) -> AnalysisRun {
    Orchestrator::new(config)
        .unwrap()
        .run(program)
        .unwrap()
}

fn report_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Rows with the wall-clock column blanked; everything else is deterministic.
fn masked_rows(run: &AnalysisRun) -> Vec<String> {
    run.records
        .iter()
        .map(|(_, record)| {
            let mut columns: Vec<String> =
                record.to_csv_row().split(';').map(str::to_string).collect();
            columns[8] = "-".to_string();
            columns.join(";")
        })
        .collect()
}

fn column(row: &str, index: usize) -> String {
    row.split(';').nth(index).unwrap().to_string()
}

// ============================================================================
// Report Files
// ============================================================================

/// A program with nothing to seed still produces a report: the header line
/// and nothing else.
#[test]
fn test_zero_seeds_writes_header_only_report() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.csv");

    let run = run_rule(
        &seedless_program(),
        AnalysisConfig::new("file-close").with_output_file(&report),
    );

    assert!(run.is_empty());
    assert_eq!(run.stats.seeds, 0);
    assert_eq!(report_lines(&report), vec![REPORT_HEADER.to_string()]);
}

/// Every discovered seed lands in the file exactly once, after the header.
#[test]
fn test_one_row_per_seed() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.csv");

    let run = run_rule(
        &mixed_program(),
        AnalysisConfig::new("file-close").with_output_file(&report),
    );

    assert_eq!(run.len(), 3);
    let lines = report_lines(&report);
    assert_eq!(lines.len(), 1 + run.len());
    assert_eq!(lines[0], REPORT_HEADER);
    for row in &lines[1..] {
        assert_eq!(row.split(';').count(), REPORT_COLUMNS);
    }

    // No duplicates: the seed column is unique per row.
    let mut seeds: Vec<String> = lines[1..].iter().map(|row| column(row, 2)).collect();
    seeds.sort();
    seeds.dedup();
    assert_eq!(seeds.len(), 3);
}

/// N batches against the same destination share one header.
#[test]
fn test_header_written_once_across_batches() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.csv");
    let program = mixed_program();

    for _ in 0..3 {
        run_rule(
            &program,
            AnalysisConfig::new("file-close").with_output_file(&report),
        );
    }

    let lines = report_lines(&report);
    assert_eq!(lines[0], REPORT_HEADER);
    assert_eq!(
        lines.iter().filter(|line| *line == REPORT_HEADER).count(),
        1
    );
    assert_eq!(lines.len(), 1 + 3 * 3);
}

// ============================================================================
// Verdicts
// ============================================================================

/// Write-after-close is flagged; well-behaved sequences are not.
#[test]
fn test_misuse_flagged_and_clean_code_passes() {
    let run = run_rule(&mixed_program(), AnalysisConfig::new("file-close"));

    let verdicts: Vec<(String, bool)> = run
        .records
        .iter()
        .map(|(seed, record)| (seed.value.clone(), record.is_in_error))
        .collect();

    assert_eq!(
        verdicts,
        vec![
            ("f".to_string(), true),
            ("g".to_string(), false),
            ("h".to_string(), false),
        ]
    );
    assert_eq!(run.stats.in_error, 1);
    assert_eq!(run.stats.completed, 3);
}

/// Worker count changes scheduling, never verdicts or row order.
#[test]
fn test_verdicts_stable_across_worker_counts() {
    let program = mixed_program();

    let sequential = run_rule(&program, AnalysisConfig::new("file-close").with_workers(1));
    let parallel = run_rule(&program, AnalysisConfig::new("file-close").with_workers(4));

    assert_eq!(masked_rows(&sequential), masked_rows(&parallel));
}

/// Two sequential runs agree on every column except wall-clock timing.
#[test]
fn test_sequential_reruns_are_deterministic() {
    let program = mixed_program();

    let first = run_rule(&program, AnalysisConfig::new("file-close"));
    let second = run_rule(&program, AnalysisConfig::new("file-close"));

    assert_eq!(masked_rows(&first), masked_rows(&second));
}

// ============================================================================
// Budgets
// ============================================================================

/// A zero budget expires before the first worklist step. Records still come
/// out complete: timed out, with the partial counts actually accumulated.
#[test]
fn test_zero_budget_times_out_with_partial_counts() {
    let run = run_rule(
        &mixed_program(),
        AnalysisConfig::new("file-close").with_budget_ms(0),
    );

    assert_eq!(run.stats.timed_out, run.stats.seeds);
    assert_eq!(run.stats.completed, 0);

    for (_, record) in &run.records {
        assert!(record.timed_out);
        // The origin is recorded before the token is polled.
        assert!(record.propagation_count >= 1);
        assert!(record.visited_methods >= 1);
        let row = record.to_csv_row();
        assert_eq!(row.split(';').count(), REPORT_COLUMNS);
        assert_eq!(column(&row, 7), "true");
    }
}

// ============================================================================
// Backward Queries
// ============================================================================

/// The marker call seeds exactly one backward query; the resolved allocation
/// replays through close-then-read and lands in the error state.
#[test]
fn test_backward_marker_finds_misused_allocation() {
    let run = run_rule(&marker_program(), AnalysisConfig::new("query-marker"));

    assert_eq!(run.len(), 1);
    let (seed, record) = &run.records[0];
    assert_eq!(seed.to_string(), "Backward(x @ com.app.Main.main:3)");
    assert_eq!(seed.value, "x");
    assert!(record.is_in_error);
    assert!(!record.timed_out);
}

// ============================================================================
// Call Cycles
// ============================================================================

/// Crossing the ping/pong edge twice marks call recursion; saturation still
/// terminates the solve inside a generous budget.
#[test]
fn test_call_cycle_marks_recursion_and_terminates() {
    let run = run_rule(&cyclic_program(), AnalysisConfig::new("file-close"));

    assert_eq!(run.len(), 1);
    let (_, record) = &run.records[0];
    assert!(record.call_recursion);
    assert!(!record.timed_out);
    assert!(record.visited_methods >= 3);
}

/// The same cycle under a zero budget: the record is a timeout and still
/// schema-stable.
#[test]
fn test_call_cycle_with_zero_budget_times_out() {
    let run = run_rule(
        &cyclic_program(),
        AnalysisConfig::new("file-close").with_budget_ms(0),
    );

    assert_eq!(run.len(), 1);
    let (_, record) = &run.records[0];
    assert!(record.timed_out);
    assert_eq!(record.to_csv_row().split(';').count(), REPORT_COLUMNS);
}
