//! Application-class classification snapshot.
//!
//! Seed discovery only looks at application classes. Which classes count as
//! "application" can be widened right before the scan: name patterns (from
//! the program document or supplied by the caller) promote matching library
//! classes. The promotion runs exactly once and produces a read-only
//! snapshot; the underlying [`Program`] is never mutated.

use super::method::ClassKind;
use super::program::Program;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default)]
pub struct ClassificationSnapshot {
    application: FxHashSet<String>,
}

impl ClassificationSnapshot {
    /// Compute the snapshot: build-time application marks plus every class
    /// whose name prefix-matches one of the program's patterns or
    /// `extra_patterns`. Patterns are normalized by stripping `<`/`>`
    /// wrappers before comparison.
    pub fn compute(program: &Program, extra_patterns: &[String]) -> Self {
        let patterns: Vec<String> = program
            .application_patterns()
            .iter()
            .chain(extra_patterns.iter())
            .map(|p| normalize_pattern(p))
            .collect();

        let mut application = FxHashSet::default();
        for (class, kind) in program.classes() {
            let promoted = patterns.iter().any(|p| class.starts_with(p.as_str()));
            if kind == ClassKind::Application || promoted {
                application.insert(class.to_string());
            }
        }

        Self { application }
    }

    pub fn is_application(&self, class: &str) -> bool {
        self.application.contains(class)
    }

    pub fn application_count(&self) -> usize {
        self.application.len()
    }
}

fn normalize_pattern(pattern: &str) -> String {
    pattern.chars().filter(|c| *c != '<' && *c != '>').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MethodDef, ProgramBuilder};

    fn program_with_classes() -> Program {
        ProgramBuilder::new()
            .method(MethodDef::new("com.app.Main.main", "com.app.Main"))
            .method(MethodDef::new("com.app.util.Helper.run", "com.app.util.Helper"))
            .method(MethodDef::new("java.io.FileWriter.write", "java.io.FileWriter"))
            .application_class("com.app.Main")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_time_marks_respected() {
        let program = program_with_classes();
        let snapshot = ClassificationSnapshot::compute(&program, &[]);
        assert!(snapshot.is_application("com.app.Main"));
        assert!(!snapshot.is_application("java.io.FileWriter"));
        assert_eq!(snapshot.application_count(), 1);
    }

    #[test]
    fn test_extra_pattern_promotes_prefix_matches() {
        let program = program_with_classes();
        let snapshot = ClassificationSnapshot::compute(&program, &["com.app.util".to_string()]);
        assert!(snapshot.is_application("com.app.util.Helper"));
        assert!(!snapshot.is_application("java.io.FileWriter"));
        assert_eq!(snapshot.application_count(), 2);
    }

    #[test]
    fn test_pattern_wrapper_chars_stripped() {
        let program = program_with_classes();
        let snapshot = ClassificationSnapshot::compute(&program, &["<com.app.util>".to_string()]);
        assert!(snapshot.is_application("com.app.util.Helper"));
    }

    #[test]
    fn test_document_patterns_apply() {
        let program = ProgramBuilder::new()
            .method(MethodDef::new("com.bench.Target.run", "com.bench.Target"))
            .application_pattern("com.bench")
            .build()
            .unwrap();
        let snapshot = ClassificationSnapshot::compute(&program, &[]);
        assert!(snapshot.is_application("com.bench.Target"));
    }

    #[test]
    fn test_snapshot_does_not_mutate_program() {
        let program = program_with_classes();
        let _ = ClassificationSnapshot::compute(&program, &["java.io".to_string()]);
        // Build-time marks are untouched by promotion.
        assert_eq!(
            program.class_kind("java.io.FileWriter"),
            Some(ClassKind::Library)
        );
    }
}
