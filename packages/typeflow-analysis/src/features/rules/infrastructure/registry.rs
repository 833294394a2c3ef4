/*
 * Rule Registry
 *
 * Static name -> factory table over the built-in rules. The orchestrator
 * resolves the configured rule here exactly once, before any seed work
 * starts; an unresolvable name is a fatal configuration error carrying the
 * full list of valid identifiers.
 */

use crate::errors::{AnalysisError, AnalysisResult};
use crate::features::rules::infrastructure::built_in::{
    ConnectionAuthRule, FileCloseRule, LockReleaseRule, QueryMarkerRule,
};
use crate::features::rules::ports::Rule;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Arc;

type RuleFactory = fn() -> Arc<dyn Rule>;

static REGISTRY: Lazy<FxHashMap<&'static str, RuleFactory>> = Lazy::new(|| {
    let mut rules: FxHashMap<&'static str, RuleFactory> = FxHashMap::default();
    rules.insert(FileCloseRule::NAME, || Arc::new(FileCloseRule::new()));
    rules.insert(LockReleaseRule::NAME, || Arc::new(LockReleaseRule::new()));
    rules.insert(ConnectionAuthRule::NAME, || {
        Arc::new(ConnectionAuthRule::new())
    });
    rules.insert(QueryMarkerRule::NAME, || Arc::new(QueryMarkerRule::new()));
    rules
});

/// Registered rule identifiers in sorted order, for CLI listings and error
/// messages.
pub fn available_rules() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Resolve a rule identifier to a fresh rule instance.
pub fn resolve(name: &str) -> AnalysisResult<Arc<dyn Rule>> {
    match REGISTRY.get(name) {
        Some(factory) => Ok(factory()),
        None => Err(AnalysisError::unknown_rule(name, &available_rules())),
    }
}
