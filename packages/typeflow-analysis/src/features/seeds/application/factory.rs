/*
 * Seed Factory
 *
 * Demand discovery: scans reachable application-class methods in definition
 * order and asks the rule to match each statement. The scan is lazy; nothing
 * is materialized until the orchestrator drains the iterator, and a program
 * with no matching statements costs one pass and no allocations.
 *
 * Library-class methods never produce seeds, no matter what they allocate.
 */

use crate::features::rules::ports::Rule;
use crate::features::seeds::domain::Seed;
use typeflow_model::{ClassificationSnapshot, Program};

/// Discovers seeds for one rule over one program snapshot.
pub struct SeedFactory<'a> {
    program: &'a Program,
    classes: &'a ClassificationSnapshot,
    rule: &'a dyn Rule,
}

impl<'a> SeedFactory<'a> {
    pub fn new(
        program: &'a Program,
        classes: &'a ClassificationSnapshot,
        rule: &'a dyn Rule,
    ) -> Self {
        Self {
            program,
            classes,
            rule,
        }
    }

    /// Lazy scan over reachable application methods, in definition order.
    /// Statement ids are assigned in definition order too, so the resulting
    /// seed sequence is strictly ascending by statement id and identical
    /// across runs.
    pub fn seeds(&self) -> impl Iterator<Item = Seed> + '_ {
        self.program
            .methods()
            .filter(|method| {
                self.classes.is_application(&method.class)
                    && self.program.icfg().is_reachable(&method.name)
            })
            .flat_map(move |method| {
                method.statements.iter().filter_map(move |stmt| {
                    self.rule.match_seed(stmt).map(|spec| {
                        Seed::new(stmt, method, self.rule.name(), spec.value, spec.direction)
                    })
                })
            })
    }
}
