//! Ordered, guard-gated application of rule sets to one file's content.
//!
//! Rule sets run in the order given; each one sees the cumulative output of
//! the ones before it. The engine never touches the filesystem.

use std::path::Path;

use crate::core::rule_set::RuleSet;
use crate::core::types::FileUnit;

/// Apply `rule_set` if its guard accepts `content`.
///
/// Returns `None` when the guard rejects the content or nothing changed.
fn step(rule_set: &RuleSet, content: &str) -> Option<String> {
    if !rule_set.applies(content) {
        return None;
    }
    let next = rule_set.apply(content);
    (next != content).then_some(next)
}

/// Rewrite `content` with every rule set, ignoring extension scopes.
pub fn rewrite(content: &str, rule_sets: &[RuleSet]) -> String {
    let mut current = content.to_string();
    for rule_set in rule_sets {
        if let Some(next) = step(rule_set, &current) {
            current = next;
        }
    }
    current
}

/// Rewrite `unit.current` with the rule sets whose scope accepts `unit.path`.
///
/// Returns the names of the rule sets that changed the content.
pub fn rewrite_unit(unit: &mut FileUnit, rule_sets: &[RuleSet]) -> Vec<String> {
    let mut applied = Vec::new();
    for rule_set in scoped(&unit.path, rule_sets) {
        if let Some(next) = step(rule_set, &unit.current) {
            applied.push(rule_set.name().to_string());
            unit.current = next;
        }
    }
    applied
}

/// Rule sets that are not idempotent on `content`.
///
/// Each scoped rule set is applied at its position in the pipeline, then
/// applied again to its own output; a second change marks it unstable.
pub fn unstable_rule_sets(path: &Path, content: &str, rule_sets: &[RuleSet]) -> Vec<String> {
    let mut unstable = Vec::new();
    let mut current = content.to_string();
    for rule_set in scoped(path, rule_sets) {
        let Some(once) = step(rule_set, &current) else {
            continue;
        };
        if step(rule_set, &once).is_some() {
            unstable.push(rule_set.name().to_string());
        }
        current = once;
    }
    unstable
}

fn scoped<'a>(path: &'a Path, rule_sets: &'a [RuleSet]) -> impl Iterator<Item = &'a RuleSet> {
    rule_sets
        .iter()
        .filter(move |rule_set| rule_set.accepts_path(path))
}
