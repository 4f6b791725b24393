//! Determinism and invariant harness.
//!
//! Runs the ordering engine and analyzer repeatedly over the same snapshot
//! and checks the structural guarantees of the ordered output.

use rampart_analyzer::{Analyzer, AnalyzerConfig};
use rampart_order::{order, ProcessedRuleCollectionGroup};
use rampart_policy::{Policy, RuleCategory};
use std::fmt;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

/// Configuration for the harness.
#[derive(Debug, Clone, Copy)]
pub struct HarnessConfig {
    /// Number of repeated runs per determinism check.
    pub iterations: usize,
    /// Analyzer configuration used for every run.
    pub analyzer: AnalyzerConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Sets the number of iterations.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Result of one harness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Human-readable message.
    pub message: String,
}

impl CheckResult {
    /// Creates a passing result.
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
        }
    }

    /// Creates a failing result.
    #[must_use]
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{status}] {}: {}", self.name, self.message)
    }
}

/// Harness over a child policy and optional parent.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    /// Creates a harness with the given configuration.
    #[must_use]
    pub const fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Runs every check and returns their results.
    pub fn run(&self, child: &Policy, parent: Option<&Policy>) -> Vec<CheckResult> {
        let groups = order(child, parent);
        let mut results = vec![self.check_determinism(child, parent)];
        results.extend(check_invariants(&groups));
        debug!(
            "Harness ran {} checks, {} failed",
            results.len(),
            results.iter().filter(|r| !r.passed).count()
        );
        results
    }

    /// Orders and analyzes the snapshot repeatedly and compares digests.
    pub fn check_determinism(&self, child: &Policy, parent: Option<&Policy>) -> CheckResult {
        let analyzer = Analyzer::new(self.config.analyzer);

        let hashes: Vec<Option<(u64, u64)>> = (0..self.config.iterations.max(2))
            .map(|_| {
                let groups = order(child, parent);
                let report = analyzer.analyze(&groups);
                let ordered = serde_json::to_string(&groups).ok()?;
                let analyzed = serde_json::to_string(&report).ok()?;
                Some((xxh64(ordered.as_bytes(), 0), xxh64(analyzed.as_bytes(), 0)))
            })
            .collect();

        judge_runs(&hashes)
    }
}

/// Compares per-run hashes; `None` marks a run whose output did not serialize.
fn judge_runs(hashes: &[Option<(u64, u64)>]) -> CheckResult {
    if hashes.iter().any(Option::is_none) {
        CheckResult::fail("determinism", "Output could not be serialized")
    } else if hashes.windows(2).all(|pair| pair[0] == pair[1]) {
        CheckResult::pass("determinism", "All runs produced identical output")
    } else {
        CheckResult::fail("determinism", "Runs produced different output")
    }
}

/// Checks the structural guarantees of an ordered hierarchy.
pub fn check_invariants(groups: &[ProcessedRuleCollectionGroup]) -> Vec<CheckResult> {
    vec![
        check_contiguous_orders(groups),
        check_category_precedence(groups),
        check_parent_precedence(groups),
        check_no_empty_collections(groups),
    ]
}

/// Processing orders read in emission order are exactly `1..=n`.
pub fn check_contiguous_orders(groups: &[ProcessedRuleCollectionGroup]) -> CheckResult {
    let orders: Vec<u32> = groups
        .iter()
        .flat_map(ProcessedRuleCollectionGroup::rules)
        .map(|r| r.processing_order)
        .collect();

    let mismatch = orders
        .iter()
        .zip(1u32..)
        .find(|(actual, expected)| **actual != *expected);

    match mismatch {
        None => CheckResult::pass(
            "contiguous_orders",
            format!("{} rules numbered 1..={}", orders.len(), orders.len()),
        ),
        Some((actual, expected)) => CheckResult::fail(
            "contiguous_orders",
            format!("Expected processing order {expected}, found {actual}"),
        ),
    }
}

/// Within each group, DNAT rules precede Network rules precede Application rules.
pub fn check_category_precedence(groups: &[ProcessedRuleCollectionGroup]) -> CheckResult {
    for group in groups {
        let mut last: Option<(RuleCategory, u32)> = None;
        for rule in group.rules() {
            if let Some((category, order)) = last {
                if rule.rule_category < category || rule.processing_order <= order {
                    return CheckResult::fail(
                        "category_precedence",
                        format!(
                            "Group '{}': {} rule '{}' follows a {} rule",
                            group.name,
                            rule.rule_category,
                            rule.name(),
                            category
                        ),
                    );
                }
            }
            last = Some((rule.rule_category, rule.processing_order));
        }
    }
    CheckResult::pass("category_precedence", "Categories evaluated DNAT, Network, Application")
}

/// Every parent rule precedes every child rule.
pub fn check_parent_precedence(groups: &[ProcessedRuleCollectionGroup]) -> CheckResult {
    let rules = || groups.iter().flat_map(ProcessedRuleCollectionGroup::rules);
    let last_parent = rules()
        .filter(|r| r.is_parent_policy)
        .map(|r| r.processing_order)
        .max();
    let first_child = rules()
        .filter(|r| !r.is_parent_policy)
        .map(|r| r.processing_order)
        .min();

    match (last_parent, first_child) {
        (Some(parent), Some(child)) if parent > child => CheckResult::fail(
            "parent_precedence",
            format!("Parent rule at {parent} runs after child rule at {child}"),
        ),
        _ => CheckResult::pass("parent_precedence", "Parent rules precede child rules"),
    }
}

/// No processed collection is empty.
pub fn check_no_empty_collections(groups: &[ProcessedRuleCollectionGroup]) -> CheckResult {
    let empty = groups
        .iter()
        .flat_map(|g| g.processed_collections.iter().map(move |c| (g, c)))
        .find(|(_, c)| c.rules.is_empty());

    match empty {
        Some((group, collection)) => CheckResult::fail(
            "no_empty_collections",
            format!("Group '{}' has empty collection '{}'", group.name, collection.name),
        ),
        None => CheckResult::pass("no_empty_collections", "Every collection holds rules"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    #[test]
    fn scenarios_pass_every_check() {
        let harness = Harness::default();

        for (child, parent) in [
            (scenarios::single_network_rule(), None),
            (scenarios::two_group_policy(), None),
            (scenarios::child_policy(), Some(scenarios::parent_policy())),
        ] {
            for result in harness.run(&child, parent.as_ref()) {
                assert!(result.passed, "{result}");
            }
        }
    }

    #[test]
    fn tampered_orders_are_detected() {
        let mut groups = order(&scenarios::two_group_policy(), None);
        groups[0].processed_collections[0].rules[0].processing_order = 7;

        assert!(!check_contiguous_orders(&groups).passed);
        assert!(!check_category_precedence(&groups).passed);
    }

    #[test]
    fn swapped_tiers_are_detected() {
        let mut groups = order(&scenarios::child_policy(), Some(&scenarios::parent_policy()));
        for group in &mut groups {
            group.is_parent_policy = !group.is_parent_policy;
            for collection in &mut group.processed_collections {
                for rule in &mut collection.rules {
                    rule.is_parent_policy = !rule.is_parent_policy;
                }
            }
        }

        assert!(!check_parent_precedence(&groups).passed);
    }

    #[test]
    fn unserializable_run_is_reported_as_such() {
        let later_failure = judge_runs(&[Some((1, 2)), Some((1, 2)), None]);
        assert!(!later_failure.passed);
        assert_eq!(later_failure.message, "Output could not be serialized");

        let diverged = judge_runs(&[Some((1, 2)), Some((1, 3))]);
        assert_eq!(diverged.message, "Runs produced different output");

        assert!(judge_runs(&[Some((1, 2)), Some((1, 2))]).passed);
    }

    #[test]
    fn check_result_display() {
        let result = CheckResult::fail("determinism", "Runs produced different output");
        assert_eq!(
            result.to_string(),
            "[FAIL] determinism: Runs produced different output"
        );
    }
}
