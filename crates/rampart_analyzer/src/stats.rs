//! Aggregate statistics over an ordered policy and its findings.

use crate::conflicts::{Conflict, ConflictSeverity};
use crate::fingerprint::{DuplicateGroup, DuplicateKind};
use rampart_order::{query, ProcessedRuleCollectionGroup};
use rampart_policy::RuleCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive min/max of a set of priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRange {
    /// Lowest priority seen.
    pub min: u32,
    /// Highest priority seen.
    pub max: u32,
}

impl PriorityRange {
    fn of(priorities: impl IntoIterator<Item = u32>) -> Option<Self> {
        priorities.into_iter().fold(None, |range, p| {
            Some(match range {
                None => Self { min: p, max: p },
                Some(Self { min, max }) => Self {
                    min: min.min(p),
                    max: max.max(p),
                },
            })
        })
    }
}

/// Summary counts for one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of processed rules.
    pub total_rules: usize,
    /// Number of processed groups.
    pub total_groups: usize,
    /// Number of processed collections.
    pub total_collections: usize,
    /// Rule count per category; every category is present.
    pub rules_by_category: BTreeMap<RuleCategory, usize>,
    /// Groups originating from the parent policy.
    pub parent_groups: usize,
    /// Groups originating from the child policy.
    pub child_groups: usize,
    /// Priority range of groups.
    pub group_priority_range: Option<PriorityRange>,
    /// Priority range of processed collections.
    pub collection_priority_range: Option<PriorityRange>,
    /// Number of duplicate groups.
    pub duplicate_groups: usize,
    /// Number of duplicate groups classified as exact.
    pub exact_duplicates: usize,
    /// Conflict count per severity.
    pub conflicts_by_severity: BTreeMap<ConflictSeverity, usize>,
}

impl Statistics {
    /// Computes statistics for an ordered hierarchy and its findings.
    #[must_use]
    pub fn compute(
        groups: &[ProcessedRuleCollectionGroup],
        duplicates: &[DuplicateGroup],
        conflicts: &[Conflict],
    ) -> Self {
        let mut rules_by_category: BTreeMap<RuleCategory, usize> =
            RuleCategory::ORDERED.iter().map(|&c| (c, 0)).collect();
        for rule in groups.iter().flat_map(ProcessedRuleCollectionGroup::rules) {
            *rules_by_category.entry(rule.rule_category).or_default() += 1;
        }

        let mut conflicts_by_severity = BTreeMap::new();
        for conflict in conflicts {
            *conflicts_by_severity.entry(conflict.severity).or_default() += 1;
        }

        let parent_groups = groups.iter().filter(|g| g.is_parent_policy).count();

        Self {
            total_rules: query::rule_count(groups),
            total_groups: groups.len(),
            total_collections: query::collection_count(groups),
            rules_by_category,
            parent_groups,
            child_groups: groups.len() - parent_groups,
            group_priority_range: PriorityRange::of(groups.iter().map(|g| g.priority)),
            collection_priority_range: PriorityRange::of(
                groups
                    .iter()
                    .flat_map(|g| &g.processed_collections)
                    .map(|c| c.priority),
            ),
            duplicate_groups: duplicates.len(),
            exact_duplicates: duplicates
                .iter()
                .filter(|d| d.kind == DuplicateKind::ExactDuplicate)
                .count(),
            conflicts_by_severity,
        }
    }

    /// Rule count for one category.
    #[must_use]
    pub fn rules_in(&self, category: RuleCategory) -> usize {
        self.rules_by_category.get(&category).copied().unwrap_or(0)
    }
}
