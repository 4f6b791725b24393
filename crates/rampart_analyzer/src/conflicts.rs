//! Pairwise conflict detection.
//!
//! Only rules of the same kind are compared. The scan is quadratic in the
//! size of each kind's bucket; policies with a few hundred rules per kind
//! are the intended scale.

use crate::fingerprint::Fingerprint;
use rampart_order::ProcessedRule;
use rampart_policy::{CollectionAction, RuleCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Where the Allow/Deny action of a rule comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// The declared action of the owning collection.
    #[default]
    Declared,
    /// Guessed from the rule and collection names ("deny"/"block" → Deny).
    Inferred,
}

/// Kind of relationship between two overlapping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// One rule allows what the other denies.
    AllowDenyConflict,
    /// Identical traffic; the later rule can never be reached.
    PriorityConflict,
    /// Partially overlapping traffic with the same outcome.
    OverlappingRules,
}

/// Conflict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    /// Contradictory outcome.
    High,
    /// Unreachable rule.
    Medium,
    /// Ambiguous but not necessarily wrong.
    Low,
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// An ordered pair of same-kind rules with overlapping traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The rule evaluated first.
    pub primary: ProcessedRule,
    /// The rule evaluated later.
    pub conflicting: ProcessedRule,
    /// Relationship between the two.
    pub conflict_type: ConflictType,
    /// Severity of the relationship.
    pub severity: ConflictSeverity,
    /// Human-readable description.
    pub description: String,
}

impl Conflict {
    fn new(
        primary: &ProcessedRule,
        conflicting: &ProcessedRule,
        conflict_type: ConflictType,
    ) -> Self {
        let (severity, description) = match conflict_type {
            ConflictType::AllowDenyConflict => (
                ConflictSeverity::High,
                format!(
                    "Rules '{}' and '{}' match the same traffic with contradictory actions",
                    primary.name(),
                    conflicting.name()
                ),
            ),
            ConflictType::PriorityConflict => (
                ConflictSeverity::Medium,
                format!(
                    "Rule '{}' is unreachable: '{}' matches identical traffic earlier",
                    conflicting.name(),
                    primary.name()
                ),
            ),
            ConflictType::OverlappingRules => (
                ConflictSeverity::Low,
                format!(
                    "Rules '{}' and '{}' have overlapping traffic",
                    primary.name(),
                    conflicting.name()
                ),
            ),
        };

        Self {
            primary: primary.clone(),
            conflicting: conflicting.clone(),
            conflict_type,
            severity,
            description,
        }
    }
}

/// Pairwise conflict detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector {
    action_source: ActionSource,
}

impl ConflictDetector {
    /// Creates a detector reading actions from `action_source`.
    #[must_use]
    pub const fn new(action_source: ActionSource) -> Self {
        Self { action_source }
    }

    /// Finds every conflicting pair among `rules`.
    ///
    /// Conflicts are returned ordered by the processing order of the primary
    /// rule, then of the conflicting rule.
    pub fn find_conflicts(&self, rules: &[&ProcessedRule]) -> Vec<Conflict> {
        let mut buckets: BTreeMap<RuleCategory, Vec<(&ProcessedRule, Fingerprint)>> =
            BTreeMap::new();
        for &rule in rules {
            buckets
                .entry(rule.rule.category())
                .or_default()
                .push((rule, Fingerprint::of(rule)));
        }

        let mut conflicts = Vec::new();
        for (category, mut bucket) in buckets {
            bucket.sort_by_key(|(r, _)| r.processing_order);

            for (i, (earlier, earlier_fp)) in bucket.iter().enumerate() {
                for (later, later_fp) in bucket.iter().skip(i + 1) {
                    if let Some(conflict) =
                        self.classify(category, (*earlier, earlier_fp), (*later, later_fp))
                    {
                        conflicts.push(conflict);
                    }
                }
            }
        }

        conflicts.sort_by_key(|c| (c.primary.processing_order, c.conflicting.processing_order));

        for conflict in conflicts
            .iter()
            .filter(|c| c.severity == ConflictSeverity::High)
        {
            warn!("[{}] {}", conflict.severity, conflict.description);
        }

        conflicts
    }

    fn classify(
        &self,
        category: RuleCategory,
        (earlier, earlier_fp): (&ProcessedRule, &Fingerprint),
        (later, later_fp): (&ProcessedRule, &Fingerprint),
    ) -> Option<Conflict> {
        if !earlier_fp.traffic.overlaps(&later_fp.traffic) {
            return None;
        }

        let filters_traffic = matches!(category, RuleCategory::Network | RuleCategory::Application);
        if filters_traffic && self.action_of(earlier) != self.action_of(later) {
            return Some(Conflict::new(earlier, later, ConflictType::AllowDenyConflict));
        }

        if earlier_fp == later_fp && earlier.processing_order < later.processing_order {
            return Some(Conflict::new(earlier, later, ConflictType::PriorityConflict));
        }

        Some(Conflict::new(earlier, later, ConflictType::OverlappingRules))
    }

    fn action_of(&self, rule: &ProcessedRule) -> CollectionAction {
        match self.action_source {
            ActionSource::Declared => rule.action,
            ActionSource::Inferred => infer_action(rule),
        }
    }
}

/// Finds conflicts using the declared collection actions.
pub fn find_conflicts(rules: &[&ProcessedRule]) -> Vec<Conflict> {
    ConflictDetector::default().find_conflicts(rules)
}

/// Guesses a rule's action from naming conventions.
pub fn infer_action(rule: &ProcessedRule) -> CollectionAction {
    let looks_denying = |name: &str| {
        let lower = name.to_lowercase();
        lower.contains("deny") || lower.contains("block")
    };

    if looks_denying(rule.name()) || looks_denying(&rule.rule_collection_name) {
        CollectionAction::Deny
    } else {
        CollectionAction::Allow
    }
}
