//! Rule fingerprints and duplicate clustering.

use crate::traffic::TrafficSelector;
use rampart_order::ProcessedRule;
use rampart_policy::RuleCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Order-independent signature of a rule's traffic-matching fields.
///
/// The rule kind is part of the key, so rules of different kinds never
/// share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    /// Rule kind.
    pub kind: RuleCategory,
    /// Normalized traffic fields.
    pub traffic: TrafficSelector,
}

impl Fingerprint {
    /// Computes the fingerprint of a processed rule.
    #[must_use]
    pub fn of(rule: &ProcessedRule) -> Self {
        Self {
            kind: rule.rule.category(),
            traffic: TrafficSelector::of(&rule.rule),
        }
    }
}

/// How closely the members of a duplicate group match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// Same traffic, same rule name, same collection.
    ExactDuplicate,
    /// Same traffic under different names or collections.
    SimilarRules,
}

/// Two or more rules sharing a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    /// Shared fingerprint.
    pub fingerprint: Fingerprint,
    /// Classification.
    pub kind: DuplicateKind,
    /// Members in processing order.
    pub rules: Vec<ProcessedRule>,
}

impl DuplicateGroup {
    /// Processing order of the first member.
    #[must_use]
    pub fn first_order(&self) -> u32 {
        self.rules.first().map_or(0, |r| r.processing_order)
    }
}

/// Groups rules by fingerprint and returns every group with two or more
/// members, ordered by the processing order of each group's first member.
pub fn find_duplicates(rules: &[&ProcessedRule]) -> Vec<DuplicateGroup> {
    let mut sorted: Vec<&ProcessedRule> = rules.to_vec();
    sorted.sort_by_key(|r| r.processing_order);

    let mut index: HashMap<Fingerprint, usize> = HashMap::new();
    let mut clusters: Vec<(Fingerprint, Vec<&ProcessedRule>)> = Vec::new();

    for rule in sorted {
        let fingerprint = Fingerprint::of(rule);
        if let Some(&slot) = index.get(&fingerprint) {
            clusters[slot].1.push(rule);
        } else {
            index.insert(fingerprint.clone(), clusters.len());
            clusters.push((fingerprint, vec![rule]));
        }
    }

    let groups: Vec<DuplicateGroup> = clusters
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(fingerprint, members)| DuplicateGroup {
            fingerprint,
            kind: classify(&members),
            rules: members.into_iter().cloned().collect(),
        })
        .collect();

    debug!("Found {} duplicate groups among {} rules", groups.len(), rules.len());
    groups
}

fn classify(members: &[&ProcessedRule]) -> DuplicateKind {
    let first = members[0];
    let identical = members.iter().all(|r| {
        r.name() == first.name() && r.rule_collection_name == first.rule_collection_name
    });
    if identical {
        DuplicateKind::ExactDuplicate
    } else {
        DuplicateKind::SimilarRules
    }
}
