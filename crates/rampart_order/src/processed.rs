//! Processed (ordered) hierarchy.
//!
//! These types are produced fresh by each ordering pass and never mutated
//! afterwards.

use rampart_policy::{CollectionAction, Rule, RuleCategory};
use serde::{Deserialize, Serialize};

/// A rule annotated with the position at which the firewall evaluates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRule {
    /// Synthetic identifier, unique within one ordered output.
    pub id: String,
    /// The original rule.
    pub rule: Rule,
    /// Owning collection name.
    pub rule_collection_name: String,
    /// Owning group name.
    pub rule_collection_group_name: String,
    /// Global evaluation rank, starting at 1.
    pub processing_order: u32,
    /// Category bucket the rule was processed in.
    pub rule_category: RuleCategory,
    /// Priority of the owning group.
    pub group_priority: u32,
    /// Priority of the owning collection.
    pub collection_priority: u32,
    /// Whether the rule comes from the parent policy.
    pub is_parent_policy: bool,
    /// Declared action of the owning collection.
    pub action: CollectionAction,
}

/// A collection holding only the processed rules of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRuleCollection {
    /// Collection name.
    pub name: String,
    /// Collection priority.
    pub priority: u32,
    /// Declared collection action.
    pub action: CollectionAction,
    /// Category of every rule in `rules`.
    pub rule_category: RuleCategory,
    /// Processed rules in evaluation order.
    pub rules: Vec<ProcessedRule>,
}

/// A group with its collections re-materialized in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRuleCollectionGroup {
    /// Group name.
    pub name: String,
    /// Group priority.
    pub priority: u32,
    /// Whether the group comes from the parent policy.
    pub is_parent_policy: bool,
    /// DNAT collections, then Network, then Application.
    pub processed_collections: Vec<ProcessedRuleCollection>,
}

impl ProcessedRule {
    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.rule.name()
    }
}

impl ProcessedRuleCollectionGroup {
    /// Iterates over all processed rules of this group in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &ProcessedRule> {
        self.processed_collections.iter().flat_map(|c| c.rules.iter())
    }
}
