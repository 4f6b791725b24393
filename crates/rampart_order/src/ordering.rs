//! Ordering engine.

use crate::processed::{ProcessedRule, ProcessedRuleCollection, ProcessedRuleCollectionGroup};
use rampart_policy::{Policy, Rule, RuleCategory, RuleCollection, RuleCollectionGroup};
use tracing::debug;

/// Flattens a child policy (and optional parent) into the exact order the
/// firewall applies its rules.
///
/// Parent groups always precede child groups regardless of priority. All
/// sorts are stable, so equal priorities keep declaration order.
///
/// # Example
///
/// ```rust
/// use rampart_order::order;
/// use rampart_policy::{CollectionAction, NetworkRule, Policy, RuleCollection, RuleCollectionGroup};
///
/// let group = |name: &str, priority| {
///     RuleCollectionGroup::new(name, priority).with_collection(
///         RuleCollection::new("c", 100, CollectionAction::Allow).with_rule(NetworkRule::new(name)),
///     )
/// };
/// let parent = Policy::new("parent").with_group(group("from-parent", 60000));
/// let child = Policy::new("child").with_group(group("from-child", 100));
///
/// let groups = order(&child, Some(&parent));
/// assert_eq!(groups[0].name, "from-parent");
/// assert!(groups[0].is_parent_policy);
/// ```
pub fn order(child: &Policy, parent: Option<&Policy>) -> Vec<ProcessedRuleCollectionGroup> {
    let mut tiers: Vec<(&RuleCollectionGroup, bool)> = parent
        .into_iter()
        .flat_map(|p| p.rule_collection_groups.iter().map(|g| (g, true)))
        .chain(child.rule_collection_groups.iter().map(|g| (g, false)))
        .collect();

    tiers.sort_by_key(|(group, is_parent)| (u8::from(!*is_parent), group.priority));

    let mut pass = OrderingPass::new();
    let groups: Vec<_> = tiers
        .into_iter()
        .map(|(group, is_parent)| pass.process_group(group, is_parent))
        .collect();

    debug!(
        "Ordered {} groups into {} rules",
        groups.len(),
        pass.emitted()
    );
    groups
}

/// State of a single ordering pass. Owns the global processing counter.
struct OrderingPass {
    next_order: u32,
}

impl OrderingPass {
    const fn new() -> Self {
        Self { next_order: 1 }
    }

    const fn emitted(&self) -> u32 {
        self.next_order - 1
    }

    fn process_group(
        &mut self,
        group: &RuleCollectionGroup,
        is_parent: bool,
    ) -> ProcessedRuleCollectionGroup {
        let mut processed_collections = Vec::new();

        for category in RuleCategory::ORDERED {
            let mut bucket: Vec<&RuleCollection> = group
                .rule_collections
                .iter()
                .filter(|c| c.has_category(category))
                .collect();
            bucket.sort_by_key(|c| c.priority);

            debug!(
                "Group '{}' {} bucket: {} collections",
                group.name,
                category,
                bucket.len()
            );

            for collection in bucket {
                let rules: Vec<ProcessedRule> = collection
                    .rules
                    .iter()
                    .filter(|r| r.category() == category)
                    .map(|rule| self.emit(group, collection, rule, is_parent))
                    .collect();

                if rules.is_empty() {
                    continue;
                }

                processed_collections.push(ProcessedRuleCollection {
                    name: collection.name.clone(),
                    priority: collection.priority,
                    action: collection.action,
                    rule_category: category,
                    rules,
                });
            }
        }

        ProcessedRuleCollectionGroup {
            name: group.name.clone(),
            priority: group.priority,
            is_parent_policy: is_parent,
            processed_collections,
        }
    }

    fn emit(
        &mut self,
        group: &RuleCollectionGroup,
        collection: &RuleCollection,
        rule: &Rule,
        is_parent: bool,
    ) -> ProcessedRule {
        let processing_order = self.next_order;
        self.next_order += 1;

        ProcessedRule {
            id: format!(
                "{}/{}/{}#{processing_order}",
                group.name,
                collection.name,
                rule.name()
            ),
            rule: rule.clone(),
            rule_collection_name: collection.name.clone(),
            rule_collection_group_name: group.name.clone(),
            processing_order,
            rule_category: rule.category(),
            group_priority: group.priority,
            collection_priority: collection.priority,
            is_parent_policy: is_parent,
            action: collection.action,
        }
    }
}
