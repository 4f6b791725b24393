//! Read-only helpers over an ordered hierarchy.

use crate::processed::{ProcessedRule, ProcessedRuleCollectionGroup};
use rampart_policy::RuleCategory;

/// Returns every processed rule sorted by processing order.
pub fn flatten(groups: &[ProcessedRuleCollectionGroup]) -> Vec<&ProcessedRule> {
    let mut rules: Vec<&ProcessedRule> = groups
        .iter()
        .flat_map(ProcessedRuleCollectionGroup::rules)
        .collect();
    rules.sort_by_key(|r| r.processing_order);
    rules
}

/// Returns the rules of one category sorted by processing order.
pub fn rules_in_category(
    groups: &[ProcessedRuleCollectionGroup],
    category: RuleCategory,
) -> Vec<&ProcessedRule> {
    flatten(groups)
        .into_iter()
        .filter(|r| r.rule_category == category)
        .collect()
}

/// Looks up a rule by its synthetic id.
pub fn find_rule<'a>(
    groups: &'a [ProcessedRuleCollectionGroup],
    id: &str,
) -> Option<&'a ProcessedRule> {
    groups
        .iter()
        .flat_map(ProcessedRuleCollectionGroup::rules)
        .find(|r| r.id == id)
}

/// Returns a copy of the hierarchy keeping only collections of `category`.
///
/// Processing orders are left untouched, so the result usually has gaps.
#[must_use]
pub fn retain_category(
    groups: &[ProcessedRuleCollectionGroup],
    category: RuleCategory,
) -> Vec<ProcessedRuleCollectionGroup> {
    groups
        .iter()
        .map(|group| ProcessedRuleCollectionGroup {
            processed_collections: group
                .processed_collections
                .iter()
                .filter(|c| c.rule_category == category)
                .cloned()
                .collect(),
            ..group.clone()
        })
        .collect()
}

/// Total number of processed rules.
pub fn rule_count(groups: &[ProcessedRuleCollectionGroup]) -> usize {
    groups
        .iter()
        .flat_map(|g| &g.processed_collections)
        .map(|c| c.rules.len())
        .sum()
}

/// Total number of processed collections.
pub fn collection_count(groups: &[ProcessedRuleCollectionGroup]) -> usize {
    groups.iter().map(|g| g.processed_collections.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::order;
    use rampart_policy::{
        ApplicationRule, CollectionAction, NatRule, NetworkRule, Policy, RuleCollection,
        RuleCollectionGroup,
    };

    fn sample_groups() -> Vec<ProcessedRuleCollectionGroup> {
        let policy = Policy::new("p")
            .with_group(
                RuleCollectionGroup::new("late", 500).with_collection(
                    RuleCollection::new("net", 100, CollectionAction::Deny)
                        .with_rule(NetworkRule::new("DenyRest")),
                ),
            )
            .with_group(
                RuleCollectionGroup::new("early", 100)
                    .with_collection(
                        RuleCollection::new("mixed", 200, CollectionAction::Allow)
                            .with_rule(NetworkRule::new("AllowDNS"))
                            .with_rule(ApplicationRule::new("AllowWeb")),
                    )
                    .with_collection(
                        RuleCollection::new("dnat", 100, CollectionAction::Dnat)
                            .with_rule(NatRule::new("Inbound")),
                    ),
            );
        order(&policy, None)
    }

    #[test]
    fn flatten_is_sorted() {
        let groups = sample_groups();
        let rules = flatten(&groups);

        let orders: Vec<_> = rules.iter().map(|r| r.processing_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert_eq!(rules[3].name(), "DenyRest");
    }

    #[test]
    fn filter_by_category() {
        let groups = sample_groups();
        let network = rules_in_category(&groups, RuleCategory::Network);

        let names: Vec<_> = network.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["AllowDNS", "DenyRest"]);
        assert_eq!(rules_in_category(&groups, RuleCategory::Dnat).len(), 1);
    }

    #[test]
    fn lookup_by_id() {
        let groups = sample_groups();
        let rule = find_rule(&groups, "early/mixed/AllowWeb#3").unwrap();

        assert_eq!(rule.rule_category, RuleCategory::Application);
        assert!(find_rule(&groups, "missing").is_none());
    }

    #[test]
    fn retained_view_keeps_original_orders() {
        let groups = sample_groups();
        let network = retain_category(&groups, RuleCategory::Network);

        assert_eq!(network.len(), 2);
        assert_eq!(collection_count(&network), 2);
        let orders: Vec<_> = flatten(&network).iter().map(|r| r.processing_order).collect();
        assert_eq!(orders, vec![2, 4]);
    }

    #[test]
    fn counts() {
        let groups = sample_groups();
        assert_eq!(rule_count(&groups), 4);
        assert_eq!(collection_count(&groups), 4);
    }
}
