//! Consistency checks over ordered output.

use crate::result::{ValidationWarning, WarningKind};
use rampart_order::{ProcessedRule, ProcessedRuleCollectionGroup};
use std::collections::BTreeMap;

/// Warns once for every priority value shared by two or more groups.
pub fn check_duplicate_priorities(
    groups: &[ProcessedRuleCollectionGroup],
) -> Vec<ValidationWarning> {
    let mut by_priority: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for group in groups {
        by_priority.entry(group.priority).or_default().push(&group.name);
    }

    by_priority
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(priority, names)| {
            ValidationWarning::new(
                WarningKind::DuplicatePriority,
                format!("Groups {} share priority {priority}", quoted(&names)),
            )
        })
        .collect()
}

/// Warns for every adjacent pair whose processing orders are not consecutive.
///
/// `rules` must already be sorted by processing order.
pub fn check_processing_gaps(rules: &[&ProcessedRule]) -> Vec<ValidationWarning> {
    rules
        .windows(2)
        .filter(|pair| pair[0].processing_order.checked_add(1) != Some(pair[1].processing_order))
        .map(|pair| {
            ValidationWarning::new(
                WarningKind::ProcessingGap,
                format!(
                    "Processing order jumps from {} ('{}') to {} ('{}')",
                    pair[0].processing_order,
                    pair[0].name(),
                    pair[1].processing_order,
                    pair[1].name()
                ),
            )
        })
        .collect()
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_order::query::{flatten, retain_category};
    use rampart_order::order;
    use rampart_policy::{
        ApplicationRule, CollectionAction, NetworkRule, Policy, RuleCategory, RuleCollection,
        RuleCollectionGroup,
    };

    fn group(name: &str, priority: u32) -> RuleCollectionGroup {
        RuleCollectionGroup::new(name, priority).with_collection(
            RuleCollection::new("c", 100, CollectionAction::Allow)
                .with_rule(NetworkRule::new(format!("{name}-net")))
                .with_rule(ApplicationRule::new(format!("{name}-app"))),
        )
    }

    #[test]
    fn shared_priority_is_reported_once() {
        let policy = Policy::new("p")
            .with_group(group("a", 100))
            .with_group(group("b", 100))
            .with_group(group("c", 100))
            .with_group(group("d", 200));

        let warnings = check_duplicate_priorities(&order(&policy, None));

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DuplicatePriority);
        assert!(warnings[0].message.contains("'a', 'b', 'c'"));
        assert!(warnings[0].message.contains("priority 100"));
    }

    #[test]
    fn parent_and_child_sharing_priority_is_reported() {
        let parent = Policy::new("parent").with_group(group("base", 100));
        let child = Policy::new("child").with_group(group("app", 100));

        let warnings = check_duplicate_priorities(&order(&child, Some(&parent)));

        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn engine_output_has_no_gaps() {
        let policy = Policy::new("p")
            .with_group(group("a", 100))
            .with_group(group("b", 200));
        let groups = order(&policy, None);

        assert!(check_processing_gaps(&flatten(&groups)).is_empty());
    }

    #[test]
    fn filtered_view_has_gaps() {
        let policy = Policy::new("p")
            .with_group(group("a", 100))
            .with_group(group("b", 200));
        let groups = order(&policy, None);
        let network = retain_category(&groups, RuleCategory::Network);

        let warnings = check_processing_gaps(&flatten(&network));

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ProcessingGap);
        assert!(warnings[0].message.contains("from 1 ('a-net') to 3 ('b-net')"));
    }

    #[test]
    fn orders_at_the_top_of_the_range() {
        let policy = Policy::new("p").with_group(group("a", 100));
        let mut groups = order(&policy, None);
        let set_orders = |groups: &mut [ProcessedRuleCollectionGroup], orders: [u32; 2]| {
            let rules = &mut groups[0].processed_collections;
            rules[0].rules[0].processing_order = orders[0];
            rules[1].rules[0].processing_order = orders[1];
        };

        set_orders(&mut groups, [u32::MAX - 1, u32::MAX]);
        assert!(check_processing_gaps(&flatten(&groups)).is_empty());

        set_orders(&mut groups, [u32::MAX, u32::MAX]);
        let warnings = check_processing_gaps(&flatten(&groups));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ProcessingGap);
    }
}
