//! Hand-built policy snapshots with known ordering outcomes.

use rampart_policy::{
    ApplicationRule, CollectionAction, NatRule, NetworkRule, Policy, RuleCollection,
    RuleCollectionGroup,
};

/// One group holding one Network collection with a single HTTP rule.
pub fn single_network_rule() -> Policy {
    Policy::new("single").with_group(
        RuleCollectionGroup::new("DefaultGroup", 200).with_collection(
            RuleCollection::new("WebTraffic", 1000, CollectionAction::Allow).with_rule(
                NetworkRule::new("AllowHTTP")
                    .with_protocols(["TCP"])
                    .with_sources(["10.0.0.0/8"])
                    .with_destinations(["*"])
                    .with_ports(["80"]),
            ),
        ),
    )
}

/// A high-priority group with every rule kind and a low-priority deny group.
///
/// Orders to NAT, Network, Network, Application, Network(deny).
pub fn two_group_policy() -> Policy {
    let high = RuleCollectionGroup::new("HighPriorityGroup", 100)
        .with_collection(
            RuleCollection::new("InboundNat", 100, CollectionAction::Dnat).with_rule(
                NatRule::new("PublishWeb")
                    .with_protocols(["TCP"])
                    .with_sources(["*"])
                    .with_destinations(["203.0.113.10"])
                    .with_ports(["443"])
                    .translate_to("10.0.1.10", "443"),
            ),
        )
        .with_collection(
            RuleCollection::new("CoreNetwork", 200, CollectionAction::Allow)
                .with_rule(
                    NetworkRule::new("AllowDNS")
                        .with_protocols(["UDP"])
                        .with_sources(["10.0.0.0/8"])
                        .with_destinations(["168.63.129.16"])
                        .with_ports(["53"]),
                )
                .with_rule(
                    NetworkRule::new("AllowNTP")
                        .with_protocols(["UDP"])
                        .with_sources(["10.0.0.0/8"])
                        .with_destinations(["*"])
                        .with_ports(["123"]),
                ),
        )
        .with_collection(
            RuleCollection::new("WebAccess", 300, CollectionAction::Allow).with_rule(
                ApplicationRule::new("AllowUpdates")
                    .with_protocol("Https", 443)
                    .with_sources(["10.0.0.0/8"])
                    .with_target_fqdns(["*.windowsupdate.com"]),
            ),
        );

    let low = RuleCollectionGroup::new("LowPriorityGroup", 1000).with_collection(
        RuleCollection::new("Blocklist", 100, CollectionAction::Deny).with_rule(
            NetworkRule::new("DenyTelnet")
                .with_protocols(["TCP"])
                .with_sources(["*"])
                .with_destinations(["*"])
                .with_ports(["23"]),
        ),
    );

    Policy::new("two-groups").with_group(low).with_group(high)
}

/// Parent policy whose baseline must run before any child rule.
pub fn parent_policy() -> Policy {
    Policy::new("parent").with_group(
        RuleCollectionGroup::new("Baseline", 5000).with_collection(
            RuleCollection::new("Guardrails", 100, CollectionAction::Deny).with_rule(
                NetworkRule::new("DenySMB")
                    .with_protocols(["TCP"])
                    .with_sources(["*"])
                    .with_destinations(["*"])
                    .with_ports(["445"]),
            ),
        ),
    )
}

/// Child policy whose numerically smaller priority still runs after the parent.
pub fn child_policy() -> Policy {
    Policy::new("child").with_group(
        RuleCollectionGroup::new("Workload", 100).with_collection(
            RuleCollection::new("AppTraffic", 100, CollectionAction::Allow)
                .with_rule(
                    NetworkRule::new("AllowSMB")
                        .with_protocols(["TCP"])
                        .with_sources(["10.1.0.0/16"])
                        .with_destinations(["10.2.0.4"])
                        .with_ports(["445"]),
                )
                .with_rule(
                    ApplicationRule::new("AllowGitHub")
                        .with_protocol("Https", 443)
                        .with_sources(["10.1.0.0/16"])
                        .with_target_fqdns(["github.com"]),
                ),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_analyzer::{analyze, ConflictType};
    use rampart_order::{order, query};
    use rampart_policy::RuleCategory;

    #[test]
    fn single_rule_gets_order_one() {
        let groups = order(&single_network_rule(), None);
        let rules = query::flatten(&groups);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].processing_order, 1);
        assert_eq!(rules[0].rule_category, RuleCategory::Network);
        assert_eq!(rules[0].name(), "AllowHTTP");
    }

    #[test]
    fn two_groups_order_by_priority_then_category() {
        let groups = order(&two_group_policy(), None);
        let rules = query::flatten(&groups);

        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["PublishWeb", "AllowDNS", "AllowNTP", "AllowUpdates", "DenyTelnet"]
        );

        let orders: Vec<_> = rules.iter().map(|r| r.processing_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);

        let report = analyze(&groups);
        assert_eq!(report.statistics.rules_in(RuleCategory::Dnat), 1);
        assert_eq!(report.statistics.rules_in(RuleCategory::Network), 3);
        assert_eq!(report.statistics.rules_in(RuleCategory::Application), 1);
    }

    #[test]
    fn parent_baseline_shadows_child_workload() {
        let groups = order(&child_policy(), Some(&parent_policy()));
        let rules = query::flatten(&groups);

        assert_eq!(rules[0].name(), "DenySMB");
        assert!(rules[0].is_parent_policy);

        let report = analyze(&groups);
        assert_eq!(report.conflicts.len(), 1);
        let conflict = &report.conflicts[0];
        assert_eq!(conflict.conflict_type, ConflictType::AllowDenyConflict);
        assert_eq!(conflict.primary.name(), "DenySMB");
        assert_eq!(conflict.conflicting.name(), "AllowSMB");
    }
}
