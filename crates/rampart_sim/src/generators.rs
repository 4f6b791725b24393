//! Property-based generators for synthetic policy snapshots.
//!
//! Uses proptest strategies to generate:
//! - Rules of every kind drawn from a small address/port pool, so overlaps
//!   and duplicates actually occur
//! - Collections with actions matching their rule kinds
//! - Groups and policies with colliding priorities

use proptest::prelude::*;
use rampart_policy::{
    ApplicationRule, CollectionAction, NatRule, NetworkRule, Policy, Rule, RuleCollection,
    RuleCollectionGroup,
};

/// Strategy for generating rule and collection names.
///
/// # Panics
///
/// Panics if the internal regex is invalid (should never happen).
pub fn rule_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-zA-Z0-9]{2,15}").expect("valid regex")
}

/// Strategy for generating source/destination addresses.
pub fn address() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("*".to_string()),
        4 => (0u8..4).prop_map(|n| format!("10.{n}.0.0/16")),
        2 => (1u8..5).prop_map(|n| format!("192.168.1.{n}")),
    ]
}

/// Strategy for generating destination ports.
pub fn port() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(vec!["22", "53", "80", "443", "3389"]).prop_map(String::from),
        1 => Just("*".to_string()),
        1 => Just("8000-8080".to_string()),
    ]
}

/// Strategy for generating IP protocols.
pub fn ip_protocol() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["TCP", "UDP", "ICMP", "Any"]).prop_map(String::from)
}

/// Strategy for generating FQDNs.
pub fn fqdn() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "github.com",
        "*.microsoft.com",
        "api.example.org",
        "login.example.org",
    ])
    .prop_map(String::from)
}

/// Strategy for generating priorities in the range the platform accepts.
pub fn priority() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => prop::sample::select(vec![100u32, 200, 1000]),
        1 => 100u32..=65000,
    ]
}

fn few<T: std::fmt::Debug>(
    strategy: impl Strategy<Value = T>,
) -> impl Strategy<Value = Vec<T>> {
    prop::collection::vec(strategy, 0..3)
}

/// Strategy for generating NAT rules.
pub fn nat_rule() -> impl Strategy<Value = NatRule> {
    (rule_name(), few(ip_protocol()), few(address()), address(), port()).prop_map(
        |(name, protocols, sources, destination, port)| {
            NatRule::new(name)
                .with_protocols(protocols)
                .with_sources(sources)
                .with_destinations([destination])
                .with_ports([port.clone()])
                .translate_to("10.0.0.4", port)
        },
    )
}

/// Strategy for generating Network rules.
pub fn network_rule() -> impl Strategy<Value = NetworkRule> {
    (
        rule_name(),
        few(ip_protocol()),
        few(address()),
        few(address()),
        few(fqdn()),
        few(port()),
    )
        .prop_map(|(name, protocols, sources, destinations, fqdns, ports)| {
            NetworkRule::new(name)
                .with_protocols(protocols)
                .with_sources(sources)
                .with_destinations(destinations)
                .with_fqdns(fqdns)
                .with_ports(ports)
        })
}

/// Strategy for generating Application rules.
pub fn application_rule() -> impl Strategy<Value = ApplicationRule> {
    (
        rule_name(),
        prop::sample::select(vec![("Http", 80u16), ("Https", 443)]),
        few(address()),
        prop::collection::vec(fqdn(), 1..3),
    )
        .prop_map(|(name, (protocol, port), sources, fqdns)| {
            ApplicationRule::new(name)
                .with_protocol(protocol, port)
                .with_sources(sources)
                .with_target_fqdns(fqdns)
        })
}

/// Strategy for generating rules of any kind.
pub fn rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        1 => nat_rule().prop_map(Rule::from),
        3 => network_rule().prop_map(Rule::from),
        2 => application_rule().prop_map(Rule::from),
    ]
}

/// Strategy for generating rule collections.
///
/// Collections holding a NAT rule are DNAT collections; the rest are Allow
/// or Deny. Mixed-kind collections are generated on purpose.
pub fn rule_collection() -> impl Strategy<Value = RuleCollection> {
    (
        rule_name(),
        priority(),
        any::<bool>(),
        prop::collection::vec(rule(), 0..5),
    )
        .prop_map(|(name, priority, deny, rules)| {
            let action = if rules.iter().any(|r| matches!(r, Rule::Nat(_))) {
                CollectionAction::Dnat
            } else if deny {
                CollectionAction::Deny
            } else {
                CollectionAction::Allow
            };
            rules
                .into_iter()
                .fold(RuleCollection::new(name, priority, action), |c, r| c.with_rule(r))
        })
}

/// Strategy for generating rule collection groups.
pub fn rule_collection_group() -> impl Strategy<Value = RuleCollectionGroup> {
    (
        rule_name(),
        priority(),
        prop::collection::vec(rule_collection(), 0..4),
    )
        .prop_map(|(name, priority, collections)| {
            collections.into_iter().fold(
                RuleCollectionGroup::new(name, priority),
                RuleCollectionGroup::with_collection,
            )
        })
}

/// Strategy for generating policies.
pub fn policy() -> impl Strategy<Value = Policy> {
    (rule_name(), prop::collection::vec(rule_collection_group(), 0..4)).prop_map(
        |(name, groups)| {
            groups
                .into_iter()
                .fold(Policy::new(name), Policy::with_group)
        },
    )
}

/// Strategy for generating a child policy with an optional parent.
pub fn policy_pair() -> impl Strategy<Value = (Policy, Option<Policy>)> {
    (policy(), prop::option::of(policy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{self, Harness, HarnessConfig};
    use rampart_analyzer::{analyze, DuplicateKind};
    use rampart_order::{digest, order, query};
    use rampart_policy::{parse, serialize, RuleCategory};

    proptest! {
        #[test]
        fn ordering_is_deterministic((child, parent) in policy_pair()) {
            let first = digest(&order(&child, parent.as_ref())).unwrap();
            let second = digest(&order(&child, parent.as_ref())).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn structural_guarantees_hold((child, parent) in policy_pair()) {
            let groups = order(&child, parent.as_ref());
            for result in harness::check_invariants(&groups) {
                prop_assert!(result.passed, "{}", result);
            }
        }

        #[test]
        fn every_rule_is_emitted_once((child, parent) in policy_pair()) {
            let groups = order(&child, parent.as_ref());
            let expected = child.rule_count() + parent.as_ref().map_or(0, Policy::rule_count);

            prop_assert_eq!(query::rule_count(&groups), expected);
        }

        #[test]
        fn every_group_is_emitted((child, parent) in policy_pair()) {
            let groups = order(&child, parent.as_ref());
            let expected = child.rule_collection_groups.len()
                + parent.as_ref().map_or(0, |p| p.rule_collection_groups.len());

            prop_assert_eq!(groups.len(), expected);
        }

        #[test]
        fn groups_are_sorted_by_tier_then_priority((child, parent) in policy_pair()) {
            let groups = order(&child, parent.as_ref());
            let keys: Vec<_> = groups
                .iter()
                .map(|g| (!g.is_parent_policy, g.priority))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();

            prop_assert_eq!(keys, sorted);
        }

        #[test]
        fn collections_are_single_kind_and_sorted(policy in policy()) {
            for group in order(&policy, None) {
                let mut last = (RuleCategory::Dnat, 0);
                for collection in &group.processed_collections {
                    let key = (collection.rule_category, collection.priority);
                    prop_assert!(key >= last);
                    last = key;
                    for rule in &collection.rules {
                        prop_assert_eq!(rule.rule_category, collection.rule_category);
                    }
                }
            }
        }

        #[test]
        fn duplicates_share_kind_and_order_ascends(policy in policy()) {
            let report = analyze(&order(&policy, None));
            for duplicate in &report.duplicates {
                prop_assert!(duplicate.rules.len() >= 2);
                let first = &duplicate.rules[0];
                let identical = duplicate.rules.iter().all(|r| {
                    r.name() == first.name() && r.rule_collection_name == first.rule_collection_name
                });
                prop_assert_eq!(duplicate.kind == DuplicateKind::ExactDuplicate, identical);
                for pair in duplicate.rules.windows(2) {
                    prop_assert_eq!(pair[0].rule_category, pair[1].rule_category);
                    prop_assert!(pair[0].processing_order < pair[1].processing_order);
                }
            }
        }

        #[test]
        fn conflict_primary_runs_first(policy in policy()) {
            let report = analyze(&order(&policy, None));
            for conflict in &report.conflicts {
                prop_assert!(conflict.primary.processing_order < conflict.conflicting.processing_order);
                prop_assert_eq!(conflict.primary.rule_category, conflict.conflicting.rule_category);
            }
        }

        #[test]
        fn serialized_policies_parse_back(policy in policy()) {
            let text = serialize(&policy).unwrap();
            prop_assert_eq!(parse(&text).unwrap(), policy);
        }

        #[test]
        fn harness_accepts_generated_policies((child, parent) in policy_pair()) {
            let harness = Harness::new(HarnessConfig::default().with_iterations(2));
            for result in harness.run(&child, parent.as_ref()) {
                prop_assert!(result.passed, "{}", result);
            }
        }
    }
}
