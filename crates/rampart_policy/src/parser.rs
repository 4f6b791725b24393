//! Policy document loader.
//!
//! Loads JSON policy documents into typed [`Policy`] structures. The
//! document is checked structurally before it is deserialized so that
//! contract violations (unknown rule kinds, missing priorities) are
//! reported with the JSON path of the offending node.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "name": "edge",
//!   "ruleCollectionGroups": [
//!     { "name": "core", "priority": 100, "ruleCollections": [
//!       { "name": "web", "priority": 1000, "action": "Allow", "rules": [
//!         { "ruleType": "NetworkRule", "name": "AllowHTTP", "destinationPorts": ["80"] }
//!       ]}
//!     ]}
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::model::Policy;
use serde_json::Value;
use tracing::debug;

const RULE_KINDS: [&str; 3] = ["NatRule", "NetworkRule", "ApplicationRule"];

/// Parses a JSON policy document into a [`Policy`].
///
/// # Errors
///
/// Returns an error if:
/// - The input is not valid JSON
/// - A group or collection has no integer `priority`
/// - A rule's `ruleType` is missing or unknown
/// - Any other field does not match the model
///
/// # Example
///
/// ```rust
/// use rampart_policy::{parse, Error};
///
/// let input = r#"{ "ruleCollectionGroups": [{ "name": "g" }] }"#;
/// assert!(matches!(parse(input), Err(Error::MissingField(_))));
/// ```
pub fn parse(input: &str) -> Result<Policy> {
    let value: Value = serde_json::from_str(input)?;
    parse_value(value)
}

/// Converts an already-decoded JSON value into a [`Policy`].
///
/// # Errors
///
/// Same conditions as [`parse`], minus JSON syntax errors.
pub fn parse_value(value: Value) -> Result<Policy> {
    check_document(&value)?;
    let policy: Policy = serde_json::from_value(value)?;
    debug!(
        "Loaded policy '{}' with {} groups and {} rules",
        policy.name,
        policy.rule_collection_groups.len(),
        policy.rule_count()
    );
    Ok(policy)
}

/// Serializes a [`Policy`] back into its JSON document form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize(policy: &Policy) -> Result<String> {
    Ok(serde_json::to_string_pretty(policy)?)
}

fn check_document(root: &Value) -> Result<()> {
    for (gi, group) in array_field(root, "ruleCollectionGroups", "")?.iter().enumerate() {
        let group_path = format!("ruleCollectionGroups[{gi}]");
        check_priority(group, &group_path)?;

        for (ci, collection) in array_field(group, "ruleCollections", &group_path)?
            .iter()
            .enumerate()
        {
            let collection_path = format!("{group_path}.ruleCollections[{ci}]");
            check_priority(collection, &collection_path)?;

            for (ri, rule) in array_field(collection, "rules", &collection_path)?
                .iter()
                .enumerate()
            {
                check_rule_kind(rule, &format!("{collection_path}.rules[{ri}]"))?;
            }
        }
    }
    Ok(())
}

/// Returns the array stored under `key`, or an empty slice if absent.
fn array_field<'a>(node: &'a Value, key: &str, path: &str) -> Result<&'a [Value]> {
    match node.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::InvalidField {
            path: join(path, key),
            reason: format!("expected an array, found {other}"),
        }),
    }
}

fn check_priority(node: &Value, path: &str) -> Result<()> {
    match node.get("priority") {
        None | Some(Value::Null) => Err(Error::MissingField(join(path, "priority"))),
        Some(v) if v.as_u64().is_some_and(|p| u32::try_from(p).is_ok()) => Ok(()),
        Some(v) => Err(Error::InvalidField {
            path: join(path, "priority"),
            reason: format!("expected a non-negative integer, found {v}"),
        }),
    }
}

fn check_rule_kind(rule: &Value, path: &str) -> Result<()> {
    match rule.get("ruleType") {
        Some(Value::String(kind)) if RULE_KINDS.contains(&kind.as_str()) => Ok(()),
        Some(Value::String(kind)) => Err(Error::UnknownRuleKind {
            path: path.to_string(),
            kind: kind.clone(),
        }),
        Some(other) => Err(Error::UnknownRuleKind {
            path: path.to_string(),
            kind: other.to_string(),
        }),
        None => Err(Error::UnknownRuleKind {
            path: path.to_string(),
            kind: String::new(),
        }),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CollectionAction, NetworkRule, Rule, RuleCollection, RuleCollectionGroup};

    const SCENARIO: &str = r#"{
        "name": "edge",
        "ruleCollectionGroups": [{
            "name": "core",
            "priority": 200,
            "ruleCollections": [
                {
                    "name": "inbound",
                    "priority": 100,
                    "action": "DNAT",
                    "rules": [{
                        "ruleType": "NatRule",
                        "name": "web-dnat",
                        "ipProtocols": ["TCP"],
                        "sourceAddresses": ["*"],
                        "destinationAddresses": ["203.0.113.10"],
                        "destinationPorts": ["443"],
                        "translatedAddress": "10.0.1.4",
                        "translatedPort": "8443"
                    }]
                },
                {
                    "name": "web",
                    "priority": 1000,
                    "action": "Allow",
                    "rules": [{
                        "ruleType": "NetworkRule",
                        "name": "AllowHTTP",
                        "ipProtocols": ["TCP"],
                        "sourceAddresses": ["10.0.0.0/8"],
                        "destinationAddresses": ["*"],
                        "destinationPorts": ["80"]
                    }]
                },
                {
                    "name": "apps",
                    "priority": 2000,
                    "action": "Allow",
                    "rules": [{
                        "ruleType": "ApplicationRule",
                        "name": "AllowGithub",
                        "protocols": [{ "protocolType": "Https", "port": 443 }],
                        "sourceAddresses": ["10.0.0.0/8"],
                        "targetFqdns": ["github.com"]
                    }]
                }
            ]
        }]
    }"#;

    #[test]
    fn parse_full_document() {
        let policy = parse(SCENARIO).unwrap();
        assert_eq!(policy.name, "edge");
        assert_eq!(policy.rule_collection_groups.len(), 1);

        let group = &policy.rule_collection_groups[0];
        assert_eq!(group.priority, 200);
        assert_eq!(group.rule_collections.len(), 3);
        assert_eq!(group.rule_collections[0].action, CollectionAction::Dnat);

        match &group.rule_collections[0].rules[0] {
            Rule::Nat(nat) => {
                assert_eq!(nat.translated_address.as_deref(), Some("10.0.1.4"));
                assert_eq!(nat.translated_port.as_deref(), Some("8443"));
            }
            other => panic!("expected NAT rule, got {other:?}"),
        }

        match &group.rule_collections[2].rules[0] {
            Rule::Application(app) => {
                assert_eq!(app.protocols[0].protocol_type, "Https");
                assert_eq!(app.protocols[0].port, 443);
                assert_eq!(app.target_fqdns, vec!["github.com"]);
            }
            other => panic!("expected application rule, got {other:?}"),
        }
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let input = r#"{
            "ruleCollectionGroups": [{
                "name": "g", "priority": 1,
                "ruleCollections": [{
                    "name": "c", "priority": 1,
                    "rules": [{ "ruleType": "NetworkRule", "name": "bare" }]
                }]
            }]
        }"#;

        let policy = parse(input).unwrap();
        let collection = &policy.rule_collection_groups[0].rule_collections[0];
        assert_eq!(collection.action, CollectionAction::Allow);
        match &collection.rules[0] {
            Rule::Network(rule) => {
                assert!(rule.source_addresses.is_empty());
                assert!(rule.destination_ports.is_empty());
            }
            other => panic!("expected network rule, got {other:?}"),
        }
    }

    #[test]
    fn unknown_rule_kind_is_rejected_with_path() {
        let input = r#"{
            "ruleCollectionGroups": [{
                "name": "g", "priority": 1,
                "ruleCollections": [{
                    "name": "c", "priority": 1,
                    "rules": [
                        { "ruleType": "NetworkRule", "name": "ok" },
                        { "ruleType": "GeoRule", "name": "future" }
                    ]
                }]
            }]
        }"#;

        match parse(input) {
            Err(Error::UnknownRuleKind { path, kind }) => {
                assert_eq!(path, "ruleCollectionGroups[0].ruleCollections[0].rules[1]");
                assert_eq!(kind, "GeoRule");
            }
            other => panic!("expected unknown rule kind, got {other:?}"),
        }
    }

    #[test]
    fn missing_rule_kind_is_rejected() {
        let input = r#"{
            "ruleCollectionGroups": [{
                "name": "g", "priority": 1,
                "ruleCollections": [{
                    "name": "c", "priority": 1,
                    "rules": [{ "name": "untyped" }]
                }]
            }]
        }"#;

        assert!(matches!(
            parse(input),
            Err(Error::UnknownRuleKind { kind, .. }) if kind.is_empty()
        ));
    }

    #[test]
    fn missing_collection_priority_is_rejected() {
        let input = r#"{
            "ruleCollectionGroups": [{
                "name": "g", "priority": 1,
                "ruleCollections": [{ "name": "c", "rules": [] }]
            }]
        }"#;

        match parse(input) {
            Err(Error::MissingField(path)) => {
                assert_eq!(path, "ruleCollectionGroups[0].ruleCollections[0].priority");
            }
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn negative_priority_is_invalid() {
        let input = r#"{ "ruleCollectionGroups": [{ "name": "g", "priority": -5 }] }"#;
        assert!(matches!(parse(input), Err(Error::InvalidField { .. })));
    }

    #[test]
    fn groups_must_be_an_array() {
        let input = r#"{ "ruleCollectionGroups": {} }"#;
        assert!(matches!(parse(input), Err(Error::InvalidField { .. })));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(parse("{ not json"), Err(Error::Json(_))));
    }

    #[test]
    fn roundtrip_serialize_parse() {
        let policy = Policy::new("roundtrip").with_group(
            RuleCollectionGroup::new("core", 100).with_collection(
                RuleCollection::new("web", 200, CollectionAction::Deny).with_rule(
                    NetworkRule::new("DenyTelnet")
                        .with_protocols(["TCP"])
                        .with_sources(["*"])
                        .with_destinations(["10.0.0.0/8"])
                        .with_ports(["23"]),
                ),
            ),
        );

        let serialized = serialize(&policy).unwrap();
        assert!(serialized.contains("\"ruleType\": \"NetworkRule\""));

        let parsed = parse(&serialized).unwrap();
        assert_eq!(parsed, policy);
    }
}
