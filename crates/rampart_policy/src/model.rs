//! Typed policy model.
//!
//! These types represent an already-parsed policy snapshot. Rule kinds are
//! a closed sum type, so every consumer matches them exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A firewall policy: the root of the group → collection → rule tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Human-readable policy name.
    #[serde(default)]
    pub name: String,
    /// Rule collection groups in declaration order.
    #[serde(default)]
    pub rule_collection_groups: Vec<RuleCollectionGroup>,
}

/// Top-level priority-ordered grouping of rule collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCollectionGroup {
    /// Group name.
    pub name: String,
    /// Priority (lower = evaluated earlier).
    pub priority: u32,
    /// Rule collections in declaration order.
    #[serde(default)]
    pub rule_collections: Vec<RuleCollection>,
}

/// Priority-ordered grouping of rules sharing one collection-level action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCollection {
    /// Collection name.
    pub name: String,
    /// Priority within the owning group (lower = evaluated earlier).
    pub priority: u32,
    /// Action applied to traffic matching any rule of this collection.
    #[serde(default)]
    pub action: CollectionAction,
    /// Rules in declaration order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Collection-level action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionAction {
    /// Permit matching traffic.
    #[default]
    #[serde(alias = "allow")]
    Allow,
    /// Reject matching traffic.
    #[serde(alias = "deny")]
    Deny,
    /// Destination-translate matching traffic (NAT collections).
    #[serde(rename = "DNAT", alias = "Dnat", alias = "dnat")]
    Dnat,
}

impl fmt::Display for CollectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
            Self::Dnat => "DNAT",
        })
    }
}

/// A single firewall rule, discriminated by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ruleType")]
pub enum Rule {
    /// Destination NAT rule.
    #[serde(rename = "NatRule")]
    Nat(NatRule),
    /// Address/port/protocol filtering rule.
    #[serde(rename = "NetworkRule")]
    Network(NetworkRule),
    /// FQDN/protocol filtering rule.
    #[serde(rename = "ApplicationRule")]
    Application(ApplicationRule),
}

/// Destination NAT rule fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatRule {
    /// Rule name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// IP protocols (TCP, UDP, ...).
    #[serde(default)]
    pub ip_protocols: Vec<String>,
    /// Source addresses or CIDRs.
    #[serde(default)]
    pub source_addresses: Vec<String>,
    /// Source IP group references.
    #[serde(default)]
    pub source_ip_groups: Vec<String>,
    /// Destination addresses (the public frontend).
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    /// Destination ports.
    #[serde(default)]
    pub destination_ports: Vec<String>,
    /// Address traffic is translated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_address: Option<String>,
    /// FQDN traffic is translated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_fqdn: Option<String>,
    /// Port traffic is translated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_port: Option<String>,
}

/// Network rule fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRule {
    /// Rule name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// IP protocols (TCP, UDP, ICMP, Any).
    #[serde(default)]
    pub ip_protocols: Vec<String>,
    /// Source addresses or CIDRs.
    #[serde(default)]
    pub source_addresses: Vec<String>,
    /// Source IP group references.
    #[serde(default)]
    pub source_ip_groups: Vec<String>,
    /// Destination addresses or CIDRs.
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    /// Destination IP group references.
    #[serde(default)]
    pub destination_ip_groups: Vec<String>,
    /// Destination FQDNs.
    #[serde(default)]
    pub destination_fqdns: Vec<String>,
    /// Destination ports or port ranges.
    #[serde(default)]
    pub destination_ports: Vec<String>,
}

/// Application rule fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRule {
    /// Rule name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Application protocol + port pairs.
    #[serde(default)]
    pub protocols: Vec<ApplicationProtocol>,
    /// Source addresses or CIDRs.
    #[serde(default)]
    pub source_addresses: Vec<String>,
    /// Source IP group references.
    #[serde(default)]
    pub source_ip_groups: Vec<String>,
    /// Destination addresses.
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    /// Target FQDNs.
    #[serde(default)]
    pub target_fqdns: Vec<String>,
    /// Target URLs (TLS inspection only).
    #[serde(default)]
    pub target_urls: Vec<String>,
    /// FQDN tags.
    #[serde(default)]
    pub fqdn_tags: Vec<String>,
    /// Web categories.
    #[serde(default)]
    pub web_categories: Vec<String>,
    /// Whether TLS is terminated for inspection.
    #[serde(default)]
    pub terminate_tls: bool,
}

/// An application protocol and port pair (e.g. `Https:443`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProtocol {
    /// Protocol type (Http, Https, Mssql).
    pub protocol_type: String,
    /// Port number.
    pub port: u16,
}

/// Category bucket a rule is processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    /// NAT rules.
    #[serde(rename = "DNAT")]
    Dnat,
    /// Network rules.
    Network,
    /// Application rules.
    Application,
}

impl RuleCategory {
    /// Categories in the order a group evaluates them.
    pub const ORDERED: [Self; 3] = [Self::Dnat, Self::Network, Self::Application];

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dnat => "DNAT",
            Self::Network => "Network",
            Self::Application => "Application",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Policy {
    /// Creates a new empty policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule_collection_groups: Vec::new(),
        }
    }

    /// Appends a group. Declaration order is preserved.
    pub fn add_group(&mut self, group: RuleCollectionGroup) {
        self.rule_collection_groups.push(group);
    }

    /// Appends a group, builder style.
    #[must_use]
    pub fn with_group(mut self, group: RuleCollectionGroup) -> Self {
        self.add_group(group);
        self
    }

    /// Total number of rules across all groups and collections.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rule_collection_groups
            .iter()
            .flat_map(|g| &g.rule_collections)
            .map(|c| c.rules.len())
            .sum()
    }
}

impl RuleCollectionGroup {
    /// Creates a new empty group.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            rule_collections: Vec::new(),
        }
    }

    /// Appends a collection, builder style.
    #[must_use]
    pub fn with_collection(mut self, collection: RuleCollection) -> Self {
        self.rule_collections.push(collection);
        self
    }
}

impl RuleCollection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: u32, action: CollectionAction) -> Self {
        Self {
            name: name.into(),
            priority,
            action,
            rules: Vec::new(),
        }
    }

    /// Appends a rule, builder style.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Returns true if at least one rule belongs to `category`.
    #[must_use]
    pub fn has_category(&self, category: RuleCategory) -> bool {
        self.rules.iter().any(|r| r.category() == category)
    }
}

impl Rule {
    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Nat(r) => &r.name,
            Self::Network(r) => &r.name,
            Self::Application(r) => &r.name,
        }
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Nat(r) => r.description.as_deref(),
            Self::Network(r) => r.description.as_deref(),
            Self::Application(r) => r.description.as_deref(),
        }
    }

    /// The category bucket this rule's kind belongs to.
    #[must_use]
    pub const fn category(&self) -> RuleCategory {
        match self {
            Self::Nat(_) => RuleCategory::Dnat,
            Self::Network(_) => RuleCategory::Network,
            Self::Application(_) => RuleCategory::Application,
        }
    }

    /// The document discriminant for this rule's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Nat(_) => "NatRule",
            Self::Network(_) => "NetworkRule",
            Self::Application(_) => "ApplicationRule",
        }
    }
}

impl From<NatRule> for Rule {
    fn from(rule: NatRule) -> Self {
        Self::Nat(rule)
    }
}

impl From<NetworkRule> for Rule {
    fn from(rule: NetworkRule) -> Self {
        Self::Network(rule)
    }
}

impl From<ApplicationRule> for Rule {
    fn from(rule: ApplicationRule) -> Self {
        Self::Application(rule)
    }
}

fn strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl NatRule {
    /// Creates a NAT rule with no addressing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets IP protocols.
    #[must_use]
    pub fn with_protocols<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.ip_protocols = strings(v);
        self
    }

    /// Sets source addresses.
    #[must_use]
    pub fn with_sources<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.source_addresses = strings(v);
        self
    }

    /// Sets destination addresses.
    #[must_use]
    pub fn with_destinations<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.destination_addresses = strings(v);
        self
    }

    /// Sets destination ports.
    #[must_use]
    pub fn with_ports<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.destination_ports = strings(v);
        self
    }

    /// Sets the translation target.
    #[must_use]
    pub fn translate_to(mut self, address: impl Into<String>, port: impl Into<String>) -> Self {
        self.translated_address = Some(address.into());
        self.translated_port = Some(port.into());
        self
    }
}

impl NetworkRule {
    /// Creates a network rule with no addressing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets IP protocols.
    #[must_use]
    pub fn with_protocols<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.ip_protocols = strings(v);
        self
    }

    /// Sets source addresses.
    #[must_use]
    pub fn with_sources<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.source_addresses = strings(v);
        self
    }

    /// Sets destination addresses.
    #[must_use]
    pub fn with_destinations<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.destination_addresses = strings(v);
        self
    }

    /// Sets destination FQDNs.
    #[must_use]
    pub fn with_fqdns<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.destination_fqdns = strings(v);
        self
    }

    /// Sets destination ports.
    #[must_use]
    pub fn with_ports<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.destination_ports = strings(v);
        self
    }
}

impl ApplicationRule {
    /// Creates an application rule with no addressing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a protocol + port pair.
    #[must_use]
    pub fn with_protocol(mut self, protocol_type: impl Into<String>, port: u16) -> Self {
        self.protocols.push(ApplicationProtocol {
            protocol_type: protocol_type.into(),
            port,
        });
        self
    }

    /// Sets source addresses.
    #[must_use]
    pub fn with_sources<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.source_addresses = strings(v);
        self
    }

    /// Sets target FQDNs.
    #[must_use]
    pub fn with_target_fqdns<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.target_fqdns = strings(v);
        self
    }

    /// Sets target URLs.
    #[must_use]
    pub fn with_target_urls<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.target_urls = strings(v);
        self
    }

    /// Sets FQDN tags.
    #[must_use]
    pub fn with_fqdn_tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.fqdn_tags = strings(v);
        self
    }

    /// Sets web categories.
    #[must_use]
    pub fn with_web_categories<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.web_categories = strings(v);
        self
    }
}
