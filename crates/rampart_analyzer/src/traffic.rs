//! Normalized traffic-matching fields of a rule.
//!
//! Every rule kind is projected onto the same four overlap dimensions so
//! that fingerprinting and overlap tests do not care which kind they look
//! at. Application match targets (FQDNs, URLs, FQDN tags, web categories)
//! are kept apart for fingerprinting and joined into the destination
//! dimension for overlap.

use rampart_policy::Rule;
use serde::{Deserialize, Serialize};

/// Entries that match any value in their dimension.
const WILDCARDS: [&str; 2] = ["*", "any"];

/// Trimmed, lower-cased, independently sorted traffic fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrafficSelector {
    /// Source addresses and source IP groups.
    pub sources: Vec<String>,
    /// Destination addresses, destination IP groups and destination FQDNs.
    pub destinations: Vec<String>,
    /// Destination ports (application rules: protocol ports).
    pub ports: Vec<String>,
    /// IP protocols (application rules: protocol types).
    pub protocols: Vec<String>,
    /// Application target FQDNs.
    pub target_fqdns: Vec<String>,
    /// Application target URLs.
    pub target_urls: Vec<String>,
    /// Application FQDN tags.
    pub fqdn_tags: Vec<String>,
    /// Application web categories.
    pub web_categories: Vec<String>,
}

impl TrafficSelector {
    /// Projects a rule onto its normalized traffic fields.
    #[must_use]
    pub fn of(rule: &Rule) -> Self {
        match rule {
            Rule::Nat(r) => Self {
                sources: normalize(r.source_addresses.iter().chain(&r.source_ip_groups)),
                destinations: normalize(&r.destination_addresses),
                ports: normalize(&r.destination_ports),
                protocols: normalize(&r.ip_protocols),
                ..Self::default()
            },
            Rule::Network(r) => Self {
                sources: normalize(r.source_addresses.iter().chain(&r.source_ip_groups)),
                destinations: normalize(
                    r.destination_addresses
                        .iter()
                        .chain(&r.destination_ip_groups)
                        .chain(&r.destination_fqdns),
                ),
                ports: normalize(&r.destination_ports),
                protocols: normalize(&r.ip_protocols),
                ..Self::default()
            },
            Rule::Application(r) => {
                let ports: Vec<String> = r.protocols.iter().map(|p| p.port.to_string()).collect();
                Self {
                    sources: normalize(r.source_addresses.iter().chain(&r.source_ip_groups)),
                    destinations: normalize(&r.destination_addresses),
                    ports: normalize(&ports),
                    protocols: normalize(r.protocols.iter().map(|p| &p.protocol_type)),
                    target_fqdns: normalize(&r.target_fqdns),
                    target_urls: normalize(&r.target_urls),
                    fqdn_tags: normalize(&r.fqdn_tags),
                    web_categories: normalize(&r.web_categories),
                }
            }
        }
    }

    /// Returns true if every dimension of `self` intersects `other`.
    ///
    /// An empty dimension, or one holding a wildcard, matches anything.
    /// Application match targets count as destinations here.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        dimension_overlaps(&self.sources, &other.sources)
            && dimension_overlaps(&self.all_destinations(), &other.all_destinations())
            && dimension_overlaps(&self.ports, &other.ports)
            && dimension_overlaps(&self.protocols, &other.protocols)
    }

    fn all_destinations(&self) -> Vec<&str> {
        self.destinations
            .iter()
            .chain(&self.target_fqdns)
            .chain(&self.target_urls)
            .chain(&self.fqdn_tags)
            .chain(&self.web_categories)
            .map(String::as_str)
            .collect()
    }
}

fn normalize<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .collect();
    out.sort();
    out
}

fn dimension_overlaps<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
    if is_any(a) || is_any(b) {
        return true;
    }
    a.iter().any(|x| b.iter().any(|y| x.as_ref() == y.as_ref()))
}

fn is_any<S: AsRef<str>>(values: &[S]) -> bool {
    values.is_empty() || values.iter().any(|v| WILDCARDS.contains(&v.as_ref()))
}
