//! Serialized forms of the ordered hierarchy.

use crate::error::{Error, Result};
use crate::processed::ProcessedRuleCollectionGroup;
use std::str::FromStr;

/// Output format for ordered policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default).
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders the ordered hierarchy in the requested format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(groups: &[ProcessedRuleCollectionGroup], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(groups).map_err(Error::from),
        OutputFormat::Yaml => serde_yaml::to_string(groups).map_err(Error::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::order;
    use rampart_policy::{CollectionAction, NatRule, Policy, RuleCollection, RuleCollectionGroup};

    fn groups() -> Vec<ProcessedRuleCollectionGroup> {
        let policy = Policy::new("p").with_group(
            RuleCollectionGroup::new("g", 100).with_collection(
                RuleCollection::new("dnat", 100, CollectionAction::Dnat)
                    .with_rule(NatRule::new("Inbound").translate_to("10.0.0.4", "8080")),
            ),
        );
        order(&policy, None)
    }

    #[test]
    fn render_json_uses_camel_case() {
        let output = render(&groups(), OutputFormat::Json).unwrap();

        assert!(output.contains("\"processingOrder\": 1"));
        assert!(output.contains("\"ruleCategory\": \"DNAT\""));
        assert!(output.contains("\"isParentPolicy\": false"));
    }

    #[test]
    fn render_yaml() {
        let output = render(&groups(), OutputFormat::Yaml).unwrap();

        assert!(output.contains("processingOrder: 1"));
        assert!(output.contains("ruleType: NatRule"));
    }

    #[test]
    fn parse_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!(matches!(
            "csv".parse::<OutputFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn render_is_deterministic() {
        let output1 = render(&groups(), OutputFormat::Json).unwrap();
        let output2 = render(&groups(), OutputFormat::Json).unwrap();

        assert_eq!(output1, output2, "Rendering must be deterministic");
    }
}
