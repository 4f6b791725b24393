//! Show command implementation.

use anyhow::Result;
use rampart_order::{query, ProcessedRule};
use rampart_policy::RuleCategory;
use tracing::info;

/// Runs the show command.
pub fn run(
    policy_path: &str,
    parent_path: Option<&str>,
    category: Option<&str>,
    id: Option<&str>,
) -> Result<()> {
    let groups = super::load_ordered(policy_path, parent_path)?;

    if let Some(id) = id {
        let Some(rule) = query::find_rule(&groups, id) else {
            anyhow::bail!("No rule with id: {id}");
        };
        println!("{}", line(rule));
        return Ok(());
    }

    let rules = match category {
        Some(name) => query::rules_in_category(&groups, parse_category(name)?),
        None => query::flatten(&groups),
    };

    for rule in &rules {
        println!("{}", line(rule));
    }

    info!("{} rules shown", rules.len());
    Ok(())
}

fn parse_category(name: &str) -> Result<RuleCategory> {
    RuleCategory::ORDERED
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            anyhow::anyhow!("Unknown rule category: {name}. Use 'dnat', 'network' or 'application'.")
        })
}

fn line(rule: &ProcessedRule) -> String {
    let tier = if rule.is_parent_policy { "parent" } else { "child" };
    format!(
        "{:>4}  {:<11} {:<5} {:<6} {}",
        rule.processing_order,
        rule.rule_category.as_str(),
        rule.action,
        tier,
        rule.id
    )
}
