//! Subcommand implementations.

pub mod analyze;
pub mod order;
pub mod show;

use anyhow::{Context, Result};
use rampart_order::ProcessedRuleCollectionGroup;
use rampart_policy::Policy;
use std::fs;
use tracing::info;

/// Reads and parses a policy file.
fn load_policy(path: &str) -> Result<Policy> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {path}"))?;

    let policy = rampart_policy::parse(&content)
        .with_context(|| format!("Failed to parse policy: {path}"))?;

    info!(
        "Parsed policy '{}' with {} groups and {} rules",
        policy.name,
        policy.rule_collection_groups.len(),
        policy.rule_count()
    );
    Ok(policy)
}

/// Loads the child policy and optional parent, then orders them.
fn load_ordered(
    policy_path: &str,
    parent_path: Option<&str>,
) -> Result<Vec<ProcessedRuleCollectionGroup>> {
    let child = load_policy(policy_path)?;
    let parent = parent_path.map(load_policy).transpose()?;

    Ok(rampart_order::order(&child, parent.as_ref()))
}
