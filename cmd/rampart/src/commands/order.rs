//! Order command implementation.

use anyhow::{Context, Result};
use rampart_order::{digest, query, render, OutputFormat};
use std::fs;
use tracing::info;

/// Runs the order command.
pub fn run(
    policy_path: &str,
    parent_path: Option<&str>,
    format: &str,
    output_path: Option<&str>,
) -> Result<()> {
    info!("Ordering policy: {}", policy_path);

    let output_format: OutputFormat = format
        .parse()
        .with_context(|| format!("Unknown output format: {format}. Use 'json' or 'yaml'."))?;

    let groups = super::load_ordered(policy_path, parent_path)?;

    info!(
        "Ordered {} rules in {} collections across {} groups",
        query::rule_count(&groups),
        query::collection_count(&groups),
        groups.len()
    );

    let output = render(&groups, output_format).with_context(|| "Failed to render order")?;
    let hash = digest(&groups).with_context(|| "Failed to digest order")?;
    info!("Order digest: {}", hash);

    match output_path {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {path}"))?;
            info!("Ordered policy written to: {}", path);
        }
        None => println!("{output}"),
    }

    Ok(())
}
