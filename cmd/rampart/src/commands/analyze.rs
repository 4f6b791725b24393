//! Analyze command implementation.

use anyhow::{Context, Result};
use rampart_analyzer::{ActionSource, Analyzer, AnalyzerConfig, ConflictSeverity};
use tracing::{error, info, warn};

/// Runs the analyze command.
pub fn run(
    policy_path: &str,
    parent_path: Option<&str>,
    action_source: &str,
    strict: bool,
    json: bool,
) -> Result<()> {
    info!("Analyzing policy: {}", policy_path);

    let groups = super::load_ordered(policy_path, parent_path)?;

    let action_source = match action_source.to_lowercase().as_str() {
        "declared" => ActionSource::Declared,
        "inferred" => ActionSource::Inferred,
        _ => {
            anyhow::bail!("Unknown action source: {action_source}. Use 'declared' or 'inferred'.");
        }
    };
    let analyzer = Analyzer::new(AnalyzerConfig::default().with_action_source(action_source));
    let report = analyzer.analyze(&groups);

    if json {
        let output =
            serde_json::to_string_pretty(&report).with_context(|| "Failed to serialize report")?;
        println!("{output}");
    }

    for duplicate in &report.duplicates {
        let names: Vec<&str> = duplicate.rules.iter().map(|r| r.name()).collect();
        warn!(
            "[{:?}] {} rules share one fingerprint: {}",
            duplicate.kind,
            duplicate.rules.len(),
            names.join(", ")
        );
    }

    for conflict in &report.conflicts {
        if conflict.severity == ConflictSeverity::High {
            error!("[{}] {}", conflict.severity, conflict.description);
        } else {
            warn!("[{}] {}", conflict.severity, conflict.description);
        }
    }

    for warning in &report.warnings {
        warn!("[{}] {}", warning.kind, warning.message);
    }

    let high = report.conflicts_with(ConflictSeverity::High).count();
    if high > 0 {
        anyhow::bail!("Policy analysis failed with {high} high-severity conflict(s)");
    }

    if strict && !report.is_clean() {
        anyhow::bail!(
            "Policy analysis failed with {} duplicate group(s), {} conflict(s), {} warning(s) (strict mode)",
            report.duplicates.len(),
            report.conflicts.len(),
            report.warnings.len()
        );
    }

    info!(
        "Policy analysis passed: {} rules, {} findings",
        report.statistics.total_rules,
        report.duplicates.len() + report.conflicts.len() + report.warnings.len()
    );
    Ok(())
}
