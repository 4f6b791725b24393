//! Analysis entry point.

use crate::checks;
use crate::conflicts::{ActionSource, ConflictDetector, ConflictSeverity};
use crate::fingerprint::find_duplicates;
use crate::result::AnalysisReport;
use crate::stats::Statistics;
use rampart_order::{query, ProcessedRuleCollectionGroup};
use tracing::info;

/// Configuration for the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Where Allow/Deny actions are read from.
    pub action_source: ActionSource,
    /// Whether to cluster rules by fingerprint.
    pub detect_duplicates: bool,
    /// Whether to run the pairwise conflict scan.
    pub detect_conflicts: bool,
    /// Whether to warn on non-consecutive processing orders.
    pub check_processing_gaps: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            action_source: ActionSource::Declared,
            detect_duplicates: true,
            detect_conflicts: true,
            check_processing_gaps: true,
        }
    }
}

impl AnalyzerConfig {
    /// Sets the action source.
    #[must_use]
    pub const fn with_action_source(mut self, action_source: ActionSource) -> Self {
        self.action_source = action_source;
        self
    }

    /// Disables duplicate detection.
    #[must_use]
    pub const fn without_duplicates(mut self) -> Self {
        self.detect_duplicates = false;
        self
    }

    /// Disables the conflict scan.
    #[must_use]
    pub const fn without_conflicts(mut self) -> Self {
        self.detect_conflicts = false;
        self
    }

    /// Disables the processing-gap check.
    #[must_use]
    pub const fn without_gap_check(mut self) -> Self {
        self.check_processing_gaps = false;
        self
    }
}

/// Analyzer over the output of the ordering engine.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Creates a new analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes an ordered hierarchy.
    #[must_use]
    pub fn analyze(&self, groups: &[ProcessedRuleCollectionGroup]) -> AnalysisReport {
        let rules = query::flatten(groups);

        let duplicates = if self.config.detect_duplicates {
            find_duplicates(&rules)
        } else {
            Vec::new()
        };

        let conflicts = if self.config.detect_conflicts {
            ConflictDetector::new(self.config.action_source).find_conflicts(&rules)
        } else {
            Vec::new()
        };

        let mut warnings = checks::check_duplicate_priorities(groups);
        if self.config.check_processing_gaps {
            warnings.extend(checks::check_processing_gaps(&rules));
        }

        let statistics = Statistics::compute(groups, &duplicates, &conflicts);

        info!(
            "Analyzed {} rules: {} duplicate groups, {} conflicts ({} high), {} warnings",
            statistics.total_rules,
            duplicates.len(),
            conflicts.len(),
            statistics
                .conflicts_by_severity
                .get(&ConflictSeverity::High)
                .copied()
                .unwrap_or(0),
            warnings.len()
        );

        AnalysisReport {
            duplicates,
            conflicts,
            statistics,
            warnings,
        }
    }
}

/// Analyzes an ordered hierarchy with the default configuration.
#[must_use]
pub fn analyze(groups: &[ProcessedRuleCollectionGroup]) -> AnalysisReport {
    Analyzer::default().analyze(groups)
}
