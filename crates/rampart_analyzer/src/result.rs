//! Analysis result types.

use crate::conflicts::{Conflict, ConflictSeverity};
use crate::fingerprint::DuplicateGroup;
use crate::stats::Statistics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of one analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Rules sharing a traffic fingerprint.
    pub duplicates: Vec<DuplicateGroup>,
    /// Overlapping rule pairs.
    pub conflicts: Vec<Conflict>,
    /// Aggregate counts and ranges.
    pub statistics: Statistics,
    /// Consistency warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl AnalysisReport {
    /// Returns true if nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.conflicts.is_empty() && self.warnings.is_empty()
    }

    /// Returns true if any conflict is high severity.
    #[must_use]
    pub fn has_high_severity(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.severity == ConflictSeverity::High)
    }

    /// Returns the conflicts of one severity.
    pub fn conflicts_with(&self, severity: ConflictSeverity) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.severity == severity)
    }
}

/// Which consistency check produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Two or more groups share a priority.
    DuplicatePriority,
    /// Adjacent rules are not numbered consecutively.
    ProcessingGap,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePriority => write!(f, "duplicate_priority"),
            Self::ProcessingGap => write!(f, "processing_gap"),
        }
    }
}

/// A non-blocking consistency warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    /// Which check produced the warning.
    pub kind: WarningKind,
    /// Human-readable message.
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new warning.
    #[must_use]
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_clean() {
        let report = AnalysisReport {
            duplicates: Vec::new(),
            conflicts: Vec::new(),
            statistics: Statistics::default(),
            warnings: Vec::new(),
        };
        assert!(report.is_clean());
        assert!(!report.has_high_severity());
    }

    #[test]
    fn warning_makes_report_unclean() {
        let report = AnalysisReport {
            duplicates: Vec::new(),
            conflicts: Vec::new(),
            statistics: Statistics::default(),
            warnings: vec![ValidationWarning::new(WarningKind::ProcessingGap, "gap")],
        };
        assert!(!report.is_clean());
    }

    #[test]
    fn warning_kind_display_matches_serialization() {
        let json = serde_json::to_string(&WarningKind::DuplicatePriority).unwrap();
        assert_eq!(json, format!("\"{}\"", WarningKind::DuplicatePriority));
    }
}
