//! Redundancy and contradiction analysis for ordered firewall rules.
//!
//! The analyzer consumes the output of the ordering engine and reports:
//!
//! - **Duplicates**: rules sharing a normalized traffic fingerprint
//! - **Conflicts**: same-kind rule pairs with overlapping traffic
//!   (allow/deny contradictions, unreachable rules, ambiguous overlaps)
//! - **Statistics**: counts per category, origin and priority range
//! - **Warnings**: shared group priorities and processing-order gaps
//!
//! # Example
//!
//! ```rust
//! use rampart_analyzer::analyze;
//! use rampart_order::order;
//! use rampart_policy::{CollectionAction, NetworkRule, Policy, RuleCollection, RuleCollectionGroup};
//!
//! let policy = Policy::new("edge").with_group(
//!     RuleCollectionGroup::new("core", 100).with_collection(
//!         RuleCollection::new("web", 100, CollectionAction::Allow)
//!             .with_rule(NetworkRule::new("AllowHTTP").with_ports(["80"])),
//!     ),
//! );
//!
//! let report = analyze(&order(&policy, None));
//! assert!(report.is_clean());
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod analyzer;
pub mod checks;
pub mod conflicts;
pub mod fingerprint;
pub mod result;
pub mod stats;
pub mod traffic;

pub use analyzer::{analyze, Analyzer, AnalyzerConfig};
pub use conflicts::{
    find_conflicts, ActionSource, Conflict, ConflictDetector, ConflictSeverity, ConflictType,
};
pub use fingerprint::{find_duplicates, DuplicateGroup, DuplicateKind, Fingerprint};
pub use result::{AnalysisReport, ValidationWarning, WarningKind};
pub use stats::{PriorityRange, Statistics};
pub use traffic::TrafficSelector;
