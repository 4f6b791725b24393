//! Rule processing order for layered firewall policies.
//!
//! This crate is **pure and deterministic**:
//! - No I/O
//! - No randomness
//! - Same policy snapshot always produces the same ordered output
//!
//! Parent-policy groups are evaluated before child-policy groups. Within a
//! tier groups run in ascending priority; within a group the DNAT, Network
//! and Application categories run in that fixed order, each over its
//! collections in ascending priority.
//!
//! # Example
//!
//! ```rust
//! use rampart_order::{order, query};
//! use rampart_policy::{CollectionAction, NetworkRule, Policy, RuleCollection, RuleCollectionGroup};
//!
//! let policy = Policy::new("edge").with_group(
//!     RuleCollectionGroup::new("core", 200).with_collection(
//!         RuleCollection::new("web", 1000, CollectionAction::Allow)
//!             .with_rule(NetworkRule::new("AllowHTTP").with_ports(["80"])),
//!     ),
//! );
//!
//! let groups = order(&policy, None);
//! let rules = query::flatten(&groups);
//! assert_eq!(rules[0].processing_order, 1);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod digest;
pub mod error;
pub mod ordering;
pub mod processed;
pub mod query;
pub mod render;

pub use digest::digest;
pub use error::{Error, Result};
pub use ordering::order;
pub use processed::{ProcessedRule, ProcessedRuleCollection, ProcessedRuleCollectionGroup};
pub use render::{render, OutputFormat};
