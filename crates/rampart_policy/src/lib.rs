//! Firewall policy model and document loading for Rampart.
//!
//! This crate provides:
//! - A typed policy model (groups → collections → rules) with one
//!   variant per rule kind
//! - Strict loading of JSON policy documents, rejecting unknown rule
//!   kinds and missing priorities with the offending path
//!
//! # Example
//!
//! ```rust
//! use rampart_policy::parse;
//!
//! let input = r#"{
//!   "name": "edge",
//!   "ruleCollectionGroups": [{
//!     "name": "core",
//!     "priority": 200,
//!     "ruleCollections": [{
//!       "name": "web",
//!       "priority": 1000,
//!       "action": "Allow",
//!       "rules": [{
//!         "ruleType": "NetworkRule",
//!         "name": "AllowHTTP",
//!         "ipProtocols": ["TCP"],
//!         "sourceAddresses": ["10.0.0.0/8"],
//!         "destinationAddresses": ["*"],
//!         "destinationPorts": ["80"]
//!       }]
//!     }]
//!   }]
//! }"#;
//!
//! let policy = parse(input).unwrap();
//! assert_eq!(policy.name, "edge");
//! assert_eq!(policy.rule_count(), 1);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod model;
pub mod parser;

pub use error::{Error, Result};
pub use model::{
    ApplicationProtocol, ApplicationRule, CollectionAction, NatRule, NetworkRule, Policy, Rule,
    RuleCategory, RuleCollection, RuleCollectionGroup,
};
pub use parser::{parse, parse_value, serialize};
