//! Property-based and deterministic simulation testing for Rampart.
//!
//! This crate provides:
//! - Proptest strategies for synthetic policy snapshots
//! - A harness that re-runs ordering and analysis and compares digests
//! - Structural checks over ordered output (contiguous orders, category
//!   precedence, parent precedence, no empty collections)
//! - Hand-built scenarios with known outcomes
//!
//! # Example
//!
//! ```rust
//! use rampart_sim::{scenarios, Harness};
//!
//! let results = Harness::default().run(&scenarios::two_group_policy(), None);
//! assert!(results.iter().all(|r| r.passed));
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod generators;
pub mod harness;
pub mod scenarios;

pub use harness::{check_invariants, CheckResult, Harness, HarnessConfig};
