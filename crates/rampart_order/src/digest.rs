//! Stable digest of an ordered hierarchy.
//!
//! The digest lets callers verify that two ordering passes over the same
//! snapshot produced byte-identical output without keeping both around.

use crate::error::Result;
use crate::processed::ProcessedRuleCollectionGroup;
use xxhash_rust::xxh64::xxh64;

/// Seed for xxhash to ensure deterministic hashing.
const HASH_SEED: u64 = 0x0052_414D_5041_5254; // "RAMPART" in hex

/// Computes a 16-hex-digit digest of the canonical JSON form of `groups`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn digest(groups: &[ProcessedRuleCollectionGroup]) -> Result<String> {
    let canonical = serde_json::to_string(groups)?;
    Ok(hash_content(&canonical))
}

/// Returns true if `groups` hashes to `expected`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn verify(groups: &[ProcessedRuleCollectionGroup], expected: &str) -> Result<bool> {
    Ok(digest(groups)? == expected)
}

fn hash_content(content: &str) -> String {
    let hash = xxh64(content.as_bytes(), HASH_SEED);
    format!("{hash:016x}")
}
