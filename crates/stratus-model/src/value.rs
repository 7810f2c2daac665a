//! Codec for JSON-encoded policy values.
//!
//! Policy assignments carry their value as an opaque JSON string:
//! `zones`-style values are string arrays, `target_replica_count` is a
//! bare integer literal. Encoding and decoding round-trip exactly for
//! well-formed values.

use thiserror::Error;

/// A policy value that could not be decoded as its expected type.
#[derive(Debug, Error)]
#[error("malformed policy value {value:?}: {reason}")]
pub struct ValueError {
    pub value: String,
    pub reason: String,
}

fn malformed(value: &str, err: serde_json::Error) -> ValueError {
    ValueError {
        value: value.to_string(),
        reason: err.to_string(),
    }
}

/// Decode a zone-list value (`["us-east","us-west"]`). Order is
/// preserved and duplicates are kept.
pub fn decode_zone_list(value: &str) -> Result<Vec<String>, ValueError> {
    serde_json::from_str(value).map_err(|e| malformed(value, e))
}

/// Encode a zone list back to its wire form.
pub fn encode_zone_list(zones: &[String]) -> String {
    // Serializing a string slice cannot fail.
    serde_json::to_string(zones).unwrap_or_default()
}

/// Decode a replica-count value (a bare non-negative integer literal).
pub fn decode_replica_count(value: &str) -> Result<u32, ValueError> {
    serde_json::from_str(value).map_err(|e| malformed(value, e))
}

/// Encode a replica count back to its wire form.
pub fn encode_replica_count(count: u32) -> String {
    count.to_string()
}
