//! stratus-model — wire-facing types for the Stratus console.
//!
//! The backend returns one flat, relationally-normalized resource
//! listing (the snapshot). This crate holds the serde types for that
//! snapshot, the codec for JSON-encoded policy values, and the console
//! config file parser. Everything here is transport-agnostic; the
//! materializer in `stratus-graph` consumes these types unchanged.

pub mod config;
pub mod types;
pub mod value;

pub use config::ConsoleConfig;
pub use types::*;
pub use value::{decode_replica_count, decode_zone_list, encode_replica_count, encode_zone_list};
