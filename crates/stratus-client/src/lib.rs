//! stratus-client — async client for the orchestration backend.
//!
//! The backend speaks a whole-document protocol: one bulk listing
//! endpoint returns the flat resource snapshot, and every mutation
//! responds with a complete replacement snapshot in the same shape.
//! There is no incremental patch endpoint; callers re-materialize
//! wholesale after each round-trip.

pub mod api;
pub mod error;
mod transport;

pub use api::{
    BucketInput, ClusterInput, ConsoleClient, FaasInput, LbOverridesInput, LbSettingsInput,
    StorageInput,
};
pub use error::{ClientError, ClientResult};
