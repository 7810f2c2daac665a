//! stratus-graph — the resource graph materializer.
//!
//! The backend returns a flat, relationally-normalized snapshot. This
//! crate reconstructs the fully cross-linked entity graph from it:
//! policy indirection is resolved into typed derived fields (zone
//! lists, replica counts, override flags), foreign keys become
//! registry-backed links, and the many-to-many replica topology is
//! rebuilt symmetrically.
//!
//! # Architecture
//!
//! Registries are arenas keyed by entity id; "references" between
//! entities are ids dereferenced through the arenas, so parent-owned
//! sequences and child back-references coexist without ownership
//! cycles. Materialization is one synchronous pass in dependency
//! order: policy index → registries → policy resolver → linker → LB
//! view model. It is pure and idempotent; the console re-runs it
//! wholesale after every mutation round-trip.
//!
//! Referentially incomplete snapshots never fail: dangling links are
//! skipped and collected as [`Fault`]s while the rest of the graph is
//! still built. Only a structurally malformed snapshot (a collection
//! that is not list-shaped) is fatal, via [`materialize_slice`].

pub mod error;
pub mod graph;
pub mod lb;
pub mod linker;
pub mod materialize;
pub mod policy;

pub use error::{Fault, GraphError, GraphResult, PolicyScope};
pub use graph::{Bucket, Cluster, FaasDeployment, Graph, Object, StorageDeployment};
pub use lb::{LbSettings, LbViewModel, SETTING_PLACEHOLDER};
pub use materialize::{materialize, materialize_slice, Materialized};
pub use policy::{
    NamedBucketPolicy, NamedClusterPolicy, NamedGlobalPolicy, PolicyIndex, PolicyKind,
};
