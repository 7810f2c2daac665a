//! Error and fault types for materialization.
//!
//! Two tiers: [`GraphError`] is fatal for the whole call (the snapshot
//! itself is malformed); [`Fault`] is a collected, non-fatal diagnostic
//! (a dangling foreign key, an undecodable policy value) — the
//! materializer always returns a best-effort graph alongside the fault
//! list.

use stratus_model::PolicyId;
use thiserror::Error;

/// Result type alias for materializer entry points.
pub type GraphResult<T> = Result<T, GraphError>;

/// Fatal materialization errors. No partial graph is returned.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed snapshot: {0}")]
    Shape(String),
}

/// Which kind of entity a policy assignment is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyScope {
    Global,
    Cluster,
    Bucket,
}

impl PolicyScope {
    fn as_str(self) -> &'static str {
        match self {
            PolicyScope::Global => "global",
            PolicyScope::Cluster => "cluster",
            PolicyScope::Bucket => "bucket",
        }
    }
}

impl std::fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal faults accumulated during materialization.
///
/// The affected link or field keeps its default; the orphaned entity
/// still appears in its registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// A policy assignment whose `policy_id` matches no known policy.
    #[error("{scope} {owner_id}: assignment references unknown policy {policy_id}")]
    UnresolvedPolicy {
        scope: PolicyScope,
        owner_id: i64,
        policy_id: PolicyId,
    },

    /// A recognized policy whose value could not be decoded.
    #[error("{scope} {owner_id}: policy {name:?} has malformed value: {reason}")]
    PolicyDecode {
        scope: PolicyScope,
        owner_id: i64,
        name: String,
        reason: String,
    },

    /// A foreign key with no matching target; the link is skipped.
    #[error("{entity} {id} references missing {target} {target_id}")]
    DanglingReference {
        entity: &'static str,
        id: i64,
        target: &'static str,
        target_id: i64,
    },
}
