//! Policy index and resolver.
//!
//! Policy assignments reference policies by id; the index maps ids back
//! to names, and the resolver dispatches on the recognized kinds to
//! populate derived entity fields. Unrecognized names have no field
//! effect but are preserved in the name-annotated flat lists returned
//! alongside the graph.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use stratus_model::{
    value, BucketId, BucketPolicyRecord, ClusterId, ClusterPolicyRecord, GlobalPolicyRecord,
    PolicyId, PolicyRecord,
};

use crate::error::{Fault, PolicyScope};
use crate::graph::Graph;

/// Lookup from policy id to policy name.
///
/// Duplicate ids are not expected from the backend but must not crash:
/// the last record wins.
#[derive(Debug, Clone, Default)]
pub struct PolicyIndex {
    by_id: HashMap<PolicyId, String>,
}

impl PolicyIndex {
    pub fn build(policies: &[PolicyRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(policies.len());
        for policy in policies {
            by_id.insert(policy.policy_id, policy.name.clone());
        }
        Self { by_id }
    }

    pub fn name_of(&self, policy_id: PolicyId) -> Option<&str> {
        self.by_id.get(&policy_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// The recognized policy kinds, plus a catch-all for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// Zone list — cluster scope sets `zones`, bucket scope sets
    /// `allowed_zones`.
    Zones,
    /// Bucket scope only: sets `target_replica_count`.
    TargetReplicaCount,
    /// Bucket scope only: presence sets `replication_overridden`.
    ReplicaLocations,
    /// Forward-compatible: no field effect, preserved verbatim.
    Other(String),
}

impl PolicyKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "zones" => PolicyKind::Zones,
            "target_replica_count" => PolicyKind::TargetReplicaCount,
            "replica_locations" => PolicyKind::ReplicaLocations,
            other => PolicyKind::Other(other.to_string()),
        }
    }
}

// ── Name-annotated assignments ────────────────────────────────────
//
// The flat assignment lists are returned alongside the graph with the
// policy name resolved, so unknown policies survive round-trips.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedGlobalPolicy {
    pub policy_id: PolicyId,
    pub name: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedClusterPolicy {
    pub cluster_id: ClusterId,
    pub policy_id: PolicyId,
    pub name: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedBucketPolicy {
    pub bucket_id: BucketId,
    pub policy_id: PolicyId,
    pub name: Option<String>,
    pub value: String,
}

pub fn annotate_global_policies(
    index: &PolicyIndex,
    assignments: &[GlobalPolicyRecord],
) -> Vec<NamedGlobalPolicy> {
    assignments
        .iter()
        .map(|gp| NamedGlobalPolicy {
            policy_id: gp.policy_id,
            name: index.name_of(gp.policy_id).map(str::to_string),
            value: gp.value.clone(),
        })
        .collect()
}

pub fn annotate_cluster_policies(
    index: &PolicyIndex,
    assignments: &[ClusterPolicyRecord],
) -> Vec<NamedClusterPolicy> {
    assignments
        .iter()
        .map(|cp| NamedClusterPolicy {
            cluster_id: cp.cluster_id,
            policy_id: cp.policy_id,
            name: index.name_of(cp.policy_id).map(str::to_string),
            value: cp.value.clone(),
        })
        .collect()
}

pub fn annotate_bucket_policies(
    index: &PolicyIndex,
    assignments: &[BucketPolicyRecord],
) -> Vec<NamedBucketPolicy> {
    assignments
        .iter()
        .map(|bp| NamedBucketPolicy {
            bucket_id: bp.bucket_id,
            policy_id: bp.policy_id,
            name: index.name_of(bp.policy_id).map(str::to_string),
            value: bp.value.clone(),
        })
        .collect()
}

// ── Resolver ──────────────────────────────────────────────────────

/// Apply cluster-scoped assignments to the cluster registry.
///
/// Only `zones` has an effect at cluster scope; other recognized kinds
/// are bucket policies and are ignored here.
pub fn apply_cluster_policies(
    graph: &mut Graph,
    index: &PolicyIndex,
    assignments: &[ClusterPolicyRecord],
    faults: &mut Vec<Fault>,
) {
    for assignment in assignments {
        let Some(name) = index.name_of(assignment.policy_id) else {
            faults.push(Fault::UnresolvedPolicy {
                scope: PolicyScope::Cluster,
                owner_id: assignment.cluster_id,
                policy_id: assignment.policy_id,
            });
            continue;
        };
        let kind = PolicyKind::from_name(name);

        let Some(cluster) = graph.clusters.get_mut(&assignment.cluster_id) else {
            faults.push(Fault::DanglingReference {
                entity: "cluster policy assignment",
                id: assignment.policy_id,
                target: "cluster",
                target_id: assignment.cluster_id,
            });
            continue;
        };

        match kind {
            PolicyKind::Zones => match value::decode_zone_list(&assignment.value) {
                Ok(zones) => cluster.zones = zones,
                Err(e) => faults.push(Fault::PolicyDecode {
                    scope: PolicyScope::Cluster,
                    owner_id: assignment.cluster_id,
                    name: "zones".to_string(),
                    reason: e.reason,
                }),
            },
            PolicyKind::TargetReplicaCount | PolicyKind::ReplicaLocations => {
                debug!(
                    cluster_id = assignment.cluster_id,
                    policy = name,
                    "bucket-scoped policy attached to a cluster, ignored"
                );
            }
            PolicyKind::Other(_) => {}
        }
    }
}

/// Apply bucket-scoped assignments to the bucket registry.
pub fn apply_bucket_policies(
    graph: &mut Graph,
    index: &PolicyIndex,
    assignments: &[BucketPolicyRecord],
    faults: &mut Vec<Fault>,
) {
    for assignment in assignments {
        let Some(name) = index.name_of(assignment.policy_id) else {
            faults.push(Fault::UnresolvedPolicy {
                scope: PolicyScope::Bucket,
                owner_id: assignment.bucket_id,
                policy_id: assignment.policy_id,
            });
            continue;
        };
        let kind = PolicyKind::from_name(name);

        let Some(bucket) = graph.buckets.get_mut(&assignment.bucket_id) else {
            faults.push(Fault::DanglingReference {
                entity: "bucket policy assignment",
                id: assignment.policy_id,
                target: "bucket",
                target_id: assignment.bucket_id,
            });
            continue;
        };

        match kind {
            PolicyKind::Zones => match value::decode_zone_list(&assignment.value) {
                Ok(zones) => bucket.allowed_zones = zones,
                Err(e) => faults.push(Fault::PolicyDecode {
                    scope: PolicyScope::Bucket,
                    owner_id: assignment.bucket_id,
                    name: "zones".to_string(),
                    reason: e.reason,
                }),
            },
            PolicyKind::TargetReplicaCount => {
                match value::decode_replica_count(&assignment.value) {
                    Ok(count) => bucket.target_replica_count = count,
                    Err(e) => faults.push(Fault::PolicyDecode {
                        scope: PolicyScope::Bucket,
                        owner_id: assignment.bucket_id,
                        name: "target_replica_count".to_string(),
                        reason: e.reason,
                    }),
                }
            }
            // Presence alone marks the override; the explicit replica
            // wiring comes from the replica_bucket_locations relation.
            PolicyKind::ReplicaLocations => bucket.replication_overridden = true,
            PolicyKind::Other(_) => {}
        }
    }
}
