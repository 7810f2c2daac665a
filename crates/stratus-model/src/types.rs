//! Flat snapshot record types.
//!
//! These mirror the backend's bulk resource listing one-to-one: separate
//! collections per entity, policy assignments via an indirection table
//! (policy_id → name), and the load-balancer scalars/maps. Every
//! collection field defaults to empty so a partial snapshot deserializes
//! cleanly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for a cluster.
pub type ClusterId = i64;

/// Unique identifier for a FaaS deployment.
pub type FaasId = i64;

/// Unique identifier for a storage deployment.
pub type StorageId = i64;

/// Unique identifier for a bucket.
pub type BucketId = i64;

/// Unique identifier for an object.
pub type ObjectId = i64;

/// Unique identifier for a policy.
pub type PolicyId = i64;

// ── Policies ──────────────────────────────────────────────────────

/// A named policy definition. Assignments reference it by `policy_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRecord {
    pub policy_id: PolicyId,
    pub name: String,
    /// JSON-encoded default, owned by the backend; carried verbatim.
    #[serde(default)]
    pub default_value: String,
}

/// A platform-wide policy assignment (not scoped to any entity).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalPolicyRecord {
    pub policy_id: PolicyId,
    pub value: String,
}

/// A policy assignment scoped to a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterPolicyRecord {
    pub cluster_id: ClusterId,
    pub policy_id: PolicyId,
    /// JSON-encoded value; decoding is the resolver's job.
    pub value: String,
}

/// A policy assignment scoped to a bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketPolicyRecord {
    pub bucket_id: BucketId,
    pub policy_id: PolicyId,
    pub value: String,
}

// ── Entities ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterRecord {
    pub cluster_id: ClusterId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaasDeploymentRecord {
    pub faas_id: FaasId,
    pub cluster_id: ClusterId,
    pub url: String,
}

/// A storage deployment with its management and connection fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageDeploymentRecord {
    pub storage_id: StorageId,
    pub cluster_id: ClusterId,
    /// Opaque handle assigned by the storage provisioner.
    #[serde(default)]
    pub deployment_handle: String,
    pub alias: String,
    pub endpoint: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub use_ssl: bool,
    /// Notification queue ARN for bucket events, if configured.
    #[serde(default)]
    pub notify_arn: String,
    #[serde(default)]
    pub management_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketRecord {
    pub bucket_id: BucketId,
    /// Origin deployment: ownership, never replica membership.
    pub storage_id: StorageId,
    pub name: String,
}

/// Replica topology edge: bucket replicated onto a storage deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaBucketLocationRecord {
    pub bucket_id: BucketId,
    pub storage_id: StorageId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectRecord {
    pub object_id: ObjectId,
    pub bucket_id: BucketId,
    pub name: String,
}

// ── Load balancer ─────────────────────────────────────────────────

/// Per-route load-balancer settings, keyed by bucket name in the
/// routes and overrides maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RouteSettings {
    pub bucket_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub policy: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upstreams: Vec<String>,
}

// ── Snapshot ──────────────────────────────────────────────────────

/// The flat resource listing returned by the backend in one call.
///
/// Every mutation endpoint returns a complete replacement snapshot in
/// this same shape; there is no incremental patch protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResourceSnapshot {
    #[serde(default)]
    pub policies: Vec<PolicyRecord>,
    #[serde(default)]
    pub global_policies: Vec<GlobalPolicyRecord>,
    #[serde(default)]
    pub clusters: Vec<ClusterRecord>,
    #[serde(default)]
    pub clusters_policies: Vec<ClusterPolicyRecord>,
    #[serde(default)]
    pub faas_deployments: Vec<FaasDeploymentRecord>,
    #[serde(default)]
    pub storage_deployments: Vec<StorageDeploymentRecord>,
    #[serde(default)]
    pub buckets: Vec<BucketRecord>,
    #[serde(default)]
    pub buckets_policies: Vec<BucketPolicyRecord>,
    #[serde(default)]
    pub replica_bucket_locations: Vec<ReplicaBucketLocationRecord>,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub load_balancer_policy: Option<String>,
    #[serde(default)]
    pub load_balancer_match_header: Option<String>,
    #[serde(default)]
    pub load_balancer_host: Option<String>,
    #[serde(default)]
    pub load_balancer_port: Option<String>,
    #[serde(default)]
    pub load_balancer_routes: BTreeMap<String, RouteSettings>,
    #[serde(default)]
    pub load_balancer_route_overrides: BTreeMap<String, RouteSettings>,
}
