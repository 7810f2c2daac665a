//! Materialized entity types and the registry arenas holding them.
//!
//! Each registry is a `BTreeMap` keyed by the entity's id. Links
//! between entities are ids, not references: parent→children are
//! ordered `Vec`s of child ids (snapshot order), child→parent is an
//! `Option` of the parent id (`None` while unlinked or dangling), and
//! the many-to-many replica topology is a `BTreeSet` on both sides.
//! Every derived field starts at its declared default when the
//! registry is built, before any linking occurs, so partial snapshots
//! still produce well-formed entities.

use std::collections::{BTreeMap, BTreeSet};

use stratus_model::{
    BucketId, BucketRecord, ClusterId, ClusterRecord, FaasDeploymentRecord, FaasId, ObjectId,
    ObjectRecord, ResourceSnapshot, StorageDeploymentRecord, StorageId,
};

/// A cluster with its resolved zone list and owned deployments.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub cluster_id: ClusterId,
    pub name: String,
    /// Zones this cluster spans, from the `zones` cluster policy.
    pub zones: Vec<String>,
    pub faas_deployments: Vec<FaasId>,
    pub storage_deployments: Vec<StorageId>,
}

impl Cluster {
    fn from_record(record: &ClusterRecord) -> Self {
        Self {
            cluster_id: record.cluster_id,
            name: record.name.clone(),
            zones: Vec::new(),
            faas_deployments: Vec::new(),
            storage_deployments: Vec::new(),
        }
    }
}

/// A serverless-function deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct FaasDeployment {
    pub faas_id: FaasId,
    pub cluster_id: ClusterId,
    pub url: String,
    /// Resolved owning cluster; `None` when `cluster_id` is dangling.
    pub cluster: Option<ClusterId>,
}

impl FaasDeployment {
    fn from_record(record: &FaasDeploymentRecord) -> Self {
        Self {
            faas_id: record.faas_id,
            cluster_id: record.cluster_id,
            url: record.url.clone(),
            cluster: None,
        }
    }
}

/// A storage deployment with its owned and replica-hosted buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageDeployment {
    pub storage_id: StorageId,
    pub cluster_id: ClusterId,
    pub deployment_handle: String,
    pub alias: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub use_ssl: bool,
    pub notify_arn: String,
    pub management_url: String,
    /// Resolved owning cluster; `None` when `cluster_id` is dangling.
    pub cluster: Option<ClusterId>,
    /// Buckets whose origin is this deployment, in snapshot order.
    pub buckets: Vec<BucketId>,
    /// Buckets replicated onto this deployment (never origin here).
    pub replica_buckets: BTreeSet<BucketId>,
}

impl StorageDeployment {
    fn from_record(record: &StorageDeploymentRecord) -> Self {
        Self {
            storage_id: record.storage_id,
            cluster_id: record.cluster_id,
            deployment_handle: record.deployment_handle.clone(),
            alias: record.alias.clone(),
            endpoint: record.endpoint.clone(),
            access_key: record.access_key.clone(),
            secret_key: record.secret_key.clone(),
            use_ssl: record.use_ssl,
            notify_arn: record.notify_arn.clone(),
            management_url: record.management_url.clone(),
            cluster: None,
            buckets: Vec::new(),
            replica_buckets: BTreeSet::new(),
        }
    }
}

/// A bucket with its resolved policies and replica topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub bucket_id: BucketId,
    /// Origin deployment id — ownership, never replica membership.
    pub storage_id: StorageId,
    pub name: String,
    /// Resolved origin deployment; `None` when `storage_id` is dangling.
    pub storage_deployment: Option<StorageId>,
    /// Zones this bucket may be replicated into, from the bucket
    /// `zones` policy.
    pub allowed_zones: Vec<String>,
    /// From the `target_replica_count` policy.
    pub target_replica_count: u32,
    /// True iff a `replica_locations` policy assignment exists for
    /// this bucket, independent of the other policies.
    pub replication_overridden: bool,
    /// Deployments holding replicas of this bucket.
    pub replica_storage_deployments: BTreeSet<StorageId>,
    /// Objects stored in this bucket, in snapshot order.
    pub objects: Vec<ObjectId>,
}

impl Bucket {
    fn from_record(record: &BucketRecord) -> Self {
        Self {
            bucket_id: record.bucket_id,
            storage_id: record.storage_id,
            name: record.name.clone(),
            storage_deployment: None,
            allowed_zones: Vec::new(),
            target_replica_count: 0,
            replication_overridden: false,
            replica_storage_deployments: BTreeSet::new(),
            objects: Vec::new(),
        }
    }
}

/// An object stored in a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub object_id: ObjectId,
    pub bucket_id: BucketId,
    pub name: String,
    /// Resolved owning bucket; `None` when `bucket_id` is dangling.
    pub bucket: Option<BucketId>,
}

impl Object {
    fn from_record(record: &ObjectRecord) -> Self {
        Self {
            object_id: record.object_id,
            bucket_id: record.bucket_id,
            name: record.name.clone(),
            bucket: None,
        }
    }
}

/// The materialized entity graph: one registry arena per entity type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    pub clusters: BTreeMap<ClusterId, Cluster>,
    pub faas_deployments: BTreeMap<FaasId, FaasDeployment>,
    pub storage_deployments: BTreeMap<StorageId, StorageDeployment>,
    pub buckets: BTreeMap<BucketId, Bucket>,
    pub objects: BTreeMap<ObjectId, Object>,
}

impl Graph {
    /// Build every registry from the flat snapshot, all derived fields
    /// at their defaults. Duplicate ids overwrite (last write wins).
    pub fn build_registries(snapshot: &ResourceSnapshot) -> Self {
        let mut graph = Graph::default();
        for record in &snapshot.clusters {
            graph
                .clusters
                .insert(record.cluster_id, Cluster::from_record(record));
        }
        for record in &snapshot.faas_deployments {
            graph
                .faas_deployments
                .insert(record.faas_id, FaasDeployment::from_record(record));
        }
        for record in &snapshot.storage_deployments {
            graph
                .storage_deployments
                .insert(record.storage_id, StorageDeployment::from_record(record));
        }
        for record in &snapshot.buckets {
            graph
                .buckets
                .insert(record.bucket_id, Bucket::from_record(record));
        }
        for record in &snapshot.objects {
            graph
                .objects
                .insert(record.object_id, Object::from_record(record));
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_model::BucketRecord;

    #[test]
    fn empty_snapshot_builds_empty_registries() {
        let graph = Graph::build_registries(&ResourceSnapshot::default());
        assert!(graph.clusters.is_empty());
        assert!(graph.buckets.is_empty());
        assert!(graph.objects.is_empty());
    }

    #[test]
    fn derived_fields_start_at_defaults() {
        let snapshot = ResourceSnapshot {
            clusters: vec![ClusterRecord {
                cluster_id: 1,
                name: "edge-1".to_string(),
            }],
            buckets: vec![BucketRecord {
                bucket_id: 7,
                storage_id: 3,
                name: "images".to_string(),
            }],
            ..Default::default()
        };
        let graph = Graph::build_registries(&snapshot);

        let cluster = &graph.clusters[&1];
        assert!(cluster.zones.is_empty());
        assert!(cluster.faas_deployments.is_empty());
        assert!(cluster.storage_deployments.is_empty());

        let bucket = &graph.buckets[&7];
        assert_eq!(bucket.storage_id, 3);
        assert_eq!(bucket.storage_deployment, None);
        assert_eq!(bucket.target_replica_count, 0);
        assert!(bucket.allowed_zones.is_empty());
        assert!(!bucket.replication_overridden);
        assert!(bucket.replica_storage_deployments.is_empty());
        assert!(bucket.objects.is_empty());
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let snapshot = ResourceSnapshot {
            clusters: vec![
                ClusterRecord {
                    cluster_id: 1,
                    name: "first".to_string(),
                },
                ClusterRecord {
                    cluster_id: 1,
                    name: "second".to_string(),
                },
            ],
            ..Default::default()
        };
        let graph = Graph::build_registries(&snapshot);
        assert_eq!(graph.clusters.len(), 1);
        assert_eq!(graph.clusters[&1].name, "second");
    }
}
