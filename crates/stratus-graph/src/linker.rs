//! Graph linker — the cross-entity join passes.
//!
//! Runs after the registries are built and policies resolved. Each
//! pass iterates one flat snapshot collection in order, so derived
//! sequences keep snapshot order. A dangling foreign key skips the
//! link and records a fault; the orphan stays in its registry with
//! defaults.

use tracing::warn;

use stratus_model::ResourceSnapshot;

use crate::error::Fault;
use crate::graph::Graph;

/// Perform all join passes in dependency order.
pub fn link_graph(graph: &mut Graph, snapshot: &ResourceSnapshot, faults: &mut Vec<Fault>) {
    link_faas_deployments(graph, snapshot, faults);
    link_storage_deployments(graph, snapshot, faults);
    link_buckets(graph, snapshot, faults);
    link_replica_topology(graph, snapshot, faults);
    link_objects(graph, snapshot, faults);
}

fn link_faas_deployments(graph: &mut Graph, snapshot: &ResourceSnapshot, faults: &mut Vec<Fault>) {
    for record in &snapshot.faas_deployments {
        if let Some(cluster) = graph.clusters.get_mut(&record.cluster_id) {
            cluster.faas_deployments.push(record.faas_id);
            if let Some(faas) = graph.faas_deployments.get_mut(&record.faas_id) {
                faas.cluster = Some(record.cluster_id);
            }
        } else {
            warn!(
                faas_id = record.faas_id,
                cluster_id = record.cluster_id,
                "faas deployment references missing cluster"
            );
            faults.push(Fault::DanglingReference {
                entity: "faas deployment",
                id: record.faas_id,
                target: "cluster",
                target_id: record.cluster_id,
            });
        }
    }
}

fn link_storage_deployments(
    graph: &mut Graph,
    snapshot: &ResourceSnapshot,
    faults: &mut Vec<Fault>,
) {
    for record in &snapshot.storage_deployments {
        if let Some(cluster) = graph.clusters.get_mut(&record.cluster_id) {
            cluster.storage_deployments.push(record.storage_id);
            if let Some(storage) = graph.storage_deployments.get_mut(&record.storage_id) {
                storage.cluster = Some(record.cluster_id);
            }
        } else {
            warn!(
                storage_id = record.storage_id,
                cluster_id = record.cluster_id,
                "storage deployment references missing cluster"
            );
            faults.push(Fault::DanglingReference {
                entity: "storage deployment",
                id: record.storage_id,
                target: "cluster",
                target_id: record.cluster_id,
            });
        }
    }
}

fn link_buckets(graph: &mut Graph, snapshot: &ResourceSnapshot, faults: &mut Vec<Fault>) {
    for record in &snapshot.buckets {
        if let Some(storage) = graph.storage_deployments.get_mut(&record.storage_id) {
            storage.buckets.push(record.bucket_id);
            if let Some(bucket) = graph.buckets.get_mut(&record.bucket_id) {
                bucket.storage_deployment = Some(record.storage_id);
            }
        } else {
            warn!(
                bucket_id = record.bucket_id,
                storage_id = record.storage_id,
                "bucket references missing storage deployment"
            );
            faults.push(Fault::DanglingReference {
                entity: "bucket",
                id: record.bucket_id,
                target: "storage deployment",
                target_id: record.storage_id,
            });
        }
    }
}

/// The many-to-many replica edge. Both directions are populated from
/// the same pass; an edge with either endpoint missing is skipped
/// entirely so the two sides never diverge.
fn link_replica_topology(graph: &mut Graph, snapshot: &ResourceSnapshot, faults: &mut Vec<Fault>) {
    for record in &snapshot.replica_bucket_locations {
        let bucket_present = graph.buckets.contains_key(&record.bucket_id);
        let storage_present = graph.storage_deployments.contains_key(&record.storage_id);

        if !bucket_present {
            faults.push(Fault::DanglingReference {
                entity: "replica location",
                id: record.storage_id,
                target: "bucket",
                target_id: record.bucket_id,
            });
        }
        if !storage_present {
            faults.push(Fault::DanglingReference {
                entity: "replica location",
                id: record.bucket_id,
                target: "storage deployment",
                target_id: record.storage_id,
            });
        }
        if !(bucket_present && storage_present) {
            warn!(
                bucket_id = record.bucket_id,
                storage_id = record.storage_id,
                "replica location edge skipped"
            );
            continue;
        }

        if let Some(storage) = graph.storage_deployments.get_mut(&record.storage_id) {
            storage.replica_buckets.insert(record.bucket_id);
        }
        if let Some(bucket) = graph.buckets.get_mut(&record.bucket_id) {
            bucket.replica_storage_deployments.insert(record.storage_id);
        }
    }
}

fn link_objects(graph: &mut Graph, snapshot: &ResourceSnapshot, faults: &mut Vec<Fault>) {
    for record in &snapshot.objects {
        if let Some(bucket) = graph.buckets.get_mut(&record.bucket_id) {
            bucket.objects.push(record.object_id);
            if let Some(object) = graph.objects.get_mut(&record.object_id) {
                object.bucket = Some(record.bucket_id);
            }
        } else {
            warn!(
                object_id = record.object_id,
                bucket_id = record.bucket_id,
                "object references missing bucket"
            );
            faults.push(Fault::DanglingReference {
                entity: "object",
                id: record.object_id,
                target: "bucket",
                target_id: record.bucket_id,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_model::{
        BucketRecord, ClusterRecord, FaasDeploymentRecord, ObjectRecord,
        ReplicaBucketLocationRecord, StorageDeploymentRecord,
    };

    fn cluster(cluster_id: i64) -> ClusterRecord {
        ClusterRecord {
            cluster_id,
            name: format!("cluster-{cluster_id}"),
        }
    }

    fn storage(storage_id: i64, cluster_id: i64) -> StorageDeploymentRecord {
        StorageDeploymentRecord {
            storage_id,
            cluster_id,
            deployment_handle: String::new(),
            alias: format!("store-{storage_id}"),
            endpoint: "127.0.0.1:9000".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            use_ssl: false,
            notify_arn: String::new(),
            management_url: String::new(),
        }
    }

    fn bucket(bucket_id: i64, storage_id: i64) -> BucketRecord {
        BucketRecord {
            bucket_id,
            storage_id,
            name: format!("bucket-{bucket_id}"),
        }
    }

    fn linked(snapshot: &ResourceSnapshot) -> (Graph, Vec<Fault>) {
        let mut graph = Graph::build_registries(snapshot);
        let mut faults = Vec::new();
        link_graph(&mut graph, snapshot, &mut faults);
        (graph, faults)
    }

    #[test]
    fn deployments_link_both_directions() {
        let snapshot = ResourceSnapshot {
            clusters: vec![cluster(1)],
            faas_deployments: vec![FaasDeploymentRecord {
                faas_id: 2,
                cluster_id: 1,
                url: "http://faas".to_string(),
            }],
            storage_deployments: vec![storage(3, 1)],
            ..Default::default()
        };
        let (graph, faults) = linked(&snapshot);
        assert!(faults.is_empty());
        assert_eq!(graph.clusters[&1].faas_deployments, vec![2]);
        assert_eq!(graph.clusters[&1].storage_deployments, vec![3]);
        assert_eq!(graph.faas_deployments[&2].cluster, Some(1));
        assert_eq!(graph.storage_deployments[&3].cluster, Some(1));
    }

    #[test]
    fn sequences_keep_snapshot_order() {
        let snapshot = ResourceSnapshot {
            clusters: vec![cluster(1)],
            // Not sorted by id: order must survive as-is.
            storage_deployments: vec![storage(9, 1), storage(4, 1), storage(7, 1)],
            ..Default::default()
        };
        let (graph, _) = linked(&snapshot);
        assert_eq!(graph.clusters[&1].storage_deployments, vec![9, 4, 7]);
    }

    #[test]
    fn dangling_cluster_reference_is_skipped_not_fatal() {
        let snapshot = ResourceSnapshot {
            storage_deployments: vec![storage(3, 99)],
            ..Default::default()
        };
        let (graph, faults) = linked(&snapshot);
        let orphan = &graph.storage_deployments[&3];
        assert_eq!(orphan.cluster, None);
        assert!(orphan.buckets.is_empty());
        assert_eq!(
            faults,
            vec![Fault::DanglingReference {
                entity: "storage deployment",
                id: 3,
                target: "cluster",
                target_id: 99,
            }]
        );
    }

    #[test]
    fn dangling_bucket_origin_keeps_bucket_in_registry() {
        let snapshot = ResourceSnapshot {
            buckets: vec![bucket(5, 99)],
            ..Default::default()
        };
        let (graph, faults) = linked(&snapshot);
        assert_eq!(graph.buckets[&5].storage_deployment, None);
        assert_eq!(faults.len(), 1);
    }

    #[test]
    fn replica_topology_is_symmetric() {
        let snapshot = ResourceSnapshot {
            clusters: vec![cluster(1)],
            storage_deployments: vec![storage(3, 1), storage(4, 1)],
            buckets: vec![bucket(5, 3)],
            replica_bucket_locations: vec![ReplicaBucketLocationRecord {
                bucket_id: 5,
                storage_id: 4,
            }],
            ..Default::default()
        };
        let (graph, faults) = linked(&snapshot);
        assert!(faults.is_empty());
        assert!(graph.buckets[&5].replica_storage_deployments.contains(&4));
        assert!(graph.storage_deployments[&4].replica_buckets.contains(&5));
        // Origin is untouched by replica membership.
        assert_eq!(graph.buckets[&5].storage_deployment, Some(3));
        assert!(graph.storage_deployments[&3].replica_buckets.is_empty());
    }

    #[test]
    fn replica_edge_with_missing_endpoint_populates_neither_side() {
        let snapshot = ResourceSnapshot {
            clusters: vec![cluster(1)],
            storage_deployments: vec![storage(3, 1)],
            buckets: vec![bucket(5, 3)],
            replica_bucket_locations: vec![ReplicaBucketLocationRecord {
                bucket_id: 5,
                storage_id: 99,
            }],
            ..Default::default()
        };
        let (graph, faults) = linked(&snapshot);
        assert!(graph.buckets[&5].replica_storage_deployments.is_empty());
        assert_eq!(faults.len(), 1);
    }

    #[test]
    fn objects_link_to_buckets_in_order() {
        let snapshot = ResourceSnapshot {
            clusters: vec![cluster(1)],
            storage_deployments: vec![storage(3, 1)],
            buckets: vec![bucket(5, 3)],
            objects: vec![
                ObjectRecord {
                    object_id: 11,
                    bucket_id: 5,
                    name: "b.txt".to_string(),
                },
                ObjectRecord {
                    object_id: 10,
                    bucket_id: 5,
                    name: "a.txt".to_string(),
                },
            ],
            ..Default::default()
        };
        let (graph, faults) = linked(&snapshot);
        assert!(faults.is_empty());
        assert_eq!(graph.buckets[&5].objects, vec![11, 10]);
        assert_eq!(graph.objects[&11].bucket, Some(5));
    }
}
