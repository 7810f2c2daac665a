//! Snapshot assembler — the materialization entry point.
//!
//! Orchestrates the passes in dependency order: policy index →
//! registries → policy resolver → graph linker → load-balancing view
//! model. One synchronous pass, no fix-point; the snapshot is acyclic
//! by construction (policies → entities → relations).

use tracing::debug;

use stratus_model::{PolicyRecord, ResourceSnapshot};

use crate::error::{Fault, GraphError, GraphResult};
use crate::graph::Graph;
use crate::lb::LbViewModel;
use crate::linker::link_graph;
use crate::policy::{
    annotate_bucket_policies, annotate_cluster_policies, annotate_global_policies,
    apply_bucket_policies, apply_cluster_policies, NamedBucketPolicy, NamedClusterPolicy,
    NamedGlobalPolicy, PolicyIndex,
};

/// The finished product of one materialization call.
///
/// Carries the linked graph, the load-balancing view model, the flat
/// policy-assignment lists (name-annotated, unknown policies preserved
/// verbatim), and every non-fatal fault encountered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    pub graph: Graph,
    pub load_balancer: LbViewModel,
    pub policies: Vec<PolicyRecord>,
    pub global_policies: Vec<NamedGlobalPolicy>,
    pub cluster_policies: Vec<NamedClusterPolicy>,
    pub bucket_policies: Vec<NamedBucketPolicy>,
    pub faults: Vec<Fault>,
}

/// Materialize a well-shaped snapshot into the linked graph.
///
/// Pure and idempotent: the same snapshot always yields a structurally
/// equal result, and the input is never mutated. Referential
/// incompleteness never fails — dangling links are skipped and
/// collected in `faults`.
pub fn materialize(snapshot: &ResourceSnapshot) -> Materialized {
    let mut faults = Vec::new();

    let index = PolicyIndex::build(&snapshot.policies);
    let mut graph = Graph::build_registries(snapshot);

    apply_cluster_policies(&mut graph, &index, &snapshot.clusters_policies, &mut faults);
    apply_bucket_policies(&mut graph, &index, &snapshot.buckets_policies, &mut faults);
    link_graph(&mut graph, snapshot, &mut faults);

    let load_balancer = LbViewModel::assemble(snapshot);

    debug!(
        clusters = graph.clusters.len(),
        storage_deployments = graph.storage_deployments.len(),
        buckets = graph.buckets.len(),
        objects = graph.objects.len(),
        faults = faults.len(),
        "snapshot materialized"
    );

    Materialized {
        graph,
        load_balancer,
        policies: snapshot.policies.clone(),
        global_policies: annotate_global_policies(&index, &snapshot.global_policies),
        cluster_policies: annotate_cluster_policies(&index, &snapshot.clusters_policies),
        bucket_policies: annotate_bucket_policies(&index, &snapshot.buckets_policies),
        faults,
    }
}

/// Decode a JSON snapshot body and materialize it.
///
/// Structural problems (a collection that is not list-shaped, wrong
/// field types) are fatal: no partial graph is returned.
pub fn materialize_slice(bytes: &[u8]) -> GraphResult<Materialized> {
    let snapshot: ResourceSnapshot =
        serde_json::from_slice(bytes).map_err(|e| GraphError::Shape(e.to_string()))?;
    Ok(materialize(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_model::{
        BucketPolicyRecord, BucketRecord, ClusterRecord, ObjectRecord, StorageDeploymentRecord,
    };

    fn scenario_snapshot() -> ResourceSnapshot {
        ResourceSnapshot {
            policies: vec![
                PolicyRecord {
                    policy_id: 1,
                    name: "zones".to_string(),
                    default_value: "[]".to_string(),
                },
                PolicyRecord {
                    policy_id: 2,
                    name: "target_replica_count".to_string(),
                    default_value: "0".to_string(),
                },
            ],
            clusters: vec![ClusterRecord {
                cluster_id: 1,
                name: "c1".to_string(),
            }],
            storage_deployments: vec![StorageDeploymentRecord {
                storage_id: 2,
                cluster_id: 1,
                deployment_handle: String::new(),
                alias: "s1".to_string(),
                endpoint: "127.0.0.1:9000".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                use_ssl: false,
                notify_arn: String::new(),
                management_url: String::new(),
            }],
            buckets: vec![BucketRecord {
                bucket_id: 3,
                storage_id: 2,
                name: "b1".to_string(),
            }],
            buckets_policies: vec![
                BucketPolicyRecord {
                    bucket_id: 3,
                    policy_id: 1,
                    value: r#"["us-east"]"#.to_string(),
                },
                BucketPolicyRecord {
                    bucket_id: 3,
                    policy_id: 2,
                    value: "2".to_string(),
                },
            ],
            objects: vec![ObjectRecord {
                object_id: 4,
                bucket_id: 3,
                name: "o1".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let out = materialize(&scenario_snapshot());
        assert!(out.faults.is_empty());

        let cluster = &out.graph.clusters[&1];
        assert!(cluster.zones.is_empty()); // no cluster zone policy
        assert_eq!(cluster.storage_deployments, vec![2]);

        let storage = &out.graph.storage_deployments[&2];
        assert_eq!(storage.cluster, Some(1));
        assert_eq!(storage.buckets, vec![3]);

        let bucket = &out.graph.buckets[&3];
        assert_eq!(bucket.storage_deployment, Some(2));
        assert_eq!(bucket.allowed_zones, vec!["us-east"]);
        assert_eq!(bucket.target_replica_count, 2);
        assert!(!bucket.replication_overridden);
        assert_eq!(bucket.objects, vec![4]);

        assert_eq!(out.graph.objects[&4].bucket, Some(3));
    }

    #[test]
    fn materialization_is_idempotent() {
        let snapshot = scenario_snapshot();
        let first = materialize(&snapshot);
        let second = materialize(&snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn input_is_not_mutated() {
        let snapshot = scenario_snapshot();
        let copy = snapshot.clone();
        let _ = materialize(&snapshot);
        assert_eq!(snapshot, copy);
    }

    #[test]
    fn empty_snapshot_materializes_clean() {
        let out = materialize(&ResourceSnapshot::default());
        assert!(out.faults.is_empty());
        assert!(out.graph.clusters.is_empty());
        assert_eq!(out.load_balancer.settings.policy, "-");
    }

    #[test]
    fn malformed_body_is_a_fatal_shape_error() {
        let err = materialize_slice(br#"{"buckets": 7}"#).unwrap_err();
        assert!(matches!(err, GraphError::Shape(_)));
    }

    #[test]
    fn well_formed_body_materializes() {
        let out = materialize_slice(br#"{"clusters":[{"cluster_id":1,"name":"c1"}]}"#).unwrap();
        assert_eq!(out.graph.clusters.len(), 1);
    }
}
