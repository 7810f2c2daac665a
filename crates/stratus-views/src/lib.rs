//! stratus-views — display-ready view models.
//!
//! These types are purpose-built for rendering: they carry
//! pre-formatted strings and computed counts so the presentation layer
//! stays simple. Everything is derived from one [`Materialized`]
//! result; no further lookups are needed at render time.

use stratus_graph::Materialized;

// ── Platform summary ──────────────────────────────────────────────

/// Headline counts for the whole platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSummary {
    pub cluster_count: usize,
    pub faas_count: usize,
    pub storage_count: usize,
    pub bucket_count: usize,
    pub object_count: usize,
    /// Buckets with at least one replica location.
    pub replicated_buckets: usize,
    /// Routes currently shadowed by an override.
    pub overridden_routes: usize,
    /// Non-fatal faults from the last materialization.
    pub fault_count: usize,
}

impl PlatformSummary {
    pub fn build(materialized: &Materialized) -> Self {
        let graph = &materialized.graph;
        Self {
            cluster_count: graph.clusters.len(),
            faas_count: graph.faas_deployments.len(),
            storage_count: graph.storage_deployments.len(),
            bucket_count: graph.buckets.len(),
            object_count: graph.objects.len(),
            replicated_buckets: graph
                .buckets
                .values()
                .filter(|b| !b.replica_storage_deployments.is_empty())
                .count(),
            overridden_routes: materialized
                .load_balancer
                .routes
                .keys()
                .filter(|name| materialized.load_balancer.is_overridden(name))
                .count(),
            fault_count: materialized.faults.len(),
        }
    }
}

// ── Entity rows ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRow {
    pub name: String,
    pub zones_display: String,
    pub faas_count: usize,
    pub storage_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaasRow {
    pub url: String,
    pub cluster_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRow {
    pub alias: String,
    pub cluster_name: String,
    pub endpoint: String,
    pub bucket_count: usize,
    pub replica_bucket_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRow {
    pub name: String,
    pub origin_alias: String,
    pub zones_display: String,
    pub target_replica_count: u32,
    /// "manual" when the replica set is pinned, "auto" otherwise.
    pub replication_mode: &'static str,
    pub replica_count: usize,
    pub object_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRow {
    pub name: String,
    pub bucket_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub bucket_name: String,
    pub policy: String,
    pub upstreams_display: String,
    pub overridden: bool,
}

/// Placeholder for a display field whose referent is missing.
const MISSING: &str = "-";

fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        MISSING.to_string()
    } else {
        items.join(", ")
    }
}

pub fn cluster_rows(materialized: &Materialized) -> Vec<ClusterRow> {
    materialized
        .graph
        .clusters
        .values()
        .map(|cluster| ClusterRow {
            name: cluster.name.clone(),
            zones_display: format_list(&cluster.zones),
            faas_count: cluster.faas_deployments.len(),
            storage_count: cluster.storage_deployments.len(),
        })
        .collect()
}

pub fn faas_rows(materialized: &Materialized) -> Vec<FaasRow> {
    let graph = &materialized.graph;
    graph
        .faas_deployments
        .values()
        .map(|faas| FaasRow {
            url: faas.url.clone(),
            cluster_name: faas
                .cluster
                .and_then(|id| graph.clusters.get(&id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
        })
        .collect()
}

pub fn storage_rows(materialized: &Materialized) -> Vec<StorageRow> {
    let graph = &materialized.graph;
    graph
        .storage_deployments
        .values()
        .map(|storage| StorageRow {
            alias: storage.alias.clone(),
            cluster_name: storage
                .cluster
                .and_then(|id| graph.clusters.get(&id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            endpoint: storage.endpoint.clone(),
            bucket_count: storage.buckets.len(),
            replica_bucket_count: storage.replica_buckets.len(),
        })
        .collect()
}

pub fn bucket_rows(materialized: &Materialized) -> Vec<BucketRow> {
    let graph = &materialized.graph;
    graph
        .buckets
        .values()
        .map(|bucket| BucketRow {
            name: bucket.name.clone(),
            origin_alias: bucket
                .storage_deployment
                .and_then(|id| graph.storage_deployments.get(&id))
                .map(|s| s.alias.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            zones_display: format_list(&bucket.allowed_zones),
            target_replica_count: bucket.target_replica_count,
            replication_mode: if bucket.replication_overridden {
                "manual"
            } else {
                "auto"
            },
            replica_count: bucket.replica_storage_deployments.len(),
            object_count: bucket.objects.len(),
        })
        .collect()
}

pub fn object_rows(materialized: &Materialized) -> Vec<ObjectRow> {
    let graph = &materialized.graph;
    graph
        .objects
        .values()
        .map(|object| ObjectRow {
            name: object.name.clone(),
            bucket_name: object
                .bucket
                .and_then(|id| graph.buckets.get(&id))
                .map(|b| b.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
        })
        .collect()
}

pub fn route_rows(materialized: &Materialized) -> Vec<RouteRow> {
    let lb = &materialized.load_balancer;
    lb.routes
        .values()
        .map(|route| RouteRow {
            bucket_name: route.bucket_name.clone(),
            policy: if route.policy.is_empty() {
                MISSING.to_string()
            } else {
                route.policy.clone()
            },
            upstreams_display: format_list(&route.upstreams),
            overridden: lb.is_overridden(&route.bucket_name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_graph::materialize;
    use stratus_model::{
        BucketRecord, ClusterRecord, FaasDeploymentRecord, ObjectRecord, ResourceSnapshot,
        RouteSettings, StorageDeploymentRecord,
    };

    fn snapshot() -> ResourceSnapshot {
        ResourceSnapshot {
            clusters: vec![ClusterRecord {
                cluster_id: 1,
                name: "edge".to_string(),
            }],
            faas_deployments: vec![FaasDeploymentRecord {
                faas_id: 5,
                cluster_id: 1,
                url: "http://10.0.0.2:8080".to_string(),
            }],
            storage_deployments: vec![StorageDeploymentRecord {
                storage_id: 2,
                cluster_id: 1,
                deployment_handle: String::new(),
                alias: "primary".to_string(),
                endpoint: "10.0.0.1:9000".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                use_ssl: false,
                notify_arn: String::new(),
                management_url: String::new(),
            }],
            buckets: vec![BucketRecord {
                bucket_id: 3,
                storage_id: 2,
                name: "images".to_string(),
            }],
            objects: vec![ObjectRecord {
                object_id: 4,
                bucket_id: 3,
                name: "a.png".to_string(),
            }],
            load_balancer_routes: [(
                "images".to_string(),
                RouteSettings {
                    bucket_name: "images".to_string(),
                    policy: "first".to_string(),
                    upstreams: vec!["10.0.0.9:80".to_string()],
                },
            )]
            .into(),
            load_balancer_route_overrides: [(
                "images".to_string(),
                RouteSettings {
                    bucket_name: "images".to_string(),
                    policy: "round_robin".to_string(),
                    upstreams: vec![],
                },
            )]
            .into(),
            ..Default::default()
        }
    }

    #[test]
    fn summary_counts() {
        let out = materialize(&snapshot());
        let summary = PlatformSummary::build(&out);
        assert_eq!(summary.cluster_count, 1);
        assert_eq!(summary.faas_count, 1);
        assert_eq!(summary.bucket_count, 1);
        assert_eq!(summary.object_count, 1);
        assert_eq!(summary.replicated_buckets, 0);
        assert_eq!(summary.overridden_routes, 1);
        assert_eq!(summary.fault_count, 0);
    }

    #[test]
    fn bucket_row_resolves_origin_alias() {
        let out = materialize(&snapshot());
        let rows = bucket_rows(&out);
        assert_eq!(rows[0].name, "images");
        assert_eq!(rows[0].origin_alias, "primary");
        assert_eq!(rows[0].replication_mode, "auto");
        assert_eq!(rows[0].object_count, 1);
    }

    #[test]
    fn faas_row_resolves_owning_cluster() {
        let out = materialize(&snapshot());
        let rows = faas_rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "http://10.0.0.2:8080");
        assert_eq!(rows[0].cluster_name, "edge");
    }

    #[test]
    fn faas_row_dangling_cluster_renders_placeholder() {
        let mut snap = snapshot();
        snap.clusters.clear();
        let out = materialize(&snap);
        let rows = faas_rows(&out);
        assert_eq!(rows[0].cluster_name, "-");
    }

    #[test]
    fn dangling_origin_renders_placeholder() {
        let mut snap = snapshot();
        snap.storage_deployments.clear();
        let out = materialize(&snap);
        let rows = bucket_rows(&out);
        assert_eq!(rows[0].origin_alias, "-");
    }

    #[test]
    fn empty_zone_list_renders_placeholder() {
        let out = materialize(&snapshot());
        let rows = cluster_rows(&out);
        assert_eq!(rows[0].zones_display, "-");
    }

    #[test]
    fn route_row_marks_override() {
        let out = materialize(&snapshot());
        let rows = route_rows(&out);
        assert!(rows[0].overridden);
        assert_eq!(rows[0].upstreams_display, "10.0.0.9:80");
    }
}
