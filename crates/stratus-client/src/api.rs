//! Typed backend operations.
//!
//! Mirrors the backend's endpoint surface: CRUD per entity, the two
//! load-balancer replace endpoints, and object upload. Every mutation
//! returns the full replacement snapshot.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use serde::Serialize;

use stratus_model::{
    BucketId, BucketRecord, ClusterId, ClusterRecord, FaasDeploymentRecord, FaasId, ObjectId,
    ResourceSnapshot, RouteSettings, StorageDeploymentRecord, StorageId,
};

use crate::error::{ClientError, ClientResult};
use crate::transport::{request, Endpoint};

const JSON: &str = "application/json";

// ── Request payloads ──────────────────────────────────────────────

/// Create/update payload for a cluster: record plus its zone policy.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterInput {
    pub cluster: ClusterRecord,
    pub zones: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaasInput {
    pub faas_deployment: FaasDeploymentRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageInput {
    pub storage_deployment: StorageDeploymentRecord,
}

/// Create/update payload for a bucket: record plus its policies and
/// explicit replica locations.
#[derive(Debug, Clone, Serialize)]
pub struct BucketInput {
    pub bucket: BucketRecord,
    pub target_replica_count: u32,
    pub zones: Vec<String>,
    pub replica_storage_ids: Vec<StorageId>,
}

/// The four load-balancer scalars, replaced as a unit. Host and port
/// are fixed at backend startup; the two editable fields travel here.
#[derive(Debug, Clone, Serialize)]
pub struct LbSettingsInput {
    pub policy: String,
    pub match_header: String,
}

/// The whole overrides map, replaced as a unit — never a per-route
/// patch. Callers must send back the full map they hold.
#[derive(Debug, Clone, Serialize)]
pub struct LbOverridesInput {
    pub route_overrides: BTreeMap<String, RouteSettings>,
}

// ── Client ────────────────────────────────────────────────────────

/// Async client for the orchestration backend.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    endpoint: Endpoint,
    timeout: Duration,
}

fn delete_path(resource: &str, id: i64, permanent: bool) -> String {
    if permanent {
        format!("/api/{resource}/{id}?permanent=true")
    } else {
        format!("/api/{resource}/{id}")
    }
}

fn upload_path(bucket_id: BucketId, filename: &str) -> String {
    // Filenames come straight from the local filesystem and may carry
    // characters that are invalid in a request target.
    format!(
        "/api/objects/{bucket_id}?filename={}",
        urlencoding::encode(filename)
    )
}

impl ConsoleClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            endpoint: Endpoint::parse(base_url)?,
            timeout,
        })
    }

    async fn snapshot_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        content_type: &str,
    ) -> ClientResult<ResourceSnapshot> {
        let bytes = request(
            &self.endpoint,
            method,
            path,
            body,
            content_type,
            self.timeout,
        )
        .await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> ClientResult<ResourceSnapshot> {
        let body = serde_json::to_vec(payload).map_err(|e| ClientError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        self.snapshot_request(method, path, Some(Bytes::from(body)), JSON)
            .await
    }

    /// Fetch the full flat resource snapshot.
    pub async fn list_resources(&self) -> ClientResult<ResourceSnapshot> {
        self.snapshot_request(Method::GET, "/api/resources", None, JSON)
            .await
    }

    // ── Clusters ───────────────────────────────────────────────

    pub async fn add_cluster(&self, input: &ClusterInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::POST, "/api/clusters", input).await
    }

    pub async fn edit_cluster(&self, input: &ClusterInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::PUT, "/api/clusters", input).await
    }

    pub async fn delete_cluster(
        &self,
        cluster_id: ClusterId,
        permanent: bool,
    ) -> ClientResult<ResourceSnapshot> {
        let path = delete_path("clusters", cluster_id, permanent);
        self.snapshot_request(Method::DELETE, &path, None, JSON).await
    }

    // ── FaaS deployments ───────────────────────────────────────

    pub async fn add_faas(&self, input: &FaasInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::POST, "/api/faas-deployments", input)
            .await
    }

    pub async fn edit_faas(&self, input: &FaasInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::PUT, "/api/faas-deployments", input)
            .await
    }

    pub async fn delete_faas(&self, faas_id: FaasId) -> ClientResult<ResourceSnapshot> {
        let path = delete_path("faas-deployments", faas_id, false);
        self.snapshot_request(Method::DELETE, &path, None, JSON).await
    }

    // ── Storage deployments ────────────────────────────────────

    pub async fn add_storage(&self, input: &StorageInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::POST, "/api/storage-deployments", input)
            .await
    }

    pub async fn delete_storage(
        &self,
        storage_id: StorageId,
        permanent: bool,
    ) -> ClientResult<ResourceSnapshot> {
        let path = delete_path("storage-deployments", storage_id, permanent);
        self.snapshot_request(Method::DELETE, &path, None, JSON).await
    }

    // ── Buckets ────────────────────────────────────────────────

    pub async fn add_bucket(&self, input: &BucketInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::POST, "/api/buckets", input).await
    }

    pub async fn edit_bucket(&self, input: &BucketInput) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::PUT, "/api/buckets", input).await
    }

    pub async fn delete_bucket(&self, bucket_id: BucketId) -> ClientResult<ResourceSnapshot> {
        let path = delete_path("buckets", bucket_id, false);
        self.snapshot_request(Method::DELETE, &path, None, JSON).await
    }

    // ── Objects ────────────────────────────────────────────────

    /// Upload a binary payload into a bucket. The backend stores it
    /// and responds with the refreshed snapshot.
    pub async fn upload_object(
        &self,
        bucket_id: BucketId,
        filename: &str,
        payload: Bytes,
    ) -> ClientResult<ResourceSnapshot> {
        let path = upload_path(bucket_id, filename);
        self.snapshot_request(
            Method::POST,
            &path,
            Some(payload),
            "application/octet-stream",
        )
        .await
    }

    pub async fn delete_object(&self, object_id: ObjectId) -> ClientResult<ResourceSnapshot> {
        let path = delete_path("objects", object_id, false);
        self.snapshot_request(Method::DELETE, &path, None, JSON).await
    }

    // ── Load balancer ──────────────────────────────────────────

    pub async fn set_lb_settings(
        &self,
        input: &LbSettingsInput,
    ) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::PUT, "/api/load-balancer/settings", input)
            .await
    }

    pub async fn set_lb_overrides(
        &self,
        input: &LbOverridesInput,
    ) -> ClientResult<ResourceSnapshot> {
        self.send_json(Method::PUT, "/api/load-balancer/route-overrides", input)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_paths() {
        assert_eq!(delete_path("buckets", 7, false), "/api/buckets/7");
        assert_eq!(
            delete_path("clusters", 3, true),
            "/api/clusters/3?permanent=true"
        );
        assert_eq!(
            delete_path("storage-deployments", 2, true),
            "/api/storage-deployments/2?permanent=true"
        );
    }

    #[test]
    fn upload_path_escapes_filename() {
        assert_eq!(upload_path(7, "a.png"), "/api/objects/7?filename=a.png");
        assert_eq!(
            upload_path(7, "report 2024&final.pdf"),
            "/api/objects/7?filename=report%202024%26final.pdf"
        );
    }

    #[test]
    fn cluster_input_wire_shape() {
        let input = ClusterInput {
            cluster: ClusterRecord {
                cluster_id: 0,
                name: "edge".to_string(),
            },
            zones: vec!["us-east".to_string()],
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["cluster"]["name"], "edge");
        assert_eq!(json["zones"][0], "us-east");
    }

    #[test]
    fn overrides_input_sends_whole_map() {
        let input = LbOverridesInput {
            route_overrides: [(
                "images".to_string(),
                RouteSettings {
                    bucket_name: "images".to_string(),
                    policy: "first".to_string(),
                    upstreams: vec![],
                },
            )]
            .into(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["route_overrides"]["images"]["bucket_name"], "images");
    }

    #[test]
    fn client_rejects_bad_base_url() {
        assert!(ConsoleClient::new("ftp://x", Duration::from_secs(1)).is_err());
    }
}
