//! Subcommand implementations.
//!
//! Every command fetches (or receives, after a mutation) a full
//! snapshot, materializes it, and renders from the view models. Faults
//! are reported after the table rather than aborting the view.

use std::path::Path;

use bytes::Bytes;
use stratus_client::{ConsoleClient, LbOverridesInput, LbSettingsInput};
use stratus_graph::{materialize, Materialized};
use stratus_model::{ResourceSnapshot, RouteSettings};
use stratus_views as views;

fn render_faults(materialized: &Materialized) {
    if materialized.faults.is_empty() {
        return;
    }
    println!();
    println!("{} fault(s) in snapshot:", materialized.faults.len());
    for fault in &materialized.faults {
        println!("  ! {fault}");
    }
}

async fn fetch(client: &ConsoleClient) -> anyhow::Result<Materialized> {
    let snapshot = client.list_resources().await?;
    Ok(materialize(&snapshot))
}

fn remat(snapshot: ResourceSnapshot) -> Materialized {
    materialize(&snapshot)
}

pub async fn summary(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    let summary = views::PlatformSummary::build(&out);
    println!("clusters:            {}", summary.cluster_count);
    println!("faas deployments:    {}", summary.faas_count);
    println!("storage deployments: {}", summary.storage_count);
    println!("buckets:             {}", summary.bucket_count);
    println!("  replicated:        {}", summary.replicated_buckets);
    println!("objects:             {}", summary.object_count);
    println!("overridden routes:   {}", summary.overridden_routes);
    render_faults(&out);
    Ok(())
}

pub async fn clusters(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    println!("{:<24} {:<32} {:>6} {:>8}", "NAME", "ZONES", "FAAS", "STORAGE");
    for row in views::cluster_rows(&out) {
        println!(
            "{:<24} {:<32} {:>6} {:>8}",
            row.name, row.zones_display, row.faas_count, row.storage_count
        );
    }
    render_faults(&out);
    Ok(())
}

pub async fn faas(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    println!("{:<40} {:<16}", "URL", "CLUSTER");
    for row in views::faas_rows(&out) {
        println!("{:<40} {:<16}", row.url, row.cluster_name);
    }
    render_faults(&out);
    Ok(())
}

pub async fn storage(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    println!(
        "{:<16} {:<16} {:<24} {:>8} {:>9}",
        "ALIAS", "CLUSTER", "ENDPOINT", "BUCKETS", "REPLICAS"
    );
    for row in views::storage_rows(&out) {
        println!(
            "{:<16} {:<16} {:<24} {:>8} {:>9}",
            row.alias, row.cluster_name, row.endpoint, row.bucket_count, row.replica_bucket_count
        );
    }
    render_faults(&out);
    Ok(())
}

pub async fn buckets(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    println!(
        "{:<20} {:<16} {:<24} {:>7} {:<8} {:>8} {:>8}",
        "NAME", "ORIGIN", "ALLOWED ZONES", "TARGET", "MODE", "REPLICAS", "OBJECTS"
    );
    for row in views::bucket_rows(&out) {
        println!(
            "{:<20} {:<16} {:<24} {:>7} {:<8} {:>8} {:>8}",
            row.name,
            row.origin_alias,
            row.zones_display,
            row.target_replica_count,
            row.replication_mode,
            row.replica_count,
            row.object_count
        );
    }
    render_faults(&out);
    Ok(())
}

pub async fn objects(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    println!("{:<40} {:<20}", "NAME", "BUCKET");
    for row in views::object_rows(&out) {
        println!("{:<40} {:<20}", row.name, row.bucket_name);
    }
    render_faults(&out);
    Ok(())
}

pub async fn lb_routes(client: &ConsoleClient) -> anyhow::Result<()> {
    let out = fetch(client).await?;
    let settings = &out.load_balancer.settings;
    println!("policy:       {}", settings.policy);
    println!("match header: {}", settings.match_header);
    println!("listen:       {}:{}", settings.host, settings.port);
    println!();
    println!(
        "{:<20} {:<14} {:<40} {:<10}",
        "BUCKET", "POLICY", "UPSTREAMS", "OVERRIDDEN"
    );
    for row in views::route_rows(&out) {
        println!(
            "{:<20} {:<14} {:<40} {:<10}",
            row.bucket_name,
            row.policy,
            row.upstreams_display,
            if row.overridden { "yes" } else { "no" }
        );
    }
    render_faults(&out);
    Ok(())
}

pub async fn lb_set_settings(
    client: &ConsoleClient,
    policy: String,
    match_header: String,
) -> anyhow::Result<()> {
    let snapshot = client
        .set_lb_settings(&LbSettingsInput {
            policy,
            match_header,
        })
        .await?;
    let out = remat(snapshot);
    println!("✓ settings updated");
    println!("policy:       {}", out.load_balancer.settings.policy);
    println!("match header: {}", out.load_balancer.settings.match_header);
    render_faults(&out);
    Ok(())
}

/// Overrides are replaced as a whole document: fetch the current map,
/// edit the one entry, send everything back.
pub async fn lb_set_override(
    client: &ConsoleClient,
    bucket: String,
    policy: String,
    upstreams: Vec<String>,
) -> anyhow::Result<()> {
    let current = client.list_resources().await?;
    let mut route_overrides = current.load_balancer_route_overrides.clone();
    route_overrides.insert(
        bucket.clone(),
        RouteSettings {
            bucket_name: bucket.clone(),
            policy,
            upstreams,
        },
    );
    let snapshot = client
        .set_lb_overrides(&LbOverridesInput { route_overrides })
        .await?;
    let out = remat(snapshot);
    println!("✓ override set for {bucket}");
    render_faults(&out);
    Ok(())
}

pub async fn lb_clear_override(client: &ConsoleClient, bucket: String) -> anyhow::Result<()> {
    let current = client.list_resources().await?;
    let mut route_overrides = current.load_balancer_route_overrides.clone();
    if route_overrides.remove(&bucket).is_none() {
        println!("no override for {bucket}");
        return Ok(());
    }
    let snapshot = client
        .set_lb_overrides(&LbOverridesInput { route_overrides })
        .await?;
    let out = remat(snapshot);
    println!("✓ override cleared for {bucket}");
    render_faults(&out);
    Ok(())
}

pub async fn upload(client: &ConsoleClient, bucket_id: i64, file: &Path) -> anyhow::Result<()> {
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid file name: {}", file.display()))?
        .to_string();
    let payload = std::fs::read(file)?;
    let snapshot = client
        .upload_object(bucket_id, &filename, Bytes::from(payload))
        .await?;
    let out = remat(snapshot);
    println!("✓ uploaded {filename}");
    render_faults(&out);
    Ok(())
}
