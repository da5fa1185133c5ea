//! Snapshot dumper
//!
//! Adds every camera from a JSON catalog to a registry and periodically
//! writes each camera's latest frame to `<OUT_DIR>/<id>.jpg`.
//!
//! Run with: cargo run --example snapshot_dump [CATALOG] [OUT_DIR]
//!
//! Examples:
//!   cargo run --example snapshot_dump                         # synthetic camera, ./snapshots
//!   cargo run --example snapshot_dump cameras.json            # cameras from a catalog
//!   cargo run --features rtsp-gstreamer --example snapshot_dump cameras.json /tmp/snaps
//!
//! Without the `rtsp-gstreamer` feature only `stub://` cameras can be
//! opened; the others are reported and skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use camcache::{CameraCatalog, CameraConfig, RegistryConfig, StreamRegistry};

const DUMP_INTERVAL: Duration = Duration::from_secs(2);

fn print_usage() {
    eprintln!("Usage: snapshot_dump [CATALOG] [OUT_DIR]");
    eprintln!();
    eprintln!("  CATALOG   JSON file of camera definitions (default: built-in test camera)");
    eprintln!("  OUT_DIR   directory for <id>.jpg snapshots (default: ./snapshots)");
}

async fn load_cameras(path: Option<&str>) -> camcache::Result<CameraCatalog> {
    match path {
        Some(path) => Ok(CameraCatalog::load(path).await?),
        None => {
            let mut catalog = CameraCatalog::new("cameras.json");
            catalog.upsert(
                "test_pattern",
                CameraConfig::new("stub://test-pattern")
                    .name("Synthetic test pattern")
                    .fps(5)
                    .resolution(640, 480),
            );
            Ok(catalog)
        }
    }
}

async fn dump_all(registry: &StreamRegistry, out_dir: &Path) {
    for id in registry.ids().await {
        match registry.get_frame(&id).await {
            Ok(frame) => {
                let path = out_dir.join(format!("{}.jpg", id));
                if let Err(e) = tokio::fs::write(&path, &frame.data).await {
                    tracing::error!(stream = %id, path = %path.display(), error = %e, "Write failed");
                    continue;
                }
                tracing::debug!(
                    stream = %id,
                    sequence = frame.sequence,
                    bytes = frame.len(),
                    age_ms = frame.age().as_millis() as u64,
                    "Snapshot written"
                );
            }
            Err(e) => tracing::info!(stream = %id, "{}", e),
        }

        if let Some(stats) = registry.stream_stats(&id).await {
            println!(
                "[{}] state={} frames={} read_failures={} encode_failures={} fps={:.1}",
                id,
                stats.state,
                stats.frames_decoded,
                stats.read_failures,
                stats.encode_failures,
                stats.effective_fps(),
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("camcache=info".parse()?)
                .add_directive("snapshot_dump=debug".parse()?),
        )
        .init();

    let out_dir = PathBuf::from(args.get(2).map(String::as_str).unwrap_or("snapshots"));
    tokio::fs::create_dir_all(&out_dir).await?;

    let catalog = load_cameras(args.get(1).map(String::as_str)).await?;
    if catalog.is_empty() {
        eprintln!("No cameras in {}", catalog.path().display());
        return Ok(());
    }

    let config = RegistryConfig::default()
        .read_backoff(Duration::from_millis(500))
        .degrade_after(5);
    let registry = Arc::new(StreamRegistry::with_config(config));

    for (id, camera) in catalog.iter() {
        match registry.add(id, camera.clone()).await {
            Ok(()) => println!("Added {} ({})", id, camera.name),
            Err(e) => eprintln!("Skipping {}: {}", id, e),
        }
    }

    println!("Writing snapshots to {} every {:?}", out_dir.display(), DUMP_INTERVAL);
    println!("Press Ctrl+C to stop");

    let dumper = {
        let registry = Arc::clone(&registry);
        let out_dir = out_dir.clone();
        async move {
            let mut ticker = tokio::time::interval(DUMP_INTERVAL);
            loop {
                ticker.tick().await;
                dump_all(&registry, &out_dir).await;
            }
        }
    };

    tokio::select! {
        _ = dumper => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    registry.shutdown().await;
    Ok(())
}
