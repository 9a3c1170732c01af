//! Vehicle stoppage identification.
//!
//! Telemetry samples go through the segmentation engine, which finds runs of
//! zero-speed samples lasting at least the configured threshold. The geometry
//! builder then projects the traveled path and one marker per stoppage for a
//! map renderer. The `map` module holds the presentation state that ties the
//! two to a threshold control and a selection.

pub mod cli;
pub mod display;
pub mod feed;
pub mod geometry;
pub mod map;
pub mod models;
pub mod segmentation;
pub mod settings;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands, DEFAULT_DATA_PATH, DEFAULT_SETTINGS_PATH};
use display::{describe_local, format_timestamp};
use map::{JsonFileSurface, MapController};
use segmentation::{parse_threshold_input, SegmentationConfig};
use settings::SettingsStore;
use utils::logging::level_override;

pub use models::{GeoCoord, Sample, Stoppage};
pub use segmentation::{segment, segment_track, Segmentation, SegmentationError};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (reads RUST_LOG env var)
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level_override(cli.verbose, std::env::var_os("RUST_LOG").is_some()) {
        builder.filter_level(level);
    }
    builder.init();

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = SettingsStore::new(settings_path)?;

    if let Commands::SetThreshold { minutes } = &cli.command {
        let threshold_minutes = parse_threshold_input(minutes)?;
        settings.update_threshold(threshold_minutes)?;
        println!("Default stoppage threshold set to {threshold_minutes} minutes");
        return Ok(());
    }

    let threshold_minutes = match &cli.threshold {
        Some(raw) => parse_threshold_input(raw)?,
        None => settings.threshold_minutes(),
    };
    let data_path = cli
        .data
        .clone()
        .or_else(|| settings.settings().data_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let controller = MapController::web_mercator(SegmentationConfig::new(threshold_minutes)?)?;

    // Ctrl-C while the feed is still loading abandons the load.
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let loaded = controller.load_feed(&data_path, &cancel).await;
    interrupt.abort();
    let snapshot = loaded?;

    log::info!(
        "{} samples, {} stoppages at {} min threshold",
        snapshot.sample_count,
        snapshot.geometry.markers.len(),
        snapshot.threshold_minutes
    );

    match cli.command {
        Commands::Stoppages => {
            if snapshot.geometry.markers.is_empty() {
                println!("No stoppages of at least {threshold_minutes} minutes");
            }
            for marker in &snapshot.geometry.markers {
                let stoppage = &marker.stoppage;
                println!(
                    "#{:<3} {} -> {}  {:>8.2} min  ({:.6}, {:.6})",
                    marker.index,
                    format_timestamp(stoppage.start_time, &chrono::Local),
                    format_timestamp(stoppage.end_time, &chrono::Local),
                    stoppage.duration_minutes(),
                    stoppage.latitude,
                    stoppage.longitude,
                );
            }
        }
        Commands::Geometry { output } => match output {
            Some(path) => {
                controller
                    .attach_surface(Arc::new(JsonFileSurface::new(path)))
                    .await?;
                controller.detach_surface().await;
            }
            None => {
                let serialized = serde_json::to_string_pretty(&snapshot.geometry)?;
                println!("{serialized}");
            }
        },
        Commands::Details { index } => {
            let handle = snapshot.handle_for(index).with_context(|| {
                format!(
                    "no stoppage #{index}; {} stoppages at {threshold_minutes} min threshold",
                    snapshot.geometry.markers.len()
                )
            })?;
            let stoppage = controller.select(handle).await?;
            println!("{}", describe_local(&stoppage));
        }
        // Persisted above, before any data was loaded.
        Commands::SetThreshold { .. } => {}
    }

    Ok(())
}
