use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::feed::load_samples;
use crate::geometry::{MapGeometry, Projection, WebMercator};
use crate::models::{Sample, Stoppage};
use crate::segmentation::{parse_threshold_input, SegmentationConfig};

use super::state::{MapState, SelectionHandle};
use super::surface::{RenderSurface, SurfaceAttachment};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub generation: u64,
    pub threshold_minutes: f64,
    pub sample_count: usize,
    pub geometry: MapGeometry,
    pub selected: Option<Stoppage>,
}

impl MapSnapshot {
    pub fn stoppages(&self) -> impl Iterator<Item = &Stoppage> {
        self.geometry.markers.iter().map(|marker| &marker.stoppage)
    }

    pub fn handle_for(&self, index: usize) -> Option<SelectionHandle> {
        self.geometry.marker(index).map(|marker| SelectionHandle {
            generation: self.generation,
            index: marker.index,
        })
    }
}

/// Owns the map's presentation state and keeps an attached surface in step
/// with it.
#[derive(Clone)]
pub struct MapController {
    state: Arc<Mutex<MapState>>,
    projection: Arc<dyn Projection>,
    attachment: Arc<Mutex<Option<SurfaceAttachment>>>,
}

impl MapController {
    pub fn new(projection: Arc<dyn Projection>, config: SegmentationConfig) -> Result<Self> {
        let state = MapState::new(config, projection.as_ref())?;
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            projection,
            attachment: Arc::new(Mutex::new(None)),
        })
    }

    pub fn web_mercator(config: SegmentationConfig) -> Result<Self> {
        Self::new(Arc::new(WebMercator), config)
    }

    pub async fn snapshot(&self) -> MapSnapshot {
        let state = self.state.lock().await;
        snapshot_of(&state)
    }

    /// Load the feed file and recompute. On failure the previous data stays.
    pub async fn load_feed(&self, path: &Path, cancel: &CancellationToken) -> Result<MapSnapshot> {
        let samples = load_samples(path, cancel)
            .await
            .with_context(|| format!("Failed to load telemetry from {}", path.display()))?;
        self.replace_samples(samples).await
    }

    pub async fn replace_samples(&self, samples: Vec<Sample>) -> Result<MapSnapshot> {
        let mut state = self.state.lock().await;
        state.replace_samples(samples, self.projection.as_ref())?;
        log_info!(
            "samples replaced: {} samples, generation {}",
            state.sample_count(),
            state.generation()
        );
        self.refresh_surface(&state).await;
        Ok(snapshot_of(&state))
    }

    pub async fn set_threshold(&self, threshold_minutes: f64) -> Result<MapSnapshot> {
        let mut state = self.state.lock().await;
        if let Err(err) = state.set_threshold(threshold_minutes, self.projection.as_ref()) {
            log_warn!("rejected stoppage threshold: {err}");
            return Err(err.into());
        }
        log_info!(
            "threshold set to {} min: {} stoppages, generation {}",
            threshold_minutes,
            state.segmentation().stoppages.len(),
            state.generation()
        );
        self.refresh_surface(&state).await;
        Ok(snapshot_of(&state))
    }

    /// Apply the raw text of the threshold input control.
    pub async fn set_threshold_input(&self, input: &str) -> Result<MapSnapshot> {
        let threshold_minutes = parse_threshold_input(input)?;
        self.set_threshold(threshold_minutes).await
    }

    pub async fn select(&self, handle: SelectionHandle) -> Result<Stoppage> {
        let mut state = self.state.lock().await;
        Ok(state.select(handle)?)
    }

    pub async fn selected(&self) -> Option<Stoppage> {
        self.state.lock().await.selected().copied()
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.clear_selection();
    }

    /// Attach a surface, releasing whichever one was attached before.
    pub async fn attach_surface(&self, surface: Arc<dyn RenderSurface>) -> Result<()> {
        let state = self.state.lock().await;
        let mut slot = self.attachment.lock().await;
        slot.take();
        *slot = Some(SurfaceAttachment::acquire(
            surface,
            state.geometry(),
            state.generation(),
        )?);
        Ok(())
    }

    pub async fn detach_surface(&self) {
        self.attachment.lock().await.take();
    }

    pub async fn has_surface(&self) -> bool {
        self.attachment.lock().await.is_some()
    }

    // The old attachment is released before the surface sees the new geometry.
    // A failed redraw does not undo the recompute; the surface stays detached.
    async fn refresh_surface(&self, state: &MapState) {
        let mut slot = self.attachment.lock().await;
        if let Some(previous) = slot.take() {
            let surface = previous.surface();
            drop(previous);
            match SurfaceAttachment::acquire(surface, state.geometry(), state.generation()) {
                Ok(attachment) => *slot = Some(attachment),
                Err(err) => log_error!(
                    "failed to redraw map surface for generation {}, surface detached: {err:#}",
                    state.generation()
                ),
            }
        }
    }
}

fn snapshot_of(state: &MapState) -> MapSnapshot {
    MapSnapshot {
        generation: state.generation(),
        threshold_minutes: state.threshold_minutes(),
        sample_count: state.sample_count(),
        geometry: state.geometry().clone(),
        selected: state.selected().copied(),
    }
}
