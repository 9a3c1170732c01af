use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::geometry::MapGeometry;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// The drawing side of the map.
///
/// `attach` draws one geometry and starts delivering marker selections for
/// it; `release` removes the drawing and any click subscription. Callers
/// should hold a [`SurfaceAttachment`] rather than pairing the two by hand.
pub trait RenderSurface: Send + Sync {
    fn attach(&self, geometry: &MapGeometry, generation: u64) -> Result<()>;
    fn release(&self);
}

/// An active attachment. Dropping it releases the surface.
pub struct SurfaceAttachment {
    surface: Arc<dyn RenderSurface>,
    generation: u64,
}

impl SurfaceAttachment {
    pub fn acquire(
        surface: Arc<dyn RenderSurface>,
        geometry: &MapGeometry,
        generation: u64,
    ) -> Result<Self> {
        surface.attach(geometry, generation)?;
        Ok(Self {
            surface,
            generation,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self) -> Arc<dyn RenderSurface> {
        Arc::clone(&self.surface)
    }
}

impl Drop for SurfaceAttachment {
    fn drop(&mut self) {
        self.surface.release();
    }
}

/// Writes the geometry as pretty JSON for an external renderer to pick up.
pub struct JsonFileSurface {
    path: PathBuf,
}

impl JsonFileSurface {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RenderSurface for JsonFileSurface {
    fn attach(&self, geometry: &MapGeometry, generation: u64) -> Result<()> {
        let serialized = serde_json::to_string_pretty(geometry)?;
        std::fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write map geometry to {}", self.path.display()))?;
        log_info!(
            "wrote generation {} geometry ({} markers) to {}",
            generation,
            geometry.markers.len(),
            self.path.display()
        );
        Ok(())
    }

    fn release(&self) {
        log_info!("released map geometry at {}", self.path.display());
    }
}
