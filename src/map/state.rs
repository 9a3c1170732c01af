use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{build_map_geometry, MapGeometry, Projection};
use crate::models::{Sample, Stoppage};
use crate::segmentation::{segment_track, Segmentation, SegmentationConfig, SegmentationError};

/// Identifies a stoppage by position within one specific recomputation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SelectionHandle {
    pub generation: u64,
    pub index: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection from generation {requested} is stale (current generation is {current})")]
    Stale { requested: u64, current: u64 },
    #[error("no stoppage at index {0}")]
    NotFound(usize),
}

/// Presentation state: the loaded samples, the active threshold and the
/// result derived from them.
///
/// Every input change rebuilds the derived data wholesale and bumps
/// `generation`. Selection is stored as an index into the current stoppage
/// list and is cleared on every rebuild.
#[derive(Debug, Clone)]
pub struct MapState {
    samples: Vec<Sample>,
    config: SegmentationConfig,
    generation: u64,
    segmentation: Segmentation,
    geometry: MapGeometry,
    selected: Option<usize>,
}

impl MapState {
    pub fn new(config: SegmentationConfig, projection: &dyn Projection) -> Result<Self, SegmentationError> {
        let segmentation = segment_track(&[], &config)?;
        let geometry = build_map_geometry(&segmentation, projection);
        Ok(Self {
            samples: Vec::new(),
            config,
            generation: 0,
            segmentation,
            geometry,
            selected: None,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn threshold_minutes(&self) -> f64 {
        self.config.threshold_minutes
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    pub fn replace_samples(
        &mut self,
        samples: Vec<Sample>,
        projection: &dyn Projection,
    ) -> Result<(), SegmentationError> {
        let segmentation = segment_track(&samples, &self.config)?;
        self.samples = samples;
        self.install(segmentation, projection);
        Ok(())
    }

    /// Change the threshold. An invalid value leaves the state untouched.
    pub fn set_threshold(
        &mut self,
        threshold_minutes: f64,
        projection: &dyn Projection,
    ) -> Result<(), SegmentationError> {
        let config = SegmentationConfig::new(threshold_minutes)?;
        let segmentation = segment_track(&self.samples, &config)?;
        self.config = config;
        self.install(segmentation, projection);
        Ok(())
    }

    fn install(&mut self, segmentation: Segmentation, projection: &dyn Projection) {
        self.geometry = build_map_geometry(&segmentation, projection);
        self.segmentation = segmentation;
        self.generation += 1;
        self.selected = None;
    }

    pub fn handle_for(&self, index: usize) -> Option<SelectionHandle> {
        (index < self.segmentation.stoppages.len()).then_some(SelectionHandle {
            generation: self.generation,
            index,
        })
    }

    /// Look up a stoppage by value in the current result.
    pub fn find(&self, stoppage: &Stoppage) -> Option<SelectionHandle> {
        self.segmentation
            .stoppages
            .iter()
            .position(|candidate| candidate == stoppage)
            .and_then(|index| self.handle_for(index))
    }

    pub fn select(&mut self, handle: SelectionHandle) -> Result<Stoppage, SelectionError> {
        if handle.generation != self.generation {
            return Err(SelectionError::Stale {
                requested: handle.generation,
                current: self.generation,
            });
        }
        let stoppage = *self
            .segmentation
            .stoppage(handle.index)
            .ok_or(SelectionError::NotFound(handle.index))?;
        self.selected = Some(handle.index);
        Ok(stoppage)
    }

    pub fn selected(&self) -> Option<&Stoppage> {
        self.selected.and_then(|index| self.segmentation.stoppage(index))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
