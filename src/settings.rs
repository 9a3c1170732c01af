use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::segmentation::{validate_threshold, DEFAULT_THRESHOLD_MINUTES};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MapSettings {
    pub stoppage_threshold_minutes: f64,
    /// Feed file used when no `--data` flag is given.
    pub data_path: Option<PathBuf>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            stoppage_threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
            data_path: None,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<MapSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            sanitize(serde_json::from_str(&contents).unwrap_or_default())
        } else {
            MapSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> MapSettings {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn threshold_minutes(&self) -> f64 {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stoppage_threshold_minutes
    }

    pub fn update_threshold(&self, threshold_minutes: f64) -> Result<()> {
        validate_threshold(threshold_minutes)?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.stoppage_threshold_minutes = threshold_minutes;
        self.persist(&guard)
    }

    pub fn update_data_path(&self, data_path: Option<PathBuf>) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.data_path = data_path;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: MapSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = sanitize(data);
        Ok(())
    }

    fn persist(&self, data: &MapSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

fn sanitize(mut data: MapSettings) -> MapSettings {
    if let Err(err) = validate_threshold(data.stoppage_threshold_minutes) {
        log_warn!("ignoring stored threshold: {err}");
        data.stoppage_threshold_minutes = DEFAULT_THRESHOLD_MINUTES;
    }
    data
}
