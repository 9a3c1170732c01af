//! Telemetry feed loading.
//!
//! The feed is a JSON array of sample records read once at startup. Anything
//! that prevents a complete, well-formed sample list from being produced is
//! reported here so the segmentation engine is never run on partial data.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::Sample;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("telemetry data unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("telemetry data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("telemetry load cancelled")]
    Cancelled,
}

pub fn parse_samples(json: &str) -> Result<Vec<Sample>, FeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse the feed file.
///
/// Returns `FeedError::Cancelled` as soon as `cancel` fires, even if the read
/// is still pending.
pub async fn load_samples(path: &Path, cancel: &CancellationToken) -> Result<Vec<Sample>, FeedError> {
    let contents = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log_info!("telemetry load from {} cancelled", path.display());
            return Err(FeedError::Cancelled);
        }
        result = tokio::fs::read_to_string(path) => result.map_err(|source| {
            log_error!("failed to read telemetry from {}: {source}", path.display());
            FeedError::Unavailable {
                path: path.to_path_buf(),
                source,
            }
        })?,
    };

    let samples = parse_samples(&contents)?;
    log_info!("loaded {} telemetry samples from {}", samples.len(), path.display());
    Ok(samples)
}
