use thiserror::Error;

/// Input validation failures raised before any segmentation work happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SegmentationError {
    #[error("stoppage threshold must be a finite, non-negative number of minutes (got {0})")]
    InvalidThreshold(f64),
    #[error("stoppage threshold {0:?} is not a number")]
    UnparsableThreshold(String),
}
