pub mod algorithm;
pub mod config;
pub mod error;

pub use algorithm::{segment, segment_track, Segmentation};
pub use config::{parse_threshold_input, validate_threshold, SegmentationConfig, DEFAULT_THRESHOLD_MINUTES};
pub use error::SegmentationError;
