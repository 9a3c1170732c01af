use super::SegmentationError;

/// Threshold used until the user picks one.
pub const DEFAULT_THRESHOLD_MINUTES: f64 = 5.0;

/// Configuration for stoppage segmentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationConfig {
    /// Minimum duration (minutes) a stopped run needs to be reported.
    /// Zero reports every stop, however brief.
    pub threshold_minutes: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
        }
    }
}

impl SegmentationConfig {
    pub fn new(threshold_minutes: f64) -> Result<Self, SegmentationError> {
        let config = Self { threshold_minutes };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SegmentationError> {
        validate_threshold(self.threshold_minutes)
    }
}

pub fn validate_threshold(threshold_minutes: f64) -> Result<(), SegmentationError> {
    if threshold_minutes.is_finite() && threshold_minutes >= 0.0 {
        Ok(())
    } else {
        Err(SegmentationError::InvalidThreshold(threshold_minutes))
    }
}

/// Parse the raw text of the threshold input control.
///
/// Accepts decimal minutes with surrounding whitespace. Empty or non-numeric
/// text, negatives, NaN and infinities are rejected.
pub fn parse_threshold_input(input: &str) -> Result<f64, SegmentationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| SegmentationError::UnparsableThreshold(trimmed.to_string()))?;
    validate_threshold(value)?;
    Ok(value)
}
