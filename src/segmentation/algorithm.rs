use serde::Serialize;

use crate::models::{minutes_between, GeoCoord, Sample, Stoppage};
use crate::segmentation::config::SegmentationConfig;
use crate::segmentation::SegmentationError;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Output of one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    /// Position of every input sample, in input order.
    pub path: Vec<GeoCoord>,
    /// Qualifying stoppages, ordered by start time.
    pub stoppages: Vec<Stoppage>,
}

impl Segmentation {
    pub fn stoppage(&self, index: usize) -> Option<&Stoppage> {
        self.stoppages.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// A stopped run that has not seen its closing sample yet.
#[derive(Debug, Clone, Copy)]
struct OpenRun {
    start_time: i64,
    anchor: GeoCoord,
}

/// Segment samples with a raw threshold in minutes.
pub fn segment(samples: &[Sample], threshold_minutes: f64) -> Result<Segmentation, SegmentationError> {
    segment_track(samples, &SegmentationConfig::new(threshold_minutes)?)
}

/// Main segmentation function: one forward pass over the samples.
///
/// A run opens at the first zero-speed sample and closes at the next moving
/// sample, whose timestamp becomes the end time. Closed runs report the anchor
/// (first stopped) position. A run still open when the data ends is closed
/// with the last sample's timestamp and reports the last sample's position.
/// That asymmetry is kept for compatibility with existing consumers.
pub fn segment_track(
    samples: &[Sample],
    config: &SegmentationConfig,
) -> Result<Segmentation, SegmentationError> {
    config.validate()?;
    let threshold = config.threshold_minutes;

    let mut stoppages = Vec::new();
    let mut open_run: Option<OpenRun> = None;
    let mut previous_time: Option<i64> = None;

    for sample in samples {
        let time = sample.event_generated_time;
        if let Some(previous) = previous_time {
            if time < previous {
                log_debug!("timestamp went backwards ({previous} -> {time}); output is unspecified");
            }
        }
        previous_time = Some(time);

        if sample.is_stopped() {
            if open_run.is_none() {
                open_run = Some(OpenRun {
                    start_time: time,
                    anchor: sample.position(),
                });
            }
        } else if let Some(run) = open_run.take() {
            if minutes_between(run.start_time, time) >= threshold {
                stoppages.push(Stoppage::new(run.anchor, run.start_time, time));
            }
        }
    }

    if let (Some(run), Some(last)) = (open_run, samples.last()) {
        let end_time = last.event_generated_time;
        if minutes_between(run.start_time, end_time) >= threshold {
            stoppages.push(Stoppage::new(last.position(), run.start_time, end_time));
        }
    }

    let path = samples.iter().map(Sample::position).collect();

    log_info!(
        "segmented {} samples at {} min threshold: {} stoppages",
        samples.len(),
        threshold,
        stoppages.len()
    );

    Ok(Segmentation { path, stoppages })
}
