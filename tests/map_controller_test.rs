//! Integration tests for the map controller
//!
//! Feed file -> segmentation -> geometry -> attached surface, plus the
//! selection and surface lifecycle across recomputations.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use vehicle_stoppage_lib::display::describe;
use vehicle_stoppage_lib::geometry::{LonLat, MapGeometry};
use vehicle_stoppage_lib::map::{MapController, RenderSurface, SelectionError};
use vehicle_stoppage_lib::segmentation::SegmentationConfig;

const FEED: &str = r#"[
    {"latitude": 12.90, "longitude": 77.60, "speed": 30, "eventGeneratedTime": 0},
    {"latitude": 12.91, "longitude": 77.61, "speed": 0,  "eventGeneratedTime": 60000},
    {"latitude": 12.91, "longitude": 77.61, "speed": 0,  "eventGeneratedTime": 240000},
    {"latitude": 12.92, "longitude": 77.62, "speed": 25, "eventGeneratedTime": 480000},
    {"latitude": 12.93, "longitude": 77.63, "speed": 0,  "eventGeneratedTime": 540000},
    {"latitude": 12.93, "longitude": 77.63, "speed": 20, "eventGeneratedTime": 600000},
    {"latitude": 12.94, "longitude": 77.64, "speed": 0,  "eventGeneratedTime": 660000},
    {"latitude": 12.95, "longitude": 77.65, "speed": 0,  "eventGeneratedTime": 1260000}
]"#;

#[derive(Debug, Clone, PartialEq)]
enum SurfaceEvent {
    Attached { generation: u64, markers: usize },
    Released,
}

#[derive(Default)]
struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn attach(&self, geometry: &MapGeometry, generation: u64) -> Result<()> {
        self.events.lock().unwrap().push(SurfaceEvent::Attached {
            generation,
            markers: geometry.markers.len(),
        });
        Ok(())
    }

    fn release(&self) {
        self.events.lock().unwrap().push(SurfaceEvent::Released);
    }
}

fn feed_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FEED.as_bytes()).unwrap();
    file
}

fn controller(threshold: f64) -> MapController {
    MapController::new(Arc::new(LonLat), SegmentationConfig::new(threshold).unwrap()).unwrap()
}

#[tokio::test]
async fn loads_feed_and_builds_geometry() {
    let file = feed_file();
    let controller = controller(5.0);

    let snapshot = controller
        .load_feed(file.path(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.sample_count, 8);
    assert_eq!(snapshot.geometry.path.0.len(), 8);

    // 1 -> 8 minute closed run, then a 10 minute trailing run.
    let spans: Vec<(i64, i64)> = snapshot
        .stoppages()
        .map(|s| (s.start_time, s.end_time))
        .collect();
    assert_eq!(spans, vec![(60_000, 480_000), (660_000, 1_260_000)]);

    let trailing = snapshot.geometry.markers[1].stoppage;
    assert_eq!((trailing.latitude, trailing.longitude), (12.95, 77.65));
}

#[tokio::test]
async fn threshold_changes_recompute_and_redraw() {
    let file = feed_file();
    let controller = controller(5.0);
    let surface = Arc::new(RecordingSurface::default());

    controller.load_feed(file.path(), &CancellationToken::new()).await.unwrap();
    controller.attach_surface(surface.clone()).await.unwrap();

    let zero = controller.set_threshold_input("0").await.unwrap();
    assert_eq!(zero.geometry.markers.len(), 3);

    let strict = controller.set_threshold(9.0).await.unwrap();
    assert_eq!(strict.geometry.markers.len(), 1);

    controller.detach_surface().await;
    assert!(!controller.has_surface().await);

    assert_eq!(
        surface.events(),
        vec![
            SurfaceEvent::Attached { generation: 1, markers: 2 },
            SurfaceEvent::Released,
            SurfaceEvent::Attached { generation: 2, markers: 3 },
            SurfaceEvent::Released,
            SurfaceEvent::Attached { generation: 3, markers: 1 },
            SurfaceEvent::Released,
        ]
    );
}

#[tokio::test]
async fn replacing_surface_releases_previous_one() {
    let controller = controller(5.0);
    let first = Arc::new(RecordingSurface::default());
    let second = Arc::new(RecordingSurface::default());

    controller.attach_surface(first.clone()).await.unwrap();
    controller.attach_surface(second.clone()).await.unwrap();

    assert_eq!(
        first.events(),
        vec![
            SurfaceEvent::Attached { generation: 0, markers: 0 },
            SurfaceEvent::Released,
        ]
    );
    assert_eq!(
        second.events(),
        vec![SurfaceEvent::Attached { generation: 0, markers: 0 }]
    );
}

#[tokio::test]
async fn recompute_invalidates_selection() {
    let file = feed_file();
    let controller = controller(5.0);
    let snapshot = controller.load_feed(file.path(), &CancellationToken::new()).await.unwrap();

    let handle = snapshot.handle_for(0).unwrap();
    let selected = controller.select(handle).await.unwrap();
    assert_eq!(controller.selected().await, Some(selected));
    assert_eq!(describe(&selected, &chrono::Utc).duration, "7.00 minutes");

    controller.set_threshold(5.0).await.unwrap();
    assert_eq!(controller.selected().await, None);

    let err = controller.select(handle).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<SelectionError>(),
        Some(&SelectionError::Stale { requested: 1, current: 2 })
    );

    controller.clear_selection().await;
    assert_eq!(controller.snapshot().await.selected, None);
}

#[tokio::test]
async fn invalid_threshold_input_keeps_previous_result() {
    let file = feed_file();
    let controller = controller(5.0);
    controller.load_feed(file.path(), &CancellationToken::new()).await.unwrap();

    assert!(controller.set_threshold_input("").await.is_err());
    assert!(controller.set_threshold_input("-2").await.is_err());
    assert!(controller.set_threshold(f64::NAN).await.is_err());

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.threshold_minutes, 5.0);
    assert_eq!(snapshot.geometry.markers.len(), 2);
}

#[tokio::test]
async fn failed_load_leaves_controller_empty() {
    let dir = tempfile::tempdir().unwrap();
    let controller = controller(5.0);

    let missing = controller
        .load_feed(&dir.path().join("data.json"), &CancellationToken::new())
        .await;
    assert!(missing.is_err());

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "[{\"latitude\": 1.0}]").unwrap();
    assert!(controller.load_feed(&broken, &CancellationToken::new()).await.is_err());

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.generation, 0);
    assert_eq!(snapshot.sample_count, 0);
}

/// Draws once, then refuses every later attach.
#[derive(Default)]
struct FailingRedrawSurface {
    attaches: Mutex<usize>,
}

impl RenderSurface for FailingRedrawSurface {
    fn attach(&self, _geometry: &MapGeometry, _generation: u64) -> Result<()> {
        let mut attaches = self.attaches.lock().unwrap();
        *attaches += 1;
        if *attaches > 1 {
            anyhow::bail!("renderer went away");
        }
        Ok(())
    }

    fn release(&self) {}
}

#[tokio::test]
async fn failed_redraw_still_applies_threshold() {
    let file = feed_file();
    let controller = controller(5.0);
    controller.load_feed(file.path(), &CancellationToken::new()).await.unwrap();
    controller
        .attach_surface(Arc::new(FailingRedrawSurface::default()))
        .await
        .unwrap();

    let snapshot = controller.set_threshold(20.0).await.unwrap();

    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.threshold_minutes, 20.0);
    assert!(snapshot.geometry.markers.is_empty());
    assert!(!controller.has_surface().await);

    let current = controller.snapshot().await;
    assert_eq!(current.generation, snapshot.generation);
    assert_eq!(current.threshold_minutes, 20.0);
}
