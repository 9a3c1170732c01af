use geo_types::{Coord, LineString, Point};
use serde::Serialize;

use crate::geometry::projection::Projection;
use crate::models::{GeoCoord, Stoppage};
use crate::segmentation::Segmentation;

/// Zoom level of the world view shown before the data is fitted.
pub const INITIAL_ZOOM: u8 = 2;
/// Padding (px) kept around the fitted data: top, right, bottom, left.
pub const FIT_PADDING_PX: [u32; 4] = [50, 50, 50, 50];
/// Fitting never zooms closer than this.
pub const FIT_MAX_ZOOM: u8 = 20;

/// A stoppage point with the record it was built from attached.
///
/// The rendering surface hands `stoppage` back on selection, and `index`
/// identifies the marker within the geometry it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppageMarker {
    pub index: usize,
    pub point: Point<f64>,
    pub stoppage: Stoppage,
}

/// Axis-aligned bounding box in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Bounding box of a set of coordinates, `None` when there are none.
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        coords.into_iter().fold(None, |extent, c| {
            let point = Self {
                min_x: c.x,
                min_y: c.y,
                max_x: c.x,
                max_y: c.y,
            };
            Some(match extent {
                Some(current) => current.union(&point),
                None => point,
            })
        })
    }

    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewHints {
    pub initial_center: Coord<f64>,
    pub initial_zoom: u8,
    pub fit_padding_px: [u32; 4],
    pub fit_max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub stroke_color: &'static str,
    pub stroke_width: f64,
    pub fill_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    pub path: LineStyle,
    pub marker: MarkerStyle,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            path: LineStyle {
                color: "black",
                width: 2.0,
            },
            marker: MarkerStyle {
                radius: 6.0,
                stroke_color: "red",
                stroke_width: 2.0,
                fill_color: "red",
            },
        }
    }
}

/// Everything a rendering surface needs to draw one segmentation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapGeometry {
    /// One continuous line through every sample.
    pub path: LineString<f64>,
    pub markers: Vec<StoppageMarker>,
    /// Union of the path and marker extents. `None` for empty data.
    pub extent: Option<Extent>,
    pub view: ViewHints,
    pub style: MapStyle,
}

impl MapGeometry {
    pub fn marker(&self, index: usize) -> Option<&StoppageMarker> {
        self.markers.get(index)
    }
}

/// Project a segmentation result into rendering-ready geometry.
///
/// The input is only read; stoppage payloads are copies of the records.
pub fn build_map_geometry(segmentation: &Segmentation, projection: &dyn Projection) -> MapGeometry {
    let path: LineString<f64> = segmentation
        .path
        .iter()
        .map(|position| projection.project(*position))
        .collect();

    let markers: Vec<StoppageMarker> = segmentation
        .stoppages
        .iter()
        .enumerate()
        .map(|(index, stoppage)| StoppageMarker {
            index,
            point: Point::from(projection.project(stoppage.position())),
            stoppage: *stoppage,
        })
        .collect();

    let path_extent = Extent::from_coords(path.coords().copied());
    let marker_extent = Extent::from_coords(markers.iter().map(|m| m.point.0));
    let extent = match (path_extent, marker_extent) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    };

    MapGeometry {
        path,
        markers,
        extent,
        view: ViewHints {
            initial_center: projection.project(GeoCoord::new(0.0, 0.0)),
            initial_zoom: INITIAL_ZOOM,
            fit_padding_px: FIT_PADDING_PX,
            fit_max_zoom: FIT_MAX_ZOOM,
        },
        style: MapStyle::default(),
    }
}
