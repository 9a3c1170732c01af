//! Geographic to map-surface coordinate projections.

use std::f64::consts::PI;

use geo_types::{coord, Coord};

use crate::models::GeoCoord;

/// Spherical Mercator radius in metres (EPSG:3857).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
/// Half the width of the EPSG:3857 world extent in metres.
pub const MERCATOR_HALF_SIZE: f64 = PI * EARTH_RADIUS_M;

/// Maps a geographic position onto the coordinate system of a rendering surface.
///
/// Any `Fn(GeoCoord) -> Coord<f64>` closure is a projection too, so a caller
/// can plug in whatever its map library expects.
pub trait Projection: Send + Sync {
    fn project(&self, position: GeoCoord) -> Coord<f64>;
}

impl<F> Projection for F
where
    F: Fn(GeoCoord) -> Coord<f64> + Send + Sync,
{
    fn project(&self, position: GeoCoord) -> Coord<f64> {
        self(position)
    }
}

/// Web Mercator (EPSG:3857), the projection used by OSM-style tile maps.
///
/// Latitudes beyond the Mercator limit clamp to the edge of the world extent.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn project(&self, position: GeoCoord) -> Coord<f64> {
        let x = EARTH_RADIUS_M * position.longitude.to_radians();
        let y = EARTH_RADIUS_M * (PI * (position.latitude + 90.0) / 360.0).tan().ln();
        coord! { x: x, y: y.clamp(-MERCATOR_HALF_SIZE, MERCATOR_HALF_SIZE) }
    }
}

/// Plain longitude/latitude degrees as x/y.
#[derive(Debug, Clone, Copy, Default)]
pub struct LonLat;

impl Projection for LonLat {
    fn project(&self, position: GeoCoord) -> Coord<f64> {
        coord! { x: position.longitude, y: position.latitude }
    }
}
