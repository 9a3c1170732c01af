pub mod builder;
pub mod projection;

pub use builder::{build_map_geometry, Extent, MapGeometry, MapStyle, StoppageMarker, ViewHints};
pub use projection::{LonLat, Projection, WebMercator};
