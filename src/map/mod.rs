pub mod controller;
pub mod state;
pub mod surface;

pub use controller::{MapController, MapSnapshot};
pub use state::{MapState, SelectionError, SelectionHandle};
pub use surface::{JsonFileSurface, RenderSurface, SurfaceAttachment};
