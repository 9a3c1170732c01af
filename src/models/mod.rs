pub mod sample;
pub mod stoppage;

pub use sample::{GeoCoord, Sample};
pub use stoppage::{minutes_between, Stoppage};
