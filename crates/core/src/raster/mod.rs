//! Raster data structures and operations

mod bounds;
mod grid;
mod sample;

pub use bounds::GeoBounds;
pub use grid::{Raster, RasterStatistics};
pub use sample::Sample;
