//! Terrain analysis algorithms
//!
//! Algorithms for analyzing Digital Elevation Models (DEMs):
//! - Cell size: ground distance of one grid step in geographic grids
//! - Slope: angle of the terrain surface from horizontal

mod cell_size;
mod slope;

pub use cell_size::{cell_size_meters, CellSize, METERS_PER_DEGREE};
pub use slope::{slope, Slope, SlopeParams};
