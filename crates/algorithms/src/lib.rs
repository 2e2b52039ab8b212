//! # avaterrain Algorithms
//!
//! Numeric stages of the slope-risk pipeline.
//!
//! - **terrain**: cell sizing for geographic grids, slope angle
//! - **diagnostics**: coordinate probes for checking overlay alignment

pub mod diagnostics;
mod maybe_rayon;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::diagnostics::{latitude_offset_scan, local_max, sample_at, steepest_cell};
    pub use crate::terrain::{cell_size_meters, slope, CellSize, Slope, SlopeParams};
    pub use avaterrain_core::prelude::*;
}
