//! # avaterrain Core
//!
//! Core types, traits and I/O for the avaterrain slope-risk pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: Generic 2D grid
//! - `Sample`: Cell value with explicit no-data
//! - `GeoBounds`: Geographic extent and index <-> coordinate mapping
//! - `Dem` / `DemProvider`: Elevation input for the pipeline
//! - GeoTIFF I/O

pub mod dem;
pub mod error;
pub mod io;
pub mod raster;

pub use dem::{Dem, DemProvider, Region};
pub use error::{Error, Result};
pub use raster::{GeoBounds, Raster, Sample};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dem::{Dem, DemProvider};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoBounds, Raster, Sample};
    pub use crate::Algorithm;
}

/// Core trait for pipeline stages.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
