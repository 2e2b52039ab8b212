//! Error types for avaterrain

use thiserror::Error;

/// Main error type for avaterrain operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Grid of {rows}x{cols} is too small for a gradient (need at least 2x2)")]
    Shape { rows: usize, cols: usize },

    #[error("Unknown risk category: {0:?}")]
    UnknownCategory(String),

    #[error("Invalid bounds: west={west}, south={south}, east={east}, north={north}")]
    InvalidBounds {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Image codec error: {0}")]
    Image(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for avaterrain operations
pub type Result<T> = std::result::Result<T, Error>;
