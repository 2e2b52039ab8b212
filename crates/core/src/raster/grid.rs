//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::{GeoBounds, Sample};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// A 2D grid of cells with optional geographic bounds.
///
/// `Raster<T>` stores values of type `T` row-major, row 0 being the
/// northernmost row and column 0 the westernmost column.
///
/// # Example
///
/// ```ignore
/// use avaterrain_core::{Raster, Sample};
///
/// let mut raster: Raster<Sample> = Raster::filled(100, 100, Sample::Value(0.0));
/// raster.set(10, 20, Sample::Value(42.0))?;
/// let value = raster.get(10, 20)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    /// Geographic extent of the whole grid
    bounds: Option<GeoBounds>,
}

impl<T: Copy> Raster<T> {
    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            bounds: None,
        }
    }

    /// Create a raster from existing row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data, bounds: None }
    }

    /// Attach geographic bounds, consuming the raster
    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Cell-wise conversion into a raster of another type, keeping bounds
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Raster<U> {
        Raster {
            data: self.data.map(f),
            bounds: self.bounds,
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            }),
        }
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the underlying data
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Consume the raster and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    // Metadata

    /// Geographic bounds, if known
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Set the geographic bounds
    pub fn set_bounds(&mut self, bounds: Option<GeoBounds>) {
        self.bounds = bounds;
    }

    /// Sub-grid `rows x cols` starting at (row0, col0), without bounds
    pub fn window(&self, row0: usize, col0: usize, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || row0 + rows > self.rows() || col0 + cols > self.cols() {
            return Err(Error::IndexOutOfBounds {
                row: row0 + rows,
                col: col0 + cols,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        let view = self
            .data
            .slice(ndarray::s![row0..row0 + rows, col0..col0 + cols]);
        Ok(Self::from_array(view.to_owned()))
    }
}

impl Raster<Sample> {
    /// Create a sample raster from plain floats; NaN becomes `Missing`
    pub fn from_values(values: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        Self::from_vec(values.into_iter().map(Sample::new).collect(), rows, cols)
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|s| s.is_missing()).count()
    }

    /// Calculate basic statistics (min, max, mean, count of valid cells)
    pub fn statistics(&self) -> RasterStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in self.data.iter().filter_map(|s| s.value()) {
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
            sum += v;
            count += 1;
        }

        RasterStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            missing_count: self.len() - count,
        }
    }
}

/// Basic statistics for a sample raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub missing_count: usize,
}
