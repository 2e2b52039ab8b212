//! Slope calculation from DEMs
//!
//! Gradients are finite differences along each grid axis: central
//! differences for interior cells, one-sided differences on the edges.

use crate::maybe_rayon::*;
use crate::terrain::CellSize;
use avaterrain_core::raster::{Raster, Sample};
use avaterrain_core::{Algorithm, Error, Result};
use ndarray::{Array2, ArrayView2};
use tracing::debug;

/// Parameters for slope calculation
#[derive(Debug, Clone, Default)]
pub struct SlopeParams {
    /// Ground distance of one grid step
    pub cell_size: CellSize,
}

/// Slope algorithm
#[derive(Debug, Clone, Default)]
pub struct Slope;

impl Algorithm for Slope {
    type Input = Raster<Sample>;
    type Output = Raster<Sample>;
    type Params = SlopeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Slope"
    }

    fn description(&self) -> &'static str {
        "Calculate slope angle in degrees from a DEM using finite-difference gradients"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        slope(&input, params)
    }
}

/// Calculate slope angle in degrees from a DEM
///
/// For a cell with neighbours along one axis:
/// ```text
/// interior:  dz = (z[i+1] - z[i-1]) / (2 * cellsize)
/// first:     dz = (z[1]   - z[0])   / cellsize
/// last:      dz = (z[n-1] - z[n-2]) / cellsize
/// slope = degrees(atan(sqrt(dz/dx² + dz/dy²)))
/// ```
///
/// A cell is `Missing` when it is missing itself or when either difference
/// reads a missing sample. Edge cells use one-sided differences and can
/// differ slightly from the true local slope.
///
/// # Errors
/// [`Error::Shape`] if the grid has fewer than 2 rows or 2 columns.
pub fn slope(dem: &Raster<Sample>, params: SlopeParams) -> Result<Raster<Sample>> {
    let (rows, cols) = dem.shape();
    if rows < 2 || cols < 2 {
        return Err(Error::Shape { rows, cols });
    }

    let cell_size = params.cell_size.meters();
    let z = dem.view();
    debug!("Slope over {} x {} cells, cell size {:.2} m", cols, rows, cell_size);

    let output_data: Vec<Sample> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| cell_slope(&z, row, col, cell_size))
                .collect::<Vec<_>>()
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    let mut output = Raster::from_array(array);
    output.set_bounds(dem.bounds());

    Ok(output)
}

/// Index pair and step count of the difference used at position `i` of `n`
fn stencil(i: usize, n: usize) -> (usize, usize, f64) {
    if i == 0 {
        (0, 1, 1.0)
    } else if i == n - 1 {
        (n - 2, n - 1, 1.0)
    } else {
        (i - 1, i + 1, 2.0)
    }
}

fn cell_slope(z: &ArrayView2<'_, Sample>, row: usize, col: usize, cell_size: f64) -> Sample {
    let (rows, cols) = z.dim();
    if z[(row, col)].is_missing() {
        return Sample::Missing;
    }

    let (r0, r1, row_steps) = stencil(row, rows);
    let (c0, c1, col_steps) = stencil(col, cols);

    let dz_dy = match (z[(r0, col)].value(), z[(r1, col)].value()) {
        (Some(a), Some(b)) => (b - a) / (row_steps * cell_size),
        _ => return Sample::Missing,
    };
    let dz_dx = match (z[(row, c0)].value(), z[(row, c1)].value()) {
        (Some(a), Some(b)) => (b - a) / (col_steps * cell_size),
        _ => return Sample::Missing,
    };

    let slope_rad = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan();
    Sample::new(slope_rad.to_degrees())
}
