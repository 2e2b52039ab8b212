//! Alignment diagnostics for slope grids
//!
//! These helpers read a slope grid through the same coordinate -> index
//! mapping the overlay uses ([`GeoBounds::pixel_index`]), so a value probed
//! at a known landmark is exactly the value painted over it on the map.

use crate::terrain::METERS_PER_DEGREE;
use avaterrain_core::{GeoBounds, Raster, Sample};

/// Value of a grid at a geographic point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub row: usize,
    pub col: usize,
    pub value: Sample,
}

/// Read the cell containing (lat, lon)
pub fn sample_at(grid: &Raster<Sample>, bounds: &GeoBounds, lat: f64, lon: f64) -> Probe {
    let (rows, cols) = grid.shape();
    let (row, col) = bounds.pixel_index(lat, lon, rows, cols);
    Probe {
        row,
        col,
        value: grid.get(row, col).unwrap_or(Sample::Missing),
    }
}

/// Largest present value in the square window of `radius` cells around (row, col)
pub fn local_max(grid: &Raster<Sample>, row: usize, col: usize, radius: usize) -> Option<f64> {
    let (rows, cols) = grid.shape();
    let r0 = row.saturating_sub(radius);
    let r1 = (row + radius + 1).min(rows);
    let c0 = col.saturating_sub(radius);
    let c1 = (col + radius + 1).min(cols);

    let view = grid.view();
    (r0..r1)
        .flat_map(|r| (c0..c1).map(move |c| (r, c)))
        .filter_map(|idx| view.get(idx).and_then(|s| s.value()))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

/// Location of the largest value in a grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteepestCell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    /// Latitude of the cell's north-west corner
    pub lat: f64,
    /// Longitude of the cell's north-west corner
    pub lon: f64,
}

/// Find the steepest cell; the first one in row-major order wins ties.
///
/// Returns `None` when every cell is missing.
pub fn steepest_cell(grid: &Raster<Sample>, bounds: &GeoBounds) -> Option<SteepestCell> {
    let (rows, cols) = grid.shape();
    let mut best: Option<(usize, usize, f64)> = None;

    for ((row, col), sample) in grid.data().indexed_iter() {
        if let Some(v) = sample.value() {
            if best.map_or(true, |(_, _, b)| v > b) {
                best = Some((row, col, v));
            }
        }
    }

    best.map(|(row, col, value)| {
        let (lat, lon) = bounds.cell_origin(row, col, rows, cols);
        SteepestCell {
            row,
            col,
            value,
            lat,
            lon,
        }
    })
}

/// Result of scanning latitudes around a landmark for the steepest reading
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetScan {
    /// (latitude offset in degrees, value) for every present sample
    pub samples: Vec<(f64, f64)>,
    /// Offset with the largest value; the first one wins ties
    pub best_offset: f64,
    pub best_value: f64,
}

impl OffsetScan {
    /// Best offset expressed as a north-south distance in meters
    pub fn offset_meters(&self) -> f64 {
        self.best_offset * METERS_PER_DEGREE
    }

    /// Whether the best offset exceeds `threshold_deg` in either direction
    pub fn is_significant(&self, threshold_deg: f64) -> bool {
        self.best_offset.abs() > threshold_deg
    }
}

/// Most latitude steps taken on each side of the scanned point
pub const MAX_SCAN_STEPS: f64 = 100_000.0;

/// Probe the grid at `lat + k * step` for every k with `|k * step| <= span`.
///
/// A known steep feature should read steepest at zero offset; a consistent
/// best offset elsewhere points at a north-south misalignment between the
/// grid and its bounds. The best offset stays at zero unless some sample
/// exceeds zero, and only a strictly larger value moves it.
///
/// Returns `None` if `step` is not positive, `span` is negative or not
/// finite, `span / step` exceeds [`MAX_SCAN_STEPS`], or no probe hits a
/// present value.
pub fn latitude_offset_scan(
    grid: &Raster<Sample>,
    bounds: &GeoBounds,
    lat: f64,
    lon: f64,
    span: f64,
    step: f64,
) -> Option<OffsetScan> {
    if step.is_nan() || step <= 0.0 || !span.is_finite() || span < 0.0 {
        return None;
    }
    let steps = (span / step).round();
    if steps > MAX_SCAN_STEPS {
        return None;
    }
    let n = steps as i64;

    let samples: Vec<(f64, f64)> = (-n..=n)
        .filter_map(|k| {
            let offset = k as f64 * step;
            sample_at(grid, bounds, lat + offset, lon)
                .value
                .value()
                .map(|v| (offset, v))
        })
        .collect();

    if samples.is_empty() {
        return None;
    }
    let (best_offset, best_value) = samples
        .iter()
        .fold((0.0, 0.0), |best, &(o, v)| if v > best.1 { (o, v) } else { best });

    Some(OffsetScan {
        samples,
        best_offset,
        best_value,
    })
}
