//! Equirectangular to Web Mercator row remapping
//!
//! Slope grids have rows evenly spaced in latitude, while tiled web maps
//! space rows evenly in Mercator Y. Stretching a grid between its corner
//! latitudes on such a map misplaces every interior row, increasingly so
//! toward the middle of tall extents. [`reproject_to_mercator`] resamples
//! rows so the image can be stretched linearly in Mercator space.

use avaterrain_colormap::RgbaGrid;
use avaterrain_core::GeoBounds;
use std::f64::consts::PI;
use tracing::debug;

/// WGS84 semi-major axis, the Web Mercator sphere radius
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Latitude in degrees to Web Mercator Y in meters
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (PI / 4.0 + lat_rad / 2.0).tan().ln() * EARTH_RADIUS
}

/// Web Mercator Y in meters to latitude in degrees
pub fn mercator_y_to_lat(y: f64) -> f64 {
    (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees()
}

/// Source row for each of `rows` output rows spaced evenly in Mercator Y.
///
/// The latitude at each output row's center is mapped back to a source row
/// with the same coordinate -> index rule as [`GeoBounds::pixel_index`].
pub fn mercator_source_rows(bounds: &GeoBounds, rows: usize) -> Vec<usize> {
    let top = lat_to_mercator_y(bounds.north());
    let bottom = lat_to_mercator_y(bounds.south());

    (0..rows)
        .map(|row| {
            let frac = (row as f64 + 0.5) / rows as f64;
            let lat = mercator_y_to_lat(top - frac * (top - bottom));
            bounds.pixel_index(lat, bounds.west(), rows, 1).0
        })
        .collect()
}

/// Resample rows of `grid` (covering `bounds`) onto Mercator row spacing.
///
/// Output has the same size; columns are unchanged since longitude is
/// linear in both projections.
pub fn reproject_to_mercator(grid: &RgbaGrid, bounds: &GeoBounds) -> RgbaGrid {
    let row_bytes = grid.cols * 4;
    let sources = mercator_source_rows(bounds, grid.rows);

    let mut pixels = Vec::with_capacity(grid.pixels.len());
    for &src in &sources {
        pixels.extend_from_slice(&grid.pixels[src * row_bytes..(src + 1) * row_bytes]);
    }

    let shifted = sources.iter().enumerate().filter(|&(i, &s)| i != s).count();
    debug!("Mercator reprojection moved {} of {} rows", shifted, grid.rows);

    RgbaGrid {
        rows: grid.rows,
        cols: grid.cols,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_roundtrip() {
        for lat in [-60.0, -12.5, 0.0, 45.0, 57.3, 80.0] {
            assert_relative_eq!(mercator_y_to_lat(lat_to_mercator_y(lat)), lat, epsilon = 1e-9);
        }
        assert_relative_eq!(lat_to_mercator_y(0.0), 0.0);
    }

    #[test]
    fn pole_is_clamped() {
        assert!(lat_to_mercator_y(90.0).is_finite());
        assert_relative_eq!(lat_to_mercator_y(90.0), lat_to_mercator_y(MAX_LATITUDE));
    }

    #[test]
    fn edges_anchored() {
        let bounds = GeoBounds::new(-5.5, 56.0, -2.8, 58.0).unwrap();
        let rows = mercator_source_rows(&bounds, 200);
        assert_eq!(rows[0], 0);
        assert_eq!(rows[199], 199);
        assert!(rows.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn middle_moves_poleward() {
        // Northern hemisphere: Mercator midpoint is north of the mean latitude
        let north = GeoBounds::new(0.0, 40.0, 1.0, 70.0).unwrap();
        let rows = mercator_source_rows(&north, 300);
        assert!(rows[150] < 150, "got {}", rows[150]);

        let south = GeoBounds::new(0.0, -70.0, 1.0, -40.0).unwrap();
        let rows = mercator_source_rows(&south, 300);
        assert!(rows[150] > 150, "got {}", rows[150]);
    }

    #[test]
    fn reprojection_copies_whole_rows() {
        let bounds = GeoBounds::new(0.0, 40.0, 1.0, 70.0).unwrap();
        let (rows, cols) = (30, 3);
        let pixels = (0..rows)
            .flat_map(|r| std::iter::repeat([r as u8, 0, 0, 255]).take(cols))
            .flatten()
            .collect();
        let grid = RgbaGrid { rows, cols, pixels };

        let out = reproject_to_mercator(&grid, &bounds);
        let sources = mercator_source_rows(&bounds, rows);
        assert_eq!(out.pixels.len(), grid.pixels.len());
        for (row, &src) in sources.iter().enumerate() {
            for col in 0..cols {
                assert_eq!(out.pixel(row, col).unwrap().r, src as u8);
            }
        }
    }
}
