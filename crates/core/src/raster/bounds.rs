//! Geographic bounds and the index <-> coordinate mapping for north-up grids

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Geographic extent of a north-up grid in decimal degrees.
///
/// Defines the affine mapping between grid indices and coordinates for a
/// grid of `rows x cols` cells:
/// ```text
/// lon = west  + (col / cols) * (east - west)
/// lat = north - (row / rows) * (north - south)
/// ```
/// Longitude increases with the column index, latitude decreases with the
/// row index (row 0 is the northernmost row).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl GeoBounds {
    /// Create bounds, rejecting empty, inverted or non-finite extents
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        let finite = [west, south, east, north].iter().all(|v| v.is_finite());
        if !finite || west >= east || south >= north {
            return Err(Error::InvalidBounds {
                west,
                south,
                east,
                north,
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Bounds for constants already known to be ordered and finite
    pub(crate) const fn new_unchecked(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Build bounds from a GeoTIFF-style origin and pixel size.
    ///
    /// `pixel_height` may be given with either sign; north-up is assumed.
    pub fn from_origin(
        origin_x: f64,
        origin_y: f64,
        pixel_width: f64,
        pixel_height: f64,
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        let east = origin_x + cols as f64 * pixel_width.abs();
        let south = origin_y - rows as f64 * pixel_height.abs();
        Self::new(origin_x, south, east, origin_y)
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    /// (west, south, east, north)
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.west, self.south, self.east, self.north)
    }

    /// East-west extent in degrees
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// North-south extent in degrees
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center point as (lat, lon)
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Vertical midpoint, used as the reference latitude for cell sizing
    pub fn mid_latitude(&self) -> f64 {
        (self.south + self.north) / 2.0
    }

    /// Whether (lat, lon) lies inside the bounds (edges included)
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Overlapping region of two bounds, if any
    pub fn intersection(&self, other: &GeoBounds) -> Option<GeoBounds> {
        GeoBounds::new(
            self.west.max(other.west),
            self.south.max(other.south),
            self.east.min(other.east),
            self.north.min(other.north),
        )
        .ok()
    }

    /// Corner pairs in the `[[south, west], [north, east]]` order web maps expect
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }

    /// Grid index (row, col) of the cell containing (lat, lon).
    ///
    /// Points outside the bounds are clamped to the nearest edge cell.
    pub fn pixel_index(&self, lat: f64, lon: f64, rows: usize, cols: usize) -> (usize, usize) {
        let x_frac = (lon - self.west) / self.width();
        let y_frac = (self.north - lat) / self.height();

        let col = clamp_index(x_frac * cols as f64, cols);
        let row = clamp_index(y_frac * rows as f64, rows);
        (row, col)
    }

    /// Coordinate (lat, lon) of the north-west corner of cell (row, col)
    pub fn cell_origin(&self, row: usize, col: usize, rows: usize, cols: usize) -> (f64, f64) {
        let lon = self.west + (col as f64 / cols as f64) * self.width();
        let lat = self.north - (row as f64 / rows as f64) * self.height();
        (lat, lon)
    }

    /// Coordinate (lat, lon) of the center of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize, rows: usize, cols: usize) -> (f64, f64) {
        let lon = self.west + ((col as f64 + 0.5) / cols as f64) * self.width();
        let lat = self.north - ((row as f64 + 0.5) / rows as f64) * self.height();
        (lat, lon)
    }
}

fn clamp_index(position: f64, len: usize) -> usize {
    if position.is_nan() || position <= 0.0 {
        return 0;
    }
    (position.floor() as usize).min(len.saturating_sub(1))
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}, {:.6}, {:.6})",
            self.west, self.south, self.east, self.north
        )
    }
}

/// Parses `west,south,east,north`
impl FromStr for GeoBounds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::InvalidParameter {
                name: "bounds",
                value: s.to_string(),
                reason: e.to_string(),
            })?;

        match parts.as_slice() {
            &[west, south, east, north] => GeoBounds::new(west, south, east, north),
            _ => Err(Error::InvalidParameter {
                name: "bounds",
                value: s.to_string(),
                reason: "expected west,south,east,north".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn highlands() -> GeoBounds {
        GeoBounds::new(-5.5, 56.0, -2.8, 58.0).unwrap()
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(GeoBounds::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(GeoBounds::new(0.0, 1.0, 1.0, 1.0).is_err());
        assert!(GeoBounds::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn from_origin_matches_extent() {
        let b = GeoBounds::from_origin(-5.0, 57.0, 0.01, -0.01, 100, 50).unwrap();
        assert_relative_eq!(b.west(), -5.0);
        assert_relative_eq!(b.east(), -4.5, epsilon = 1e-12);
        assert_relative_eq!(b.south(), 56.0, epsilon = 1e-12);
        assert_relative_eq!(b.north(), 57.0);
    }

    #[test]
    fn pixel_index_corners() {
        let b = highlands();
        assert_eq!(b.pixel_index(58.0, -5.5, 200, 270), (0, 0));
        // South-east corner lands exactly on the far edge and is clamped
        assert_eq!(b.pixel_index(56.0, -2.8, 200, 270), (199, 269));
    }

    #[test]
    fn pixel_index_clamps_outside_points() {
        let b = highlands();
        assert_eq!(b.pixel_index(60.0, -10.0, 10, 10), (0, 0));
        assert_eq!(b.pixel_index(50.0, 10.0, 10, 10), (9, 9));
    }

    #[test]
    fn center_roundtrip() {
        let b = highlands();
        let (rows, cols) = (240, 324);
        for &(row, col) in &[(0, 0), (17, 203), (120, 5), (239, 323)] {
            let (lat, lon) = b.cell_center(row, col, rows, cols);
            assert_eq!(b.pixel_index(lat, lon, rows, cols), (row, col));
        }
    }

    #[test]
    fn origin_is_north_west_corner() {
        let b = highlands();
        let (lat, lon) = b.cell_origin(0, 0, 10, 10);
        assert_relative_eq!(lat, 58.0);
        assert_relative_eq!(lon, -5.5);
        let (lat, lon) = b.cell_origin(10, 10, 10, 10);
        assert_relative_eq!(lat, 56.0, epsilon = 1e-12);
        assert_relative_eq!(lon, -2.8, epsilon = 1e-12);
    }

    #[test]
    fn corners_are_south_west_north_east() {
        assert_eq!(highlands().corners(), [[56.0, -5.5], [58.0, -2.8]]);
    }

    #[test]
    fn parse_bounds() {
        let b: GeoBounds = "-5.5, 56, -2.8, 58".parse().unwrap();
        assert_eq!(b, highlands());
        assert!("1,2,3".parse::<GeoBounds>().is_err());
        assert!("a,b,c,d".parse::<GeoBounds>().is_err());
    }

    #[test]
    fn intersection_of_overlapping_bounds() {
        let a = highlands();
        let b = GeoBounds::new(-4.0, 57.0, 0.0, 59.0).unwrap();
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.as_tuple(), (-4.0, 57.0, -2.8, 58.0));

        let far = GeoBounds::new(10.0, 10.0, 11.0, 11.0).unwrap();
        assert!(a.intersection(&far).is_none());
    }
}
