//! Elevation models and the providers that supply them

use crate::error::{Error, Result};
use crate::raster::{GeoBounds, Raster, Sample};

/// Elevation grid together with its georeferencing.
#[derive(Debug, Clone)]
pub struct Dem {
    /// Elevation samples in meters, row 0 = north
    pub elevation: Raster<Sample>,
    /// Actual extent covered by `elevation`
    pub bounds: GeoBounds,
    /// Angular size of one cell in degrees
    pub resolution: f64,
}

impl Dem {
    /// Bundle an elevation grid with its bounds and angular resolution
    pub fn new(elevation: Raster<Sample>, bounds: GeoBounds, resolution: f64) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: resolution.to_string(),
                reason: "must be a positive number of degrees".into(),
            });
        }
        let elevation = elevation.with_bounds(bounds);
        Ok(Self {
            elevation,
            bounds,
            resolution,
        })
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.elevation.shape()
    }

    /// Latitude used to convert the angular resolution to meters
    pub fn reference_latitude(&self) -> f64 {
        self.bounds.mid_latitude()
    }

    /// Elevation at (lat, lon), using the same index mapping as the overlay
    pub fn elevation_at(&self, lat: f64, lon: f64) -> Sample {
        let (rows, cols) = self.shape();
        let (row, col) = self.bounds.pixel_index(lat, lon, rows, cols);
        self.elevation.get(row, col).unwrap_or(Sample::Missing)
    }

    /// Sub-grid covering `request`, snapped outward to whole cells.
    ///
    /// The returned bounds describe the cells actually kept, which may be
    /// slightly larger than the request.
    pub fn crop(&self, request: &GeoBounds) -> Result<Dem> {
        let overlap = self.bounds.intersection(request).ok_or_else(|| Error::InvalidParameter {
            name: "bounds",
            value: request.to_string(),
            reason: format!("does not overlap DEM extent {}", self.bounds),
        })?;

        let (rows, cols) = self.shape();
        let cell_w = self.bounds.width() / cols as f64;
        let cell_h = self.bounds.height() / rows as f64;

        // Small tolerance so requests on exact cell edges don't pick up a sliver
        let eps = 1e-9;
        let col0 = (((overlap.west() - self.bounds.west()) / cell_w) + eps).floor() as usize;
        let col1 = ((((overlap.east() - self.bounds.west()) / cell_w) - eps).ceil() as usize).min(cols);
        let row0 = (((self.bounds.north() - overlap.north()) / cell_h) + eps).floor() as usize;
        let row1 = ((((self.bounds.north() - overlap.south()) / cell_h) - eps).ceil() as usize).min(rows);

        let (n_rows, n_cols) = (row1.saturating_sub(row0), col1.saturating_sub(col0));
        let window = self.elevation.window(row0, col0, n_rows, n_cols)?;

        let bounds = GeoBounds::new(
            self.bounds.west() + col0 as f64 * cell_w,
            self.bounds.north() - row1 as f64 * cell_h,
            self.bounds.west() + col1 as f64 * cell_w,
            self.bounds.north() - row0 as f64 * cell_h,
        )?;

        tracing::debug!(
            "Cropped DEM {}x{} -> {}x{} at rows {}..{}, cols {}..{}",
            rows, cols, n_rows, n_cols, row0, row1, col0, col1
        );

        Dem::new(window, bounds, self.resolution)
    }
}

/// Source of elevation data for a requested region.
///
/// Implementations may read local files, caches or remote tiles; any failure
/// to produce a complete grid must be reported here, before slope analysis.
pub trait DemProvider {
    /// Load the elevation grid covering `request`
    fn load(&self, request: &GeoBounds) -> Result<Dem>;
}

/// Named regions with a default map view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Central Highlands and Cairngorms, Scotland
    ScottishHighlands,
}

impl Region {
    pub const ALL: &[Region] = &[Region::ScottishHighlands];

    /// Machine-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Region::ScottishHighlands => "scottish-highlands",
        }
    }

    /// Look up a region by its name
    pub fn from_name(name: &str) -> Option<Region> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }

    /// Bounding box to request from a provider
    pub fn bounds(&self) -> GeoBounds {
        match self {
            Region::ScottishHighlands => GeoBounds::new_unchecked(-5.5, 56.0, -2.8, 58.0),
        }
    }

    /// Default map center (lat, lon)
    pub fn center(&self) -> (f64, f64) {
        match self {
            Region::ScottishHighlands => (57.0, -5.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp_dem() -> Dem {
        // 10x20 grid over 1x2 degrees, value = row * 100 + col
        let values: Vec<f64> = (0..10)
            .flat_map(|r| (0..20).map(move |c| (r * 100 + c) as f64))
            .collect();
        let grid = Raster::from_values(values, 10, 20).unwrap();
        let bounds = GeoBounds::new(0.0, 50.0, 2.0, 51.0).unwrap();
        Dem::new(grid, bounds, 0.1).unwrap()
    }

    #[test]
    fn rejects_non_positive_resolution() {
        let grid = Raster::filled(2, 2, Sample::Value(0.0));
        let bounds = GeoBounds::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(Dem::new(grid.clone(), bounds, 0.0).is_err());
        assert!(Dem::new(grid, bounds, f64::NAN).is_err());
    }

    #[test]
    fn reference_latitude_is_midpoint() {
        assert_relative_eq!(ramp_dem().reference_latitude(), 50.5);
    }

    #[test]
    fn crop_on_cell_edges() {
        let dem = ramp_dem();
        let request = GeoBounds::new(0.5, 50.2, 1.0, 50.7).unwrap();
        let cropped = dem.crop(&request).unwrap();

        assert_eq!(cropped.shape(), (5, 5));
        let (w, s, e, n) = cropped.bounds.as_tuple();
        assert_relative_eq!(w, 0.5, epsilon = 1e-9);
        assert_relative_eq!(s, 50.2, epsilon = 1e-9);
        assert_relative_eq!(e, 1.0, epsilon = 1e-9);
        assert_relative_eq!(n, 50.7, epsilon = 1e-9);
        // north-west cell of the crop is row 3, col 5 of the source
        assert_eq!(cropped.elevation.get(0, 0).unwrap(), Sample::Value(305.0));
    }

    #[test]
    fn crop_snaps_outward() {
        let dem = ramp_dem();
        let request = GeoBounds::new(0.55, 50.25, 0.95, 50.65).unwrap();
        let cropped = dem.crop(&request).unwrap();
        assert_eq!(cropped.shape(), (5, 5));
        assert!(cropped.bounds.west() <= request.west());
        assert!(cropped.bounds.north() >= request.north());
    }

    #[test]
    fn crop_outside_fails() {
        let dem = ramp_dem();
        let request = GeoBounds::new(10.0, 10.0, 11.0, 11.0).unwrap();
        assert!(dem.crop(&request).is_err());
    }

    #[test]
    fn elevation_lookup_uses_probe_mapping() {
        let dem = ramp_dem();
        let (lat, lon) = dem.bounds.cell_center(4, 7, 10, 20);
        assert_eq!(dem.elevation_at(lat, lon), Sample::Value(407.0));
    }

    #[test]
    fn region_lookup() {
        let region = Region::from_name("scottish-highlands").unwrap();
        assert_eq!(region.bounds().as_tuple(), (-5.5, 56.0, -2.8, 58.0));
        assert!(Region::from_name("alps").is_none());
    }
}
