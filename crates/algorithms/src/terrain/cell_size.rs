//! Ground cell size for grids stored in geographic (lon/lat) coordinates

use avaterrain_core::{Dem, Error, Result};

/// Meters spanned by one degree of latitude, treated as constant
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Approximate ground size of one grid step, in meters.
///
/// One angular step covers `METERS_PER_DEGREE` north-south but only
/// `METERS_PER_DEGREE * cos(lat)` east-west; the cell size is the mean of the
/// two, so it stays a single scalar usable by a square-cell gradient.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CellSize(f64);

impl CellSize {
    /// Wrap a size in meters; must be positive and finite
    pub fn new(meters: f64) -> Result<Self> {
        if meters.is_finite() && meters > 0.0 {
            Ok(Self(meters))
        } else {
            Err(Error::InvalidParameter {
                name: "cell_size",
                value: meters.to_string(),
                reason: "must be a positive number of meters".into(),
            })
        }
    }

    /// Cell size for an angular resolution at a reference latitude
    pub fn from_resolution(resolution_deg: f64, latitude_deg: f64) -> Result<Self> {
        Self::new(cell_size_meters(resolution_deg, latitude_deg))
    }

    /// Cell size of a DEM at its vertical midpoint
    pub fn for_dem(dem: &Dem) -> Result<Self> {
        Self::from_resolution(dem.resolution, dem.reference_latitude())
    }

    pub fn meters(self) -> f64 {
        self.0
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Convert an angular resolution to an approximate cell size in meters.
///
/// `latitude_deg` must lie in (-90, 90); results outside that range are
/// meaningless but not an error.
pub fn cell_size_meters(resolution_deg: f64, latitude_deg: f64) -> f64 {
    let meters_per_degree_lat = METERS_PER_DEGREE;
    let meters_per_degree_lon = METERS_PER_DEGREE * latitude_deg.to_radians().cos();

    let cell_size_lat = resolution_deg * meters_per_degree_lat;
    let cell_size_lon = resolution_deg * meters_per_degree_lon;

    (cell_size_lat + cell_size_lon) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SRTM_3_ARC_SECOND: f64 = 1.0 / 1200.0;

    #[test]
    fn equator_is_full_degree_length() {
        assert_relative_eq!(cell_size_meters(1.0, 0.0), METERS_PER_DEGREE);

        let size = cell_size_meters(SRTM_3_ARC_SECOND, 0.0);
        assert!(80.0 < size && size < 100.0, "got {}", size);
    }

    #[test]
    fn scottish_latitude_is_smaller() {
        let size = cell_size_meters(SRTM_3_ARC_SECOND, 57.0);
        assert!(50.0 < size && size < 90.0, "got {}", size);
        assert!(size < cell_size_meters(SRTM_3_ARC_SECOND, 0.0));
    }

    #[test]
    fn near_pole_approaches_half() {
        let size = cell_size_meters(1.0, 89.999);
        assert_relative_eq!(size, METERS_PER_DEGREE / 2.0, max_relative = 1e-4);
    }

    #[test]
    fn increases_with_resolution() {
        let small = cell_size_meters(1.0 / 1200.0, 57.0);
        let large = cell_size_meters(1.0 / 120.0, 57.0);
        assert!(large > small);
    }

    #[test]
    fn symmetric_in_hemisphere() {
        assert_relative_eq!(cell_size_meters(0.01, 45.0), cell_size_meters(0.01, -45.0));
    }

    #[test]
    fn rejects_non_positive() {
        assert!(CellSize::new(0.0).is_err());
        assert!(CellSize::new(-3.0).is_err());
        assert!(CellSize::new(f64::INFINITY).is_err());
        assert!(CellSize::from_resolution(-0.001, 10.0).is_err());
        assert_relative_eq!(CellSize::new(30.0).unwrap().meters(), 30.0);
    }
}
