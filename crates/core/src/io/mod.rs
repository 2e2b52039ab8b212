//! I/O operations for reading and writing georeferenced rasters

mod native;

pub use native::{
    read_dem, read_dem_from_buffer, write_geotiff, write_geotiff_to_buffer, GeoTiffDem,
    DEFAULT_NODATA_FLOOR,
};
