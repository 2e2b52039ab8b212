//! Native GeoTIFF reading/writing
//!
//! Uses the `tiff` crate for basic TIFF I/O. Only north-up rasters described
//! by ModelPixelScale + ModelTiepoint tags are supported.

use crate::dem::{Dem, DemProvider};
use crate::error::{Error, Result};
use crate::raster::{GeoBounds, Raster, Sample};
use num_traits::ToPrimitive;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tracing::{debug, info};

const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;

/// Values below this are treated as voids (SRTM uses -32768)
pub const DEFAULT_NODATA_FLOOR: f64 = -1000.0;

/// Georeferenced grid as stored on disk
struct DecodedTiff {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
    bounds: GeoBounds,
    resolution: f64,
}

/// DEM provider backed by a single local GeoTIFF file.
#[derive(Debug, Clone)]
pub struct GeoTiffDem {
    path: PathBuf,
    nodata_floor: f64,
}

impl GeoTiffDem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            nodata_floor: DEFAULT_NODATA_FLOOR,
        }
    }

    /// Override the elevation below which samples are treated as missing
    pub fn with_nodata_floor(mut self, floor: f64) -> Self {
        self.nodata_floor = floor;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file without cropping
    pub fn read_full(&self) -> Result<Dem> {
        let file = File::open(&self.path)?;
        let dem = decode_dem(file, self.nodata_floor)?;
        info!(
            "Read DEM {}: {} x {}, bounds {}",
            self.path.display(),
            dem.elevation.cols(),
            dem.elevation.rows(),
            dem.bounds
        );
        Ok(dem)
    }
}

impl DemProvider for GeoTiffDem {
    fn load(&self, request: &GeoBounds) -> Result<Dem> {
        self.read_full()?.crop(request)
    }
}

/// Read a GeoTIFF file into a DEM
pub fn read_dem<P: AsRef<Path>>(path: P) -> Result<Dem> {
    GeoTiffDem::new(path.as_ref()).read_full()
}

/// Read a GeoTIFF from an in-memory buffer into a DEM
pub fn read_dem_from_buffer(data: &[u8]) -> Result<Dem> {
    decode_dem(Cursor::new(data), DEFAULT_NODATA_FLOOR)
}

fn decode_dem<R>(reader: R, nodata_floor: f64) -> Result<Dem>
where
    R: std::io::Read + std::io::Seek,
{
    let decoded = decode_geotiff(reader)?;
    let samples = decoded
        .values
        .into_iter()
        .map(|v| Sample::with_floor(v, nodata_floor))
        .collect();
    let elevation = Raster::from_vec(samples, decoded.rows, decoded.cols)?;
    Dem::new(elevation, decoded.bounds, decoded.resolution)
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<R>(reader: R) -> Result<DecodedTiff>
where
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Image(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Image(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let (origin_x, origin_y, scale_x, scale_y) = read_georeference(&mut decoder)?;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Image(format!("Cannot read image data: {}", e)))?;

    let values: Vec<f64> = match result {
        DecodingResult::F32(buf) => buf.iter().map(|&v| v as f64).collect(),
        DecodingResult::F64(buf) => buf,
        DecodingResult::U8(buf) => cast_all(&buf),
        DecodingResult::U16(buf) => cast_all(&buf),
        DecodingResult::U32(buf) => cast_all(&buf),
        DecodingResult::I8(buf) => cast_all(&buf),
        DecodingResult::I16(buf) => cast_all(&buf),
        DecodingResult::I32(buf) => cast_all(&buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if values.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let bounds = GeoBounds::from_origin(origin_x, origin_y, scale_x, scale_y, rows, cols)?;
    debug!("GeoTIFF origin ({}, {}), pixel {} x {}", origin_x, origin_y, scale_x, scale_y);

    Ok(DecodedTiff {
        values,
        rows,
        cols,
        bounds,
        resolution: scale_x.abs(),
    })
}

fn cast_all<T: ToPrimitive>(buf: &[T]) -> Vec<f64> {
    buf.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect()
}

/// Read (origin_x, origin_y, scale_x, scale_y) from ModelTiepoint + ModelPixelScale
fn read_georeference<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<(f64, f64, f64, f64)> {
    let scale = decoder
        .get_tag_f64_vec(MODEL_PIXEL_SCALE)
        .map_err(|e| Error::Other(format!("Cannot read GeoTIFF pixel scale tag: {}", e)))?;

    let tiepoint = decoder
        .get_tag_f64_vec(MODEL_TIEPOINT)
        .map_err(|e| Error::Other(format!("Cannot read GeoTIFF tiepoint tag: {}", e)))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z]
        // scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        return Ok((origin_x, origin_y, scale[0], scale[1]));
    }

    Err(Error::Other("Cannot determine georeference".into()))
}

/// Write a sample raster to a GeoTIFF file.
///
/// Writes 32-bit floats in geographic (EPSG:4326) coordinates; missing
/// samples are stored as NaN.
pub fn write_geotiff<P: AsRef<Path>>(
    raster: &Raster<Sample>,
    bounds: &GeoBounds,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, bounds, file)
}

/// Write a sample raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer(raster: &Raster<Sample>, bounds: &GeoBounds) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, bounds, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode a sample raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<W>(raster: &Raster<Sample>, bounds: &GeoBounds, writer: W) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Image(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();
    let data: Vec<f32> = raster.data().iter().map(|s| s.to_f64() as f32).collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Image(format!("Cannot create TIFF image: {}", e)))?;

    let scale = vec![bounds.width() / cols as f64, bounds.height() / rows as f64, 0.0];
    image
        .encoder()
        .write_tag(MODEL_PIXEL_SCALE, scale.as_slice())
        .map_err(|e| Error::Image(format!("Cannot write scale tag: {}", e)))?;

    let tiepoint = vec![0.0, 0.0, 0.0, bounds.west(), bounds.north(), 0.0];
    image
        .encoder()
        .write_tag(MODEL_TIEPOINT, tiepoint.as_slice())
        .map_err(|e| Error::Image(format!("Cannot write tiepoint tag: {}", e)))?;

    // GTModelTypeGeoKey=2 (Geographic), GTRasterTypeGeoKey=1 (PixelIsArea),
    // GeographicTypeGeoKey=4326 (WGS84)
    let geokeys: Vec<u16> = vec![
        1, 1, 0, 3, // Version 1.1.0, 3 keys
        1024, 0, 1, 2, //
        1025, 0, 1, 1, //
        2048, 0, 1, 4326,
    ];
    image
        .encoder()
        .write_tag(GEO_KEY_DIRECTORY, geokeys.as_slice())
        .map_err(|e| Error::Image(format!("Cannot write geokey tag: {}", e)))?;

    image
        .write_data(&data)
        .map_err(|e| Error::Image(format!("Cannot write image data: {}", e)))?;

    Ok(())
}
