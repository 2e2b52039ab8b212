//! Image overlay layers and their parameters

use avaterrain_colormap::RgbaGrid;
use avaterrain_core::{Error, GeoBounds, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use serde::Serialize;
use std::io::Cursor;

/// Parameters for building a slope overlay.
#[derive(Debug, Clone)]
pub struct OverlayParams {
    /// Longest allowed side of the embedded image, in pixels
    pub max_dimension: usize,
    /// Layer opacity in [0, 1]
    pub opacity: f64,
    /// Layer name shown in the layer control
    pub name: String,
    /// Initial map center (lat, lon); the bounds center if `None`
    pub center: Option<(f64, f64)>,
    /// Initial zoom level
    pub zoom: u8,
    /// Resample rows onto Web Mercator spacing before embedding
    pub mercator: bool,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            max_dimension: 1500,
            opacity: 0.6,
            name: "Slope Angle".to_string(),
            center: None,
            zoom: 8,
            mercator: true,
        }
    }
}

impl OverlayParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(Error::InvalidParameter {
                name: "max_dimension",
                value: self.max_dimension.to_string(),
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::InvalidParameter {
                name: "opacity",
                value: self.opacity.to_string(),
                reason: "must lie in [0, 1]".into(),
            });
        }
        Ok(())
    }
}

/// Georeferenced image handed to the web map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLayer {
    pub name: String,
    /// `[[south, west], [north, east]]`
    pub bounds: [[f64; 2]; 2],
    pub opacity: f64,
    /// PNG data URI
    pub image: String,
    pub width: usize,
    pub height: usize,
}

impl OverlayLayer {
    /// Encode `grid` as PNG and stretch it over `bounds`
    pub fn new(name: &str, bounds: &GeoBounds, opacity: f64, grid: &RgbaGrid) -> Result<Self> {
        let png = encode_png(grid)?;
        Ok(Self {
            name: name.to_string(),
            bounds: bounds.corners(),
            opacity,
            image: png_data_uri(&png),
            width: grid.cols,
            height: grid.rows,
        })
    }
}

/// Encode an RGBA grid as PNG bytes
pub fn encode_png(grid: &RgbaGrid) -> Result<Vec<u8>> {
    let image = RgbaImage::from_raw(grid.cols as u32, grid.rows as u32, grid.pixels.clone())
        .ok_or(Error::InvalidDimensions {
            width: grid.cols,
            height: grid.rows,
        })?;

    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Error::Image(format!("PNG encode error: {}", e)))?;
    Ok(buf)
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
