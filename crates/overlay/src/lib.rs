//! # avaterrain Overlay
//!
//! Turns a slope raster into a web map: risk colors, display downsampling,
//! Web Mercator row remapping, PNG encoding and a self-contained Leaflet page
//! with OpenStreetMap and Esri Topo base layers and a risk legend.
//!
//! ## Usage
//!
//! ```ignore
//! use avaterrain_overlay::{write_slope_map, OverlayParams};
//!
//! write_slope_map("slope_map.html", &slopes, &bounds, &OverlayParams::default())?;
//! ```

mod downsample;
mod html;
mod layer;
mod legend;
mod mercator;

pub use downsample::{downsample, target_size};
pub use html::{render_page, BaseLayer, BASE_LAYERS};
pub use layer::{encode_png, png_data_uri, OverlayLayer, OverlayParams};
pub use legend::{Legend, LegendEntry};
pub use mercator::{
    lat_to_mercator_y, mercator_source_rows, mercator_y_to_lat, reproject_to_mercator,
    MAX_LATITUDE,
};

use avaterrain_colormap::{slope_to_rgba, RenderParams};
use avaterrain_core::{GeoBounds, Raster, Result, Sample};
use std::path::Path;
use tracing::{info, warn};

/// Everything needed to display one slope grid on a web map
#[derive(Debug, Clone)]
pub struct SlopeOverlay {
    pub layer: OverlayLayer,
    pub legend: Legend,
    /// Initial view (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
}

impl SlopeOverlay {
    pub fn to_html(&self) -> Result<String> {
        render_page(&self.layer, &self.legend, self.center, self.zoom)
    }
}

/// Build the overlay for `slopes` covering `bounds` without touching the
/// filesystem.
///
/// `bounds` must be the extent of the grid actually rendered; an overlay
/// stretched over any other box is misaligned with the base map.
pub fn build_overlay(
    slopes: &Raster<Sample>,
    bounds: &GeoBounds,
    params: &OverlayParams,
) -> Result<SlopeOverlay> {
    params.validate()?;
    if let Some(own) = slopes.bounds() {
        if own != *bounds {
            warn!("Overlay bounds {} differ from raster bounds {}", bounds, own);
        }
    }

    let rgba = slope_to_rgba(slopes, &RenderParams::default());
    let mut image = downsample(&rgba, params.max_dimension)?;
    if params.mercator {
        image = reproject_to_mercator(&image, bounds);
    }

    let layer = OverlayLayer::new(&params.name, bounds, params.opacity, &image)?;
    info!(
        "Built overlay '{}': {} x {} px over {}",
        layer.name, layer.width, layer.height, bounds
    );

    Ok(SlopeOverlay {
        layer,
        legend: Legend::default(),
        center: params.center.unwrap_or_else(|| bounds.center()),
        zoom: params.zoom,
    })
}

/// Build the overlay and write it as a single HTML file at `path`.
pub fn write_slope_map<P: AsRef<Path>>(
    path: P,
    slopes: &Raster<Sample>,
    bounds: &GeoBounds,
    params: &OverlayParams,
) -> Result<SlopeOverlay> {
    let overlay = build_overlay(slopes, bounds, params)?;
    std::fs::write(path.as_ref(), overlay.to_html()?)?;
    info!("Map saved to {}", path.as_ref().display());
    Ok(overlay)
}
