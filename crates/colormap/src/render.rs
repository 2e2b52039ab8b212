//! Slope-to-RGBA rendering using the risk table.

use crate::risk::{classify, RiskCategory, Rgba};
use avaterrain_core::raster::{Raster, Sample};
use tracing::debug;

/// Parameters for risk rendering.
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Color for missing pixels. Default: fully transparent.
    pub nodata_color: Rgba,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            nodata_color: Rgba::TRANSPARENT,
        }
    }
}

/// Row-major RGBA pixel buffer, row 0 = north.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaGrid {
    pub rows: usize,
    pub cols: usize,
    /// `rows * cols * 4` bytes
    pub pixels: Vec<u8>,
}

impl RgbaGrid {
    /// Color of the pixel at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgba> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let offset = (row * self.cols + col) * 4;
        let p = &self.pixels[offset..offset + 4];
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }
}

/// Assign a risk category to every cell; missing cells get `None`.
pub fn classify_grid(slopes: &Raster<Sample>) -> Raster<Option<RiskCategory>> {
    slopes.map(|&s| classify(s))
}

/// Convert a slope raster to an RGBA pixel buffer.
///
/// Each present cell takes the color of its risk category; missing cells are
/// rendered with `params.nodata_color`.
pub fn slope_to_rgba(slopes: &Raster<Sample>, params: &RenderParams) -> RgbaGrid {
    let (rows, cols) = slopes.shape();
    let mut pixels = Vec::with_capacity(rows * cols * 4);

    for &s in slopes.data().iter() {
        let color = classify(s).map_or(params.nodata_color, |c| c.color());
        pixels.extend_from_slice(&color.to_array());
    }

    debug!("Rendered {} x {} risk pixels", cols, rows);
    RgbaGrid { rows, cols, pixels }
}

/// Cell counts per risk category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskSummary {
    /// Indexed by `RiskCategory as usize`
    pub counts: [usize; 5],
    pub missing: usize,
}

impl RiskSummary {
    pub fn from_slopes(slopes: &Raster<Sample>) -> Self {
        let mut summary = Self::default();
        for &s in slopes.data().iter() {
            match classify(s) {
                Some(c) => summary.counts[c as usize] += 1,
                None => summary.missing += 1,
            }
        }
        summary
    }

    pub fn count(&self, category: RiskCategory) -> usize {
        self.counts[category as usize]
    }

    /// Number of classified (non-missing) cells
    pub fn classified(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of classified cells in `category`, in percent
    pub fn percent(&self, category: RiskCategory) -> f64 {
        let total = self.classified();
        if total == 0 {
            return 0.0;
        }
        self.count(category) as f64 * 100.0 / total as f64
    }
}
