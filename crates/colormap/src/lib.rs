//! # avaterrain Colormap
//!
//! Avalanche risk classification and slope-to-RGBA rendering.
//!
//! Slope angles are binned into five fixed risk categories by [`classify`];
//! [`slope_to_rgba`] turns a slope raster into an RGBA pixel buffer using the
//! category colors, with no-data rendered fully transparent.
//!
//! ## Usage
//!
//! ```ignore
//! use avaterrain_colormap::{slope_to_rgba, RenderParams};
//!
//! let rgba = slope_to_rgba(&slopes, &RenderParams::default());
//! ```

mod render;
mod risk;

pub use render::{classify_grid, slope_to_rgba, RenderParams, RgbaGrid, RiskSummary};
pub use risk::{
    classify, classify_value, risk_color, table_is_partition, RiskCategory, RiskClass, Rgba,
    RISK_TABLE,
};
