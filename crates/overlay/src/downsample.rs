//! Display-size reduction of RGBA overlays

use avaterrain_colormap::RgbaGrid;
use avaterrain_core::{Error, Result};
use image::imageops::{self, FilterType};
use image::Rgba32FImage;
use tracing::debug;

/// Output size (rows, cols) for a grid whose long side may not exceed
/// `max_dimension`.
///
/// The long side becomes exactly `max_dimension`; the short side is scaled
/// by the same factor and rounded, never below one pixel.
pub fn target_size(rows: usize, cols: usize, max_dimension: usize) -> (usize, usize) {
    let long = rows.max(cols);
    if long <= max_dimension {
        return (rows, cols);
    }
    let scale = max_dimension as f64 / long as f64;
    let shrink = |n: usize| {
        if n == long {
            max_dimension
        } else {
            ((n as f64 * scale).round() as usize).max(1)
        }
    };
    (shrink(rows), shrink(cols))
}

/// Shrink `grid` with Lanczos3 resampling so neither side exceeds
/// `max_dimension`. Grids already small enough are returned unchanged.
pub fn downsample(grid: &RgbaGrid, max_dimension: usize) -> Result<RgbaGrid> {
    if max_dimension == 0 {
        return Err(Error::InvalidParameter {
            name: "max_dimension",
            value: "0".into(),
            reason: "must be at least 1".into(),
        });
    }
    if grid.rows == 0 || grid.cols == 0 {
        return Err(Error::InvalidDimensions {
            width: grid.cols,
            height: grid.rows,
        });
    }

    let (rows, cols) = target_size(grid.rows, grid.cols, max_dimension);
    if (rows, cols) == (grid.rows, grid.cols) {
        return Ok(grid.clone());
    }

    let image = premultiply(grid).ok_or(Error::InvalidDimensions {
        width: grid.cols,
        height: grid.rows,
    })?;
    let resized = imageops::resize(&image, cols as u32, rows as u32, FilterType::Lanczos3);

    debug!(
        "Downsampled overlay {} x {} -> {} x {}",
        grid.cols, grid.rows, cols, rows
    );

    Ok(RgbaGrid {
        rows,
        cols,
        pixels: unpremultiply(&resized.into_raw()),
    })
}

/// Normalized float image with color channels scaled by alpha, so fully
/// transparent pixels carry no color into their neighbours when filtered.
fn premultiply(grid: &RgbaGrid) -> Option<Rgba32FImage> {
    let data: Vec<f32> = grid
        .pixels
        .chunks_exact(4)
        .flat_map(|p| {
            let a = p[3] as f32 / 255.0;
            [
                p[0] as f32 / 255.0 * a,
                p[1] as f32 / 255.0 * a,
                p[2] as f32 / 255.0 * a,
                a,
            ]
        })
        .collect();
    Rgba32FImage::from_raw(grid.cols as u32, grid.rows as u32, data)
}

fn unpremultiply(data: &[f32]) -> Vec<u8> {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    data.chunks_exact(4)
        .flat_map(|p| {
            let a = p[3].clamp(0.0, 1.0);
            if to_u8(a) == 0 {
                return [0; 4];
            }
            [to_u8(p[0] / a), to_u8(p[1] / a), to_u8(p[2] / a), to_u8(a)]
        })
        .collect()
}
