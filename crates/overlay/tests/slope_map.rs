//! End-to-end overlay generation

use approx::assert_relative_eq;
use avaterrain_colormap::{classify, RiskCategory};
use avaterrain_core::{Error, GeoBounds, Raster, Sample};
use avaterrain_overlay::{build_overlay, write_slope_map, OverlayParams};

fn highlands() -> GeoBounds {
    GeoBounds::new(-5.5, 56.0, -2.8, 58.0).unwrap()
}

/// Slope grid rising 0..90 degrees west to east with one missing cell
fn ramp(rows: usize, cols: usize) -> Raster<Sample> {
    let mut values: Vec<f64> = (0..rows)
        .flat_map(|_| (0..cols).map(move |c| c as f64 * 90.0 / (cols - 1) as f64))
        .collect();
    values[0] = f64::NAN;
    Raster::from_values(values, rows, cols).unwrap()
}

#[test]
fn probe_and_paint_agree() {
    let bounds = highlands();
    let (rows, cols) = (40, 54);
    for row in 0..rows {
        for col in 0..cols {
            let (lat, lon) = bounds.cell_origin(row, col, rows, cols);
            // nudge inside the cell to stay clear of float rounding at the edge
            let (lat, lon) = (lat - 1e-9, lon + 1e-9);
            assert_eq!(bounds.pixel_index(lat, lon, rows, cols), (row, col));
        }
    }
}

#[test]
fn writes_self_contained_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slope_map.html");

    let slopes = ramp(20, 30);
    let overlay = write_slope_map(&path, &slopes, &highlands(), &OverlayParams::default()).unwrap();
    let html = std::fs::read_to_string(&path).unwrap();

    assert!(html.contains("\"bounds\":[[56.0,-5.5],[58.0,-2.8]]"));
    assert!(html.contains("\"opacity\":0.6"));
    assert!(html.contains("\"name\":\"Slope Angle\""));
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("Avalanche Terrain Risk"));
    assert!(html.contains("World_Topo_Map"));

    assert_eq!((overlay.layer.width, overlay.layer.height), (30, 20));
    assert_relative_eq!(overlay.center.0, 57.0);
    assert_relative_eq!(overlay.center.1, -4.15, epsilon = 1e-12);
    assert_eq!(overlay.zoom, 8);
}

#[test]
fn custom_view_and_name() {
    let params = OverlayParams {
        name: "Cairngorms".to_string(),
        center: Some((57.0, -5.0)),
        zoom: 10,
        opacity: 0.8,
        mercator: false,
        ..Default::default()
    };
    let overlay = build_overlay(&ramp(10, 10), &highlands(), &params).unwrap();
    assert_eq!(overlay.layer.name, "Cairngorms");
    assert_eq!(overlay.layer.opacity, 0.8);
    assert_eq!(overlay.center, (57.0, -5.0));
    assert_eq!(overlay.zoom, 10);
}

#[test]
fn large_grid_is_downsampled() {
    let slopes = Raster::filled(2000, 3000, Sample::Value(35.0));
    let overlay = build_overlay(&slopes, &highlands(), &OverlayParams::default()).unwrap();
    assert_eq!((overlay.layer.width, overlay.layer.height), (1500, 1000));
}

#[test]
fn missing_is_not_painted_low() {
    let slopes = ramp(4, 4);
    assert_eq!(classify(slopes.get(0, 0).unwrap()), None);
    assert_eq!(classify(slopes.get(1, 0).unwrap()), Some(RiskCategory::Low));
}

#[test]
fn unwritable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("map.html");
    let result = write_slope_map(&path, &ramp(5, 5), &highlands(), &OverlayParams::default());
    assert!(matches!(result, Err(Error::Io(_))));
}
