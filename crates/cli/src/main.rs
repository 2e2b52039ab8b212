//! avaterrain CLI - avalanche slope-risk maps from DEMs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use avaterrain_algorithms::diagnostics::{
    latitude_offset_scan, local_max, sample_at, steepest_cell,
};
use avaterrain_algorithms::terrain::{slope, CellSize, SlopeParams};
use avaterrain_colormap::{classify, RiskCategory, RiskSummary};
use avaterrain_core::io::{write_geotiff, GeoTiffDem};
use avaterrain_core::{Dem, DemProvider, GeoBounds, Raster, Region, Sample};
use avaterrain_overlay::{write_slope_map, OverlayParams};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "avaterrain")]
#[command(author, version, about = "Avalanche terrain slope-risk maps", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Area of the DEM to process
#[derive(clap::Args, Debug, Clone)]
struct AreaArgs {
    /// Named region to crop to (scottish-highlands)
    #[arg(long, conflicts_with = "bounds")]
    region: Option<String>,
    /// Bounds to crop to: west,south,east,north
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<GeoBounds>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a DEM file
    Info {
        /// Input DEM file
        input: PathBuf,
    },
    /// Calculate slope angle in degrees and write it as GeoTIFF
    Slope {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        #[command(flatten)]
        area: AreaArgs,
    },
    /// Generate an HTML map with the avalanche risk overlay
    Map {
        /// Input DEM file
        input: PathBuf,
        /// Output HTML file
        output: PathBuf,
        #[command(flatten)]
        area: AreaArgs,
        /// Initial map center: lat,lon
        #[arg(long, value_parser = parse_center, allow_hyphen_values = true)]
        center: Option<(f64, f64)>,
        /// Initial zoom level
        #[arg(short, long, default_value = "8")]
        zoom: u8,
        /// Longest side of the embedded overlay image in pixels
        #[arg(long, default_value = "1500")]
        max_dimension: usize,
        /// Overlay opacity in [0, 1]
        #[arg(long, default_value = "0.6")]
        opacity: f64,
        /// Overlay layer name
        #[arg(long, default_value = "Slope Angle")]
        name: String,
        /// Stretch the overlay linearly in latitude instead of Web Mercator
        #[arg(long)]
        no_mercator: bool,
    },
    /// Check slope values at known landmarks to verify overlay alignment
    Probe {
        /// Input DEM file
        input: PathBuf,
        #[command(flatten)]
        area: AreaArgs,
        /// Landmark to probe: name,lat,lon (repeatable; Cairngorm landmarks by default)
        #[arg(long = "point", value_parser = parse_landmark, allow_hyphen_values = true)]
        points: Vec<Landmark>,
        /// Window radius in cells for the local maximum
        #[arg(short, long, default_value = "50")]
        radius: usize,
        /// Latitude span in degrees for the offset scan
        #[arg(long, default_value = "0.02")]
        offset_span: f64,
        /// Latitude step in degrees for the offset scan
        #[arg(long, default_value = "0.001")]
        offset_step: f64,
        /// Offsets larger than this (degrees) are reported as misalignment
        #[arg(long, default_value = "0.005")]
        threshold: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Landmark {
    name: String,
    lat: f64,
    lon: f64,
}

impl Landmark {
    fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
        }
    }
}

/// Cairngorm features with well-known terrain; the first one is a steep
/// headwall used for the offset scan.
fn default_landmarks() -> Vec<Landmark> {
    vec![
        Landmark::new("Coire an t-Sneachda headwall", 57.1089, -3.6542),
        Landmark::new("Cairn Gorm summit", 57.1167, -3.6431),
        Landmark::new("Loch Avon", 57.0983, -3.5750),
        Landmark::new("Ben Macdui summit", 57.0703, -3.6689),
        Landmark::new("Lurcher's Crag", 57.1000, -3.7167),
        Landmark::new("Coire an Lochain headwall", 57.1050, -3.6850),
    ]
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_center(s: &str) -> std::result::Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [lat, lon] => {
            let lat = lat.parse::<f64>().map_err(|e| format!("Invalid latitude: {}", e))?;
            let lon = lon.parse::<f64>().map_err(|e| format!("Invalid longitude: {}", e))?;
            Ok((lat, lon))
        }
        _ => Err(format!("Center must be 'lat,lon', got: {}", s)),
    }
}

fn parse_landmark(s: &str) -> std::result::Result<Landmark, String> {
    // The name may itself contain commas; lat and lon are the last two fields
    let mut parts = s.rsplitn(3, ',');
    let lon = parts.next();
    let lat = parts.next();
    let name = parts.next();
    match (name, lat, lon) {
        (Some(name), Some(lat), Some(lon)) if !name.trim().is_empty() => {
            let (lat, lon) = parse_center(&format!("{},{}", lat, lon))?;
            Ok(Landmark::new(name.trim(), lat, lon))
        }
        _ => Err(format!("Point must be 'name,lat,lon', got: {}", s)),
    }
}

fn requested_bounds(area: &AreaArgs) -> Result<Option<GeoBounds>> {
    if let Some(bounds) = area.bounds {
        return Ok(Some(bounds));
    }
    match &area.region {
        Some(name) => {
            let region = Region::from_name(name).with_context(|| {
                let known: Vec<&str> = Region::ALL.iter().map(|r| r.name()).collect();
                format!("Unknown region: {}. Use one of: {}", name, known.join(", "))
            })?;
            Ok(Some(region.bounds()))
        }
        None => Ok(None),
    }
}

fn read_dem(path: &Path, area: &AreaArgs) -> Result<Dem> {
    let provider = GeoTiffDem::new(path);
    let request = requested_bounds(area)?;

    let pb = spinner("Reading DEM...");
    let dem = match request {
        Some(bounds) => provider.load(&bounds),
        None => provider.read_full(),
    }
    .with_context(|| format!("Failed to read DEM {}", path.display()))?;
    pb.finish_and_clear();

    let (rows, cols) = dem.shape();
    info!("Input: {} x {}, bounds {}", cols, rows, dem.bounds);
    if dem.elevation.missing_count() > 0 {
        warn!("DEM has {} void cells", dem.elevation.missing_count());
    }
    Ok(dem)
}

fn compute_slope(dem: &Dem) -> Result<Raster<Sample>> {
    let cell_size = CellSize::for_dem(dem).context("Invalid DEM resolution")?;
    info!(
        "Resolution: {} degrees ({:.1} meters)",
        dem.resolution,
        cell_size.meters()
    );

    let pb = spinner("Calculating slope angles...");
    let slopes = slope(&dem.elevation, SlopeParams { cell_size })
        .context("Failed to calculate slope")?;
    pb.finish_and_clear();

    let stats = slopes.statistics();
    if let (Some(min), Some(max)) = (stats.min, stats.max) {
        info!("Slope range: {:.1}° to {:.1}°", min, max);
    }
    Ok(slopes)
}

fn print_summary(slopes: &Raster<Sample>) {
    let summary = RiskSummary::from_slopes(slopes);
    println!("\nRisk distribution:");
    for &category in RiskCategory::ALL {
        println!(
            "  {:<10} {:>10} cells ({:.1}%)",
            category.label(),
            summary.count(category),
            summary.percent(category)
        );
    }
    if summary.missing > 0 {
        println!("  {:<10} {:>10} cells", "No data", summary.missing);
    }
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn format_sample(sample: Sample, unit: &str) -> String {
    match sample.value() {
        Some(v) => format!("{:.1}{}", v, unit),
        None => "no data".to_string(),
    }
}

// ─── Probe ──────────────────────────────────────────────────────────────

struct ProbeArgs {
    radius: usize,
    offset_span: f64,
    offset_step: f64,
    threshold: f64,
}

fn run_probe(dem: &Dem, slopes: &Raster<Sample>, points: &[Landmark], args: &ProbeArgs) {
    let bounds = &dem.bounds;
    println!("DEM bounds: {}", bounds);
    println!("DEM shape: {} x {}", dem.elevation.cols(), dem.elevation.rows());

    println!("\nAlignment check at known locations:");
    for point in points {
        let probe = sample_at(slopes, bounds, point.lat, point.lon);
        println!("\n{}", point.name);
        println!("  Coordinates: {:.4}°N, {:.4}°E", point.lat, point.lon);
        if !bounds.contains(point.lat, point.lon) {
            println!("  Outside DEM bounds, clamped to the nearest edge cell");
        }
        println!("  Pixel index: row={}, col={}", probe.row, probe.col);
        println!("  Elevation: {}", format_sample(dem.elevation_at(point.lat, point.lon), "m"));
        println!("  Slope angle: {}", format_sample(probe.value, "°"));
        if let Some(category) = classify(probe.value) {
            println!("  Risk: {}", category.label());
        }
        match local_max(slopes, probe.row, probe.col, args.radius) {
            Some(max) => println!("  Max slope within {} cells: {:.1}°", args.radius, max),
            None => println!("  No slope data within {} cells", args.radius),
        }
    }

    println!("\nSteepest point in dataset:");
    match steepest_cell(slopes, bounds) {
        Some(s) => {
            println!("  Coordinates: {:.4}°N, {:.4}°E", s.lat, s.lon);
            println!("  Slope: {:.1}°", s.value);
            if let Ok(elevation) = dem.elevation.get(s.row, s.col) {
                println!("  Elevation: {}", format_sample(elevation, "m"));
            }
        }
        None => println!("  No slope data"),
    }

    let Some(anchor) = points.first() else {
        return;
    };
    println!(
        "\nOffset scan near {} (±{}° in {}° steps):",
        anchor.name, args.offset_span, args.offset_step
    );
    match latitude_offset_scan(
        slopes,
        bounds,
        anchor.lat,
        anchor.lon,
        args.offset_span,
        args.offset_step,
    ) {
        Some(scan) => {
            println!(
                "  Best match: offset {:+.3}° ({:+.0}m) with slope = {:.1}°",
                scan.best_offset,
                scan.offset_meters(),
                scan.best_value
            );
            if scan.is_significant(args.threshold) {
                let direction = if scan.best_offset > 0.0 { "NORTH" } else { "SOUTH" };
                warn!(
                    "Significant offset: slope data appears shifted {:.0}m {}",
                    scan.offset_meters().abs(),
                    direction
                );
            }
        }
        None => println!("  No scan: no slope data along it, or span/step out of range"),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let dem = read_dem(&input, &AreaArgs { region: None, bounds: None })?;
            let (rows, cols) = dem.shape();
            let stats = dem.elevation.statistics();
            let cell_size = CellSize::for_dem(&dem).context("Invalid DEM resolution")?;

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, dem.elevation.len());
            println!(
                "Resolution: {} degrees ({:.1} meters)",
                dem.resolution,
                cell_size.meters()
            );
            println!("Bounds: {}", dem.bounds);
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / dem.elevation.len().max(1) as f64
            );
        }

        // ── Slope ────────────────────────────────────────────────────
        Commands::Slope { input, output, area } => {
            let dem = read_dem(&input, &area)?;
            let start = Instant::now();
            let slopes = compute_slope(&dem)?;
            let elapsed = start.elapsed();

            let pb = spinner("Writing output...");
            write_geotiff(&slopes, &dem.bounds, &output).context("Failed to write output")?;
            pb.finish_and_clear();
            done("Slope", &output, elapsed);
        }

        // ── Map ──────────────────────────────────────────────────────
        Commands::Map {
            input,
            output,
            area,
            center,
            zoom,
            max_dimension,
            opacity,
            name,
            no_mercator,
        } => {
            let region = area.region.as_deref().and_then(Region::from_name);
            let dem = read_dem(&input, &area)?;
            let start = Instant::now();
            let slopes = compute_slope(&dem)?;

            let params = OverlayParams {
                max_dimension,
                opacity,
                name,
                center: center.or_else(|| region.map(|r| r.center())),
                zoom,
                mercator: !no_mercator,
            };

            let pb = spinner("Generating map...");
            write_slope_map(&output, &slopes, &dem.bounds, &params)
                .context("Failed to write map")?;
            pb.finish_and_clear();

            print_summary(&slopes);
            done("Map", &output, start.elapsed());
        }

        // ── Probe ────────────────────────────────────────────────────
        Commands::Probe {
            input,
            area,
            points,
            radius,
            offset_span,
            offset_step,
            threshold,
        } => {
            let dem = read_dem(&input, &area)?;
            let slopes = compute_slope(&dem)?;
            let points = if points.is_empty() {
                default_landmarks()
            } else {
                points
            };
            let args = ProbeArgs {
                radius,
                offset_span,
                offset_step,
                threshold,
            };
            run_probe(&dem, &slopes, &points, &args);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_center() {
        assert_eq!(parse_center("57.0,-5.0"), Ok((57.0, -5.0)));
        assert!(parse_center("57.0").is_err());
        assert!(parse_center("a,b").is_err());
    }

    #[test]
    fn parses_landmark_with_commas_in_name() {
        let point = parse_landmark("Loch Avon, Cairngorms,57.0983,-3.5750").unwrap();
        assert_eq!(point, Landmark::new("Loch Avon, Cairngorms", 57.0983, -3.5750));
        assert!(parse_landmark(",57.0,-3.0").is_err());
        assert!(parse_landmark("57.0,-3.0").is_err());
    }

    #[test]
    fn parses_map_arguments() {
        let cli = Cli::try_parse_from([
            "avaterrain",
            "map",
            "dem.tif",
            "map.html",
            "--bounds",
            "-5.5,56.0,-2.8,58.0",
            "--opacity",
            "0.5",
            "--no-mercator",
        ])
        .unwrap();
        match cli.command {
            Commands::Map {
                area,
                opacity,
                no_mercator,
                zoom,
                ..
            } => {
                assert_eq!(area.bounds.unwrap().as_tuple(), (-5.5, 56.0, -2.8, 58.0));
                assert_eq!(opacity, 0.5);
                assert!(no_mercator);
                assert_eq!(zoom, 8);
            }
            _ => panic!("expected map command"),
        }
    }

    #[test]
    fn region_and_bounds_conflict() {
        let result = Cli::try_parse_from([
            "avaterrain",
            "slope",
            "dem.tif",
            "out.tif",
            "--region",
            "scottish-highlands",
            "--bounds",
            "0,0,1,1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_region_is_reported() {
        let area = AreaArgs {
            region: Some("alps".into()),
            bounds: None,
        };
        let err = requested_bounds(&area).unwrap_err();
        assert!(err.to_string().contains("scottish-highlands"));
    }
}
