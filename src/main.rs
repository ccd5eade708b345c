//! takmark - convert point data into ATAK mission packages
//!
//! Reads points from a shelter-registry CSV export or a KML document and
//! produces a mission package ZIP that ATAK imports as a set of map markers.
//!
//! # Usage
//!
//! ```bash
//! # Convert a shelter registry export
//! takmark --schrony schrony-csv.csv -o shelters
//!
//! # Convert KML placemarks
//! takmark --kml waypoints.kml -o waypoints
//! ```
//!
//! The package is written as `{output}.zip` in the current directory; the
//! staging tree is left behind in `out/` for inspection.

mod adapters;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use takmark_cot::ProducerUid;
use takmark_datapackage::PackageBuilder;
use tracing::{info, warn};

/// Convert CSV and KML point data into ATAK mission packages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true)))]
struct Args {
    /// CSV file with shelter registry data to convert
    #[arg(long, group = "input")]
    schrony: Option<PathBuf>,

    /// KML file to convert
    #[arg(long, group = "input")]
    kml: Option<PathBuf>,

    /// Output package name, also the base name of the ZIP file
    #[arg(short, long)]
    output: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let markers = if let Some(csv_path) = &args.schrony {
        adapters::csv::read_shelters(csv_path)
            .with_context(|| format!("Failed to read shelter CSV {}", csv_path.display()))?
    } else if let Some(kml_path) = &args.kml {
        adapters::kml::read_placemarks(kml_path)
            .with_context(|| format!("Failed to read KML {}", kml_path.display()))?
    } else {
        unreachable!("input group is required");
    };

    if markers.is_empty() {
        warn!("No markers extracted from input; no package written");
        return Ok(());
    }

    info!("Extracted {} markers", markers.len());

    let producer = ProducerUid::generate();
    let zip_path = PackageBuilder::new(&args.output)
        .build(&markers, &producer)
        .with_context(|| format!("Failed to build package {}", args.output))?;

    info!("✓ Mission package written to {}", zip_path.display());

    Ok(())
}
