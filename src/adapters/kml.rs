//! KML placemark adapter
//!
//! Converts the placemarks of a KML document into markers. Placemarks are
//! collected recursively through Document and Folder nesting; each one
//! contributes its name (callsign), description (remarks), and the first
//! coordinate of its geometry. Altitudes are dropped.

use anyhow::{Context, Result};
use kml::types::{Coord, Geometry, Placemark};
use kml::Kml;
use std::fs;
use std::path::Path;
use takmark_cot::Marker;
use tracing::debug;

/// Callsign for placemarks without a name
const DEFAULT_CALLSIGN: &str = "Unnamed Waypoint";

/// Reads markers from the placemarks of a KML document.
///
/// Placemarks without a usable geometry are skipped.
pub fn read_placemarks(path: &Path) -> Result<Vec<Marker>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Kml = text
        .parse()
        .with_context(|| format!("Invalid KML in {}", path.display()))?;

    let mut placemarks = Vec::new();
    collect_placemarks(&document, &mut placemarks);

    let mut markers = Vec::new();
    for placemark in placemarks {
        match placemark_marker(placemark) {
            Some(marker) => markers.push(marker),
            None => debug!(
                "Skipping placemark without coordinates: {}",
                placemark.name.as_deref().unwrap_or(DEFAULT_CALLSIGN)
            ),
        }
    }

    Ok(markers)
}

fn collect_placemarks<'a>(node: &'a Kml, out: &mut Vec<&'a Placemark>) {
    match node {
        Kml::KmlDocument(doc) => {
            for child in &doc.elements {
                collect_placemarks(child, out);
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            for child in elements {
                collect_placemarks(child, out);
            }
        }
        Kml::Placemark(placemark) => out.push(placemark),
        _ => {}
    }
}

fn placemark_marker(placemark: &Placemark) -> Option<Marker> {
    let geometry = placemark.geometry.as_ref()?;
    let coord = first_coord(geometry)?;

    let callsign = match placemark.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_CALLSIGN,
    };
    let remarks = placemark.description.as_deref().unwrap_or_default();

    Some(Marker::with_remarks(callsign, coord.x, coord.y, remarks))
}

/// First coordinate of a geometry: the point itself, the first vertex of a
/// line or ring, the outer ring of a polygon, or the first usable member of
/// a multi-geometry.
fn first_coord(geometry: &Geometry) -> Option<&Coord> {
    match geometry {
        Geometry::Point(point) => Some(&point.coord),
        Geometry::LineString(line) => line.coords.first(),
        Geometry::LinearRing(ring) => ring.coords.first(),
        Geometry::Polygon(polygon) => polygon.outer.coords.first(),
        Geometry::MultiGeometry(multi) => multi.geometries.iter().find_map(first_coord),
        _ => None,
    }
}
