//! Shelter registry CSV adapter
//!
//! Converts rows of a civil-defense shelter registry export into markers.
//! Only rows whose category column marks an actual shelter are kept; the
//! export mixes in other structure types that ATAK users do not want on the
//! map.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use takmark_cot::Marker;
use tracing::debug;

/// Category cell value identifying a shelter row
const SHELTER_CATEGORY: &str = "[1] - (S) - schron";

/// Callsign assigned to every shelter marker
const SHELTER_CALLSIGN: &str = "Schron";

/// One row of the registry export; columns beyond these are ignored
#[derive(Debug, Deserialize)]
struct ShelterRow {
    /// Structure category
    #[serde(rename = "Rodzaj obi")]
    category: String,
    /// Longitude in decimal degrees
    x: String,
    /// Latitude in decimal degrees
    y: String,
    /// Street address, kept as marker remarks
    #[serde(rename = "Adres")]
    address: String,
}

/// Reads shelter markers from a registry CSV export.
///
/// The first line is consumed as the header and rows are matched by column
/// name, so column order in the export does not matter. A malformed row
/// fails the whole run.
pub fn read_shelters(path: &Path) -> Result<Vec<Marker>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut markers = Vec::new();
    for row in reader.deserialize() {
        let row: ShelterRow = row.context("Invalid shelter CSV row")?;
        if row.category != SHELTER_CATEGORY {
            debug!("Skipping non-shelter row: {}", row.category);
            continue;
        }
        markers.push(Marker::with_remarks(
            SHELTER_CALLSIGN,
            &row.x,
            &row.y,
            row.address,
        ));
    }

    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_shelter_rows() {
        let file = write_csv(
            "Lp,Rodzaj obi,Adres,x,y\n\
             1,[1] - (S) - schron,ul. Polna 1,18.5,54.4\n\
             2,[2] - (U) - ukrycie,ul. Lesna 2,18.6,54.5\n\
             3,[1] - (S) - schron,\"ul. Dluga 3, Gdynia\",18.7,54.6\n",
        );

        let markers = read_shelters(file.path()).unwrap();
        assert_eq!(markers.len(), 2);

        assert_eq!(markers[0].callsign, "Schron");
        assert_eq!(markers[0].lon, "18.5");
        assert_eq!(markers[0].lat, "54.4");
        assert_eq!(markers[0].remarks, "ul. Polna 1");

        // quoted comma stays inside the address cell
        assert_eq!(markers[1].remarks, "ul. Dluga 3, Gdynia");
        assert_eq!(markers[1].lon, "18.7");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let file = write_csv(
            "Rodzaj obi,x,y,Adres,Uwagi\n\
             [1] - (S) - schron,18.1,54.2,ul. Krotka 9,stan dobry\n",
        );

        let markers = read_shelters(file.path()).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].remarks, "ul. Krotka 9");
    }

    #[test]
    fn test_missing_column_is_error() {
        let file = write_csv("Rodzaj obi,x,y\n[1] - (S) - schron,18.1,54.2\n");
        assert!(read_shelters(file.path()).is_err());
    }

    #[test]
    fn test_header_only_yields_no_markers() {
        let file = write_csv("Rodzaj obi,x,y,Adres\n");
        let markers = read_shelters(file.path()).unwrap();
        assert!(markers.is_empty());
    }
}
