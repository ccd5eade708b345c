//! Marker model for imported map points

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{DEFAULT_ICON_PATH, MARKER_HOW, MARKER_TYPE};

/// One map marker destined for an ATAK mission package.
///
/// Coordinates are carried as text so that input values (CSV cells, KML
/// coordinates, literals) pass through to the emitted XML unchanged; no
/// range checking is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique identifier, an uppercase hyphenated UUID v4.
    ///
    /// Also names the marker's directory and `.cot` file inside the package.
    pub uid: String,
    /// Callsign shown on the map
    pub callsign: String,
    /// Latitude in decimal degrees
    pub lat: String,
    /// Longitude in decimal degrees
    pub lon: String,
    /// Free-text remarks attached to the marker (may be empty)
    pub remarks: String,
    /// Event timestamp, pinned to 00:00:00Z of the current UTC day.
    ///
    /// Used for the event `time`, `start`, and `stale` attributes alike, so
    /// imported markers never go stale.
    pub time: String,
    /// CoT type (always "a-u-G" for imported markers)
    #[serde(rename = "type")]
    pub cot_type: String,
    /// CoT how code (always "h-g-i-g-o")
    pub how: String,
    /// ATAK iconset path for the marker icon
    pub icon_path: String,
}

impl Marker {
    /// Creates a marker with empty remarks.
    pub fn new(callsign: impl Into<String>, lon: impl ToString, lat: impl ToString) -> Self {
        Self::with_remarks(callsign, lon, lat, "")
    }

    /// Creates a marker with the given remarks text.
    pub fn with_remarks(
        callsign: impl Into<String>,
        lon: impl ToString,
        lat: impl ToString,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            uid: new_uid(),
            callsign: callsign.into(),
            lat: lat.to_string(),
            lon: lon.to_string(),
            remarks: remarks.into(),
            time: start_of_day(),
            cot_type: MARKER_TYPE.to_string(),
            how: MARKER_HOW.to_string(),
            icon_path: DEFAULT_ICON_PATH.to_string(),
        }
    }
}

/// Identity of the generating run.
///
/// Every event in a package carries this uid in its `<link>` element so ATAK
/// can attribute all markers of one import to the same producer. Generate it
/// once per run and pass it to each render call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducerUid(String);

impl ProducerUid {
    /// Creates a fresh producer identity (uppercase UUID v4).
    pub fn generate() -> Self {
        Self(new_uid())
    }

    /// Returns the uid as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProducerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProducerUid {
    fn from(uid: &str) -> Self {
        Self(uid.to_string())
    }
}

fn new_uid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

fn start_of_day() -> String {
    Utc::now().format("%Y-%m-%dT00:00:00Z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_defaults() {
        let marker = Marker::new("Checkpoint", 18.014296, 54.609026);
        assert_eq!(marker.callsign, "Checkpoint");
        assert_eq!(marker.lon, "18.014296");
        assert_eq!(marker.lat, "54.609026");
        assert_eq!(marker.remarks, "");
        assert_eq!(marker.cot_type, MARKER_TYPE);
        assert_eq!(marker.how, MARKER_HOW);
        assert_eq!(marker.icon_path, DEFAULT_ICON_PATH);
    }

    #[test]
    fn test_marker_with_remarks() {
        let marker = Marker::with_remarks("Schron", "18.5", "54.4", "ul. Polna 1");
        assert_eq!(marker.lon, "18.5");
        assert_eq!(marker.lat, "54.4");
        assert_eq!(marker.remarks, "ul. Polna 1");
    }

    #[test]
    fn test_uid_is_uppercase_uuid() {
        let marker = Marker::new("A", 0.0, 0.0);
        assert_eq!(marker.uid.len(), 36);
        assert_eq!(marker.uid, marker.uid.to_uppercase());
        assert!(Uuid::parse_str(&marker.uid).is_ok());
    }

    #[test]
    fn test_uids_are_unique() {
        let a = Marker::new("A", 0.0, 0.0);
        let b = Marker::new("B", 0.0, 0.0);
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn test_time_pinned_to_start_of_day() {
        let marker = Marker::new("A", 0.0, 0.0);
        assert_eq!(marker.time.len(), 20);
        assert!(marker.time.ends_with("T00:00:00Z"));
    }

    #[test]
    fn test_producer_uid() {
        let producer = ProducerUid::generate();
        assert_eq!(producer.as_str().len(), 36);
        assert_eq!(producer.as_str(), producer.as_str().to_uppercase());

        let fixed = ProducerUid::from("0B7EAAE8-52B9-4A94-907B-7C104A2B9C5C");
        assert_eq!(fixed.to_string(), "0B7EAAE8-52B9-4A94-907B-7C104A2B9C5C");
    }
}
