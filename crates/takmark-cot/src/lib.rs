//! Cursor on Target (CoT) marker support for TakMark
//!
//! This crate provides the marker model and XML rendering used to populate
//! ATAK mission packages:
//! - [`Marker`]: one map point (callsign, coordinates, remarks) with the
//!   fixed CoT attributes ATAK expects for imported markers
//! - [`ProducerUid`]: the identity of the generating run, referenced from
//!   every event's `<link>` element
//! - [`render_event`]: serializes a marker as a standalone `.cot` XML document
//!
//! # Example
//!
//! ```rust
//! use takmark_cot::{render_event, Marker, ProducerUid};
//!
//! let producer = ProducerUid::generate();
//! let marker = Marker::new("Checkpoint 1", 18.014296, 54.609026);
//!
//! let xml = render_event(&marker, &producer).expect("Failed to render event");
//! assert!(xml.contains("Checkpoint 1"));
//! ```

pub mod event;
pub mod marker;

pub use event::{render_event, RenderError};
pub use marker::{Marker, ProducerUid};

/// CoT schema version emitted on every event
pub const COT_VERSION: &str = "2.0";

/// CoT type for imported map markers (atom, unknown, ground)
pub const MARKER_TYPE: &str = "a-u-G";

/// CoT how code for imported markers (human, GIGO)
pub const MARKER_HOW: &str = "h-g-i-g-o";

/// Default ATAK iconset path (Google light-blue pushpin)
pub const DEFAULT_ICON_PATH: &str =
    "f7f71666-8b28-4b57-9fbb-e38e61d33b79/Google/ltblu-pushpin.png";
