//! CoT event XML rendering
//!
//! Produces the standalone `.cot` document stored per marker inside a
//! mission package. ATAK's import path reads these with a strict schema:
//! attribute order, the fixed detail children, and the absence of an XML
//! declaration all match what the consuming application expects.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::marker::{Marker, ProducerUid};
use crate::COT_VERSION;

/// Link type identifying the producer as a friendly ground unit
const LINK_TYPE: &str = "a-f-G-U-C";

/// Parent/producer relation code
const LINK_RELATION: &str = "p-p";

/// Callsign ATAK shows as the import source
const LINK_PARENT_CALLSIGN: &str = "ATAK Marker Import";

/// Placeholder source codes for markers without sensor provenance
const GEOPOINT_SRC: &str = "???";
const ALT_SRC: &str = "???";

/// Marker color, -1 is white in ARGB
const COLOR_ARGB: &str = "-1";

/// Static flow tag recognized by TAK servers; the value is never recomputed
const FLOW_TAG_NAME: &str = "TAK-Server-fe3bcbd8";
const FLOW_TAG_TIME: &str = "2020-02-06T17:53:28Z";

/// Errors that can occur while rendering an event document
#[derive(Error, Debug)]
pub enum RenderError {
    /// I/O error from the underlying writer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Rendered document was not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Renders a marker as a CoT event XML document.
///
/// The producer uid is stamped into the event's `<link>` element so all
/// markers of one run share a producer. Callsign, remarks, and coordinate
/// values are escaped by the writer, so arbitrary input text is safe.
pub fn render_event(marker: &Marker, producer: &ProducerUid) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut event = BytesStart::new("event");
    event.push_attribute(("version", COT_VERSION));
    event.push_attribute(("uid", marker.uid.as_str()));
    event.push_attribute(("type", marker.cot_type.as_str()));
    event.push_attribute(("how", marker.how.as_str()));
    event.push_attribute(("time", marker.time.as_str()));
    event.push_attribute(("start", marker.time.as_str()));
    event.push_attribute(("stale", marker.time.as_str()));
    writer.write_event(Event::Start(event))?;

    let mut point = BytesStart::new("point");
    point.push_attribute(("lat", marker.lat.as_str()));
    point.push_attribute(("lon", marker.lon.as_str()));
    point.push_attribute(("hae", "0.0"));
    point.push_attribute(("ce", "0.0"));
    point.push_attribute(("le", "0.0"));
    writer.write_event(Event::Empty(point))?;

    writer.write_event(Event::Start(BytesStart::new("detail")))?;

    let mut contact = BytesStart::new("contact");
    contact.push_attribute(("callsign", marker.callsign.as_str()));
    writer.write_event(Event::Empty(contact))?;

    let mut precision = BytesStart::new("precisionlocation");
    precision.push_attribute(("geopointsrc", GEOPOINT_SRC));
    precision.push_attribute(("altsrc", ALT_SRC));
    writer.write_event(Event::Empty(precision))?;

    let mut status = BytesStart::new("status");
    status.push_attribute(("readiness", "true"));
    writer.write_event(Event::Empty(status))?;

    writer.write_event(Event::Empty(BytesStart::new("archive")))?;

    let mut link = BytesStart::new("link");
    link.push_attribute(("uid", producer.as_str()));
    link.push_attribute(("production_time", marker.time.as_str()));
    link.push_attribute(("type", LINK_TYPE));
    link.push_attribute(("parent_callsign", LINK_PARENT_CALLSIGN));
    link.push_attribute(("relation", LINK_RELATION));
    writer.write_event(Event::Empty(link))?;

    let mut usericon = BytesStart::new("usericon");
    usericon.push_attribute(("iconsetpath", marker.icon_path.as_str()));
    writer.write_event(Event::Empty(usericon))?;

    let mut color = BytesStart::new("color");
    color.push_attribute(("argb", COLOR_ARGB));
    writer.write_event(Event::Empty(color))?;

    let mut flow_tags = BytesStart::new("_flow-tags_");
    flow_tags.push_attribute((FLOW_TAG_NAME, FLOW_TAG_TIME));
    writer.write_event(Event::Empty(flow_tags))?;

    writer.write_event(Event::Start(BytesStart::new("remarks")))?;
    writer.write_event(Event::Text(BytesText::new(&marker.remarks)))?;
    writer.write_event(Event::End(BytesEnd::new("remarks")))?;

    writer.write_event(Event::End(BytesEnd::new("detail")))?;
    writer.write_event(Event::End(BytesEnd::new("event")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}
