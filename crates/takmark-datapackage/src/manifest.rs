//! Mission package manifest parsing and generation
//!
//! Implements the MissionPackageManifest v2 format ATAK expects when
//! importing a package. The configuration section carries exactly the
//! `name`, `uid`, and `remarks` parameters; each content entry wraps the
//! marker uid in a nested `<Parameter>` element.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

use crate::error::{PackageError, Result};
use crate::MANIFEST_VERSION;

/// Mission package manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest version (always "2")
    pub version: String,
    /// Configuration parameters, in emission order
    pub configuration: Vec<ManifestParameter>,
    /// Package contents, in emission order
    pub contents: Vec<ManifestContent>,
}

/// Configuration parameter in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestParameter {
    /// Parameter name
    pub name: String,
    /// Parameter value
    pub value: String,
}

/// Content entry referencing one event file inside the archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestContent {
    /// Path within the ZIP archive (`{uid}/{uid}.cot`)
    pub zip_entry: String,
    /// Marker uid, repeated as a nested Parameter element
    pub uid: String,
    /// Whether ATAK should skip this entry on import
    pub ignore: bool,
}

impl Manifest {
    /// Creates a manifest with the standard configuration parameters.
    pub fn new(uid: &str, name: &str) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            configuration: vec![
                ManifestParameter {
                    name: "name".to_string(),
                    value: name.to_string(),
                },
                ManifestParameter {
                    name: "uid".to_string(),
                    value: uid.to_string(),
                },
                ManifestParameter {
                    name: "remarks".to_string(),
                    value: String::new(),
                },
            ],
            contents: Vec::new(),
        }
    }

    /// Adds a content entry for a marker uid.
    ///
    /// The zip entry follows the package layout: `{uid}/{uid}.cot`.
    pub fn add_content(&mut self, uid: &str) {
        self.contents.push(ManifestContent {
            zip_entry: format!("{}/{}.cot", uid, uid),
            uid: uid.to_string(),
            ignore: false,
        });
    }

    /// Get a configuration parameter by name
    pub fn get_parameter(&self, name: &str) -> Option<&str> {
        self.configuration
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Get the package UID
    pub fn uid(&self) -> Option<&str> {
        self.get_parameter("uid")
    }

    /// Get the package name
    pub fn name(&self) -> Option<&str> {
        self.get_parameter("name")
    }

    /// Parse a manifest from an XML string
    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::parse_from_reader(xml.as_bytes())
    }

    /// Parse a manifest from a reader
    pub fn parse_from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut version = MANIFEST_VERSION.to_string();
        let mut configuration = Vec::new();
        let mut contents: Vec<ManifestContent> = Vec::new();
        let mut buf = Vec::new();

        let mut in_configuration = false;
        let mut in_contents = false;
        let mut open_content: Option<ManifestContent> = None;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"MissionPackageManifest" => {
                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| {
                                PackageError::InvalidManifest(format!("Invalid attribute: {}", e))
                            })?;
                            if attr.key.as_ref() == b"version" {
                                version = attr.unescape_value()?.into_owned();
                            }
                        }
                    }
                    b"Configuration" => in_configuration = true,
                    b"Contents" => in_contents = true,
                    b"Content" if in_contents => open_content = Some(parse_content(e)?),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"Parameter" => {
                        let (name, value) = parse_parameter(e)?;
                        if let Some(content) = open_content.as_mut() {
                            if name == "uid" {
                                content.uid = value;
                            }
                        } else if in_configuration && !name.is_empty() {
                            configuration.push(ManifestParameter { name, value });
                        }
                    }
                    b"Content" if in_contents => contents.push(parse_content(e)?),
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"Configuration" => in_configuration = false,
                    b"Contents" => in_contents = false,
                    b"Content" => {
                        if let Some(content) = open_content.take() {
                            contents.push(content);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(PackageError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            version,
            configuration,
            contents,
        })
    }

    /// Serialize the manifest to an XML string
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        // XML declaration
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        // Root element
        let mut root = BytesStart::new("MissionPackageManifest");
        root.push_attribute(("version", self.version.as_str()));
        writer.write_event(Event::Start(root))?;

        // Configuration section
        writer.write_event(Event::Start(BytesStart::new("Configuration")))?;
        for param in &self.configuration {
            let mut elem = BytesStart::new("Parameter");
            elem.push_attribute(("name", param.name.as_str()));
            elem.push_attribute(("value", param.value.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Configuration")))?;

        // Contents section
        writer.write_event(Event::Start(BytesStart::new("Contents")))?;
        for content in &self.contents {
            let mut elem = BytesStart::new("Content");
            elem.push_attribute(("zipEntry", content.zip_entry.as_str()));
            elem.push_attribute(("ignore", if content.ignore { "true" } else { "false" }));
            writer.write_event(Event::Start(elem))?;

            let mut uid = BytesStart::new("Parameter");
            uid.push_attribute(("name", "uid"));
            uid.push_attribute(("value", content.uid.as_str()));
            writer.write_event(Event::Empty(uid))?;

            writer.write_event(Event::End(BytesEnd::new("Content")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Contents")))?;

        // Close root
        writer.write_event(Event::End(BytesEnd::new("MissionPackageManifest")))?;

        let result = writer.into_inner();
        Ok(String::from_utf8(result)?)
    }
}

fn parse_content(e: &BytesStart) -> Result<ManifestContent> {
    let mut zip_entry = String::new();
    let mut ignore = false;

    for attr in e.attributes() {
        let attr = attr
            .map_err(|e| PackageError::InvalidManifest(format!("Invalid attribute: {}", e)))?;
        match attr.key.as_ref() {
            b"zipEntry" => zip_entry = attr.unescape_value()?.into_owned(),
            b"ignore" => {
                ignore = attr.unescape_value()?.eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    if zip_entry.is_empty() {
        return Err(PackageError::InvalidManifest(
            "Content without zipEntry".to_string(),
        ));
    }

    Ok(ManifestContent {
        zip_entry,
        uid: String::new(),
        ignore,
    })
}

fn parse_parameter(e: &BytesStart) -> Result<(String, String)> {
    let mut name = String::new();
    let mut value = String::new();

    for attr in e.attributes() {
        let attr = attr
            .map_err(|e| PackageError::InvalidManifest(format!("Invalid attribute: {}", e)))?;
        match attr.key.as_ref() {
            b"name" => name = attr.unescape_value()?.into_owned(),
            b"value" => value = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }

    Ok((name, value))
}
