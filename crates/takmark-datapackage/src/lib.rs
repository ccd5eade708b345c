//! ATAK mission package assembly for TakMark
//!
//! A mission package is a ZIP archive with a fixed layout:
//! - `MANIFEST/manifest.xml`: MissionPackageManifest v2 describing the contents
//! - `{uid}/{uid}.cot`: one CoT event document per marker
//!
//! [`PackageBuilder`] stages this layout in a scratch directory and archives
//! it as `{name}.zip`.

pub mod error;
pub mod manifest;
pub mod builder;

pub use builder::PackageBuilder;
pub use error::{PackageError, Result};
pub use manifest::{Manifest, ManifestContent, ManifestParameter};

/// Mission package manifest version
pub const MANIFEST_VERSION: &str = "2";

/// Manifest directory within the package
pub const MANIFEST_DIR: &str = "MANIFEST";

/// Standard manifest path within the package
pub const MANIFEST_PATH: &str = "MANIFEST/manifest.xml";

/// Default scratch directory for staging the package layout
pub const DEFAULT_STAGING_DIR: &str = "out";
