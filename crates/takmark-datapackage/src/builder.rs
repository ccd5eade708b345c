//! Mission package builder
//!
//! Stages the package layout in a scratch directory and archives it. The
//! archive is written through a temp file and only renamed to `{name}.zip`
//! once the ZIP is complete, so an interrupted build never leaves a partial
//! package behind. The staging tree itself carries no such guarantee; it is
//! deleted and rebuilt from scratch on every run.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use takmark_cot::{render_event, Marker, ProducerUid};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{PackageError, Result};
use crate::manifest::Manifest;
use crate::{DEFAULT_STAGING_DIR, MANIFEST_DIR};

/// Builder for creating mission packages
pub struct PackageBuilder {
    /// Package name; also the base name of the ZIP file
    name: String,
    /// Package manifest, populated from the markers at build time
    manifest: Manifest,
    /// Scratch directory for the staged layout
    staging_dir: PathBuf,
    /// Directory the finished ZIP is written to
    output_dir: PathBuf,
}

impl PackageBuilder {
    /// Creates a builder with a fresh package uid.
    pub fn new(name: &str) -> Self {
        let uid = uuid::Uuid::new_v4().to_string().to_uppercase();
        Self::with_uid(&uid, name)
    }

    /// Creates a builder with a specific package uid.
    pub fn with_uid(uid: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            manifest: Manifest::new(uid, name),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            output_dir: PathBuf::from("."),
        }
    }

    /// Sets the scratch directory used to stage the package layout.
    ///
    /// The directory is deleted and recreated on every build.
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Sets the directory the finished `{name}.zip` is written to.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Stages all markers and archives them as `{name}.zip`.
    ///
    /// Returns the path of the written archive.
    pub fn build(mut self, markers: &[Marker], producer: &ProducerUid) -> Result<PathBuf> {
        self.stage(markers, producer)?;
        let zip_path = self.archive()?;

        info!(
            "Created mission package: {} ({} markers)",
            zip_path.display(),
            markers.len()
        );

        Ok(zip_path)
    }

    /// Writes the package layout into a fresh staging directory.
    fn stage(&mut self, markers: &[Marker], producer: &ProducerUid) -> Result<()> {
        if self.staging_dir.exists() {
            fs::remove_dir_all(&self.staging_dir)
                .map_err(|e| output_write(&self.staging_dir, e))?;
        }
        fs::create_dir_all(&self.staging_dir).map_err(|e| output_write(&self.staging_dir, e))?;

        for marker in markers {
            self.manifest.add_content(&marker.uid);
        }

        let manifest_dir = self.staging_dir.join(MANIFEST_DIR);
        fs::create_dir(&manifest_dir).map_err(|e| output_write(&manifest_dir, e))?;
        let manifest_path = manifest_dir.join("manifest.xml");
        let manifest_xml = self.manifest.to_xml()?;
        fs::write(&manifest_path, manifest_xml).map_err(|e| output_write(&manifest_path, e))?;

        for marker in markers {
            // plain create_dir: a uid collision must fail, not be merged over
            let marker_dir = self.staging_dir.join(&marker.uid);
            fs::create_dir(&marker_dir).map_err(|e| output_write(&marker_dir, e))?;

            let event_path = marker_dir.join(format!("{}.cot", marker.uid));
            let event_xml = render_event(marker, producer)?;
            fs::write(&event_path, event_xml).map_err(|e| output_write(&event_path, e))?;

            debug!("Staged marker {} ({})", marker.callsign, marker.uid);
        }

        Ok(())
    }

    /// Zips the staging tree and moves the archive into the output directory.
    fn archive(&self) -> Result<PathBuf> {
        let zip_path = self.output_dir.join(format!("{}.zip", self.name));

        // The temp file lives in the output directory; persist() is then a
        // rename on the same filesystem.
        let mut temp = NamedTempFile::new_in(&self.output_dir)?;
        {
            let mut zip = ZipWriter::new(temp.as_file_mut());
            let options = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .unix_permissions(0o644);

            for entry in walkdir::WalkDir::new(&self.staging_dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let rel_path = entry.path().strip_prefix(&self.staging_dir).map_err(|_| {
                    PackageError::PathEscape(entry.path().display().to_string())
                })?;

                // Forward slashes regardless of platform
                let entry_name = rel_path.to_string_lossy().replace('\\', "/");

                zip.start_file(entry_name, options)?;
                let mut file = File::open(entry.path())?;
                let mut buffer = Vec::new();
                file.read_to_end(&mut buffer)?;
                zip.write_all(&buffer)?;
            }

            zip.finish()?;
        }

        temp.persist(&zip_path)?;

        Ok(zip_path)
    }
}

fn output_write(path: &Path, source: std::io::Error) -> PackageError {
    PackageError::OutputWrite {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn markers(n: usize) -> Vec<Marker> {
        (0..n)
            .map(|i| Marker::new(format!("Point.{}", i), "18.0", "54.0"))
            .collect()
    }

    #[test]
    fn test_staging_layout() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("out");
        let producer = ProducerUid::generate();
        let set = markers(2);

        PackageBuilder::new("layout")
            .staging_dir(&staging)
            .output_dir(dir.path())
            .build(&set, &producer)
            .unwrap();

        assert!(staging.join(MANIFEST_DIR).join("manifest.xml").is_file());
        for marker in &set {
            let event = staging.join(&marker.uid).join(format!("{}.cot", marker.uid));
            assert!(event.is_file());
        }
    }

    #[test]
    fn test_build_writes_zip() {
        let dir = TempDir::new().unwrap();
        let producer = ProducerUid::generate();

        let zip_path = PackageBuilder::new("pkg")
            .staging_dir(dir.path().join("out"))
            .output_dir(dir.path())
            .build(&markers(1), &producer)
            .unwrap();

        assert_eq!(zip_path, dir.path().join("pkg.zip"));
        let data = fs::read(&zip_path).unwrap();
        assert_eq!(&data[0..2], b"PK");
    }

    #[test]
    fn test_rebuild_resets_staging() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("out");
        let producer = ProducerUid::generate();

        let first = markers(2);
        PackageBuilder::new("reset")
            .staging_dir(&staging)
            .output_dir(dir.path())
            .build(&first, &producer)
            .unwrap();

        let second = markers(1);
        PackageBuilder::new("reset")
            .staging_dir(&staging)
            .output_dir(dir.path())
            .build(&second, &producer)
            .unwrap();

        assert!(staging.join(&second[0].uid).is_dir());
        for marker in &first {
            assert!(!staging.join(&marker.uid).exists());
        }
    }

    #[test]
    fn test_duplicate_uid_fails() {
        let dir = TempDir::new().unwrap();
        let producer = ProducerUid::generate();
        let marker = Marker::new("A", "18.0", "54.0");
        let set = vec![marker.clone(), marker];

        let result = PackageBuilder::new("dup")
            .staging_dir(dir.path().join("out"))
            .output_dir(dir.path())
            .build(&set, &producer);

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_output_dir_leaves_no_package() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let producer = ProducerUid::generate();

        let result = PackageBuilder::new("gone")
            .staging_dir(dir.path().join("out"))
            .output_dir(&missing)
            .build(&markers(1), &producer);

        assert!(result.is_err());
        assert!(!missing.exists());
    }
}
