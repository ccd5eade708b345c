//! Error types for mission package operations

use thiserror::Error;

/// Result type for mission package operations
pub type Result<T> = std::result::Result<T, PackageError>;

/// Errors that can occur while assembling or inspecting a mission package
#[derive(Error, Debug)]
pub enum PackageError {
    /// Failure writing to the staging tree
    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: String,
        source: std::io::Error,
    },

    /// I/O error during archiving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Failure moving the finished archive into place
    #[error("Failed to persist archive: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Staged file resolved outside the staging directory
    #[error("Path escapes staging directory: {0}")]
    PathEscape(String),

    /// XML reading or writing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid manifest structure
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Invalid UTF-8 in a rendered document
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Event rendering failure
    #[error("Event rendering failed: {0}")]
    Render(#[from] takmark_cot::RenderError),
}
