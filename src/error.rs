//! Error taxonomy for archive parsing and launching.
//!
//! Every error is fatal to the bootstrap; none are retried. Each variant
//! carries the archive location and, where relevant, the entry or attribute
//! name so a broken archive can be diagnosed from the message alone.

use thiserror::Error;

/// Errors produced while reading or deriving archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The backing storage is truncated, the end-of-central-directory record
    /// could not be found, or an index entry is malformed.
    #[error("failed to read archive {location}: {detail}")]
    Read { location: String, detail: String },

    /// A manifest entry is present but structurally invalid.
    #[error("malformed manifest in {location}: {detail}")]
    ManifestParse { location: String, detail: String },

    /// A nested entry selected for the classpath is compressed, so it cannot
    /// be mapped in place as an independent archive.
    #[error("nested entry {entry} in {location} is compressed; only stored entries can be opened in place")]
    NestedUnsupported { location: String, entry: String },
}

impl ArchiveError {
    pub(crate) fn read(location: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        ArchiveError::Read {
            location: location.into(),
            detail: detail.to_string(),
        }
    }
}

/// Errors produced by the launch sequence itself.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The running process's own backing archive could not be located.
    #[error("cannot determine the location of the running archive: {detail}")]
    SelfLocation { detail: String },

    /// The manifest is missing the attribute naming the entrypoint.
    #[error("manifest of {location} has no {attribute} attribute")]
    Configuration { location: String, attribute: String },

    /// The classpath was built but the named entrypoint is not on it.
    #[error("entrypoint {name} (resource {resource}) not found on the classpath")]
    EntrypointResolution { name: String, resource: String },
}
