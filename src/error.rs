//! Error types
//!
//! Both kinds are recoverable: a failed asset falls back to a primitive
//! shape or silence, and an unavailable audio device mutes the session.

use std::path::PathBuf;

use thiserror::Error;

/// A sprite or sound could not be loaded
#[derive(Debug, Error)]
pub enum AssetError {
    /// No path configured for this slot
    #[error("no asset configured")]
    NotConfigured,
    /// The file could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its contents are unusable
    #[error("'{}' is not a valid {kind}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        kind: &'static str,
        reason: String,
    },
}

/// The audio subsystem could not be brought up
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio subsystem unavailable: {0}")]
    Unavailable(String),
}
