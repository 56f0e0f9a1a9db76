use std::{io, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Session recorder errors with source location tracking.
///
/// Precondition failures (no target, wrong recording state) are not errors;
/// they surface as `false` / `None` from the recorder operations.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Reading or writing the target file failed.
    #[error("IO error on {path:?}: {source} {location}")]
    Io {
        /// File the operation was acting on.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The target picker could not produce a destination.
    #[error("Target selection failed: {reason} {location}")]
    PickerFailed {
        /// Description of the picker failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
