use crate::{CoreResult, RecorderError};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Chooses the file that will receive timestamp output.
///
/// Returning `Ok(None)` means the user cancelled; the recorder keeps its
/// previous target in that case.
pub trait TargetPicker {
    /// Pick a destination, starting in `directory` with `default_name`
    /// proposed as the file name.
    fn pick(&self, directory: &Path, default_name: &str) -> CoreResult<Option<PathBuf>>;
}

/// Non-interactive picker that always accepts the proposed name.
///
/// The destination directory is created if it does not exist yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryPicker;

impl TargetPicker for DirectoryPicker {
    #[track_caller]
    #[instrument(skip(self))]
    fn pick(&self, directory: &Path, default_name: &str) -> CoreResult<Option<PathBuf>> {
        if default_name.trim().is_empty() {
            return Err(RecorderError::PickerFailed {
                reason: "Empty file name".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !directory.exists() {
            fs::create_dir_all(directory).map_err(|source| RecorderError::Io {
                path: directory.to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!(directory = ?directory, "Created output directory");
        }

        Ok(Some(directory.join(default_name)))
    }
}
