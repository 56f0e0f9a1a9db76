mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod output_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, output_config::OutputConfig,
};

use crate::{AppError, AppResult};

use std::{fs, io::Write, panic::Location, path::Path, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use tracing::debug;

pub(crate) const DEFAULT_VOICE_NOTE_MARKS_TIME: bool = true;
pub(crate) const DEFAULT_OPEN_AFTER_CREATE: bool = false;

pub(crate) fn default_voice_note_marks_time() -> bool {
    DEFAULT_VOICE_NOTE_MARKS_TIME
}

pub(crate) fn default_open_after_create() -> bool {
    DEFAULT_OPEN_AFTER_CREATE
}

/// Platform config directory, created on first use.
#[track_caller]
pub(crate) fn config_dir() -> AppResult<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "stampwatch", "Stampwatch").ok_or_else(|| {
        AppError::ConfigError {
            reason: "Failed to get config directory".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    let config_dir = proj_dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
        debug!(config_dir = ?config_dir, "Created config directory");
    }

    Ok(config_dir.to_path_buf())
}

/// Write `contents` to a temp file next to `path`, sync, then rename over
/// `path` so a crash never leaves a half-written file.
#[track_caller]
pub(crate) fn atomic_write(path: &Path, contents: &str) -> AppResult<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
        reason: format!("Failed to create temp file {:?}: {}", temp_path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to write temp file {:?}: {}", temp_path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    temp_file.sync_all().map_err(|e| AppError::ConfigError {
        reason: format!("Failed to sync temp file {:?}: {}", temp_path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
        reason: format!("Failed to rename {:?} to {:?}: {}", temp_path, path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(())
}
