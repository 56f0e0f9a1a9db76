//! Keybind persistence.
//!
//! Bindings live in a TOML sidecar next to the main configuration:
//!
//! ```toml
//! [bindings]
//! create_file = "F13"
//! mark_time = "ctrl+shift+KeyM"
//! ```
//!
//! A missing or corrupt file is replaced by the defaults.

use crate::{
    AppError, AppResult,
    config::{atomic_write, config_dir},
    keybinds::{Action, KeyBindings},
};

use std::{collections::BTreeMap, fs, io::ErrorKind, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const KEYBIND_FILE_NAME: &str = "keybinds.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct KeybindFile {
    #[serde(default)]
    bindings: BTreeMap<String, String>,
}

/// Loads and saves [`KeyBindings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct KeybindStore {
    path: PathBuf,
}

impl KeybindStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory.
    #[track_caller]
    pub fn in_config_dir() -> AppResult<Self> {
        Ok(Self::new(config_dir()?.join(KEYBIND_FILE_NAME)))
    }

    /// Load bindings, writing defaults when the file is missing or corrupt.
    ///
    /// Actions absent from an otherwise valid file get their default key,
    /// and the completed set is written back.
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but cannot be read (contents
    /// that are not UTF-8 count as corrupt, not unreadable), or the
    /// defaults cannot be written.
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    pub fn load(&self) -> AppResult<KeyBindings> {
        if !self.path.exists() {
            info!("No keybind file found, writing defaults");
            return self.restore_defaults();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(error = %e, "Keybind file is not UTF-8, restoring defaults");
                return self.restore_defaults();
            }
            Err(e) => {
                return Err(AppError::KeybindError {
                    reason: format!("Failed to read keybinds: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        match Self::parse(&contents) {
            Ok((bindings, completed)) => {
                if completed {
                    debug!("Missing actions filled with defaults");
                    self.save(&bindings)?;
                }
                info!(bindings = bindings.len(), "Keybinds loaded");
                Ok(bindings)
            }
            Err(e) => {
                warn!(error = %e, "Keybind file corrupt, restoring defaults");
                self.restore_defaults()
            }
        }
    }

    #[track_caller]
    fn restore_defaults(&self) -> AppResult<KeyBindings> {
        let defaults = KeyBindings::defaults()?;
        self.save(&defaults)?;
        Ok(defaults)
    }

    /// Save bindings using the atomic write pattern.
    #[track_caller]
    #[instrument(skip(self, bindings), fields(path = ?self.path))]
    pub fn save(&self, bindings: &KeyBindings) -> AppResult<()> {
        let file = KeybindFile {
            bindings: bindings
                .entries()
                .map(|(action, key)| (action.id().to_string(), key.to_string()))
                .collect(),
        };

        let contents = toml::to_string_pretty(&file).map_err(|e| AppError::KeybindError {
            reason: format!("Failed to serialize keybinds: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        atomic_write(&self.path, &contents)?;

        debug!("Keybinds saved (atomic write)");

        Ok(())
    }

    /// Parse a keybind file, returning the bindings and whether defaults
    /// had to be filled in.
    ///
    /// Unknown actions, invalid keys and keys bound twice are corrupt.
    #[track_caller]
    fn parse(contents: &str) -> AppResult<(KeyBindings, bool)> {
        let file: KeybindFile = toml::from_str(contents).map_err(|e| AppError::KeybindError {
            reason: format!("Failed to parse keybinds: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut bindings = KeyBindings::default();
        for (id, key) in &file.bindings {
            let action = Action::from_id(id).ok_or_else(|| AppError::KeybindError {
                reason: format!("Unknown action {:?}", id),
                location: ErrorLocation::from(Location::caller()),
            })?;
            claim(&mut bindings, action, key)?;
        }

        let mut completed = false;
        for action in Action::ALL {
            if bindings.key_for(action).is_none() {
                claim(&mut bindings, action, action.default_key())?;
                completed = true;
            }
        }

        Ok((bindings, completed))
    }
}

/// Bind without displacing: a key already in use is an error.
#[track_caller]
fn claim(bindings: &mut KeyBindings, action: Action, key: &str) -> AppResult<()> {
    if bindings.is_bound(key) {
        return Err(AppError::KeybindError {
            reason: format!("Key {:?} bound to more than one action", key),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    bindings.bind(action, key)?;
    Ok(())
}
