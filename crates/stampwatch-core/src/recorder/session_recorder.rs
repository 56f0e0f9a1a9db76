use crate::{
    CoreResult, RecorderError,
    recorder::{Clock, RecordingState, SystemClock, TargetPicker, format},
};

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use directories::UserDirs;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Append-only timestamp writer for a single target file.
///
/// Every mutation opens the target, writes, and closes it again; no handle
/// is held between calls. Operations whose preconditions are not met
/// return `false` / `None` without touching the file. Only IO failures are
/// reported as errors.
///
/// # Thread Safety
///
/// SessionRecorder performs no locking. It is meant to be owned by a single
/// dispatcher; other threads should send it commands rather than share it.
#[derive(Debug)]
pub struct SessionRecorder<C: Clock = SystemClock> {
    clock: C,
    target: Option<PathBuf>,
    state: RecordingState,
}

impl SessionRecorder<SystemClock> {
    /// Creates an idle recorder with no target.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionRecorder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionRecorder<C> {
    /// Creates an idle recorder with no target using the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            target: None,
            state: RecordingState::Idle,
        }
    }

    /// Currently targeted file, if any.
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Current recording state.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Whether the stopwatch is running.
    pub fn is_recording(&self) -> bool {
        self.state.is_active()
    }

    /// Marks written since the last start.
    pub fn mark_count(&self) -> u32 {
        self.state.marks()
    }

    /// Selects a new target file through `picker`.
    ///
    /// `directory_hint` defaults to the user's home directory. The picked
    /// file is created if missing; existing content is kept. A new target
    /// starts a fresh idle session. Returns `None` when the picker cancels,
    /// leaving the current session untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the picker fails or the file cannot be created.
    #[track_caller]
    #[instrument(skip(self, picker))]
    pub fn select_target(
        &mut self,
        picker: &dyn TargetPicker,
        directory_hint: Option<&Path>,
    ) -> CoreResult<Option<PathBuf>> {
        let directory = match directory_hint {
            Some(dir) => dir.to_path_buf(),
            None => default_directory(),
        };
        let default_name = format::default_file_name(&self.clock.now());

        let Some(path) = picker.pick(&directory, &default_name)? else {
            debug!("Target selection cancelled");
            return Ok(None);
        };

        // Touch the file so it exists before the first write.
        append(&path, "")?;

        if let RecordingState::Active { session_id, .. } = self.state {
            debug!(session_id = %session_id, "Previous session discarded by new target");
        }
        self.target = Some(path.clone());
        self.state = RecordingState::Idle;

        info!(path = ?path, "Target selected");

        Ok(Some(path))
    }

    /// Starts the stopwatch and writes a section header.
    ///
    /// Returns `false` if there is no target or a recording is running.
    ///
    /// # Errors
    ///
    /// Returns error if the header cannot be appended.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<bool> {
        let Some(path) = self.target.as_deref() else {
            return Ok(false);
        };
        if self.state.is_active() {
            return Ok(false);
        }

        append(path, &format::section_header(&self.clock.now()))?;

        let session_id = Uuid::new_v4();
        self.state = RecordingState::Active {
            origin: self.clock.instant(),
            marks: 0,
            session_id,
        };

        info!(session_id = %session_id, "Recording started");

        Ok(true)
    }

    /// Appends the elapsed time since start as the next numbered mark.
    ///
    /// Returns the elapsed time as `HH:MM:SS`, or `None` if there is no
    /// target or no recording is running.
    ///
    /// # Errors
    ///
    /// Returns error if the mark cannot be appended. The counter is left
    /// unchanged in that case.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn mark(&mut self) -> CoreResult<Option<String>> {
        let Some(path) = self.target.as_deref() else {
            return Ok(None);
        };
        let RecordingState::Active {
            origin,
            marks,
            session_id,
        } = self.state
        else {
            return Ok(None);
        };

        let elapsed =
            format::format_elapsed(self.clock.instant().saturating_duration_since(origin));
        let ordinal = marks + 1;

        append(path, &format::mark_line(ordinal, &elapsed))?;

        self.state = RecordingState::Active {
            origin,
            marks: ordinal,
            session_id,
        };

        debug!(
            session_id = %session_id,
            mark = ordinal,
            elapsed = %elapsed,
            "Time marked"
        );

        Ok(Some(elapsed))
    }

    /// Writes the separator and stops the stopwatch.
    ///
    /// Returns `false` if there is no target or no recording is running.
    ///
    /// # Errors
    ///
    /// Returns error if the separator cannot be appended; the recording
    /// stays active in that case.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<bool> {
        let Some(path) = self.target.as_deref() else {
            return Ok(false);
        };
        let RecordingState::Active {
            origin,
            marks,
            session_id,
        } = self.state
        else {
            return Ok(false);
        };

        append(path, &format::separator_line())?;

        self.state = RecordingState::Idle;

        info!(
            session_id = %session_id,
            marks,
            duration_ms = self.clock.instant().saturating_duration_since(origin).as_millis(),
            "Recording stopped"
        );

        Ok(true)
    }

    /// Appends a dated short line. Works whether or not recording.
    ///
    /// Returns `false` if there is no target.
    ///
    /// # Errors
    ///
    /// Returns error if the line cannot be appended.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_short(&mut self) -> CoreResult<bool> {
        let Some(path) = self.target.as_deref() else {
            return Ok(false);
        };

        append(path, &format::short_line(&self.clock.now()))?;

        debug!("Short saved");

        Ok(true)
    }

    /// Appends the voice note marker.
    ///
    /// Does not add a mark of its own; callers wanting a timed voice note
    /// call [`mark`](Self::mark) first. Returns `false` if there is no
    /// target or no recording is running.
    ///
    /// # Errors
    ///
    /// Returns error if the marker cannot be appended.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn mark_voice_note(&mut self) -> CoreResult<bool> {
        let Some(path) = self.target.as_deref() else {
            return Ok(false);
        };
        if !self.state.is_active() {
            return Ok(false);
        }

        append(path, format::VOICE_NOTE_MARKER)?;

        debug!("Voice note marked");

        Ok(true)
    }

    /// Replaces the whole target file with `content`, trimmed of leading
    /// and trailing whitespace.
    ///
    /// Returns `false` if there is no target.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    #[track_caller]
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub fn overwrite(&mut self, content: &str) -> CoreResult<bool> {
        let Some(path) = self.target.as_deref() else {
            return Ok(false);
        };

        fs::write(path, content.trim()).map_err(|source| RecorderError::Io {
            path: path.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!("Target overwritten");

        Ok(true)
    }

    /// Reads the whole target file.
    ///
    /// A missing target, or a target file that no longer exists, reads as
    /// an empty string.
    ///
    /// # Errors
    ///
    /// Returns error for IO failures other than a missing file.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn read_all(&self) -> CoreResult<String> {
        let Some(path) = self.target.as_deref() else {
            return Ok(String::new());
        };

        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?path, "Target missing, reading as empty");
                Ok(String::new())
            }
            Err(source) => Err(RecorderError::Io {
                path: path.to_path_buf(),
                source,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Opens `path` in append mode (creating it), writes `text` and closes it.
#[track_caller]
fn append(path: &Path, text: &str) -> CoreResult<()> {
    let location = Location::caller();
    let io_error = |source| RecorderError::Io {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(location),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    file.write_all(text.as_bytes()).map_err(io_error)?;

    Ok(())
}

fn default_directory() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
