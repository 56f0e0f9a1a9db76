use std::fmt;

/// User-triggerable actions, each bindable to a global hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Select a new target file.
    CreateFile,
    /// Start the stopwatch.
    StartRecording,
    /// Mark the elapsed time.
    MarkTime,
    /// Stop the stopwatch.
    StopRecording,
    /// Append a dated short.
    SaveShort,
    /// Append a voice note marker.
    MarkVoiceNote,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Action; 6] = [
        Action::CreateFile,
        Action::StartRecording,
        Action::MarkTime,
        Action::StopRecording,
        Action::SaveShort,
        Action::MarkVoiceNote,
    ];

    /// Identifier used in the keybind file.
    pub fn id(self) -> &'static str {
        match self {
            Action::CreateFile => "create_file",
            Action::StartRecording => "start_recording",
            Action::MarkTime => "mark_time",
            Action::StopRecording => "stop_recording",
            Action::SaveShort => "save_short",
            Action::MarkVoiceNote => "mark_voice_note",
        }
    }

    /// Parse an identifier from the keybind file.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Action::CreateFile => "Create File",
            Action::StartRecording => "Start Recording",
            Action::MarkTime => "Mark Time",
            Action::StopRecording => "Stop Recording",
            Action::SaveShort => "Save Short",
            Action::MarkVoiceNote => "Voice Note",
        }
    }

    /// Key bound to this action when the user has not remapped it.
    pub fn default_key(self) -> &'static str {
        match self {
            Action::CreateFile => "F13",
            Action::StartRecording => "F14",
            Action::MarkTime => "F15",
            Action::StopRecording => "F16",
            Action::MarkVoiceNote => "F17",
            Action::SaveShort => "F18",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
