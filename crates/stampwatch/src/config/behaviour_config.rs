use crate::config::{default_open_after_create, default_voice_note_marks_time};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether a voice note is preceded by a time mark.
    #[serde(default = "default_voice_note_marks_time")]
    pub voice_note_marks_time: bool,

    /// Whether a newly created log is opened in the system editor.
    #[serde(default = "default_open_after_create")]
    pub open_after_create: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            voice_note_marks_time: default_voice_note_marks_time(),
            open_after_create: default_open_after_create(),
        }
    }
}
