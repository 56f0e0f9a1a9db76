mod clock;
pub mod format;
mod picker;
mod session_recorder;
mod state;

pub use {
    clock::{Clock, SystemClock},
    picker::{DirectoryPicker, TargetPicker},
    session_recorder::SessionRecorder,
    state::RecordingState,
};
