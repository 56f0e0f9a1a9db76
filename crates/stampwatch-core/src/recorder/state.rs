use std::time::Instant;

use uuid::Uuid;

/// Recording state of a session.
///
/// The origin instant and mark counter only exist while `Active`, so a
/// stopped session can never carry a stale origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Not currently recording.
    #[default]
    Idle,
    /// Stopwatch running.
    Active {
        /// When recording started.
        origin: Instant,
        /// Marks written since the start.
        marks: u32,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingState {
    /// Whether the stopwatch is running.
    pub fn is_active(&self) -> bool {
        matches!(self, RecordingState::Active { .. })
    }

    /// Marks written since the last start, 0 while idle.
    pub fn marks(&self) -> u32 {
        match self {
            RecordingState::Idle => 0,
            RecordingState::Active { marks, .. } => *marks,
        }
    }
}
