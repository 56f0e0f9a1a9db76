/// Tray icon states corresponding to the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// No log file selected yet.
    NoFile,
    /// Log selected, stopwatch stopped.
    Ready,
    /// Stopwatch running.
    Recording,
}
