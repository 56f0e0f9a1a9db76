use crate::TrayIconState;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayCommand {
    /// Update the tray icon and tooltip.
    Update {
        /// New icon state.
        state: TrayIconState,
        /// File name of the current log, if any.
        target_name: Option<String>,
    },
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
