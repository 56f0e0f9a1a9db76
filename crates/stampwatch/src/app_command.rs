use crate::keybinds::Action;

/// Commands sent from the hotkey handler to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Run a user action against the session recorder.
    Invoke {
        /// Action bound to the pressed hotkey.
        action: Action,
    },
    /// Request application shutdown.
    Shutdown,
}

impl From<Action> for AppCommand {
    fn from(action: Action) -> Self {
        AppCommand::Invoke { action }
    }
}
