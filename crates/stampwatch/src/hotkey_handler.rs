//! Global hotkey handler.
//!
//! Registers one global hotkey per keybind and forwards presses to the
//! dispatcher as [`AppCommand`]s. The handler never touches the session
//! recorder itself; the dispatcher is the only writer.

use crate::{AppCommand, AppError, AppResult, keybinds::Action, keybinds::KeyBindings};

use std::{fmt::Display, panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Global hotkey handler that maps hotkey presses to actions.
pub struct HotkeyHandler {
    bindings: KeyBindings,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register every bound hotkey.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao`/`winit` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkeys to remain registered.
    ///
    /// A binding that cannot be registered (e.g. taken by another
    /// application) is logged and skipped; its action is returned in the
    /// failed list so the tray can stop advertising the key.
    #[track_caller]
    #[instrument(skip(bindings))]
    pub fn register_hotkeys(
        bindings: &KeyBindings,
    ) -> AppResult<(GlobalHotKeyManager, Vec<Action>)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let failed = register_each(bindings, |hotkey| manager.register(hotkey));

        info!(
            registered = bindings.len() - failed.len(),
            total = bindings.len(),
            "Global hotkeys registered"
        );

        Ok((manager, failed))
    }

    /// Create a handler for previously registered bindings.
    ///
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(bindings: KeyBindings, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            bindings,
            command_tx,
        }
    }

    /// Run the hotkey handler event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a blocking crossbeam receiver;
        // bridge it into tokio with one persistent blocking task. It exits
        // when event_rx is dropped and the next blocking_send fails.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.state == HotKeyState::Pressed {
                        self.dispatch(event.id).await?;
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may be parked in recv() until the next hotkey
        // event; do not hang shutdown waiting for it.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Forward the action bound to `hotkey_id`, if any.
    ///
    /// Returns the forwarded action.
    #[instrument(skip(self))]
    pub(crate) async fn dispatch(&self, hotkey_id: u32) -> AppResult<Option<Action>> {
        let Some(action) = self.bindings.action_for(hotkey_id) else {
            debug!("Unbound hotkey ignored");
            return Ok(None);
        };

        self.command_tx
            .send(AppCommand::from(action))
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {}: {}", action, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(action = %action, "Hotkey forwarded");

        Ok(Some(action))
    }
}

/// Register each binding with `register`, returning the actions that failed.
pub(crate) fn register_each<E: Display>(
    bindings: &KeyBindings,
    mut register: impl FnMut(HotKey) -> Result<(), E>,
) -> Vec<Action> {
    let mut failed = Vec::new();
    for (action, hotkey) in bindings.hotkeys() {
        let key = bindings.key_for(action).unwrap_or_default();
        match register(hotkey) {
            Ok(()) => debug!(action = %action, key, "Global hotkey registered"),
            Err(e) => {
                warn!(action = %action, key, error = %e, "Failed to register hotkey");
                failed.push(action);
            }
        }
    }
    failed
}
