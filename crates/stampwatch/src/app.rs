use crate::{
    AppCommand, AppResult, TrayCommand, TrayIconState, TrayMenuIds, config::Config,
    keybinds::Action,
};

use std::{ops::ControlFlow, sync::mpsc::Sender};

use stampwatch_core::{RecordingState, SessionRecorder, TargetPicker};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Main application state and the only owner of the session recorder.
///
/// Runs on the async runtime thread. Hotkeys and tray menu events arrive
/// as messages and are applied one at a time, so recorder calls never
/// overlap. Tray icon updates go back to the main thread via `tray_tx`
/// because `TrayIcon` is `!Send` and must remain on the UI thread.
pub struct App {
    pub(crate) recorder: SessionRecorder,
    pub(crate) picker: Box<dyn TargetPicker + Send>,
    pub(crate) tray_tx: Sender<TrayCommand>,
    pub(crate) config: Config,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: TrayMenuIds,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Stampwatch starting");

        self.publish_tray_state();

        // MenuEvent::receiver() is a blocking crossbeam receiver; forward it
        // into tokio with one persistent blocking task that exits when
        // tray_event_rx is dropped and the next blocking_send fails.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if self.handle_tray_event(&event).is_break() {
                        break;
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    if self.handle_command(cmd).is_break() {
                        break;
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        if let RecordingState::Active {
            session_id, marks, ..
        } = self.recorder.state()
        {
            warn!(session_id = %session_id, marks, "Exiting while recording, section left open");
        }

        let _ = self.shutdown_tx.send(true);
        let _ = self.tray_tx.send(TrayCommand::Shutdown);
        info!("Stampwatch shut down successfully");

        Ok(())
    }

    /// Apply one command. Breaks on shutdown.
    ///
    /// Recorder failures are logged; the dispatcher keeps running.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, cmd: AppCommand) -> ControlFlow<()> {
        match cmd {
            AppCommand::Invoke { action } => {
                if let Err(e) = self.execute(action) {
                    error!(action = %action, error = ?e, "Action failed");
                }
                self.publish_tray_state();
                ControlFlow::Continue(())
            }
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                ControlFlow::Break(())
            }
        }
    }

    /// Run a single action against the recorder.
    #[instrument(skip(self))]
    fn execute(&mut self, action: Action) -> AppResult<()> {
        match action {
            Action::CreateFile => {
                let directory = self.config.output.resolved_directory();
                match self
                    .recorder
                    .select_target(self.picker.as_ref(), directory.as_deref())?
                {
                    Some(path) => {
                        info!(path = ?path, "Log file ready");
                        if self.config.behavior.open_after_create {
                            self.open_log()?;
                        }
                    }
                    None => debug!("File creation cancelled"),
                }
            }
            Action::StartRecording => {
                if !self.recorder.start()? {
                    debug!("Start ignored: no file or already recording");
                }
            }
            Action::MarkTime => match self.recorder.mark()? {
                Some(elapsed) => info!(elapsed = %elapsed, "Marked time"),
                None => debug!("Mark ignored: not recording"),
            },
            Action::StopRecording => {
                if !self.recorder.stop()? {
                    debug!("Stop ignored: not recording");
                }
            }
            Action::SaveShort => {
                if self.recorder.save_short()? {
                    info!("Short taken");
                } else {
                    debug!("Short ignored: no file");
                }
            }
            Action::MarkVoiceNote => {
                // Voice notes are timed: mark first, then tag the mark.
                if self.config.behavior.voice_note_marks_time {
                    self.recorder.mark()?;
                }
                if self.recorder.mark_voice_note()? {
                    info!("Voice note taken");
                } else {
                    debug!("Voice note ignored: not recording");
                }
            }
        }

        Ok(())
    }

    /// Handle tray menu events.
    ///
    /// Action items run directly; Exit queues a shutdown command so that
    /// commands already in the channel are applied first. Only this loop
    /// drains the channel, so a full channel breaks immediately instead.
    #[instrument(skip(self))]
    pub(crate) fn handle_tray_event(&mut self, event: &MenuEvent) -> ControlFlow<()> {
        let event_id = &event.id;

        if let Some(action) = self.menu_ids.action_for(event_id) {
            return self.handle_command(AppCommand::from(action));
        }

        if *event_id == self.menu_ids.open_log {
            if let Err(e) = self.open_log() {
                error!(error = ?e, "Failed to open log");
            }
        } else if *event_id == self.menu_ids.exit {
            info!("Exit requested from tray menu");
            if let Err(e) = self.command_tx.try_send(AppCommand::Shutdown) {
                warn!(error = %e, "Shutdown not queued, exiting now");
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    /// Open the current log in the system's default editor.
    fn open_log(&self) -> AppResult<()> {
        let Some(path) = self.recorder.target() else {
            debug!("No log to open");
            return Ok(());
        };
        open::that(path)?;
        info!(path = ?path, "Opened log");
        Ok(())
    }

    /// Send the current session state to the tray.
    fn publish_tray_state(&self) {
        let state = match (self.recorder.target(), self.recorder.is_recording()) {
            (None, _) => TrayIconState::NoFile,
            (Some(_), false) => TrayIconState::Ready,
            (Some(_), true) => TrayIconState::Recording,
        };
        let target_name = self
            .recorder
            .target()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned());

        let _ = self.tray_tx.send(TrayCommand::Update { state, target_name });
    }
}
