//! Stampwatch: hotkey-driven timestamps for a running text log.

mod app;
mod app_command;
mod config;
mod error;
mod hotkey_handler;
mod keybinds;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::{TrayManager, TrayMenuIds},
};

use crate::{config::Config, keybinds::KeybindStore};

use global_hotkey::GlobalHotKeyManager;
use stampwatch_core::{DirectoryPicker, SessionRecorder};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("stampwatch=debug,stampwatch_core=debug")
        .init();

    let keybinds = match KeybindStore::in_config_dir().and_then(|store| store.load()) {
        Ok(kb) => kb,
        Err(e) => {
            error!("Failed to load keybinds: {:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new(&keybinds) {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Persists across event loop iterations; dropping it unregisters the hotkeys.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::Update { state, target_name } => {
                        if let Err(e) = tray_manager.update_state(state, target_name.as_deref()) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Register hotkeys on the main thread; tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                hotkey_manager = match HotkeyHandler::register_hotkeys(&keybinds) {
                    Ok((manager, failed)) => {
                        tray_manager.show_unregistered(&failed);
                        Some(manager)
                    }
                    Err(e) => {
                        error!("Failed to register hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };

                // Tray updates are produced on the runtime thread; forward
                // them to the event loop proxy, which wakes the main thread.
                let (tray_tx, tray_rx) = std::sync::mpsc::channel::<TrayCommand>();
                let proxy = tray_proxy.clone();
                std::thread::spawn(move || {
                    while let Ok(cmd) = tray_rx.recv() {
                        if proxy.send_event(cmd).is_err() {
                            break;
                        }
                    }
                });

                let menu_ids = tray_manager.menu_ids().clone();
                let keybinds = keybinds.clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler = HotkeyHandler::new(keybinds, command_tx.clone());

                        let app = App {
                            recorder: SessionRecorder::new(),
                            picker: Box::new(DirectoryPicker),
                            tray_tx,
                            config,
                            command_tx,
                            command_rx,
                            shutdown_tx,
                            menu_ids,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });

                    info!("Runtime thread finished");
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
