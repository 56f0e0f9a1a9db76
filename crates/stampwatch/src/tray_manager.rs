//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with three states (NoFile, Ready, Recording)
//! and a context menu with one entry per action, Open Log and Exit.

use crate::{
    AppError, AppResult, TrayIconState,
    keybinds::{Action, KeyBindings},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const APP_NAME: &str = "Stampwatch";

/// Menu item ids the dispatcher needs to route tray menu events.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// One entry per action.
    pub actions: Vec<(MenuId, Action)>,
    /// Open the current log in the system editor.
    pub open_log: MenuId,
    /// Quit the application.
    pub exit: MenuId,
}

impl TrayMenuIds {
    /// Action behind a menu item, if it is an action item.
    pub fn action_for(&self, id: &MenuId) -> Option<Action> {
        self.actions
            .iter()
            .find(|(item_id, _)| item_id == id)
            .map(|(_, action)| *action)
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    action_items: Vec<(Action, MenuItem)>,
    menu_ids: TrayMenuIds,
}

impl TrayManager {
    /// Create a new tray manager; action labels show their hotkeys.
    ///
    /// Hotkeys are registered later, once the event loop runs; call
    /// [`show_unregistered`](Self::show_unregistered) with any that failed.
    #[track_caller]
    #[instrument(skip(bindings))]
    pub fn new(bindings: &KeyBindings) -> AppResult<Self> {
        let menu = Menu::new();

        let mut actions = Vec::with_capacity(Action::ALL.len());
        let mut action_items = Vec::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            let item = MenuItem::new(action_label(action, bindings.key_for(action)), true, None);
            append(&menu, &item)?;
            actions.push((item.id().clone(), action));
            action_items.push((action, item));
        }

        append(&menu, &PredefinedMenuItem::separator())?;

        let open_log_item = MenuItem::new("Open Log", true, None);
        let exit_item = MenuItem::new("Exit", true, None);
        append(&menu, &open_log_item)?;
        append(&menu, &exit_item)?;

        let menu_ids = TrayMenuIds {
            actions,
            open_log: open_log_item.id().clone(),
            exit: exit_item.id().clone(),
        };

        let icon = Self::load_icon(TrayIconState::NoFile)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip(TrayIconState::NoFile, None))
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            action_items,
            menu_ids,
        })
    }

    /// Drop the key hint from actions whose hotkey could not be registered.
    #[instrument(skip(self))]
    pub fn show_unregistered(&self, failed: &[Action]) {
        for (action, item) in &self.action_items {
            if failed.contains(action) {
                item.set_text(action_label(*action, None));
            }
        }
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(
        &mut self,
        state: TrayIconState,
        target_name: Option<&str>,
    ) -> AppResult<()> {
        let icon = Self::load_icon(state)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip(state, target_name)))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Menu item ids for event routing.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    /// Load icon from compile-time embedded PNG bytes.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::NoFile => include_bytes!("../resources/icons/no_file.png"),
            TrayIconState::Ready => include_bytes!("../resources/icons/ready.png"),
            TrayIconState::Recording => include_bytes!("../resources/icons/recording.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Menu label for an action, e.g. `Mark Time (F15)`.
pub(crate) fn action_label(action: Action, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("{} ({})", action.label(), key),
        None => action.label().to_string(),
    }
}

/// Tooltip text, e.g. `Stampwatch - notes.txt - Recording`.
pub(crate) fn tooltip(state: TrayIconState, target_name: Option<&str>) -> String {
    let status = match state {
        TrayIconState::NoFile => "No file open",
        TrayIconState::Ready => "Ready",
        TrayIconState::Recording => "Recording...",
    };
    match target_name {
        Some(name) => format!("{} - {} - {}", APP_NAME, name, status),
        None => format!("{} - {}", APP_NAME, status),
    }
}

#[track_caller]
fn append(menu: &Menu, item: &dyn tray_icon::menu::IsMenuItem) -> AppResult<()> {
    menu.append(item).map_err(|e| AppError::TrayError {
        reason: format!("Failed to add menu item: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}
