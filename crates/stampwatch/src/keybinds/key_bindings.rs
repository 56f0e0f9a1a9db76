use crate::{AppError, AppResult, keybinds::Action};

use std::{
    collections::{BTreeMap, HashMap},
    panic::Location,
};

use error_location::ErrorLocation;
use global_hotkey::hotkey::HotKey;

#[derive(Debug, Clone)]
struct Binding {
    key: String,
    hotkey: HotKey,
}

/// Bidirectional action <-> hotkey mapping.
///
/// Both directions are updated together on every change, so dispatch
/// looks up the action for a hotkey id without rebuilding an inverse map.
/// Keys are compared by their parsed hotkey, so `ctrl+F1` and `control+F1`
/// are the same binding.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    by_action: BTreeMap<Action, Binding>,
    by_hotkey: HashMap<u32, Action>,
}

impl KeyBindings {
    /// Default bindings (F13..F18).
    #[track_caller]
    pub fn defaults() -> AppResult<Self> {
        let mut bindings = Self::default();
        for action in Action::ALL {
            bindings.bind(action, action.default_key())?;
        }
        Ok(bindings)
    }

    /// Bind `action` to `key`.
    ///
    /// Any action previously bound to the same hotkey loses its binding and
    /// is returned, so a runtime remap can tell the user which action it
    /// left unbound. Loading from disk never displaces: the store rejects
    /// duplicate keys before calling this.
    ///
    /// # Errors
    ///
    /// Returns error if `key` is not a valid hotkey string.
    #[track_caller]
    pub fn bind(&mut self, action: Action, key: &str) -> AppResult<Option<Action>> {
        let hotkey = parse_key(key)?;

        let displaced = self
            .by_hotkey
            .get(&hotkey.id())
            .copied()
            .filter(|bound| *bound != action);
        if let Some(other) = displaced {
            self.by_action.remove(&other);
        }

        if let Some(previous) = self.by_action.remove(&action) {
            self.by_hotkey.remove(&previous.hotkey.id());
        }

        self.by_hotkey.insert(hotkey.id(), action);
        self.by_action.insert(
            action,
            Binding {
                key: key.trim().to_string(),
                hotkey,
            },
        );

        Ok(displaced)
    }

    /// Key string bound to `action`.
    pub fn key_for(&self, action: Action) -> Option<&str> {
        self.by_action.get(&action).map(|b| b.key.as_str())
    }

    /// Action bound to the hotkey with `hotkey_id`.
    pub fn action_for(&self, hotkey_id: u32) -> Option<Action> {
        self.by_hotkey.get(&hotkey_id).copied()
    }

    /// Whether a key string is bound to some action.
    pub fn is_bound(&self, key: &str) -> bool {
        parse_key(key)
            .map(|hotkey| self.by_hotkey.contains_key(&hotkey.id()))
            .unwrap_or(false)
    }

    /// Bound hotkeys in action order.
    pub fn hotkeys(&self) -> impl Iterator<Item = (Action, HotKey)> + '_ {
        self.by_action.iter().map(|(action, b)| (*action, b.hotkey))
    }

    /// Bound key strings in action order.
    pub fn entries(&self) -> impl Iterator<Item = (Action, &str)> + '_ {
        self.by_action
            .iter()
            .map(|(action, b)| (*action, b.key.as_str()))
    }

    /// Number of bound actions.
    pub fn len(&self) -> usize {
        self.by_action.len()
    }
}

#[track_caller]
fn parse_key(key: &str) -> AppResult<HotKey> {
    key.trim()
        .parse::<HotKey>()
        .map_err(|e| AppError::KeybindError {
            reason: format!("Invalid key {:?}: {}", key, e),
            location: ErrorLocation::from(Location::caller()),
        })
}
