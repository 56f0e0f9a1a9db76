mod action;
mod key_bindings;
mod keybind_store;

pub(crate) use {action::Action, key_bindings::KeyBindings, keybind_store::KeybindStore};
