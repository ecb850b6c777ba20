//! Focus ring only for keyboard users

use crate::app::{Context, Key};

const KEYBOARD_CLASS: &str = "keyboard-navigation";

/// Tab switches the focus ring on
pub fn on_key(cx: &mut Context<'_>, key: &Key) {
    if *key != Key::Tab {
        return;
    }
    if let Some(body) = cx.surface.body() {
        cx.surface.add_class(body, KEYBOARD_CLASS);
    }
    cx.state.keyboard_navigation = true;
}

/// Any pointer press switches it off again
pub fn on_pointer_down(cx: &mut Context<'_>) {
    if let Some(body) = cx.surface.body() {
        cx.surface.remove_class(body, KEYBOARD_CLASS);
    }
    cx.state.keyboard_navigation = false;
}
