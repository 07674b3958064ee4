mod confirm;
mod form;
mod table;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

use confirm::handle_confirm;
use form::handle_form;
use table::handle_table;

/// Handle a key event for whichever widget has focus
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The confirmation dialog is modal
    if app.is_confirming() {
        handle_confirm(app, key);
        return;
    }

    match app.focus {
        Focus::Input => handle_form(app, key),
        Focus::Table => handle_table(app, key),
    }
}

/// Handle a bracketed paste. Only the input field accepts text; newlines
/// become spaces since titles are single-line.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.is_confirming() || app.focus != Focus::Input || text.is_empty() {
        return;
    }
    let clean = text.replace(['\r', '\n'], " ");
    app.input.insert_str(&clean);
}
