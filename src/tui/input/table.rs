use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Focus};

pub(super) fn handle_table(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab) | (_, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('i')) => {
            app.focus = Focus::Input
        }
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.should_quit = true,

        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            if app.table_cursor == 0 {
                app.focus = Focus::Input;
            } else {
                app.move_cursor(-1);
            }
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => app.move_cursor(1),
        (_, KeyCode::PageUp) => app.move_cursor(-10),
        (_, KeyCode::PageDown) => app.move_cursor(10),
        (_, KeyCode::Home) | (KeyModifiers::NONE, KeyCode::Char('g')) => app.cursor_to_first(),
        (_, KeyCode::End) | (KeyModifiers::SHIFT, KeyCode::Char('G')) => app.cursor_to_last(),

        (_, KeyCode::Char(' '))
        | (_, KeyCode::Enter)
        | (KeyModifiers::NONE, KeyCode::Char('x')) => app.toggle_cursor_row(),
        (KeyModifiers::NONE, KeyCode::Char('a')) => app.toggle_all_rows(),

        (_, KeyCode::Delete) | (KeyModifiers::NONE, KeyCode::Char('d')) => app.request_delete(),
        _ => {}
    }
}
