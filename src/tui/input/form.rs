use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Focus};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => app.submit_input(),
        (_, KeyCode::Tab) | (_, KeyCode::Esc) | (_, KeyCode::Down) => app.focus = Focus::Table,

        (KeyModifiers::CONTROL, KeyCode::Char('a')) | (_, KeyCode::Home) => app.input.home(),
        (KeyModifiers::CONTROL, KeyCode::Char('e')) | (_, KeyCode::End) => app.input.end(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.input.clear(),
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => app.input.delete_word_back(),

        (_, KeyCode::Backspace) => app.input.backspace(),
        (_, KeyCode::Delete) => app.input.delete_forward(),
        (_, KeyCode::Left) => app.input.move_left(),
        (_, KeyCode::Right) => app.input.move_right(),

        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let mut buf = [0u8; 4];
            app.input.insert_str(c.encode_utf8(&mut buf));
        }
        _ => {}
    }
}
