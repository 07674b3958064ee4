use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, DeleteFlow, DialogButton};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let button = match &app.delete_flow {
        DeleteFlow::ConfirmPending { button, .. } => *button,
        DeleteFlow::Idle => return,
    };

    match (key.modifiers, key.code) {
        // Activate the focused button
        (_, KeyCode::Enter) => match button {
            DialogButton::Close => app.cancel_delete(),
            DialogButton::Delete => app.confirm_delete(),
        },
        // Shortcuts
        (KeyModifiers::NONE, KeyCode::Char('y')) | (KeyModifiers::NONE, KeyCode::Char('d')) => {
            app.confirm_delete()
        }
        (KeyModifiers::NONE, KeyCode::Char('n'))
        | (KeyModifiers::NONE, KeyCode::Char('c'))
        | (_, KeyCode::Esc) => app.cancel_delete(),
        // Move between Close and Delete
        (_, KeyCode::Left)
        | (_, KeyCode::Right)
        | (_, KeyCode::Tab)
        | (_, KeyCode::BackTab)
        | (KeyModifiers::NONE, KeyCode::Char('h'))
        | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            if let DeleteFlow::ConfirmPending { button, .. } = &mut app.delete_flow {
                *button = match button {
                    DialogButton::Close => DialogButton::Delete,
                    DialogButton::Delete => DialogButton::Close,
                };
            }
        }
        _ => {}
    }
}
