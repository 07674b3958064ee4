use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Focus};

const PLACEHOLDER: &str = "Enter your task";
const BUTTON_WIDTH: u16 = 14;

/// Render the task entry form: a bordered input and the add button
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::Input && !app.is_confirming();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(BUTTON_WIDTH)])
        .split(area);

    let border_color = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(chunks[0]);

    let line = if app.input.buffer.is_empty() {
        Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(
            app.input.buffer.as_str(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ))
    };

    // Scroll horizontally so the cursor stays inside the box
    let cursor_col = app.input.cursor_col();
    let inner_w = inner.width as usize;
    let scroll = if inner_w == 0 {
        0
    } else {
        cursor_col.saturating_sub(inner_w - 1)
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .scroll((0, scroll as u16));
    frame.render_widget(paragraph, chunks[0]);

    if focused && inner.width > 0 && inner.height > 0 {
        let x = inner.x + (cursor_col - scroll) as u16;
        frame.set_cursor_position((x, inner.y));
    }

    let button = Paragraph::new(Line::from(Span::styled(
        "Add Task",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.dim).bg(bg))
            .style(Style::default().bg(bg)),
    );
    frame.render_widget(button, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn placeholder_when_empty() {
        let app = empty_app();
        let output = render_to_string(TERM_W, 3, |frame, area| {
            render_form(frame, &app, area);
        });
        assert!(output.contains("Enter your task"));
        assert!(output.contains("Add Task"));
    }

    #[test]
    fn typed_text_replaces_placeholder() {
        let mut app = empty_app();
        app.input.insert_str("Buy milk");
        let output = render_to_string(TERM_W, 3, |frame, area| {
            render_form(frame, &app, area);
        });
        assert!(output.contains("Buy milk"));
        assert!(!output.contains("Enter your task"));
    }

    #[test]
    fn long_input_scrolls_to_cursor() {
        let mut app = empty_app();
        app.input.insert_str(&format!("{}END", "x".repeat(100)));
        let output = render_to_string(40, 3, |frame, area| {
            render_form(frame, &app, area);
        });
        assert!(output.contains("END"));
    }
}
