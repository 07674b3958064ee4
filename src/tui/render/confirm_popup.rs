use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, DeleteFlow, DialogButton};
use crate::util::unicode;

/// Render the delete confirmation dialog
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let (task, button) = match &app.delete_flow {
        DeleteFlow::ConfirmPending { task, button } => (task, *button),
        DeleteFlow::Idle => return,
    };

    let bg = app.theme.background;
    let highlight = app.theme.highlight;

    let header_style = Style::default()
        .fg(highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let bright_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let popup_w: u16 = 50.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let button_style = |this: DialogButton, color: Color| {
        if this == button {
            Style::default()
                .fg(bg)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).bg(bg)
        }
    };

    let lines = vec![
        Line::from(Span::styled(" Delete Task", header_style)),
        Line::from(Span::styled("", text_style)),
        Line::from(Span::styled(
            " Are you sure you want to delete this task?",
            text_style,
        )),
        Line::from(Span::styled("", text_style)),
        Line::from(Span::styled(
            format!(
                "   {}",
                unicode::truncate_to_width(&task.title, inner_w.saturating_sub(4))
            ),
            bright_style,
        )),
        Line::from(Span::styled("", text_style)),
        Line::from(vec![
            Span::styled(" ", text_style),
            Span::styled(
                " Close ",
                button_style(DialogButton::Close, app.theme.text_bright),
            ),
            Span::styled("  ", text_style),
            Span::styled(
                " Delete ",
                button_style(DialogButton::Delete, app.theme.danger),
            ),
        ]),
        Line::from(Span::styled("", text_style)),
        Line::from(vec![
            Span::styled(" \u{2190}\u{2192}", dim_style),
            Span::styled(" switch  ", text_style),
            Span::styled("Enter", dim_style),
            Span::styled(" choose  ", text_style),
            Span::styled("Esc", dim_style),
            Span::styled(" close", text_style),
        ]),
    ];

    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
