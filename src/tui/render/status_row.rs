use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus, NotificationKind};
use crate::util::unicode;

/// Render the status row (bottom of screen): the notification if one is
/// showing, otherwise key hints. The done count sits on the right.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = match &app.notification {
        Some(n) => {
            let color = match n.kind {
                NotificationKind::Error => app.theme.danger,
                NotificationKind::Info => app.theme.success,
            };
            vec![Span::styled(
                format!(" {}", n.message),
                Style::default().fg(color).bg(bg),
            )]
        }
        None => {
            let hint = match app.focus {
                Focus::Input => " Enter add  Tab table  Ctrl-C quit",
                Focus::Table => " Space toggle  a all  d delete  Tab input  q quit",
            };
            vec![Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg))]
        }
    };

    let count = format!(
        "{}/{} done ",
        app.store.completed_count(),
        app.store.len()
    );
    let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let count_width = unicode::display_width(&count);
    if content_width + count_width < width {
        let padding = width - content_width - count_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            count,
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
