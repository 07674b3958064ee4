pub mod confirm_popup;
pub mod form;
pub mod status_row;
pub mod table_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | form (3 rows) | table | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    form::render_form(frame, app, chunks[1]);
    table_view::render_table(frame, app, chunks[2]);
    status_row::render_status_row(frame, app, chunks[3]);

    // Confirmation dialog (rendered on top of everything)
    if app.is_confirming() {
        confirm_popup::render_confirm_popup(frame, app, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let style = Style::default()
        .fg(app.theme.highlight)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    let title = Paragraph::new(Line::from(Span::styled("Todo App", style)))
        .alignment(Alignment::Center)
        .style(Style::default().bg(app.theme.background));
    frame.render_widget(title, area);
}
