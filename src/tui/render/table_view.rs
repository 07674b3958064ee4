use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::tui::app::{App, Focus};
use crate::util::unicode;

const CHECK_W: u16 = 3;
const DATE_W: u16 = 21;
const DELETE_W: u16 = 6;
const COLUMN_SPACING: u16 = 1;

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Render the task table, newest first, with the cursor row highlighted
pub fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::Table && !app.is_confirming();

    let border_color = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tasks ")
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);

    if app.store.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No tasks yet",
            Style::default().fg(app.theme.dim).bg(bg),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // One row goes to the header
    let visible_rows = inner.height.saturating_sub(1) as usize;
    app.clamp_table_view(visible_rows);

    let title_w = inner
        .width
        .saturating_sub(CHECK_W + DATE_W + DELETE_W + COLUMN_SPACING * 3)
        as usize;

    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let header = Row::new(vec![
        Cell::from(checkbox(app.store.all_selected())),
        Cell::from("Task"),
        Cell::from("Date"),
        Cell::from("Delete"),
    ])
    .style(header_style);

    let rows: Vec<Row> = app
        .store
        .tasks()
        .iter()
        .enumerate()
        .skip(app.table_scroll)
        .take(visible_rows)
        .map(|(i, task)| {
            let selected = app.store.is_selected(task.id);
            let title_style = if selected {
                Style::default()
                    .fg(app.theme.success)
                    .bg(bg)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(app.theme.text_bright).bg(bg)
            };
            let row = Row::new(vec![
                Cell::from(Span::styled(checkbox(selected), text_style)),
                Cell::from(Span::styled(
                    unicode::truncate_to_width(&task.title, title_w),
                    title_style,
                )),
                Cell::from(Span::styled(task.created_at.as_str(), dim_style)),
                Cell::from(Span::styled(
                    "\u{2715}",
                    Style::default().fg(app.theme.danger).bg(bg),
                )),
            ]);
            if i == app.table_cursor && focused {
                row.style(Style::default().bg(app.theme.selection_bg))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(CHECK_W),
        Constraint::Min(1),
        Constraint::Length(DATE_W),
        Constraint::Length(DELETE_W),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(block);
    frame.render_widget(table, area);
}
