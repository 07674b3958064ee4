use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::storage::{KvStore, MemoryStore};
use crate::ops::store::{StoreOptions, TaskStore};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an empty in-memory store.
pub fn empty_app() -> App {
    let store = TaskStore::open(
        Box::new(MemoryStore::new()) as Box<dyn KvStore>,
        StoreOptions::default(),
    );
    App::new(store, Theme::default(), Duration::from_secs(3))
}

/// An App with tasks added in the given order, so the last title is the
/// newest and sits in row 0.
pub fn app_with_titles(titles: &[&str]) -> App {
    let mut app = empty_app();
    for title in titles {
        app.store.add_task(title).unwrap();
    }
    app
}
