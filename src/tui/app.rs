use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::storage::KvStore;
use crate::model::config::Config;
use crate::model::task::Task;
use crate::ops::store::TaskStore;
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// The store type the TUI works against
pub type Store = TaskStore<Box<dyn KvStore>>;

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Table,
}

/// Button inside the delete confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Close,
    Delete,
}

/// Delete confirmation flow. The dialog exists only while a task is targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteFlow {
    Idle,
    ConfirmPending { task: Task, button: DialogButton },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// Transient message shown in the status row
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// `None` when the configured lifetime runs past what `Instant` can hold
    pub expires_at: Option<Instant>,
}

/// Single-line text input with a byte-offset cursor kept on grapheme boundaries
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub buffer: String,
    pub cursor: usize,
}

impl InputField {
    pub fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn delete_word_back(&mut self) {
        let start = unicode::word_start_before(&self.buffer, self.cursor);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Terminal column of the cursor
    pub fn cursor_col(&self) -> usize {
        unicode::display_col(&self.buffer, self.cursor)
    }
}

/// Main application state
pub struct App {
    pub store: Store,
    pub focus: Focus,
    pub input: InputField,
    /// Cursor row in the table
    pub table_cursor: usize,
    /// First visible table row
    pub table_scroll: usize,
    pub delete_flow: DeleteFlow,
    pub notification: Option<Notification>,
    pub notification_ttl: Duration,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Store, theme: Theme, notification_ttl: Duration) -> Self {
        App {
            store,
            focus: Focus::Input,
            input: InputField::default(),
            table_cursor: 0,
            table_scroll: 0,
            delete_flow: DeleteFlow::Idle,
            notification: None,
            notification_ttl,
            theme,
            should_quit: false,
        }
    }

    /// Build an App from loaded config
    pub fn from_config(store: Store, config: &Config) -> Self {
        App::new(
            store,
            Theme::from_config(&config.ui),
            Duration::from_secs(config.ui.notification_secs),
        )
    }

    // -----------------------------------------------------------------------
    // Form
    // -----------------------------------------------------------------------

    /// Add the input text as a task. Clears the input on success; on a blank
    /// title shows a notification and leaves the input as typed.
    pub fn submit_input(&mut self) {
        match self.store.add_task(&self.input.buffer) {
            Ok(_) => {
                self.input.clear();
                self.table_cursor = 0;
                self.table_scroll = 0;
            }
            Err(e) => self.notify(NotificationKind::Error, e.to_string()),
        }
        self.report_write_error();
    }

    // -----------------------------------------------------------------------
    // Table
    // -----------------------------------------------------------------------

    /// Task under the table cursor
    pub fn cursor_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.table_cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.store.len();
        if len == 0 {
            self.table_cursor = 0;
            return;
        }
        let next = self.table_cursor as isize + delta;
        self.table_cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn cursor_to_first(&mut self) {
        self.table_cursor = 0;
    }

    pub fn cursor_to_last(&mut self) {
        self.table_cursor = self.store.len().saturating_sub(1);
    }

    /// Toggle the selection checkbox of the cursor row
    pub fn toggle_cursor_row(&mut self) {
        if let Some(id) = self.cursor_task().map(|t| t.id) {
            self.store.toggle_selected(id);
            self.report_write_error();
        }
    }

    /// Header checkbox: select every row, or clear when all are selected
    pub fn toggle_all_rows(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.store.toggle_all();
        self.report_write_error();
    }

    /// Keep the cursor inside the table and visible within `visible_rows`
    pub fn clamp_table_view(&mut self, visible_rows: usize) {
        let len = self.store.len();
        self.table_cursor = self.table_cursor.min(len.saturating_sub(1));
        if visible_rows == 0 {
            return;
        }
        if self.table_cursor < self.table_scroll {
            self.table_scroll = self.table_cursor;
        } else if self.table_cursor >= self.table_scroll + visible_rows {
            self.table_scroll = self.table_cursor + 1 - visible_rows;
        }
        self.table_scroll = self.table_scroll.min(len.saturating_sub(visible_rows));
    }

    // -----------------------------------------------------------------------
    // Delete flow
    // -----------------------------------------------------------------------

    /// Open the confirmation dialog for the cursor row. Does nothing without a row.
    pub fn request_delete(&mut self) {
        if let Some(task) = self.cursor_task().cloned() {
            self.delete_flow = DeleteFlow::ConfirmPending {
                task,
                button: DialogButton::Close,
            };
        }
    }

    /// Delete the targeted task and close the dialog
    pub fn confirm_delete(&mut self) {
        let flow = std::mem::replace(&mut self.delete_flow, DeleteFlow::Idle);
        if let DeleteFlow::ConfirmPending { task, .. } = flow {
            if self.store.delete_task(task.id).is_some() {
                self.notify(NotificationKind::Info, format!("deleted \"{}\"", task.title));
            }
            self.move_cursor(0);
            self.report_write_error();
        }
    }

    /// Close the dialog without deleting
    pub fn cancel_delete(&mut self) {
        self.delete_flow = DeleteFlow::Idle;
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.delete_flow, DeleteFlow::ConfirmPending { .. })
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
            expires_at: Instant::now().checked_add(self.notification_ttl),
        });
    }

    /// Drop the notification once it has expired
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .and_then(|n| n.expires_at)
            .is_some_and(|expires_at| now >= expires_at)
        {
            self.notification = None;
        }
    }

    /// Surface a failed save, if the last mutation produced one
    fn report_write_error(&mut self) {
        if let Some(e) = self.store.take_write_error() {
            self.notify(NotificationKind::Error, format!("Could not save: {}", e));
        }
    }
}

/// Run the TUI application
pub fn run(store: Store, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::from_config(store, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    tracing::info!("tui started");
    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    tracing::info!("tui stopped");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
