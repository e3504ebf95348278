//! The editor controller: owns the document, cursor, viewport, and status
//! state, and dispatches decoded keys into movement, edits, save, search,
//! and quit confirmation.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::input::{self, ctrl, Key};
use crate::prompt::PromptObserver;
use crate::search::SearchState;
use crate::terminal::Backend;
use crate::viewport::Viewport;

/// Presses of the quit key required to discard unsaved changes.
pub const QUIT_CONFIRM_PRESSES: u32 = 3;

/// How long a status message stays on the bar.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

const CTRL_E: u8 = ctrl(b'e');
const CTRL_F: u8 = ctrl(b'f');
const CTRL_H: u8 = ctrl(b'h');
const CTRL_L: u8 = ctrl(b'l');
const CTRL_S: u8 = ctrl(b's');

/// Cursor position in edit coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Transient status-bar message.
#[derive(Debug)]
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) set_at: Instant,
}

/// The editor: one document, one cursor, one window.
///
/// Generic over the terminal [`Backend`] so the whole key-to-frame loop can
/// be driven from tests with a scripted collaborator.
pub struct Editor<B: Backend> {
    pub(crate) term: B,
    pub(crate) doc: Document,
    pub(crate) filename: Option<PathBuf>,
    pub(crate) cursor: Position,
    pub(crate) render_col: usize,
    pub(crate) viewport: Viewport,
    /// Text area size: the window minus the status and message rows.
    pub(crate) text_rows: usize,
    pub(crate) text_cols: usize,
    pub(crate) status: StatusMessage,
    pub(crate) quit_presses_left: u32,
}

impl<B: Backend> Editor<B> {
    pub fn new(term: B, doc: Document, filename: Option<PathBuf>) -> Self {
        Editor {
            term,
            doc,
            filename,
            cursor: Position::default(),
            render_col: 0,
            viewport: Viewport::new(),
            text_rows: 0,
            text_cols: 0,
            status: StatusMessage {
                text: String::new(),
                set_at: Instant::now(),
            },
            quit_presses_left: QUIT_CONFIRM_PRESSES,
        }
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn status_message(&self) -> &str {
        &self.status.text
    }

    pub fn terminal(&self) -> &B {
        &self.term
    }

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status = StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        };
    }

    /// Run the key loop until quit or a fatal terminal error.
    pub fn run(&mut self) -> io::Result<()> {
        tracing::info!("editor started with {} lines", self.doc.len());
        loop {
            self.refresh_screen()?;
            let key = self.wait_key()?;
            if !self.process_key(key)? {
                break;
            }
        }
        tracing::info!("editor exiting");
        Ok(())
    }

    /// Block for the next key. Between read timeouts, retire an expired
    /// status message so the bar clears without a keystroke.
    pub(crate) fn wait_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = input::read_key(&mut self.term)? {
                return Ok(key);
            }
            if !self.status.text.is_empty() && self.status.set_at.elapsed() >= MESSAGE_TIMEOUT {
                self.status.text.clear();
                self.refresh_screen()?;
            }
        }
    }

    /// Dispatch one key. Returns `false` when the editor should exit.
    pub fn process_key(&mut self, key: Key) -> io::Result<bool> {
        match key {
            Key::Enter => self.insert_newline(),
            Key::Char(CTRL_E) => {
                if self.doc.is_dirty() && self.quit_presses_left > 0 {
                    self.set_status_message(format!(
                        "WARNING!!! File has unsaved changes. \
                         Press Ctrl-E {} more times to quit.",
                        self.quit_presses_left
                    ));
                    self.quit_presses_left -= 1;
                    return Ok(true);
                }
                tracing::info!("quit");
                return Ok(false);
            }
            Key::Char(CTRL_S) => self.save()?,
            Key::Char(CTRL_F) => self.find()?,
            Key::Home => self.cursor.col = 0,
            Key::End => {
                if let Some(row) = self.doc.row(self.cursor.row) {
                    self.cursor.col = row.len();
                }
            }
            Key::Backspace | Key::Char(CTRL_H) => self.delete_char(),
            Key::Delete => {
                self.move_cursor(Key::Right);
                self.delete_char();
            }
            Key::PageUp | Key::PageDown => self.move_page(key),
            Key::Up | Key::Down | Key::Left | Key::Right => self.move_cursor(key),
            Key::Char(CTRL_L) | Key::Escape => {}
            Key::Char(c) => self.insert_char(c),
        }
        Ok(true)
    }

    /// Move one step. Left/Right wrap across line boundaries; after any
    /// move the column snaps back to the new line's length.
    pub(crate) fn move_cursor(&mut self, key: Key) {
        match key {
            Key::Left => {
                if self.cursor.col > 0 {
                    self.cursor.col -= 1;
                } else if self.cursor.row > 0 {
                    self.cursor.row -= 1;
                    self.cursor.col = self.doc.row(self.cursor.row).map_or(0, |r| r.len());
                }
            }
            Key::Right => {
                if let Some(row) = self.doc.row(self.cursor.row) {
                    if self.cursor.col < row.len() {
                        self.cursor.col += 1;
                    } else {
                        self.cursor.row += 1;
                        self.cursor.col = 0;
                    }
                }
            }
            Key::Up => self.cursor.row = self.cursor.row.saturating_sub(1),
            Key::Down => {
                if self.cursor.row < self.doc.len() {
                    self.cursor.row += 1;
                }
            }
            _ => {}
        }
        let len = self.doc.row(self.cursor.row).map_or(0, |r| r.len());
        if self.cursor.col > len {
            self.cursor.col = len;
        }
    }

    /// Jump to the window edge, then move one screenful through the normal
    /// movement path so the wrap/snap rules apply.
    pub(crate) fn move_page(&mut self, key: Key) {
        let step = match key {
            Key::PageUp => {
                self.cursor.row = self.viewport.row_offset;
                Key::Up
            }
            Key::PageDown => {
                let target = self.viewport.row_offset + self.text_rows;
                self.cursor.row = target.saturating_sub(1).min(self.doc.len());
                Key::Down
            }
            _ => return,
        };
        for _ in 0..self.text_rows {
            self.move_cursor(step);
        }
    }

    /// Insert a literal byte at the cursor. On the synthetic end-of-document
    /// row a new empty line is appended first.
    pub(crate) fn insert_char(&mut self, c: u8) {
        if self.cursor.row == self.doc.len() {
            self.doc.insert_row(self.doc.len(), Vec::new());
        }
        self.doc.insert_char(self.cursor.row, self.cursor.col, c);
        self.cursor.col += 1;
    }

    pub(crate) fn insert_newline(&mut self) {
        if self.cursor.col == 0 {
            self.doc.insert_row(self.cursor.row, Vec::new());
        } else {
            self.doc.split_row(self.cursor.row, self.cursor.col);
        }
        self.cursor.row += 1;
        self.cursor.col = 0;
    }

    /// Delete before the cursor; at column zero the current line is joined
    /// onto the previous one. No-op at the document start and on the
    /// synthetic end row.
    pub(crate) fn delete_char(&mut self) {
        if self.cursor.row == self.doc.len() {
            return;
        }
        if self.cursor.col == 0 && self.cursor.row == 0 {
            return;
        }
        if self.cursor.col > 0 {
            self.doc.delete_char(self.cursor.row, self.cursor.col);
            self.cursor.col -= 1;
        } else {
            let prev_len = self.doc.row(self.cursor.row - 1).map_or(0, |r| r.len());
            self.doc.join_rows(self.cursor.row - 1);
            self.cursor.row -= 1;
            self.cursor.col = prev_len;
        }
    }

    /// Save to the current filename, prompting for one first if the
    /// document is unnamed. Save failures are reported on the status bar,
    /// never propagated.
    pub(crate) fn save(&mut self) -> io::Result<()> {
        let path = match &self.filename {
            Some(path) => path.clone(),
            None => match self.prompt("Save as: {} (ESC to cancel)", PromptObserver::None)? {
                Some(name) => {
                    let path = PathBuf::from(name);
                    self.filename = Some(path.clone());
                    path
                }
                None => {
                    self.set_status_message("Save aborted");
                    return Ok(());
                }
            },
        };
        match self.doc.save(&path) {
            Ok(bytes) => {
                tracing::info!("saved {} bytes to {}", bytes, path.display());
                self.quit_presses_left = QUIT_CONFIRM_PRESSES;
                self.set_status_message(format!("{} bytes written to disk", bytes));
            }
            Err(err) => {
                tracing::warn!("save to {} failed: {}", path.display(), err);
                self.set_status_message(format!("Can't save! I/O error: {}", err));
            }
        }
        Ok(())
    }

    /// Incremental search. The session runs inside the prompt; on cancel the
    /// cursor and viewport are restored from the snapshot taken here.
    pub(crate) fn find(&mut self) -> io::Result<()> {
        let saved_cursor = self.cursor;
        let saved_viewport = self.viewport;
        let confirmed = self.prompt(
            "Search: {} (Use ESC/Arrows/Enter)",
            PromptObserver::Search(SearchState::new()),
        )?;
        if confirmed.is_none() {
            self.cursor = saved_cursor;
            self.viewport = saved_viewport;
        }
        Ok(())
    }
}
