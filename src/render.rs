//! Frame composition: one full-screen buffer per refresh, emitted to the
//! terminal as a single write so partial frames are never observable.

use std::io;

use crossterm::{cursor, queue, style, terminal};

use crate::editor::{Editor, MESSAGE_TIMEOUT};
use crate::terminal::Backend;

/// Rows below the text area: status bar and message bar.
pub(crate) const CHROME_ROWS: usize = 2;

const VERSION: &str = env!("CARGO_PKG_VERSION");

impl<B: Backend> Editor<B> {
    /// Compose and emit one frame: text rows, status bar, message bar, and
    /// final cursor placement, bracketed by hide/show.
    pub fn refresh_screen(&mut self) -> io::Result<()> {
        self.update_window_size()?;
        self.scroll();

        let mut frame = Vec::with_capacity((self.text_rows + CHROME_ROWS) * (self.text_cols + 8));
        queue!(frame, cursor::Hide, cursor::MoveTo(0, 0))?;
        self.draw_rows(&mut frame)?;
        self.draw_status_bar(&mut frame)?;
        self.draw_message_bar(&mut frame)?;

        let (screen_row, screen_col) = self.viewport.to_screen(self.cursor.row, self.render_col);
        queue!(
            frame,
            cursor::MoveTo(screen_col as u16, screen_row as u16),
            cursor::Show
        )?;
        self.term.write_frame(&frame)
    }

    /// Window geometry is re-read every frame, so a resize shows up on the
    /// next refresh without any signal handling.
    fn update_window_size(&mut self) -> io::Result<()> {
        let (cols, rows) = self.term.size()?;
        self.text_cols = cols;
        self.text_rows = rows.saturating_sub(CHROME_ROWS);
        Ok(())
    }

    /// Recompute the cursor's render column and clamp the viewport to it.
    pub(crate) fn scroll(&mut self) {
        self.render_col = match self.doc.row(self.cursor.row) {
            Some(row) => row.cx_to_rx(self.cursor.col),
            None => 0,
        };
        self.viewport.recompute(
            self.cursor.row,
            self.render_col,
            self.text_rows,
            self.text_cols,
        );
    }

    fn draw_rows(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        for y in 0..self.text_rows {
            let file_row = y + self.viewport.row_offset;
            match self.doc.row(file_row) {
                Some(row) => {
                    let render = row.render();
                    let start = self.viewport.col_offset.min(render.len());
                    let end = (start + self.text_cols).min(render.len());
                    frame.extend_from_slice(&render[start..end]);
                }
                None => {
                    if self.doc.is_empty() && y == self.text_rows / 3 {
                        self.draw_welcome(frame);
                    } else {
                        frame.push(b'~');
                    }
                }
            }
            queue!(frame, terminal::Clear(terminal::ClearType::UntilNewLine))?;
            frame.extend_from_slice(b"\r\n");
        }
        Ok(())
    }

    fn draw_welcome(&self, frame: &mut Vec<u8>) {
        let banner = format!("Lexi editor -- version {}", VERSION);
        let shown = &banner.as_bytes()[..banner.len().min(self.text_cols)];
        let mut padding = (self.text_cols - shown.len()) / 2;
        if padding > 0 {
            frame.push(b'~');
            padding -= 1;
        }
        frame.resize(frame.len() + padding, b' ');
        frame.extend_from_slice(shown);
    }

    /// Reverse-video bar: truncated filename, line count, modified marker,
    /// and a right-aligned row indicator.
    fn draw_status_bar(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        queue!(frame, style::SetAttribute(style::Attribute::Reverse))?;

        let name = self
            .filename
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("[No Name]"));
        let left = format!(
            "{:.20} - {} lines {}",
            name,
            self.doc.len(),
            if self.doc.is_dirty() { "(modified)" } else { "" }
        );
        let right = format!("{}/{}", self.cursor.row + 1, self.doc.len());

        let left = left.as_bytes();
        let mut len = left.len().min(self.text_cols);
        frame.extend_from_slice(&left[..len]);
        while len < self.text_cols {
            if self.text_cols - len == right.len() {
                frame.extend_from_slice(right.as_bytes());
                break;
            }
            frame.push(b' ');
            len += 1;
        }
        queue!(frame, style::SetAttribute(style::Attribute::Reset))?;
        frame.extend_from_slice(b"\r\n");
        Ok(())
    }

    /// The last row. The message disappears once it outlives its timeout.
    fn draw_message_bar(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        queue!(frame, terminal::Clear(terminal::ClearType::UntilNewLine))?;
        if !self.status.text.is_empty() && self.status.set_at.elapsed() < MESSAGE_TIMEOUT {
            let text = self.status.text.as_bytes();
            frame.extend_from_slice(&text[..text.len().min(self.text_cols)]);
        }
        Ok(())
    }
}
