//! Line-oriented document model: the editable byte text of each line plus its
//! tab-expanded render form, and the mutation set the editor dispatches into.

use std::fs;
use std::io;
use std::path::Path;

/// Number of columns a tab stop occupies in render coordinates.
pub const TAB_STOP: usize = 8;

/// One line of the document.
///
/// `chars` is the stored text (no line terminator, tabs kept as single
/// bytes); `render` is the display form with tabs expanded to spaces.
/// `render` is rebuilt from scratch on every mutation of `chars`.
#[derive(Debug, Clone, Default)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    pub fn new(chars: Vec<u8>) -> Self {
        let mut row = Row {
            chars,
            render: Vec::new(),
        };
        row.rebuild_render();
        row
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Length of the stored text in edit coordinates.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Map an edit column to its render column: one cell per ordinary byte,
    /// tabs advance to the next multiple of [`TAB_STOP`].
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &c in self.chars.iter().take(cx) {
            if c == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Inverse of [`Row::cx_to_rx`]: the first edit column whose cumulative
    /// render width exceeds `rx`. A render column at or past the end of the
    /// line maps to the line's edit length.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            if c == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    fn insert_char(&mut self, at: usize, ch: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
        self.rebuild_render();
    }

    fn remove_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.rebuild_render();
        true
    }

    fn append(&mut self, text: &[u8]) {
        self.chars.extend_from_slice(text);
        self.rebuild_render();
    }

    /// Split the line at `at`, keeping the head and returning the tail bytes.
    fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let rest = self.chars.split_off(at);
        self.rebuild_render();
        rest
    }

    fn rebuild_render(&mut self) {
        self.render.clear();
        for &c in &self.chars {
            if c == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(c);
            }
        }
    }
}

/// Ordered sequence of rows plus the unsaved-modification counter.
///
/// Every structural or content mutation bumps `dirty` by one per row touched;
/// a successful save resets it. Out-of-range rows or columns make an
/// operation a no-op that leaves the counter alone.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    dirty: usize,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Load a document from disk. Each `\n` ends a line; trailing `\r` bytes
    /// are stripped per line and a final terminator does not produce an
    /// empty last row. An empty file yields zero rows.
    pub fn open(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let mut rows = Vec::new();
        if !bytes.is_empty() {
            let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
            if bytes.ends_with(b"\n") {
                lines.pop();
            }
            for line in lines {
                rows.push(Row::new(trim_line_ending(line).to_vec()));
            }
        }
        Ok(Document { rows, dirty: 0 })
    }

    /// Serialize and write the whole document, create-or-truncate. Returns
    /// the number of bytes written and clears the dirty counter on success.
    pub fn save(&mut self, path: &Path) -> io::Result<usize> {
        let bytes = self.to_bytes();
        fs::write(path, &bytes)?;
        self.dirty = 0;
        Ok(bytes.len())
    }

    /// On-disk form: each row's text followed by exactly one `\n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn dirty(&self) -> usize {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn insert_row(&mut self, at: usize, text: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(text));
        self.dirty += 1;
    }

    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Split row `row` at edit column `col` into two rows; the tail becomes
    /// row `row + 1`.
    pub fn split_row(&mut self, row: usize, col: usize) {
        let rest = match self.rows.get_mut(row) {
            Some(r) if col <= r.len() => r.split_off(col),
            _ => return,
        };
        self.rows.insert(row + 1, Row::new(rest));
        self.dirty += 1;
    }

    /// Merge row `row + 1` onto the end of row `row`. Counts as two
    /// mutations, one per row touched.
    pub fn join_rows(&mut self, row: usize) {
        if row + 1 >= self.rows.len() {
            return;
        }
        let tail = self.rows.remove(row + 1);
        self.dirty += 1;
        self.append_to_row(row, tail.chars());
    }

    pub fn append_to_row(&mut self, row: usize, text: &[u8]) {
        if let Some(r) = self.rows.get_mut(row) {
            r.append(text);
            self.dirty += 1;
        }
    }

    /// Insert `ch` before edit column `col`; a column past the end of the
    /// row appends.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: u8) {
        if let Some(r) = self.rows.get_mut(row) {
            r.insert_char(col, ch);
            self.dirty += 1;
        }
    }

    /// Remove the character immediately before edit column `col`; no-op at
    /// the start of a row.
    pub fn delete_char(&mut self, row: usize, col: usize) {
        if col == 0 {
            return;
        }
        if let Some(r) = self.rows.get_mut(row) {
            if r.remove_char(col - 1) {
                self.dirty += 1;
            }
        }
    }
}

fn trim_line_ending(mut line: &[u8]) -> &[u8] {
    while line.last() == Some(&b'\r') {
        line = &line[..line.len() - 1];
    }
    line
}
