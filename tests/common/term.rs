//! A scripted terminal standing in for the real one.
//!
//! Mirror of `src/testing.rs`, the source of truth: `#[cfg(test)]` items
//! are invisible to integration test crates, so the fake lives in both
//! places. Keep the two in lockstep.

use std::collections::VecDeque;
use std::io;

use lexi::input::ByteSource;
use lexi::terminal::Backend;

/// Scripted terminal: feeds a fixed byte script to the key decoder and
/// captures every frame the editor writes.
///
/// A drained script reports a bounded number of timeouts, letting a pending
/// escape sequence resolve, and then errors like a closed stdin so a test
/// that forgets to script its exit fails instead of hanging.
pub struct ScriptedTerm {
    reads: VecDeque<Option<u8>>,
    drained_reads_left: usize,
    pub frames: Vec<Vec<u8>>,
    pub cols: usize,
    pub rows: usize,
}

impl ScriptedTerm {
    pub fn new(script: &[u8]) -> Self {
        ScriptedTerm {
            reads: script.iter().copied().map(Some).collect(),
            drained_reads_left: 100,
            frames: Vec::new(),
            cols: 80,
            rows: 24,
        }
    }

    /// Append key bytes to the script.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.reads.extend(bytes.iter().copied().map(Some));
    }

    /// Append one read timeout, e.g. to let a lone Escape resolve before
    /// the bytes that follow it.
    pub fn pause(&mut self) {
        self.reads.push_back(None);
    }
}

impl ByteSource for ScriptedTerm {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(read) = self.reads.pop_front() {
            return Ok(read);
        }
        if self.drained_reads_left > 0 {
            self.drained_reads_left -= 1;
            return Ok(None);
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "script drained",
        ))
    }
}

impl Backend for ScriptedTerm {
    fn size(&self) -> io::Result<(usize, usize)> {
        Ok((self.cols, self.rows))
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}
