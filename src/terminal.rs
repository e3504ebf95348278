//! Terminal collaborator: raw mode lifetime, window-size queries, timed
//! single-byte reads off the stdin descriptor, and whole-frame writes.

use std::io::{self, Write};
use std::os::fd::{BorrowedFd, RawFd};
use std::time::Duration;

use crossterm::{cursor, execute, terminal};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::input::ByteSource;

/// How long one byte read waits before reporting "no key pending".
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Terminal-facing surface of the editor.
///
/// [`Tty`] is the real implementation; tests substitute a scripted one to
/// drive the editor loop without a terminal.
pub trait Backend: ByteSource {
    /// Current window size as `(cols, rows)`.
    fn size(&self) -> io::Result<(usize, usize)>;

    /// Emit one composed frame in a single write.
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// The real terminal. Raw mode is enabled for the lifetime of the value and
/// restored on drop, on every exit path including panics; teardown also
/// clears the screen, homes the cursor, and re-shows it.
pub struct Tty {
    stdin_fd: RawFd,
}

impl Tty {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::debug!("raw mode enabled");
        Ok(Tty {
            stdin_fd: libc::STDIN_FILENO,
        })
    }
}

impl Drop for Tty {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Show
        );
        let _ = terminal::disable_raw_mode();
        tracing::debug!("raw mode restored");
    }
}

impl ByteSource for Tty {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        read_byte_from(self.stdin_fd, READ_TIMEOUT)
    }
}

impl Backend for Tty {
    fn size(&self) -> io::Result<(usize, usize)> {
        let (cols, rows) = terminal::size()?;
        Ok((cols as usize, rows as usize))
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(frame)?;
        stdout.flush()
    }
}

/// Wait up to `timeout` for `fd` to become readable.
fn poll_readable(fd: RawFd, timeout: Duration) -> io::Result<bool> {
    // SAFETY: the descriptor stays open for the duration of the call.
    let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
    let mut fds = [PollFd::new(borrowed, PollFlags::POLLIN)];
    let timeout_ms = timeout.as_millis().min(u16::MAX as u128) as u16;
    match poll(&mut fds, PollTimeout::from(timeout_ms)) {
        Ok(0) => Ok(false),
        Ok(_) => Ok(true),
        // A signal landing mid-poll counts as "nothing yet"; the caller
        // retries on its next pass.
        Err(nix::errno::Errno::EINTR) => Ok(false),
        Err(err) => Err(io::Error::from_raw_os_error(err as i32)),
    }
}

/// One timed byte read straight off the descriptor. Stdin must be read at
/// the fd level: a buffered reader would hold bytes where the next poll
/// cannot see them. End-of-file is an error; no further key can ever
/// arrive once stdin closes.
fn read_byte_from(fd: RawFd, timeout: Duration) -> io::Result<Option<u8>> {
    if !poll_readable(fd, timeout)? {
        return Ok(None);
    }
    let mut buf = [0u8; 1];
    // SAFETY: reading into a valid one-byte buffer.
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), 1) };
    match n {
        1 => Ok(Some(buf[0])),
        0 => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )),
        _ => {
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                _ => Err(err),
            }
        }
    }
}
