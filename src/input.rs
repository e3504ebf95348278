//! Key decoding: reconstructs logical keys from the raw terminal byte
//! stream, including escape sequences that may arrive split across timed
//! reads.

use std::io;

/// Control-key code for a letter, e.g. `ctrl(b'e')` for Ctrl-E.
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// A decoded logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A literal byte: printable text, control codes, high-bit bytes.
    Char(u8),
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Source of raw input bytes under a bounded read timeout.
///
/// `read_byte` returns `Ok(None)` when no byte arrived within the timeout;
/// callers retry. Errors are reserved for unrecoverable conditions.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Decode one logical key.
///
/// Returns `Ok(None)` when the first read times out, so the caller can
/// interleave housekeeping between keystrokes. Once an escape byte has been
/// seen, a timeout on any lookahead byte resolves the sequence to a bare
/// [`Key::Escape`]; so does any unrecognized sequence. Malformed input never
/// blocks and never errors.
pub fn read_key<S: ByteSource>(src: &mut S) -> io::Result<Option<Key>> {
    let byte = match src.read_byte()? {
        Some(b) => b,
        None => return Ok(None),
    };
    let key = match byte {
        0x1b => decode_escape(src)?,
        b'\r' => Key::Enter,
        0x7f => Key::Backspace,
        b => Key::Char(b),
    };
    Ok(Some(key))
}

fn decode_escape<S: ByteSource>(src: &mut S) -> io::Result<Key> {
    let first = match src.read_byte()? {
        Some(b) => b,
        None => return Ok(Key::Escape),
    };
    let second = match src.read_byte()? {
        Some(b) => b,
        None => return Ok(Key::Escape),
    };
    Ok(match (first, second) {
        (b'[', b'0'..=b'9') => decode_vt_key(src, second)?,
        (b'[', b'A') => Key::Up,
        (b'[', b'B') => Key::Down,
        (b'[', b'C') => Key::Right,
        (b'[', b'D') => Key::Left,
        (b'[', b'H') => Key::Home,
        (b'[', b'F') => Key::End,
        (b'O', b'H') => Key::Home,
        (b'O', b'F') => Key::End,
        _ => Key::Escape,
    })
}

/// VT-style `ESC [ <digit> ~` keys.
fn decode_vt_key<S: ByteSource>(src: &mut S, digit: u8) -> io::Result<Key> {
    let terminator = match src.read_byte()? {
        Some(b) => b,
        None => return Ok(Key::Escape),
    };
    if terminator != b'~' {
        return Ok(Key::Escape);
    }
    Ok(match digit {
        b'1' | b'7' => Key::Home,
        b'3' => Key::Delete,
        b'4' | b'8' => Key::End,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => Key::Escape,
    })
}
