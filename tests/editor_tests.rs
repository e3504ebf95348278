// End-to-end tests driving the editor loop through a scripted terminal.

mod common;

use common::term::ScriptedTerm;
use std::path::PathBuf;
use tempfile::TempDir;

use lexi::input::ctrl;
use lexi::{Document, Editor, Key, Position};

const CTRL_E: u8 = ctrl(b'e');
const CTRL_F: u8 = ctrl(b'f');
const CTRL_S: u8 = ctrl(b's');

fn open_fixture(dir: &TempDir, name: &str, contents: &str) -> (Document, PathBuf) {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    let doc = Document::open(&path).unwrap();
    (doc, path)
}

/// Type into an empty buffer, save through the Save-as prompt, then quit.
#[test]
fn test_typing_and_saving_workflow() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.txt");

    let mut script: Vec<u8> = Vec::new();
    script.extend_from_slice(b"hello");
    script.push(CTRL_S);
    script.extend_from_slice(path.to_str().unwrap().as_bytes());
    script.push(b'\r');
    script.push(CTRL_E);

    let term = ScriptedTerm::new(&script);
    let mut editor = Editor::new(term, Document::new(), None);
    editor.run().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"hello\n");
    assert!(!editor.document().is_dirty());
    assert_eq!(editor.filename(), Some(path.as_path()));
    assert!(editor.status_message().contains("bytes written to disk"));
}

/// Open a file, append to the first line, save in place.
#[test]
fn test_open_edit_save_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (doc, path) = open_fixture(&dir, "notes.txt", "hello\nworld\n");

    let term = ScriptedTerm::new(b"");
    let mut editor = Editor::new(term, doc, Some(path.clone()));

    editor.process_key(Key::End).unwrap();
    for &b in b", there" {
        editor.process_key(Key::Char(b)).unwrap();
    }
    assert!(editor.document().is_dirty());

    editor.process_key(Key::Char(CTRL_S)).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"hello, there\nworld\n");
    assert!(!editor.document().is_dirty());
}

/// Cancelling the Save-as prompt leaves the buffer dirty and unnamed.
#[test]
fn test_save_as_can_be_aborted() {
    let mut term = ScriptedTerm::new(b"x");
    term.feed(&[CTRL_S]);
    term.feed(b"scratch.txt");
    term.feed(b"\x1b");
    term.pause();
    term.feed(&[CTRL_E; 4]);

    let mut editor = Editor::new(term, Document::new(), None);
    editor.run().unwrap();

    assert!(editor.filename().is_none());
    assert!(editor.document().is_dirty());
    let aborted = editor
        .terminal()
        .frames
        .iter()
        .any(|frame| String::from_utf8_lossy(frame).contains("Save aborted"));
    assert!(aborted, "no frame showed the abort message");
}

/// A dirty buffer takes four quit presses; the warning counts down.
#[test]
fn test_quit_requires_confirmation_when_dirty() {
    let mut term = ScriptedTerm::new(b"x");
    term.feed(&[CTRL_E; 4]);

    let mut editor = Editor::new(term, Document::new(), None);
    editor.run().unwrap();

    assert!(editor.document().is_dirty());
    assert!(editor.status_message().contains("1 more times"));
}

/// A clean buffer quits on the first press, after a single repaint.
#[test]
fn test_clean_quit_needs_one_press() {
    let term = ScriptedTerm::new(&[CTRL_E]);
    let mut editor = Editor::new(term, Document::new(), None);
    editor.run().unwrap();

    assert_eq!(editor.terminal().frames.len(), 1);
}

/// Right at the end of a line wraps to the next; Left at the start wraps back.
#[test]
fn test_arrow_keys_wrap_at_line_ends() {
    let dir = TempDir::new().unwrap();
    let (doc, path) = open_fixture(&dir, "two.txt", "ab\ncd\n");

    let mut term = ScriptedTerm::new(b"\x1b[C\x1b[C\x1b[C");
    term.feed(b"\x1b[D");
    term.feed(&[CTRL_E]);

    let mut editor = Editor::new(term, doc, Some(path));
    editor.run().unwrap();

    // Three Rights walk off the first line onto the second; Left walks back.
    assert_eq!(editor.cursor(), Position { row: 0, col: 2 });
}

/// PageDown jumps the cursor a screenful and scrolls the window after it.
#[test]
fn test_page_down_advances_a_screenful() {
    let dir = TempDir::new().unwrap();
    let body: String = (0..100).map(|i| format!("line{}\n", i)).collect();
    let (doc, path) = open_fixture(&dir, "long.txt", &body);

    let term = ScriptedTerm::new(b"");
    let mut editor = Editor::new(term, doc, Some(path));
    editor.refresh_screen().unwrap();

    editor.process_key(Key::PageDown).unwrap();
    editor.refresh_screen().unwrap();

    // 24 terminal rows leave 22 for text.
    assert_eq!(editor.cursor().row, 43);
    assert_eq!(editor.viewport().row_offset, 22);
    assert!(!editor.document().is_dirty());
}

/// Enter keeps the cursor on the match found incrementally.
#[test]
fn test_search_confirm_keeps_match_position() {
    let dir = TempDir::new().unwrap();
    let (doc, path) = open_fixture(&dir, "two.txt", "abc\ndef\n");

    let mut term = ScriptedTerm::new(&[CTRL_F]);
    term.feed(b"ef\r");
    term.feed(&[CTRL_E]);

    let mut editor = Editor::new(term, doc, Some(path));
    editor.run().unwrap();

    assert_eq!(editor.cursor(), Position { row: 1, col: 1 });
}

/// Escape abandons the search and puts the cursor back where it started.
#[test]
fn test_search_cancel_restores_position() {
    let dir = TempDir::new().unwrap();
    let (doc, path) = open_fixture(&dir, "two.txt", "abc\ndef\n");

    let mut term = ScriptedTerm::new(b"\x1b[C\x1b[B");
    term.feed(&[CTRL_F]);
    term.feed(b"de");
    term.feed(b"\x1b");
    term.pause();
    term.feed(&[CTRL_E]);

    let mut editor = Editor::new(term, doc, Some(path));
    editor.run().unwrap();

    assert_eq!(editor.cursor(), Position { row: 1, col: 1 });
}
