//! Incremental search over the document's render text, driven from the
//! prompt's per-keystroke observer.

use crate::editor::{Editor, Position};
use crate::input::Key;
use crate::terminal::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Direction {
    #[default]
    Forward,
    Backward,
}

/// State of one search session, owned by the prompt observer variant and
/// discarded when the session ends.
#[derive(Debug, Default)]
pub struct SearchState {
    last_match: Option<usize>,
    direction: Direction,
}

impl SearchState {
    pub fn new() -> Self {
        SearchState::default()
    }

    /// React to one prompt keystroke: update the session, then scan for the
    /// next hit and move the cursor onto it.
    ///
    /// Enter and Escape end the session without moving further. The arrow
    /// keys pick the scan direction; any other key restarts a fresh forward
    /// scan from the top with the updated query.
    pub(crate) fn on_key<B: Backend>(&mut self, editor: &mut Editor<B>, query: &str, key: Key) {
        match key {
            Key::Enter | Key::Escape => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return;
            }
            Key::Right | Key::Down => self.direction = Direction::Forward,
            Key::Left | Key::Up => self.direction = Direction::Backward,
            _ => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        let total = editor.doc.len();
        let mut current = self.last_match;
        for _ in 0..total {
            let index = step(current, self.direction, total);
            current = Some(index);
            let row = match editor.doc.row(index) {
                Some(row) => row,
                None => break,
            };
            if let Some(offset) = find_substring(row.render(), query.as_bytes()) {
                self.last_match = Some(index);
                editor.cursor = Position {
                    row: index,
                    col: row.rx_to_cx(offset),
                };
                // Park the scroll offset past the last line; the next clamp
                // snaps the match line to the top of the window.
                editor.viewport.row_offset = total;
                break;
            }
        }
    }
}

/// Next row in the scan, wrapping at both document ends.
fn step(from: Option<usize>, direction: Direction, total: usize) -> usize {
    match (from, direction) {
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => total.saturating_sub(1),
        (Some(i), Direction::Forward) => {
            if i + 1 >= total {
                0
            } else {
                i + 1
            }
        }
        (Some(i), Direction::Backward) => {
            if i == 0 {
                total.saturating_sub(1)
            } else {
                i - 1
            }
        }
    }
}

fn find_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
