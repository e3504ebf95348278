//! Modal line prompt over the message bar, with an optional per-keystroke
//! observer.

use std::io;

use crate::editor::Editor;
use crate::input::{ctrl, Key};
use crate::search::SearchState;
use crate::terminal::Backend;

const CTRL_H: u8 = ctrl(b'h');

/// Per-keystroke hook into the prompt loop.
///
/// The observer owns whatever session state it needs; search keeps its
/// match bookkeeping inside its variant.
pub enum PromptObserver {
    None,
    Search(SearchState),
}

impl PromptObserver {
    fn notify<B: Backend>(&mut self, editor: &mut Editor<B>, buffer: &str, key: Key) {
        match self {
            PromptObserver::None => {}
            PromptObserver::Search(state) => state.on_key(editor, buffer, key),
        }
    }
}

impl<B: Backend> Editor<B> {
    /// Run a modal prompt. `template` contains a `{}` placeholder replaced
    /// by the live buffer on every repaint. Returns `None` on cancel.
    ///
    /// The observer runs exactly once per accepted keystroke, including the
    /// confirming Enter and the cancelling Escape; that is what lets search
    /// react to every character as it is typed.
    pub(crate) fn prompt(
        &mut self,
        template: &str,
        mut observer: PromptObserver,
    ) -> io::Result<Option<String>> {
        let mut buffer = String::new();
        loop {
            self.set_status_message(template.replacen("{}", &buffer, 1));
            self.refresh_screen()?;

            let key = self.wait_key()?;
            match key {
                Key::Backspace | Key::Delete | Key::Char(CTRL_H) => {
                    buffer.pop();
                }
                Key::Escape => {
                    self.set_status_message("");
                    observer.notify(self, &buffer, key);
                    return Ok(None);
                }
                Key::Enter if !buffer.is_empty() => {
                    self.set_status_message("");
                    observer.notify(self, &buffer, key);
                    return Ok(Some(buffer));
                }
                Key::Char(c) if c.is_ascii() && !c.is_ascii_control() => {
                    buffer.push(c as char);
                }
                _ => {}
            }
            observer.notify(self, &buffer, key);
        }
    }
}
