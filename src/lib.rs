//! A small terminal text editor.
//!
//! The editor owns the terminal for its whole lifetime: raw mode goes on
//! at startup, input is decoded one byte at a time with a read timeout,
//! and every keystroke triggers a full repaint issued as a single write.
//! All state lives in plain structs threaded through [`Editor`]; there
//! are no globals and no background threads.

pub mod document;
pub mod editor;
pub mod input;
pub mod prompt;
pub mod render;
pub mod search;
pub mod terminal;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use document::Document;
pub use editor::{Editor, Position};
pub use input::Key;
pub use terminal::{Backend, Tty};
