use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use lexi::{Document, Editor, Tty};

/// A tiny terminal text editor
#[derive(Parser, Debug)]
#[command(name = "lexi")]
#[command(about = "A tiny terminal text editor", long_about = None)]
#[command(version)]
struct Args {
    /// File to open. Starts with an empty buffer when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

/// Route diagnostics to a file: once raw mode is on, stderr would paint
/// over the editor screen.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let path = std::env::temp_dir().join("lexi.log");
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    // Load before touching the terminal so an unreadable path fails with
    // a plain error message instead of a garbled screen.
    let doc = match &args.file {
        Some(path) => {
            Document::open(path).with_context(|| format!("failed to open {}", path.display()))?
        }
        None => Document::new(),
    };

    let term = Tty::new().context("failed to enable raw terminal mode")?;
    let mut editor = Editor::new(term, doc, args.file);
    editor.set_status_message("HELP: Ctrl-S = save | Ctrl-E = quit | Ctrl-F = find");
    editor.run().context("editor loop failed")
}
