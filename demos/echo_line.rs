//! Echo every line typed until end of input.
//!
//! Run with `cargo run --example echo_line`. Set `LINEKIT_DEBUG=1` to log
//! the editor's key dispatch to `/tmp/linekit-debug.log`, and
//! `LINEKIT_SCREEN_WIDTH` / `COLUMNS` to change the window size.

use linekit::prelude::*;

fn main() {
    init_debug_logging();

    let config = match EditorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let history_path = std::env::temp_dir().join("linekit-echo-history");
    let mut editor = match LineEditor::builder()
        .with_config(config)
        .with_history_file(&history_path)
        .with_commit_hook(|line: &mut String| {
            let trimmed = line.trim_end().len();
            (trimmed < line.len()).then(|| {
                line.truncate(trimmed);
                trimmed
            })
        })
        .build()
    {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to start line editor: {e}");
            std::process::exit(1);
        }
    };

    println!("Type a line and press Enter. Ctrl-D on an empty line quits.");
    loop {
        match editor.read_line("$ ") {
            Ok(line) if line.is_empty() => break,
            Ok(line) => print!("{line}"),
            Err(EditError::Overflow { partial, capacity }) => {
                eprintln!("line longer than {capacity} characters, discarded: {partial}");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }
    }

    if let Err(e) = editor.save_history() {
        eprintln!("Failed to save history to {}: {e}", history_path.display());
    }
}
