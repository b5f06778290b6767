//! # Linekit - Emacs-style line editing for terminals
//!
//! Linekit reads one line at a time from an interactive terminal with
//! Emacs-style editing, a kill ring, a history ring and incremental search.
//! It draws using only printable characters, backspace and the bell, so it
//! works on any terminal that echoes; lines wider than the screen scroll
//! horizontally with `$` marking the hidden parts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linekit::prelude::*;
//!
//! let mut editor = LineEditor::builder()
//!     .with_screen_width(100)
//!     .build()
//!     .expect("Failed to create line editor");
//!
//! loop {
//!     match editor.read_line("> ") {
//!         Ok(line) if line.is_empty() => break,
//!         Ok(line) => print!("you typed: {line}"),
//!         Err(e) => {
//!             eprintln!("Error: {e}");
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`linekit_core`]: the buffer, kill ring, history, viewport renderer,
//!   search and key dispatch, written against the console traits
//! - [`linekit_io`]: the Unix terminal, the byte decoder and a mock console
//! - this crate: [`LineEditor`], which bundles an [`EditorContext`] with
//!   the platform terminal

// Re-export core and io crates
pub use linekit_core::*;
pub use linekit_io::{
    create_mock_terminal, create_terminal, init_debug_logging, KeyParser, MockConsole,
    ParserState,
};

#[cfg(unix)]
pub use linekit_io::UnixTerminal;

pub mod line_editor;
pub mod prelude;

pub use line_editor::{BuildError, LineEditor, LineEditorBuilder};
