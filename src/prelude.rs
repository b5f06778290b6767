//! Convenient re-exports for common use cases
//!
//! ```rust
//! use linekit::prelude::*;
//!
//! let editor = LineEditor::builder()
//!     .with_terminal(Box::new(MockConsole::new()))
//!     .build()
//!     .unwrap();
//! assert_eq!(editor.context().config().screen_width, 80);
//! ```

pub use linekit_core::{
    ConfigError, ConsoleError, EditError, EditResult, EditorConfig, EditorContext, HistoryStore,
    Hooks, Key, KeyEvent, Terminal, TerminalSignal,
};
pub use linekit_io::{init_debug_logging, MockConsole};

pub use crate::line_editor::{BuildError, LineEditor, LineEditorBuilder};
