//! Linekit Core Library
//!
//! An Emacs-style single-line editor that draws with nothing but printable
//! characters, backspace and the bell. Lines wider than the screen scroll
//! horizontally inside a fixed window, with `$` marking hidden text.
//!
//! The pieces are usable on their own ([`LineBuffer`], [`KillRing`],
//! [`HistoryStore`], [`Viewport`]) or together through an
//! [`EditorContext`], which reads one line at a time from any [`Terminal`].
//! Platform terminals live in the `linekit-io` crate.

pub mod buffer;
pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod history;
pub mod hooks;
pub mod key;
pub mod kill_ring;
pub mod search;
pub mod viewport;
pub mod width;

mod session;

// Re-export commonly used types for convenience
pub use buffer::{CapacityError, Change, CursorTarget, Direction, Edit, LineBuffer};
pub use config::{EditorConfig, DEFAULT_SCREEN_WIDTH, MIN_SCREEN_WIDTH};
pub use console::{
    default_signal_for, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard,
    SignalBridge, Terminal, TerminalSignal,
};
pub use editor::EditorContext;
pub use error::{ConfigError, EditError, EditResult};
pub use history::HistoryStore;
pub use hooks::{expand_tab, CommitHook, DisplayHook, Hooks, TabHook};
pub use key::{Key, KeyEvent};
pub use kill_ring::KillRing;
pub use search::{SearchDirection, SearchState};
pub use viewport::{Viewport, ViewportState};
pub use width::{ansi_aware_width, char_count_width, unicode_display_width, WidthFn};
