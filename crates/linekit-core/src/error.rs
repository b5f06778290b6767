//! Error types for line reading and editor configuration.
//!
//! Per-keystroke rejections (cursor already at an edge, nothing to delete,
//! no search match) are not errors: the editor rings the bell and carries
//! on. Only conditions that end a `read_line` call surface here.

use thiserror::Error;

use crate::console::{ConsoleError, TerminalSignal};

/// Errors that end a `read_line` call.
#[derive(Debug, Error)]
pub enum EditError {
    /// Input or output is not attached to a terminal.
    #[error("not interactive: stdin and stdout must be terminals")]
    NotInteractive,

    /// The line grew past the configured maximum length.
    ///
    /// `partial` holds what had been typed, followed by a newline.
    #[error("input buffer overflow (limit {capacity} characters)")]
    Overflow { partial: String, capacity: usize },

    /// A terminal signal key aborted the call.
    #[error("interrupted by {0}")]
    Interrupted(TerminalSignal),

    /// The terminal backend failed.
    #[error("console error: {0}")]
    Console(#[from] ConsoleError),
}

impl EditError {
    /// The partially edited line carried by an overflow, if any.
    pub fn partial_line(&self) -> Option<&str> {
        match self {
            EditError::Overflow { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Result type for line editing operations
pub type EditResult<T> = Result<T, EditError>;

/// Rejected editor configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("screen width must be greater than {min}, got {width}")]
    ScreenWidthTooSmall { width: usize, min: usize },

    #[error("scroll span {span} is out of range for screen width {screen_width}")]
    InvalidScrollSpan { span: usize, screen_width: usize },

    #[error("max line length must be at least {min}, got {length}")]
    LineLengthTooSmall { length: usize, min: usize },

    #[error("history capacity must be at least {min}, got {capacity}")]
    HistoryCapacityTooSmall { capacity: usize, min: usize },

    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidEnvironment { name: String, value: String },
}
