//! Terminal backends for linekit.
//!
//! Provides the platform side of the editor's collaborator traits:
//! - [`UnixTerminal`]: termios raw mode, blocking key reads, `\r\n` output
//!   and signal delivery via `raise(3)`
//! - [`MockConsole`]: scripted keys and captured output for tests
//! - [`KeyParser`]: the byte-to-key decoder the Unix backend uses

// Re-export core types and traits
pub use linekit_core::{
    ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, Key, KeyEvent, RawModeGuard,
    SignalBridge, Terminal, TerminalSignal,
};

pub mod debug;
pub mod key_parser;
pub mod mock;

#[cfg(unix)]
pub mod unix;

pub use debug::init_debug_logging;
pub use key_parser::{KeyParser, ParserState};
pub use mock::MockConsole;

#[cfg(unix)]
pub use unix::UnixTerminal;

/// Create the terminal for the current platform
pub fn create_terminal() -> ConsoleResult<Box<dyn Terminal>> {
    #[cfg(unix)]
    {
        let terminal = unix::UnixTerminal::new()?;
        Ok(Box::new(terminal))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "terminal".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create a mock terminal for testing
pub fn create_mock_terminal() -> MockConsole {
    MockConsole::new()
}
