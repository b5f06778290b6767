//! Terminal collaborator traits: key source, writer, raw mode and signals.
//!
//! The editor never talks to a terminal directly. A backend (see the
//! `linekit-io` crate) implements these traits; anything implementing all
//! three of [`ConsoleInput`], [`ConsoleOutput`] and [`SignalBridge`] is a
//! [`Terminal`] and can drive a `read_line` call.

use std::fmt;

use thiserror::Error;

use crate::key::{Key, KeyEvent};

/// Blocking key source with scoped raw-mode control.
pub trait ConsoleInput {
    /// Whether both ends of the session are attached to a terminal.
    fn is_interactive(&self) -> bool;

    /// Enter raw mode; the returned guard restores the previous mode when
    /// dropped.
    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard>;

    /// Block until the next key. `Ok(None)` means end of input.
    fn read_key(&mut self) -> ConsoleResult<Option<KeyEvent>>;
}

/// Raw text sink. Newline translation is the implementor's job.
pub trait ConsoleOutput {
    /// Write text at the current cursor position
    fn write_text(&mut self, text: &str) -> ConsoleResult<()>;

    /// Flush buffered output to the terminal
    fn flush(&mut self) -> ConsoleResult<()>;
}

/// Terminal signals the editor can forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalSignal {
    Interrupt,
    Quit,
    Suspend,
}

impl fmt::Display for TerminalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalSignal::Interrupt => write!(f, "interrupt"),
            TerminalSignal::Quit => write!(f, "quit"),
            TerminalSignal::Suspend => write!(f, "suspend"),
        }
    }
}

/// Maps keys to terminal signals and delivers them.
///
/// Raw mode turns off the terminal's own signal generation, so signal keys
/// reach the editor as ordinary control keys and are handed back here.
pub trait SignalBridge {
    /// The signal a key stands for, if any.
    fn signal_for(&self, key: Key) -> Option<TerminalSignal> {
        default_signal_for(key)
    }

    /// Deliver `signal` to the process. Called with raw mode released.
    fn raise(&mut self, signal: TerminalSignal) -> ConsoleResult<()>;
}

/// `^\` quits and `^Z` suspends. `^C` is an editing command (kill line).
pub fn default_signal_for(key: Key) -> Option<TerminalSignal> {
    match key {
        Key::ControlBackslash => Some(TerminalSignal::Quit),
        Key::ControlZ => Some(TerminalSignal::Suspend),
        _ => None,
    }
}

/// Everything a `read_line` call needs from its environment.
pub trait Terminal: ConsoleInput + ConsoleOutput + SignalBridge {}

impl<T: ConsoleInput + ConsoleOutput + SignalBridge + ?Sized> Terminal for T {}

/// RAII guard for terminal raw mode
pub struct RawModeGuard {
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
    platform_info: String,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F, platform_info: String) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            platform_info,
        }
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    pub fn is_active(&self) -> bool {
        self.restore_fn.is_some()
    }

    /// Restore terminal mode now instead of on drop.
    pub fn restore(mut self) -> ConsoleResult<()> {
        match self.restore_fn.take() {
            Some(restore_fn) => {
                restore_fn();
                Ok(())
            }
            None => Err(ConsoleError::TerminalError("Already restored".to_string())),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

impl fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("platform_info", &self.platform_info)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Console operation errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Platform I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Terminal setup/teardown error
    #[error("Terminal error: {0}")]
    TerminalError(String),

    /// Feature not supported on this platform
    #[error("Feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_guard_restores_once_on_drop() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&restored);
        {
            let guard = RawModeGuard::new(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                "test".to_string(),
            );
            assert!(guard.is_active());
            assert_eq!(guard.platform_info(), "test");
        }
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_manual_restore() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&restored);
        let guard = RawModeGuard::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            "test".to_string(),
        );
        guard.restore().unwrap();
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_signal_keys() {
        assert_eq!(default_signal_for(Key::ControlZ), Some(TerminalSignal::Suspend));
        assert_eq!(default_signal_for(Key::ControlBackslash), Some(TerminalSignal::Quit));
        assert_eq!(default_signal_for(Key::ControlC), None);
        assert_eq!(TerminalSignal::Interrupt.to_string(), "interrupt");
    }
}
