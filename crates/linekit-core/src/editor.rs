//! The editor context: state that outlives a single `read_line` call.

use std::io;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::config::{validate_screen_width, EditorConfig};
use crate::console::Terminal;
use crate::error::{ConfigError, EditError, EditResult};
use crate::history::HistoryStore;
use crate::hooks::Hooks;
use crate::kill_ring::KillRing;
use crate::session::Session;

/// Configuration, history, kill ring and hooks shared by successive
/// `read_line` calls.
///
/// ```
/// use linekit_core::{EditorConfig, EditorContext};
///
/// let mut editor = EditorContext::new(EditorConfig::default().with_history_dedup(true)).unwrap();
/// editor.add_history("make test");
/// editor.add_history("make test");
/// assert_eq!(editor.history().len(), 1);
/// assert!(editor.set_screen_width(20).is_err());
/// ```
#[derive(Debug)]
pub struct EditorContext {
    pub(crate) config: EditorConfig,
    pub(crate) history: HistoryStore,
    pub(crate) kill_ring: KillRing,
    pub(crate) hooks: Hooks,
}

impl Default for EditorContext {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            history: HistoryStore::new(config.history_capacity, config.history_dedup),
            kill_ring: KillRing::new(),
            hooks: Hooks::new(),
            config,
        }
    }
}

impl EditorContext {
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            history: HistoryStore::new(config.history_capacity, config.history_dedup),
            kill_ring: KillRing::new(),
            hooks: Hooks::new(),
            config,
        })
    }

    /// Edit one line on `terminal` and return it with a trailing newline.
    ///
    /// An empty string means the input ended. The terminal must be
    /// interactive; raw mode is held for the duration of the call and
    /// released on every exit path.
    pub fn read_line(&mut self, prompt: &str, terminal: &mut dyn Terminal) -> EditResult<String> {
        if !terminal.is_interactive() {
            return Err(EditError::NotInteractive);
        }
        let guard = terminal.enable_raw_mode()?;
        debug!("raw mode on ({})", guard.platform_info());
        Session::new(self, terminal, prompt, guard).run()
    }

    /// Append a line to history, subject to the blank-line and dedup rules.
    pub fn add_history(&mut self, line: &str) {
        self.history.commit(line);
    }

    /// Change the terminal width used by later calls. Widths of 20 columns
    /// or fewer are rejected.
    pub fn set_screen_width(&mut self, width: usize) -> Result<(), ConfigError> {
        validate_screen_width(width)?;
        self.config.screen_width = width;
        if self.config.validate().is_err() {
            self.config.scroll_span = None;
        }
        debug!("screen width set to {width}");
        Ok(())
    }

    /// Measure prompts with `width` instead of counting characters.
    pub fn set_width_function<F>(&mut self, width: F)
    where
        F: Fn(&str) -> usize + Send + Sync + 'static,
    {
        self.hooks.set_width_fn(Arc::new(width));
    }

    pub fn set_history_dedup(&mut self, dedup: bool) {
        self.config.history_dedup = dedup;
        self.history.set_dedup(dedup);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn save_history(&self, path: impl AsRef<Path>) -> io::Result<usize> {
        self.history.save(path)
    }

    pub fn load_history(&mut self, path: impl AsRef<Path>) -> io::Result<usize> {
        let count = self.history.load(path)?;
        info!("history holds {} entries", self.history.len());
        Ok(count)
    }
}
