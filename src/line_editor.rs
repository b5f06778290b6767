//! High-level line editor with builder pattern
//!
//! [`LineEditor`] owns an [`EditorContext`] together with the terminal it
//! reads from, so an application only has to pick a prompt.
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```no_run
//! use linekit::prelude::*;
//!
//! let mut editor = LineEditor::builder()
//!     .build()
//!     .expect("Failed to create line editor");
//! let line = editor.read_line("$ ").expect("read failed");
//! ```
//!
//! ## With a persistent history and hooks
//!
//! ```no_run
//! use linekit::prelude::*;
//!
//! let mut editor = LineEditor::builder()
//!     .with_history_file("/tmp/myapp-history")
//!     .with_commit_hook(|line: &mut String| {
//!         let trimmed = line.trim_end().len();
//!         (trimmed < line.len()).then(|| {
//!             line.truncate(trimmed);
//!             trimmed
//!         })
//!     })
//!     .build()
//!     .expect("Failed to create line editor");
//! ```

use std::io;
use std::path::{Path, PathBuf};

use linekit_core::{ConfigError, ConsoleError, EditResult, EditorConfig, EditorContext, Terminal};
use log::debug;
use thiserror::Error;

/// Why a [`LineEditor`] could not be built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal unavailable: {0}")]
    Console(#[from] ConsoleError),

    #[error("failed to load history from {path}: {source}")]
    History {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A line editor bound to a terminal.
///
/// ```
/// use linekit::prelude::*;
///
/// let console = MockConsole::new();
/// console.queue_text_input("ls");
/// console.queue_key(Key::Enter);
///
/// let mut editor = LineEditor::builder()
///     .with_terminal(Box::new(console.clone()))
///     .build()
///     .unwrap();
/// assert_eq!(editor.read_line("$ ").unwrap(), "ls\n");
/// assert_eq!(console.get_output_string(), "$ ls\n");
/// ```
pub struct LineEditor {
    context: EditorContext,
    terminal: Box<dyn Terminal>,
    history_file: Option<PathBuf>,
}

impl LineEditor {
    pub fn builder() -> LineEditorBuilder {
        LineEditorBuilder::new()
    }

    /// Read one line, including its trailing newline. An empty string
    /// means the input ended.
    pub fn read_line(&mut self, prompt: &str) -> EditResult<String> {
        self.context.read_line(prompt, &mut *self.terminal)
    }

    pub fn add_history(&mut self, line: &str) {
        self.context.add_history(line);
    }

    pub fn set_screen_width(&mut self, width: usize) -> Result<(), ConfigError> {
        self.context.set_screen_width(width)
    }

    pub fn set_width_function<F>(&mut self, width: F)
    where
        F: Fn(&str) -> usize + Send + Sync + 'static,
    {
        self.context.set_width_function(width);
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.context
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    /// Write the history to the configured file. Returns the number of
    /// entries written, or zero when no file is configured.
    pub fn save_history(&self) -> io::Result<usize> {
        match &self.history_file {
            Some(path) => self.context.save_history(path),
            None => Ok(0),
        }
    }
}

type DisplayFn = Box<dyn FnMut(&mut String) + Send>;
type CommitFn = Box<dyn FnMut(&mut String) -> Option<usize> + Send>;
type TabFn = Box<dyn FnMut(&mut String, usize, &mut usize) -> Option<usize> + Send>;

/// Builder for [`LineEditor`].
pub struct LineEditorBuilder {
    config: EditorConfig,
    terminal: Option<Box<dyn Terminal>>,
    history_file: Option<PathBuf>,
    display_hook: Option<DisplayFn>,
    commit_hook: Option<CommitFn>,
    tab_hook: Option<Option<TabFn>>,
}

impl LineEditorBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            terminal: None,
            history_file: None,
            display_hook: None,
            commit_hook: None,
            tab_hook: None,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_screen_width(mut self, width: usize) -> Self {
        self.config.screen_width = width;
        self
    }

    pub fn with_history_dedup(mut self, dedup: bool) -> Self {
        self.config.history_dedup = dedup;
        self
    }

    /// Load history from `path` on build (a missing file is fine) and save
    /// to it with [`LineEditor::save_history`].
    pub fn with_history_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Use `terminal` instead of the platform terminal.
    pub fn with_terminal(mut self, terminal: Box<dyn Terminal>) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn with_display_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut String) + Send + 'static,
    {
        self.display_hook = Some(Box::new(hook));
        self
    }

    pub fn with_commit_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut String) -> Option<usize> + Send + 'static,
    {
        self.commit_hook = Some(Box::new(hook));
        self
    }

    pub fn with_tab_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut String, usize, &mut usize) -> Option<usize> + Send + 'static,
    {
        self.tab_hook = Some(Some(Box::new(hook)));
        self
    }

    /// Make Tab do nothing instead of expanding to the next tab stop.
    pub fn without_tab_hook(mut self) -> Self {
        self.tab_hook = Some(None);
        self
    }

    /// Build the editor. Falls back to the platform terminal when none was
    /// given.
    pub fn build(self) -> Result<LineEditor, BuildError> {
        let mut context = EditorContext::new(self.config)?;

        let hooks = context.hooks_mut();
        if let Some(hook) = self.display_hook {
            hooks.set_display_hook(hook);
        }
        if let Some(hook) = self.commit_hook {
            hooks.set_commit_hook(hook);
        }
        match self.tab_hook {
            Some(Some(hook)) => hooks.set_tab_hook(hook),
            Some(None) => hooks.clear_tab_hook(),
            None => {}
        }

        if let Some(path) = &self.history_file {
            match context.load_history(path) {
                Ok(count) => debug!("loaded {count} history lines from {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("no history file at {}", path.display());
                }
                Err(source) => {
                    return Err(BuildError::History {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }

        let terminal = match self.terminal {
            Some(terminal) => terminal,
            None => linekit_io::create_terminal()?,
        };

        Ok(LineEditor {
            context,
            terminal,
            history_file: self.history_file,
        })
    }
}

impl Default for LineEditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
