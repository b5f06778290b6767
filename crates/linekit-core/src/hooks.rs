//! Optional callbacks that customise a line editor.
//!
//! Each slot has a fixed signature. Hooks see the line as a `String` and
//! positions as character indices.

use std::fmt;

use crate::width::{default_width_fn, WidthFn};

/// Rewrites the line before it is shown: at the start of a read, after a
/// history entry is loaded and when a search ends.
pub type DisplayHook = Box<dyn FnMut(&mut String) + Send>;

/// Rewrites the committed line. Returns the index from which the text
/// changed, or `None` if it is unchanged.
pub type CommitHook = Box<dyn FnMut(&mut String) -> Option<usize> + Send>;

/// Handles the Tab key. Receives the line, the prompt width and the cursor
/// (which it may move), and returns the index from which the line changed.
pub type TabHook = Box<dyn FnMut(&mut String, usize, &mut usize) -> Option<usize> + Send>;

/// Tab stops every this many columns.
pub const TAB_WIDTH: usize = 8;

/// The hook slots of an editor context.
pub struct Hooks {
    display: Option<DisplayHook>,
    commit: Option<CommitHook>,
    tab: Option<TabHook>,
    width: WidthFn,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            display: None,
            commit: None,
            tab: Some(Box::new(expand_tab)),
            width: default_width_fn(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("display", &self.display.is_some())
            .field("commit", &self.commit.is_some())
            .field("tab", &self.tab.is_some())
            .finish_non_exhaustive()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_display_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut String) + Send + 'static,
    {
        self.display = Some(Box::new(hook));
    }

    pub fn set_commit_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut String) -> Option<usize> + Send + 'static,
    {
        self.commit = Some(Box::new(hook));
    }

    pub fn set_tab_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut String, usize, &mut usize) -> Option<usize> + Send + 'static,
    {
        self.tab = Some(Box::new(hook));
    }

    /// Make Tab a no-op.
    pub fn clear_tab_hook(&mut self) {
        self.tab = None;
    }

    pub fn set_width_fn(&mut self, width: WidthFn) {
        self.width = width;
    }

    pub fn width_fn(&self) -> WidthFn {
        self.width.clone()
    }

    pub fn has_display_hook(&self) -> bool {
        self.display.is_some()
    }

    /// Run the display hook, if any.
    pub fn apply_display(&mut self, line: &mut String) {
        if let Some(hook) = self.display.as_mut() {
            hook(line);
        }
    }

    /// Run the commit hook. `None` when there is no hook or nothing changed.
    pub fn apply_commit(&mut self, line: &mut String) -> Option<usize> {
        self.commit.as_mut().and_then(|hook| hook(line))
    }

    /// Run the tab hook. `None` when Tab is unbound or nothing changed.
    pub fn apply_tab(&mut self, line: &mut String, prompt_width: usize, cursor: &mut usize) -> Option<usize> {
        self.tab
            .as_mut()
            .and_then(|hook| hook(line, prompt_width, cursor))
    }
}

/// Insert spaces up to the next tab stop, counting the prompt's columns.
pub fn expand_tab(line: &mut String, prompt_width: usize, cursor: &mut usize) -> Option<usize> {
    let at = *cursor;
    let count = TAB_WIDTH - (prompt_width + at) % TAB_WIDTH;
    let byte = line.char_indices().nth(at).map_or(line.len(), |(i, _)| i);
    line.insert_str(byte, &" ".repeat(count));
    *cursor = at + count;
    Some(at)
}
