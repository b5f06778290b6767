//! Incremental history search.
//!
//! While searching, the prompt shows the pattern followed by `"? "`. Each
//! typed character narrows the pattern: if the line on screen still contains
//! it the cursor jumps to the match, otherwise history is walked in the
//! search direction until an entry matches or the walk runs out.

use log::debug;

use crate::buffer::{CursorTarget, Edit};
use crate::error::EditResult;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Backward,
    Forward,
}

/// Pattern, direction and anchor of an active search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pattern: Vec<char>,
    direction: SearchDirection,
    /// History slot to return to when the pattern shrinks.
    anchor: usize,
}

impl SearchState {
    pub fn new(direction: SearchDirection, anchor: usize) -> Self {
        Self {
            pattern: Vec::new(),
            direction,
            anchor,
        }
    }

    /// The alternate prompt shown while searching.
    pub fn prompt(&self) -> String {
        format!("{}? ", self.pattern())
    }

    pub fn pattern(&self) -> String {
        self.pattern.iter().collect()
    }

    pub fn pattern_chars(&self) -> &[char] {
        &self.pattern
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: SearchDirection) {
        self.direction = direction;
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: usize) {
        self.anchor = anchor;
    }

    pub fn push(&mut self, ch: char) {
        self.pattern.push(ch);
    }

    /// Drop the last pattern character. `false` if the pattern was empty.
    pub fn pop(&mut self) -> bool {
        self.pattern.pop().is_some()
    }
}

/// Character index of `pattern` in `text`.
fn find_in(text: &str, pattern: &[char]) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    if pattern.is_empty() {
        return Some(0);
    }
    chars
        .windows(pattern.len())
        .position(|window| window == pattern)
}

impl Session<'_> {
    /// Reverse or forward search key.
    ///
    /// Starts a search with an empty pattern, or, when one is already
    /// running, steps to the next match in `direction`.
    pub(crate) fn search_start(&mut self, direction: SearchDirection) -> EditResult<()> {
        if let Some(state) = self.search.as_mut() {
            state.set_direction(direction);
            return self.search_step(true);
        }

        self.ctx.history.reset_nav();
        debug!("search start {direction:?}");
        self.search = Some(SearchState::new(direction, self.ctx.history.nav_cursor()));
        let edit = self.buffer.clear();
        self.apply(edit)
    }

    /// Printable key while searching.
    pub(crate) fn search_add_char(&mut self, ch: char) -> EditResult<()> {
        if let Some(state) = self.search.as_mut() {
            state.push(ch);
        }
        self.search_resolve()
    }

    /// Backspace while searching: shrink the pattern and look again from
    /// the anchor, or leave search mode when the pattern is already empty.
    pub(crate) fn search_backspace(&mut self) -> EditResult<()> {
        let Some(state) = self.search.as_mut() else {
            return Ok(());
        };

        if !state.pop() {
            self.ctx.history.reset_nav();
            self.bell()?;
            return self.search_terminate();
        }

        if state.pattern_chars().is_empty() {
            self.ctx.history.reset_nav();
        } else {
            let anchor = state.anchor();
            self.ctx.history.set_nav(anchor);
        }
        let entry = self.ctx.history.current().to_string();
        if self.buffer.set(&entry).is_err() {
            return Err(self.overflow());
        }
        self.search_resolve()
    }

    /// Leave search mode, keeping whatever line is on screen.
    pub(crate) fn search_terminate(&mut self) -> EditResult<()> {
        if self.search.take().is_none() {
            return Ok(());
        }
        debug!("search end");

        if self.buffer.is_empty() {
            self.ctx.history.reset_nav();
        }
        let cursor = self.buffer.cursor();
        if self.ctx.hooks.has_display_hook() {
            let mut line = self.buffer.text();
            self.ctx.hooks.apply_display(&mut line);
            if self.buffer.set(&line).is_err() {
                return Err(self.overflow());
            }
        }
        self.apply(Edit::changed(0, CursorTarget::At(cursor)))
    }

    /// Show the match in the current line, or go looking through history.
    fn search_resolve(&mut self) -> EditResult<()> {
        let Some(state) = self.search.as_ref() else {
            return Ok(());
        };
        match self.buffer.find(state.pattern_chars()) {
            Some(index) => self.apply(Edit::changed(0, CursorTarget::At(index))),
            None => self.search_step(false),
        }
    }

    /// Walk history in the search direction until an entry contains the
    /// pattern. A match found by a direction key becomes the new anchor.
    fn search_step(&mut self, new_search: bool) -> EditResult<()> {
        let Some(state) = self.search.as_ref() else {
            return Ok(());
        };
        if state.pattern_chars().is_empty() {
            return self.bell();
        }
        let pattern = state.pattern_chars().to_vec();
        let direction = state.direction();

        loop {
            let entry = match direction {
                SearchDirection::Backward => self.ctx.history.prev(),
                SearchDirection::Forward => self.ctx.history.next(),
            }
            .filter(|entry| !entry.is_empty())
            .map(str::to_string);

            let Some(entry) = entry else {
                debug!(
                    "search for {:?} hit the end of history",
                    pattern.iter().collect::<String>()
                );
                let edit = self.buffer.clear();
                self.apply(edit)?;
                return self.bell();
            };

            if let Some(index) = find_in(&entry, &pattern) {
                if self.buffer.set(&entry).is_err() {
                    return Err(self.overflow());
                }
                self.apply(Edit::changed(0, CursorTarget::At(index)))?;
                if new_search {
                    let slot = self.ctx.history.nav_cursor();
                    if let Some(state) = self.search.as_mut() {
                        state.set_anchor(slot);
                    }
                }
                return Ok(());
            }
        }
    }
}
