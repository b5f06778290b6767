//! The editable line: characters, cursor and overwrite mode.
//!
//! Mutations never move the cursor themselves. Each one returns an [`Edit`]
//! describing which part of the line changed and where the cursor should
//! go; the [`Viewport`](crate::Viewport) consumes it, redraws the dirty part
//! of the screen and then commits the cursor with
//! [`LineBuffer::place_cursor`]. A rejected command returns `None` and the
//! caller rings the bell.

use thiserror::Error;

/// Slots reserved past the last character (newline and terminator).
pub const RESERVED_SLOTS: usize = 2;

/// Which part of the line needs redrawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Contents unchanged; only the cursor moves.
    None,
    /// Characters from this index onward may differ from the screen.
    From(usize),
    /// The terminal cursor is at column 0 of a fresh line: draw the prompt
    /// and the whole line.
    Redraw,
}

/// Where the cursor should end up after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTarget {
    /// An absolute index; past the end rings the bell and clamps.
    At(usize),
    /// One step left; rings the bell at the start.
    Left,
    /// One step right; rings the bell at the end.
    Right,
    /// The end of the line, silently.
    End,
}

/// Result of a buffer operation, consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub change: Change,
    pub cursor: CursorTarget,
    /// Only this many characters from the change point need redrawing.
    pub extent: Option<usize>,
}

impl Edit {
    /// A cursor move with no content change.
    pub fn moved(cursor: CursorTarget) -> Self {
        Self {
            change: Change::None,
            cursor,
            extent: None,
        }
    }

    /// Contents changed from `from` onward.
    pub fn changed(from: usize, cursor: CursorTarget) -> Self {
        Self {
            change: Change::From(from),
            cursor,
            extent: None,
        }
    }

    /// Start a fresh line with the cursor at `cursor`.
    pub fn redraw(cursor: CursorTarget) -> Self {
        Self {
            change: Change::Redraw,
            cursor,
            extent: None,
        }
    }

    pub fn with_extent(mut self, extent: usize) -> Self {
        self.extent = Some(extent);
        self
    }
}

/// Which side of the cursor a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The character before the cursor (backspace).
    Left,
    /// The character under the cursor.
    Here,
}

/// The line would not fit in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("line would exceed {limit} characters")]
pub struct CapacityError {
    pub limit: usize,
}

/// A bounded single line of text with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    chars: Vec<char>,
    capacity: usize,
    cursor: usize,
    overwrite: bool,
}

impl LineBuffer {
    /// An empty line with room for `capacity - 2` characters.
    pub fn new(capacity: usize) -> Self {
        Self {
            chars: Vec::new(),
            capacity: capacity.max(RESERVED_SLOTS + 1),
            cursor: 0,
            overwrite: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Maximum number of characters the line can hold.
    pub fn limit(&self) -> usize {
        self.capacity - RESERVED_SLOTS
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Text of `range`, clamped to the line.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// Flip overwrite mode, returning the new state.
    pub fn toggle_overwrite(&mut self) -> bool {
        self.overwrite = !self.overwrite;
        self.overwrite
    }

    /// Resolve `target` against the current cursor and move there.
    ///
    /// Returns `false` when the target was out of range (the caller rings
    /// the bell); the cursor is still clamped into `[0, len]`.
    pub fn place_cursor(&mut self, target: CursorTarget) -> bool {
        let len = self.chars.len();
        let current = self.cursor.min(len);
        let (cursor, in_range) = match target {
            CursorTarget::At(pos) if pos > len => (len, false),
            CursorTarget::At(pos) => (pos, true),
            CursorTarget::Left if current == 0 => (0, false),
            CursorTarget::Left => (current - 1, true),
            CursorTarget::Right if current >= len => (len, false),
            CursorTarget::Right => (current + 1, true),
            CursorTarget::End => (len, true),
        };
        self.cursor = cursor;
        in_range
    }

    /// Insert `ch` at `pos`, or replace the character there in overwrite
    /// mode. `None` when the line is full.
    pub fn insert_at(&mut self, pos: usize, ch: char) -> Option<Edit> {
        let pos = pos.min(self.chars.len());
        if self.overwrite && pos < self.chars.len() {
            self.chars[pos] = ch;
            return Some(Edit::changed(pos, CursorTarget::At(pos + 1)).with_extent(1));
        }
        if self.chars.len() >= self.limit() {
            return None;
        }
        self.chars.insert(pos, ch);
        Some(Edit::changed(pos, CursorTarget::At(pos + 1)))
    }

    /// Insert `text` at `pos` following the overwrite mode.
    ///
    /// Fails without touching the line if the result would not fit.
    pub fn insert_str_at(&mut self, pos: usize, text: &[char]) -> Result<Edit, CapacityError> {
        let pos = pos.min(self.chars.len());
        let end = pos + text.len();

        if self.overwrite {
            if end > self.chars.len() {
                return self
                    .replace_suffix(pos, text)
                    .map(|edit| edit.with_extent(text.len()));
            }
            self.chars[pos..end].copy_from_slice(text);
            return Ok(Edit::changed(pos, CursorTarget::At(end)).with_extent(text.len()));
        }

        if self.chars.len() + text.len() > self.limit() {
            return Err(CapacityError { limit: self.limit() });
        }
        self.chars.splice(pos..pos, text.iter().copied());
        Ok(Edit::changed(pos, CursorTarget::At(end)))
    }

    /// Delete one character on the given side of `pos`.
    pub fn delete_at(&mut self, pos: usize, direction: Direction) -> Option<Edit> {
        let index = match direction {
            Direction::Left if pos > 0 && pos <= self.chars.len() => pos - 1,
            Direction::Here if pos < self.chars.len() => pos,
            _ => return None,
        };
        self.chars.remove(index);
        Some(Edit::changed(index, CursorTarget::At(index)))
    }

    /// Replace everything from `from` onward with `text`.
    pub fn replace_suffix(&mut self, from: usize, text: &[char]) -> Result<Edit, CapacityError> {
        let from = from.min(self.chars.len());
        if from + text.len() > self.limit() {
            return Err(CapacityError { limit: self.limit() });
        }
        self.chars.truncate(from);
        self.chars.extend(text.iter().copied());
        Ok(Edit::changed(from, CursorTarget::At(from + text.len())))
    }

    /// Swap the characters either side of `pos`.
    pub fn transpose_at(&mut self, pos: usize) -> Option<Edit> {
        if pos == 0 || pos >= self.chars.len() {
            return None;
        }
        self.chars.swap(pos - 1, pos);
        Some(Edit::changed(pos - 1, CursorTarget::At(pos)).with_extent(2))
    }

    /// Replace the whole line. Control characters are dropped.
    pub fn set(&mut self, text: &str) -> Result<Edit, CapacityError> {
        let chars: Vec<char> = text.chars().filter(|c| !c.is_control()).collect();
        self.replace_suffix(0, &chars)?;
        Ok(Edit::changed(0, CursorTarget::End))
    }

    pub fn clear(&mut self) -> Edit {
        self.chars.clear();
        self.cursor = 0;
        Edit::changed(0, CursorTarget::At(0))
    }

    /// Remove and return everything from `pos` onward.
    pub fn split_off(&mut self, pos: usize) -> Vec<char> {
        let pos = pos.min(self.chars.len());
        let tail = self.chars.split_off(pos);
        self.cursor = self.cursor.min(pos);
        tail
    }

    /// Index of the first occurrence of `pattern`.
    pub fn find(&self, pattern: &[char]) -> Option<usize> {
        if pattern.is_empty() {
            return Some(0);
        }
        self.chars
            .windows(pattern.len())
            .position(|window| window == pattern)
    }

    /// Start of the next word: skip the rest of this word, then blanks.
    pub fn next_word_start(&self) -> usize {
        let len = self.chars.len();
        let mut pos = self.cursor;
        while pos < len && !self.chars[pos].is_whitespace() {
            pos += 1;
        }
        while pos < len && self.chars[pos].is_whitespace() {
            pos += 1;
        }
        pos
    }

    /// Start of the current or previous word.
    pub fn prev_word_start(&self) -> usize {
        let mut pos = self.cursor.min(self.chars.len());
        if pos > 0 {
            pos -= 1;
        }
        while pos > 0 && self.is_blank(pos) {
            pos -= 1;
        }
        while pos > 0 && !self.is_blank(pos) {
            pos -= 1;
        }
        if pos < self.chars.len() && self.is_blank(pos) {
            pos += 1;
        }
        pos
    }

    fn is_blank(&self, pos: usize) -> bool {
        self.chars.get(pos).is_some_and(|c| c.is_whitespace())
    }
}
