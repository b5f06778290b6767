//! Single-slot kill buffer shared across `read_line` calls.

use crate::buffer::{CapacityError, CursorTarget, Edit, LineBuffer};

/// Holds the most recently killed text. Each kill replaces the slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillRing {
    text: Vec<char>,
}

impl KillRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Move everything from `pos` to the end of the line into the slot.
    ///
    /// `None` (bell) when there is nothing after `pos`; the slot keeps its
    /// previous contents in that case.
    pub fn kill_from(&mut self, buffer: &mut LineBuffer, pos: usize) -> Option<Edit> {
        if pos >= buffer.len() {
            return None;
        }
        self.text = buffer.split_off(pos);
        Some(Edit::changed(pos, CursorTarget::At(pos)))
    }

    /// Insert the slot at `cursor`.
    ///
    /// `Ok(None)` (bell) when the slot is empty; an error when the line
    /// would overflow, in which case the buffer is untouched.
    pub fn yank_into(
        &self,
        buffer: &mut LineBuffer,
        cursor: usize,
    ) -> Result<Option<Edit>, CapacityError> {
        if self.text.is_empty() {
            return Ok(None);
        }
        buffer.insert_str_at(cursor, &self.text).map(Some)
    }
}
