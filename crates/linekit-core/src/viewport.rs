//! Incremental single-line renderer with horizontal scrolling.
//!
//! The renderer never queries the terminal. It remembers which buffer index
//! the terminal cursor sits on, how long the drawn line was and which slice
//! of the line is visible, and moves the cursor only with backspaces and by
//! re-emitting characters already on screen.
//!
//! Lines wider than the space after the prompt scroll in steps of
//! `scroll_span` columns. A `$` in the first column after the prompt marks
//! text hidden on the left, a `$` in the last used column marks text hidden
//! on the right. Once scrolled, the trigger point moves so that small
//! cursor movements near an edge do not flip the window back and forth.

use log::trace;

use crate::buffer::{Change, Edit, LineBuffer};
use crate::console::{ConsoleOutput, ConsoleResult};
use crate::width::WidthFn;

const BELL: char = '\x07';
const BACKSPACE: char = '\x08';

/// Columns always left for the line, however wide the prompt.
const MIN_USABLE_WIDTH: usize = 8;

/// Snapshot of the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub screen_width: usize,
    pub scroll_span: usize,
    /// Columns available to the line after the prompt.
    pub usable_width: usize,
    /// Index of the first visible character.
    pub shift: usize,
    pub off_left: bool,
    pub off_right: bool,
}

pub struct Viewport {
    screen_width: usize,
    scroll_span: usize,
    measure: WidthFn,
    bell: bool,
    width: usize,
    shift: usize,
    off_left: bool,
    off_right: bool,
    /// Buffer index under the terminal cursor.
    pos: usize,
    /// Line length the screen was last drawn for, relative to the prompt.
    drawn_len: isize,
    last_prompt: String,
    last_prompt_width: usize,
}

impl Viewport {
    pub fn new(screen_width: usize, scroll_span: usize, measure: WidthFn) -> Self {
        Self {
            screen_width,
            scroll_span: scroll_span.max(1),
            measure,
            bell: true,
            width: screen_width.max(MIN_USABLE_WIDTH),
            shift: 0,
            off_left: false,
            off_right: false,
            pos: 0,
            drawn_len: 0,
            last_prompt: String::new(),
            last_prompt_width: 0,
        }
    }

    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            screen_width: self.screen_width,
            scroll_span: self.scroll_span,
            usable_width: self.width,
            shift: self.shift,
            off_left: self.off_left,
            off_right: self.off_right,
        }
    }

    pub fn usable_width(&self) -> usize {
        self.width
    }

    pub fn prompt(&self) -> &str {
        &self.last_prompt
    }

    /// Ring the bell on its own.
    pub fn bell<O: ConsoleOutput + ?Sized>(&self, out: &mut O) -> ConsoleResult<()> {
        if self.bell {
            out.write_text("\x07")?;
        }
        Ok(())
    }

    /// Bring the screen in line with `buffer` after `edit`, then commit the
    /// cursor position into the buffer.
    pub fn reconcile<O: ConsoleOutput + ?Sized>(
        &mut self,
        out: &mut O,
        prompt: &str,
        buffer: &mut LineBuffer,
        edit: Edit,
    ) -> ConsoleResult<()> {
        let mut frame = String::new();
        let mut change = edit.change;

        if change == Change::Redraw {
            frame.push_str(prompt);
            self.set_prompt(prompt);
            self.shift = 0;
            self.off_left = false;
            self.off_right = false;
            self.pos = 0;
            self.drawn_len = 0;
            change = Change::From(0);
        } else if prompt != self.last_prompt {
            let old_width = self.last_prompt_width;
            push_backspaces(&mut frame, old_width + self.pos.saturating_sub(self.shift));
            frame.push_str(prompt);
            self.set_prompt(prompt);
            self.drawn_len += old_width as isize - self.last_prompt_width as isize;
            self.pos = self.shift;
            change = Change::From(0);
        }

        let width = self.width as isize;
        let scroll = self.effective_scroll() as isize;
        let shift = self.shift as isize;
        let len = buffer.len() as isize;

        let mut pad = if self.off_right { width - 1 } else { self.drawn_len - shift };
        let mut backup = self.pos as isize - shift;
        self.drawn_len = len;

        if !buffer.place_cursor(edit.cursor) && self.bell {
            frame.push(BELL);
        }
        let cursor = buffer.cursor() as isize;

        let extra = if self.off_right || (self.off_left && cursor < shift + width - scroll / 2) {
            (scroll / 2).max(2)
        } else {
            0
        };
        let mut new_shift = cursor + extra + scroll - width;
        new_shift = if new_shift > 0 { new_shift / scroll * scroll } else { 0 };
        loop {
            let last_column = if len > new_shift + width - 1 { width - 3 } else { width - 1 };
            if cursor - new_shift <= last_column {
                break;
            }
            new_shift += scroll;
        }

        let (left, right, new_right) = if new_shift != shift {
            self.shift = new_shift as usize;
            self.off_left = new_shift > 0;
            self.off_right = len > new_shift + width - 1;
            let right = self.right_edge(new_shift, width, len);
            (new_shift, right, right)
        } else if let Change::From(from) = change {
            let from = (from as isize).min(len);
            let left = if from < shift + self.off_left as isize {
                shift
            } else {
                backup = self.pos as isize - from;
                from
            };
            self.off_right = len > shift + width - 1;
            let right = self.right_edge(shift, width, len);
            let new_right = match edit.extent {
                Some(extent) if right > left + extent as isize => left + extent as isize,
                _ => right,
            };
            (left, right, new_right)
        } else {
            (0, -1, -1)
        };

        let shift = self.shift as isize;
        pad -= if self.off_right { width - 1 } else { len - shift };
        let pad = pad.max(0);

        let mut pos = self.pos as isize;
        if left <= right {
            if backup > 0 {
                push_backspaces(&mut frame, backup as usize);
            } else if backup < 0 {
                frame.push_str(&buffer.slice(pos as usize, left as usize));
            }
            let mut start = left;
            if start == shift && self.off_left {
                frame.push('$');
                start += 1;
            }
            frame.push_str(&buffer.slice(start as usize, new_right.max(start) as usize));
            pos = new_right.max(start);
            if self.off_right && new_right == right {
                frame.push('$');
                pos += 1;
            } else {
                frame.extend(std::iter::repeat(' ').take(pad as usize));
                pos += pad;
            }
        }

        if pos > cursor {
            push_backspaces(&mut frame, (pos - cursor) as usize);
        } else {
            frame.push_str(&buffer.slice(pos as usize, cursor as usize));
        }
        self.pos = cursor as usize;

        trace!(
            "reconcile change={:?} cursor={} shift={} off_left={} off_right={} bytes={}",
            edit.change,
            cursor,
            self.shift,
            self.off_left,
            self.off_right,
            frame.len()
        );

        if frame.is_empty() {
            return Ok(());
        }
        out.write_text(&frame)?;
        out.flush()
    }

    fn right_edge(&self, shift: isize, width: isize, len: isize) -> isize {
        if self.off_right {
            shift + width - 2
        } else {
            len
        }
    }

    /// The scroll step, reduced when a wide prompt leaves little room.
    fn effective_scroll(&self) -> usize {
        self.scroll_span.min(self.width / 2).max(1)
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.last_prompt = prompt.to_string();
        self.last_prompt_width = (self.measure)(prompt);
        self.width = self
            .screen_width
            .saturating_sub(self.last_prompt_width)
            .max(MIN_USABLE_WIDTH);
    }
}

fn push_backspaces(frame: &mut String, count: usize) {
    frame.extend(std::iter::repeat(BACKSPACE).take(count));
}
