//! One `read_line` call: key dispatch over a line buffer and its viewport.

use log::{debug, trace, warn};

use crate::buffer::{CursorTarget, Direction, Edit, LineBuffer};
use crate::console::{RawModeGuard, Terminal, TerminalSignal};
use crate::editor::EditorContext;
use crate::error::{EditError, EditResult};
use crate::key::{Key, KeyEvent};
use crate::search::{SearchDirection, SearchState};
use crate::viewport::Viewport;

/// Whether the loop keeps reading keys.
pub(crate) enum Flow {
    Continue,
    Done(String),
}

pub(crate) struct Session<'a> {
    pub(crate) ctx: &'a mut EditorContext,
    pub(crate) term: &'a mut dyn Terminal,
    prompt: String,
    pub(crate) buffer: LineBuffer,
    viewport: Viewport,
    pub(crate) search: Option<SearchState>,
    raw_mode: Option<RawModeGuard>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        ctx: &'a mut EditorContext,
        term: &'a mut dyn Terminal,
        prompt: &str,
        raw_mode: RawModeGuard,
    ) -> Self {
        let config = &ctx.config;
        let viewport = Viewport::new(
            config.screen_width,
            config.effective_scroll_span(),
            ctx.hooks.width_fn(),
        )
        .with_bell(config.bell);
        let buffer = LineBuffer::new(config.max_line_length);
        Self {
            ctx,
            term,
            prompt: prompt.to_string(),
            buffer,
            viewport,
            search: None,
            raw_mode: Some(raw_mode),
        }
    }

    /// Read keys until the line is committed or input ends.
    pub(crate) fn run(mut self) -> EditResult<String> {
        debug!("read_line start prompt={:?}", self.prompt);
        self.start_line()?;

        loop {
            let Some(event) = self.term.read_key()? else {
                let line = self.end_of_input()?;
                self.release_raw_mode()?;
                return Ok(line);
            };
            if let Flow::Done(line) = self.handle(event)? {
                debug!("read_line done len={}", line.len());
                self.release_raw_mode()?;
                return Ok(line);
            }
        }
    }

    fn start_line(&mut self) -> EditResult<()> {
        self.ctx.history.reset_nav();
        if self.ctx.hooks.has_display_hook() {
            let mut line = String::new();
            self.ctx.hooks.apply_display(&mut line);
            if self.buffer.set(&line).is_err() {
                return Err(self.overflow());
            }
        }
        self.apply(Edit::redraw(CursorTarget::End))
    }

    pub(crate) fn handle(&mut self, event: KeyEvent) -> EditResult<Flow> {
        if let Some(chars) = event.printable_chars() {
            for ch in chars {
                self.insert_char(ch)?;
            }
            return Ok(Flow::Continue);
        }

        if self.search.is_some() {
            match event.key {
                Key::Escape | Key::ControlN | Key::ControlP | Key::Up | Key::Down => {
                    self.search_terminate()?;
                    return Ok(Flow::Continue);
                }
                Key::Backspace | Key::ControlH => {
                    self.search_backspace()?;
                    return Ok(Flow::Continue);
                }
                Key::ControlR | Key::ControlS => {}
                _ => self.search_terminate()?,
            }
        }

        self.dispatch(event.key)
    }

    fn dispatch(&mut self, key: Key) -> EditResult<Flow> {
        trace!("dispatch {key:?}");
        match key {
            Key::Enter | Key::ControlJ => return self.commit().map(Flow::Done),
            Key::ControlD if self.buffer.is_empty() => {
                return self.end_of_input().map(Flow::Done);
            }
            Key::ControlD | Key::Delete => self.delete(Direction::Here)?,
            Key::Backspace | Key::ControlH => self.delete(Direction::Left)?,
            Key::ControlA | Key::Home => self.apply(Edit::moved(CursorTarget::At(0)))?,
            Key::ControlE | Key::End => self.apply(Edit::moved(CursorTarget::End))?,
            Key::ControlB | Key::Left => self.apply(Edit::moved(CursorTarget::Left))?,
            Key::ControlF | Key::Right => self.apply(Edit::moved(CursorTarget::Right))?,
            Key::MetaF | Key::ControlRight => {
                let target = self.buffer.next_word_start();
                self.move_word(target)?;
            }
            Key::MetaB | Key::ControlLeft => {
                let target = self.buffer.prev_word_start();
                self.move_word(target)?;
            }
            Key::ControlC => self.cancel_line()?,
            Key::ControlK => {
                let cursor = self.buffer.cursor();
                self.kill(cursor)?;
            }
            Key::ControlU => self.kill(0)?,
            Key::ControlY => self.yank()?,
            Key::ControlT => self.transpose()?,
            Key::ControlO | Key::Insert => {
                let overwrite = self.buffer.toggle_overwrite();
                debug!("overwrite mode {overwrite}");
            }
            Key::ControlL => self.redraw()?,
            Key::ControlP | Key::Up => self.history_prev()?,
            Key::ControlN | Key::Down => self.history_next()?,
            Key::ControlR => self.search_start(SearchDirection::Backward)?,
            Key::ControlS => self.search_start(SearchDirection::Forward)?,
            Key::Tab => self.tab()?,
            Key::Ignore => {}
            other => match self.term.signal_for(other) {
                Some(signal) => return self.deliver_signal(signal),
                None => self.bell()?,
            },
        }
        Ok(Flow::Continue)
    }

    /// The prompt currently on screen.
    fn current_prompt(&self) -> String {
        match &self.search {
            Some(state) => state.prompt(),
            None => self.prompt.clone(),
        }
    }

    /// Render `edit` and commit the cursor.
    pub(crate) fn apply(&mut self, edit: Edit) -> EditResult<()> {
        let prompt = self.current_prompt();
        self.viewport
            .reconcile(&mut *self.term, &prompt, &mut self.buffer, edit)?;
        Ok(())
    }

    pub(crate) fn bell(&mut self) -> EditResult<()> {
        self.viewport.bell(&mut *self.term)?;
        self.term.flush()?;
        Ok(())
    }

    /// Abort the call because the line no longer fits.
    pub(crate) fn overflow(&mut self) -> EditError {
        let capacity = self.buffer.limit();
        warn!("input buffer overflow at {capacity} characters");
        if let Err(err) = self
            .term
            .write_text("\n")
            .and_then(|()| self.term.flush())
        {
            debug!("failed to finish the line after overflow: {err}");
        }
        EditError::Overflow {
            partial: format!("{}\n", self.buffer.text()),
            capacity,
        }
    }

    fn insert_char(&mut self, ch: char) -> EditResult<()> {
        if self.search.is_some() {
            return self.search_add_char(ch);
        }
        match self.buffer.insert_at(self.buffer.cursor(), ch) {
            Some(edit) => self.apply(edit),
            None => self.bell(),
        }
    }

    fn delete(&mut self, direction: Direction) -> EditResult<()> {
        match self.buffer.delete_at(self.buffer.cursor(), direction) {
            Some(edit) => self.apply(edit),
            None => self.bell(),
        }
    }

    fn move_word(&mut self, target: usize) -> EditResult<()> {
        if target == self.buffer.cursor() {
            return self.bell();
        }
        self.apply(Edit::moved(CursorTarget::At(target)))
    }

    fn kill(&mut self, pos: usize) -> EditResult<()> {
        match self.ctx.kill_ring.kill_from(&mut self.buffer, pos) {
            Some(edit) => self.apply(edit),
            None => self.bell(),
        }
    }

    fn yank(&mut self) -> EditResult<()> {
        let cursor = self.buffer.cursor();
        match self.ctx.kill_ring.yank_into(&mut self.buffer, cursor) {
            Ok(Some(edit)) => self.apply(edit),
            Ok(None) => self.bell(),
            Err(_) => Err(self.overflow()),
        }
    }

    fn transpose(&mut self) -> EditResult<()> {
        match self.buffer.transpose_at(self.buffer.cursor()) {
            Some(edit) => self.apply(edit),
            None => self.bell(),
        }
    }

    fn tab(&mut self) -> EditResult<()> {
        let mut line = self.buffer.text();
        let before = self.buffer.cursor();
        let mut cursor = before;
        let prompt_width = (self.ctx.hooks.width_fn())(&self.prompt);

        match self.ctx.hooks.apply_tab(&mut line, prompt_width, &mut cursor) {
            // A rewrite that does not fit is rejected like any other insert.
            Some(from) => match self.buffer.set(&line) {
                Ok(_) => self.apply(Edit::changed(from, CursorTarget::At(cursor))),
                Err(_) => self.bell(),
            },
            None if cursor != before => self.apply(Edit::moved(CursorTarget::At(cursor))),
            None => Ok(()),
        }
    }

    /// Echo `^C`, kill the whole line and start over on a fresh line.
    fn cancel_line(&mut self) -> EditResult<()> {
        self.apply(Edit::moved(CursorTarget::End))?;
        self.term.write_text("^C\n")?;
        self.ctx.kill_ring.kill_from(&mut self.buffer, 0);
        self.ctx.history.reset_nav();
        self.apply(Edit::redraw(CursorTarget::At(0)))
    }

    fn redraw(&mut self) -> EditResult<()> {
        self.term.write_text("\n")?;
        let cursor = self.buffer.cursor();
        self.apply(Edit::redraw(CursorTarget::At(cursor)))
    }

    fn history_prev(&mut self) -> EditResult<()> {
        match self.ctx.history.prev().map(str::to_string) {
            Some(entry) => self.load_line(&entry),
            None => self.bell(),
        }
    }

    fn history_next(&mut self) -> EditResult<()> {
        match self.ctx.history.next().map(str::to_string) {
            Some(entry) => self.load_line(&entry),
            None => self.bell(),
        }
    }

    /// Replace the line with a history entry, cursor at the end.
    fn load_line(&mut self, entry: &str) -> EditResult<()> {
        let mut line = entry.to_string();
        self.ctx.hooks.apply_display(&mut line);
        if self.buffer.set(&line).is_err() {
            return Err(self.overflow());
        }
        self.apply(Edit::changed(0, CursorTarget::End))
    }

    /// Finish the line: run the commit hook, scroll back towards the start
    /// and record the line in history.
    fn commit(&mut self) -> EditResult<String> {
        let mut line = self.buffer.text();
        let change = match self.ctx.hooks.apply_commit(&mut line) {
            Some(from) => {
                if self.buffer.set(&line).is_err() {
                    return Err(self.overflow());
                }
                from
            }
            None => self.buffer.len(),
        };

        let loc = self
            .viewport
            .usable_width()
            .saturating_sub(5)
            .min(self.buffer.len());
        self.apply(Edit::changed(change, CursorTarget::At(loc)))?;
        self.term.write_text("\n")?;
        self.term.flush()?;

        let line = self.buffer.text();
        if self.ctx.history.commit(&line) {
            trace!("history entry added");
        }
        Ok(format!("{line}\n"))
    }

    /// `^D` on an empty line, or the key source ran dry.
    fn end_of_input(&mut self) -> EditResult<String> {
        if !self.buffer.is_empty() {
            debug!("input ended with a pending line, committing it");
            return self.commit();
        }
        debug!("end of input");
        self.term.write_text("\n")?;
        self.term.flush()?;
        Ok(String::new())
    }

    fn deliver_signal(&mut self, signal: TerminalSignal) -> EditResult<Flow> {
        match signal {
            TerminalSignal::Suspend => {
                debug!("suspending");
                self.release_raw_mode()?;
                self.term.raise(signal)?;
                self.raw_mode = Some(self.term.enable_raw_mode()?);
                self.term.write_text("\n")?;
                let cursor = self.buffer.cursor();
                self.apply(Edit::redraw(CursorTarget::At(cursor)))?;
                Ok(Flow::Continue)
            }
            TerminalSignal::Interrupt | TerminalSignal::Quit => {
                warn!("read_line aborted by {signal}");
                self.term.write_text("\n")?;
                self.term.flush()?;
                self.release_raw_mode()?;
                self.term.raise(signal)?;
                Err(EditError::Interrupted(signal))
            }
        }
    }

    fn release_raw_mode(&mut self) -> EditResult<()> {
        if let Some(guard) = self.raw_mode.take() {
            guard.restore()?;
        }
        Ok(())
    }
}
