// Shared helpers for the linekit-core integration tests: a scripted terminal
// and a small emulator that replays the editor's output onto screen rows.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use linekit_core::{
    ConsoleInput, ConsoleOutput, ConsoleResult, Key, KeyEvent, RawModeGuard, SignalBridge,
    TerminalSignal,
};

/// Interprets printable characters, backspace, bell and newline.
///
/// Rows are unbounded in width so that drawing past the screen edge shows up
/// in assertions instead of being hidden by wrapping.
#[derive(Debug, Default)]
pub struct LineEmulator {
    rows: Vec<Vec<char>>,
    column: usize,
    bells: usize,
}

impl LineEmulator {
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new()],
            column: 0,
            bells: 0,
        }
    }

    pub fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\x08' => self.column = self.column.saturating_sub(1),
                '\x07' => self.bells += 1,
                '\n' => {
                    self.rows.push(Vec::new());
                    self.column = 0;
                }
                '\r' => self.column = 0,
                ch => {
                    let row = self.rows.last_mut().expect("emulator always has a row");
                    if row.len() <= self.column {
                        row.resize(self.column + 1, ' ');
                    }
                    row[self.column] = ch;
                    self.column += 1;
                }
            }
        }
    }

    /// The row the cursor is on, trailing blanks trimmed.
    pub fn line(&self) -> String {
        self.row(self.rows.len() - 1)
    }

    pub fn row(&self, index: usize) -> String {
        let text: String = self.rows[index].iter().collect();
        text.trim_end().to_string()
    }

    pub fn rows(&self) -> Vec<String> {
        (0..self.rows.len()).map(|i| self.row(i)).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn bells(&self) -> usize {
        self.bells
    }
}

/// A terminal fed from a key script.
pub struct ScriptedTerminal {
    keys: VecDeque<KeyEvent>,
    pub output: String,
    pub screen: LineEmulator,
    pub interactive: bool,
    pub raised: Vec<TerminalSignal>,
    raw_mode: Arc<AtomicBool>,
    raw_entries: Arc<AtomicUsize>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            output: String::new(),
            screen: LineEmulator::new(),
            interactive: true,
            raised: Vec::new(),
            raw_mode: Arc::new(AtomicBool::new(false)),
            raw_entries: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_keys(events: Vec<KeyEvent>) -> Self {
        let mut terminal = Self::new();
        terminal.push_keys(events);
        terminal
    }

    pub fn push_keys(&mut self, events: Vec<KeyEvent>) {
        self.keys.extend(events);
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn in_raw_mode(&self) -> bool {
        self.raw_mode.load(Ordering::SeqCst)
    }

    pub fn raw_mode_entries(&self) -> usize {
        self.raw_entries.load(Ordering::SeqCst)
    }
}

impl ConsoleInput for ScriptedTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard> {
        self.raw_mode.store(true, Ordering::SeqCst);
        self.raw_entries.fetch_add(1, Ordering::SeqCst);
        let flag = Arc::clone(&self.raw_mode);
        Ok(RawModeGuard::new(
            move || flag.store(false, Ordering::SeqCst),
            "scripted".to_string(),
        ))
    }

    fn read_key(&mut self) -> ConsoleResult<Option<KeyEvent>> {
        Ok(self.keys.pop_front())
    }
}

impl ConsoleOutput for ScriptedTerminal {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        self.output.push_str(text);
        self.screen.feed(text);
        Ok(())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        Ok(())
    }
}

impl SignalBridge for ScriptedTerminal {
    fn raise(&mut self, signal: TerminalSignal) -> ConsoleResult<()> {
        self.raised.push(signal);
        Ok(())
    }
}

/// One event per character of `text`.
pub fn typed(text: &str) -> Vec<KeyEvent> {
    text.chars().map(KeyEvent::char).collect()
}

pub fn key(key: Key) -> KeyEvent {
    KeyEvent::key(key)
}

/// `text` followed by Enter.
pub fn line(text: &str) -> Vec<KeyEvent> {
    let mut events = typed(text);
    events.push(key(Key::Enter));
    events
}

/// Make control bytes readable in snapshots.
pub fn visible(output: &str) -> String {
    output
        .chars()
        .map(|ch| match ch {
            '\x08' => "<BS>".to_string(),
            '\x07' => "<BEL>".to_string(),
            '\n' => "<NL>".to_string(),
            ' ' => "·".to_string(),
            ch => ch.to_string(),
        })
        .collect()
}
