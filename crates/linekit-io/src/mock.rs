//! Mock console for testing

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use linekit_core::{
    ConsoleInput, ConsoleOutput, ConsoleResult, Key, KeyEvent, RawModeGuard, SignalBridge,
    TerminalSignal,
};

/// Scripted key input and captured output.
///
/// Clones share the same queue, output and counters, so a test can keep one
/// handle for inspection while the editor owns another.
#[derive(Clone)]
pub struct MockConsole {
    input_queue: Arc<Mutex<VecDeque<KeyEvent>>>,
    output: Arc<Mutex<String>>,
    interactive: Arc<AtomicBool>,
    raw_mode: Arc<AtomicBool>,
    raw_mode_entries: Arc<AtomicUsize>,
    raised: Arc<Mutex<Vec<TerminalSignal>>>,
}

impl Default for MockConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsole {
    pub fn new() -> Self {
        Self {
            input_queue: Arc::new(Mutex::new(VecDeque::new())),
            output: Arc::new(Mutex::new(String::new())),
            interactive: Arc::new(AtomicBool::new(true)),
            raw_mode: Arc::new(AtomicBool::new(false)),
            raw_mode_entries: Arc::new(AtomicUsize::new(0)),
            raised: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a key event for testing
    pub fn queue_key_event(&self, event: KeyEvent) {
        if let Ok(mut queue) = self.input_queue.lock() {
            queue.push_back(event);
        }
    }

    pub fn queue_key(&self, key: Key) {
        self.queue_key_event(KeyEvent::key(key));
    }

    /// Queue text input as a sequence of character key events
    pub fn queue_text_input(&self, text: &str) {
        if let Ok(mut queue) = self.input_queue.lock() {
            queue.extend(text.chars().map(KeyEvent::char));
        }
    }

    /// Queue multiple key events at once
    pub fn queue_key_events(&self, events: &[KeyEvent]) {
        if let Ok(mut queue) = self.input_queue.lock() {
            queue.extend(events.iter().cloned());
        }
    }

    /// Get the number of queued events
    pub fn queued_event_count(&self) -> usize {
        self.input_queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Everything written so far.
    pub fn get_output_string(&self) -> String {
        self.output.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Return and clear the captured output.
    pub fn take_output(&self) -> String {
        self.output
            .lock()
            .map(|mut o| std::mem::take(&mut *o))
            .unwrap_or_default()
    }

    pub fn set_interactive(&self, interactive: bool) {
        self.interactive.store(interactive, Ordering::SeqCst);
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode.load(Ordering::SeqCst)
    }

    /// How many times raw mode was entered.
    pub fn raw_mode_entries(&self) -> usize {
        self.raw_mode_entries.load(Ordering::SeqCst)
    }

    /// Signals delivered through [`SignalBridge::raise`].
    pub fn raised_signals(&self) -> Vec<TerminalSignal> {
        self.raised.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ConsoleInput for MockConsole {
    fn is_interactive(&self) -> bool {
        self.interactive.load(Ordering::SeqCst)
    }

    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard> {
        self.raw_mode.store(true, Ordering::SeqCst);
        self.raw_mode_entries.fetch_add(1, Ordering::SeqCst);
        let raw_mode = Arc::clone(&self.raw_mode);
        Ok(RawModeGuard::new(
            move || raw_mode.store(false, Ordering::SeqCst),
            "Mock".to_string(),
        ))
    }

    /// Pops the next queued event; an empty queue reads as end of input.
    fn read_key(&mut self) -> ConsoleResult<Option<KeyEvent>> {
        Ok(self.input_queue.lock().ok().and_then(|mut q| q.pop_front()))
    }
}

impl ConsoleOutput for MockConsole {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        if let Ok(mut output) = self.output.lock() {
            output.push_str(text);
        }
        Ok(())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        Ok(())
    }
}

impl SignalBridge for MockConsole {
    fn raise(&mut self, signal: TerminalSignal) -> ConsoleResult<()> {
        if let Ok(mut raised) = self.raised.lock() {
            raised.push(signal);
        }
        Ok(())
    }
}
