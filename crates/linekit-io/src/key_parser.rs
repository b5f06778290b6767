//! State machine that turns raw terminal bytes into key events.
//!
//! Bytes can arrive split at any point, so partial escape sequences and
//! partial UTF-8 characters are buffered between calls to [`KeyParser::feed`].
//! A lone ESC is ambiguous until the next byte arrives; the terminal backend
//! calls [`KeyParser::flush`] when no byte follows within its timeout.

use linekit_core::{Key, KeyEvent};

/// Longest escape sequence kept before giving up on it.
const MAX_SEQUENCE_LEN: usize = 32;

const ESC: u8 = 0x1b;
const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Parser state for the byte currently being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Plain input: printable text, control bytes and UTF-8.
    Normal,
    /// Saw ESC.
    EscapeSequence,
    /// Saw `ESC [`.
    CsiSequence,
    /// Saw `ESC O`.
    Ss3Sequence,
    /// Between `ESC [ 200 ~` and `ESC [ 201 ~`.
    BracketedPaste,
}

pub struct KeyParser {
    state: ParserState,
    /// Bytes of the escape sequence in progress.
    buffer: Vec<u8>,
    /// Bytes of a multi-byte UTF-8 character in progress.
    utf8: Vec<u8>,
    utf8_len: usize,
    paste_buffer: Vec<u8>,
}

impl KeyParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Normal,
            buffer: Vec::new(),
            utf8: Vec::new(),
            utf8_len: 0,
            paste_buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Whether an escape sequence or UTF-8 character is waiting for more
    /// bytes. A paste in progress waits for its end marker however long it
    /// takes, so it does not count.
    pub fn has_pending(&self) -> bool {
        !matches!(self.state, ParserState::Normal | ParserState::BracketedPaste)
            || !self.utf8.is_empty()
    }

    /// Decode `data`, returning every key it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for &byte in data {
            match self.state {
                ParserState::Normal => self.handle_normal_byte(byte, &mut events),
                ParserState::EscapeSequence => self.handle_escape_byte(byte, &mut events),
                ParserState::CsiSequence => self.handle_csi_byte(byte, &mut events),
                ParserState::Ss3Sequence => self.handle_ss3_byte(byte, &mut events),
                ParserState::BracketedPaste => self.handle_paste_byte(byte, &mut events),
            }
        }
        events
    }

    /// Give up waiting for the rest of a sequence.
    ///
    /// A pending lone ESC becomes the Escape key; a cut-off sequence becomes
    /// Escape followed by its remaining bytes as ordinary input.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        match self.state {
            ParserState::Normal => {}
            ParserState::BracketedPaste => {
                let mut content = std::mem::take(&mut self.paste_buffer);
                content.extend_from_slice(&self.buffer);
                events.push(paste_event(content));
            }
            _ => {
                let rest = self.buffer.split_off(1);
                events.push(KeyEvent::simple(Key::Escape, vec![ESC]));
                self.reset();
                for byte in rest {
                    self.handle_normal_byte(byte, &mut events);
                }
            }
        }

        if !self.utf8.is_empty() {
            let bytes = std::mem::take(&mut self.utf8);
            events.push(KeyEvent::simple(Key::NotDefined, bytes));
        }

        self.reset();
        events
    }

    pub fn reset(&mut self) {
        self.state = ParserState::Normal;
        self.buffer.clear();
        self.utf8.clear();
        self.utf8_len = 0;
        self.paste_buffer.clear();
    }

    fn handle_normal_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        if !self.utf8.is_empty() {
            self.handle_utf8_byte(byte, events);
            return;
        }

        match byte {
            ESC => {
                self.buffer.push(byte);
                self.state = ParserState::EscapeSequence;
            }
            0x00..=0x1f | 0x7f => {
                let key = Key::from_control_byte(byte).unwrap_or(Key::NotDefined);
                events.push(KeyEvent::simple(key, vec![byte]));
            }
            0x20..=0x7e => events.push(KeyEvent::char(byte as char)),
            _ => match utf8_length(byte) {
                Some(len) => {
                    self.utf8.push(byte);
                    self.utf8_len = len;
                }
                None => events.push(KeyEvent::simple(Key::NotDefined, vec![byte])),
            },
        }
    }

    fn handle_utf8_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        if byte & 0xc0 != 0x80 {
            // Truncated character: report it and decode this byte afresh.
            let bytes = std::mem::take(&mut self.utf8);
            events.push(KeyEvent::simple(Key::NotDefined, bytes));
            self.handle_normal_byte(byte, events);
            return;
        }

        self.utf8.push(byte);
        if self.utf8.len() < self.utf8_len {
            return;
        }

        let bytes = std::mem::take(&mut self.utf8);
        match std::str::from_utf8(&bytes).ok().and_then(|s| s.chars().next()) {
            Some(ch) => events.push(KeyEvent::char(ch)),
            None => events.push(KeyEvent::simple(Key::NotDefined, bytes)),
        }
    }

    fn handle_escape_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        match byte {
            b'[' => {
                self.buffer.push(byte);
                self.state = ParserState::CsiSequence;
            }
            b'O' => {
                self.buffer.push(byte);
                self.state = ParserState::Ss3Sequence;
            }
            b'f' | b'F' => self.emit(Key::MetaF, byte, events),
            b'b' | b'B' => self.emit(Key::MetaB, byte, events),
            ESC => {
                // ESC ESC: the first one stands alone.
                events.push(KeyEvent::simple(Key::Escape, vec![ESC]));
            }
            _ => {
                events.push(KeyEvent::simple(Key::Escape, vec![ESC]));
                self.reset_to_normal();
                self.handle_normal_byte(byte, events);
            }
        }
    }

    fn handle_csi_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        if self.buffer == PASTE_START {
            self.buffer.clear();
            self.state = ParserState::BracketedPaste;
            return;
        }

        match byte {
            // Parameter and intermediate bytes.
            0x20..=0x3f => {
                if self.buffer.len() > MAX_SEQUENCE_LEN {
                    events.push(KeyEvent::simple(Key::NotDefined, self.buffer.clone()));
                    self.reset_to_normal();
                }
            }
            0x40..=0x7e => {
                let params = &self.buffer[2..self.buffer.len() - 1];
                let key = csi_key(params, byte);
                events.push(KeyEvent::simple(key, self.buffer.clone()));
                self.reset_to_normal();
            }
            _ => {
                // Not a CSI sequence after all: ESC and '[' were plain input.
                let rest = self.buffer.split_off(2);
                events.push(KeyEvent::simple(Key::Escape, vec![ESC]));
                events.push(KeyEvent::char('['));
                self.reset_to_normal();
                for byte in rest {
                    self.handle_normal_byte(byte, events);
                }
            }
        }
    }

    fn handle_ss3_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);
        let key = match byte {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::NotDefined,
        };
        events.push(KeyEvent::simple(key, self.buffer.clone()));
        self.reset_to_normal();
    }

    fn handle_paste_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        if self.buffer.ends_with(PASTE_END) {
            let end = self.buffer.len() - PASTE_END.len();
            self.paste_buffer.extend_from_slice(&self.buffer[..end]);
            let content = std::mem::take(&mut self.paste_buffer);
            events.push(paste_event(content));
            self.reset_to_normal();
        } else if self.buffer.len() >= PASTE_END.len() {
            // Keep only what could still be the start of the end marker.
            let keep = PASTE_END.len() - 1;
            let moved = self.buffer.len() - keep;
            self.paste_buffer.extend_from_slice(&self.buffer[..moved]);
            self.buffer.drain(..moved);
        }
    }

    fn emit(&mut self, key: Key, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);
        events.push(KeyEvent::simple(key, self.buffer.clone()));
        self.reset_to_normal();
    }

    fn reset_to_normal(&mut self) {
        self.state = ParserState::Normal;
        self.buffer.clear();
    }
}

impl Default for KeyParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Total length of a UTF-8 character from its lead byte.
fn utf8_length(lead: u8) -> Option<usize> {
    match lead {
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

fn csi_key(params: &[u8], final_byte: u8) -> Key {
    match (params, final_byte) {
        (b"", b'A') => Key::Up,
        (b"", b'B') => Key::Down,
        (b"", b'C') => Key::Right,
        (b"", b'D') => Key::Left,
        (b"" | b"1", b'H') => Key::Home,
        (b"" | b"1", b'F') => Key::End,
        (b"1;5", b'C') | (b"5", b'C') => Key::ControlRight,
        (b"1;5", b'D') | (b"5", b'D') => Key::ControlLeft,
        (b"1;3", b'C') => Key::MetaF,
        (b"1;3", b'D') => Key::MetaB,
        (b"1" | b"7", b'~') => Key::Home,
        (b"2", b'~') => Key::Insert,
        (b"3", b'~') => Key::Delete,
        (b"4" | b"8", b'~') => Key::End,
        (b"201", b'~') => Key::Ignore,
        _ => Key::NotDefined,
    }
}

fn paste_event(content: Vec<u8>) -> KeyEvent {
    let text = String::from_utf8_lossy(&content).into_owned();
    KeyEvent::with_text(Key::BracketedPaste, content, text)
}
