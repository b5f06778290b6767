//! Key definitions and key event structures produced by key sources.
//!
//! The set of keys is limited to what a single-line editor binds: the
//! control characters, the navigation block and the Meta word-motion pair.
//! Printable input arrives as [`Key::NotDefined`] carrying its text.

/// Key represents every distinct input the editor can dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key
    Escape,

    // Control characters (Ctrl+A through Ctrl+Z)
    ControlA,
    ControlB,
    ControlC,
    ControlD,
    ControlE,
    ControlF,
    ControlG,
    ControlH,
    ControlJ,
    ControlK,
    ControlL,
    ControlN,
    ControlO,
    ControlP,
    ControlQ,
    ControlR,
    ControlS,
    ControlT,
    ControlU,
    ControlV,
    ControlW,
    ControlX,
    ControlY,
    ControlZ,

    // Additional control combinations
    ControlSpace,
    ControlBackslash,
    ControlSquareClose,
    ControlCircumflex,
    ControlUnderscore,
    ControlLeft,
    ControlRight,

    // Navigation keys (arrow keys)
    Up,
    Down,
    Right,
    Left,

    // Navigation and editing keys
    Home,
    End,
    Delete,
    Insert,
    Backspace,

    // Aliases for common keys
    Tab,
    Enter,

    // Meta (Escape-prefixed) word motion
    /// Meta-b / Meta-B
    MetaB,
    /// Meta-f / Meta-F
    MetaF,

    /// Bracketed paste mode content
    BracketedPaste,

    /// Key which should be ignored (no action should be taken)
    Ignore,
    /// Key is not defined or a printable character (see [`KeyEvent::text`])
    NotDefined,
}

impl Key {
    /// Maps a single control byte (0x00..=0x1f, 0x7f) to its key.
    pub fn from_control_byte(byte: u8) -> Option<Key> {
        let key = match byte {
            0x00 => Key::ControlSpace,
            0x01 => Key::ControlA,
            0x02 => Key::ControlB,
            0x03 => Key::ControlC,
            0x04 => Key::ControlD,
            0x05 => Key::ControlE,
            0x06 => Key::ControlF,
            0x07 => Key::ControlG,
            0x08 => Key::ControlH,
            0x09 => Key::Tab,
            0x0a => Key::ControlJ,
            0x0b => Key::ControlK,
            0x0c => Key::ControlL,
            0x0d => Key::Enter,
            0x0e => Key::ControlN,
            0x0f => Key::ControlO,
            0x10 => Key::ControlP,
            0x11 => Key::ControlQ,
            0x12 => Key::ControlR,
            0x13 => Key::ControlS,
            0x14 => Key::ControlT,
            0x15 => Key::ControlU,
            0x16 => Key::ControlV,
            0x17 => Key::ControlW,
            0x18 => Key::ControlX,
            0x19 => Key::ControlY,
            0x1a => Key::ControlZ,
            0x1b => Key::Escape,
            0x1c => Key::ControlBackslash,
            0x1d => Key::ControlSquareClose,
            0x1e => Key::ControlCircumflex,
            0x1f => Key::ControlUnderscore,
            0x7f => Key::Backspace,
            _ => return None,
        };
        Some(key)
    }
}

/// KeyEvent represents a decoded key input together with the bytes that
/// produced it and, for printable input, its text.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The parsed key type
    pub key: Key,
    /// The raw bytes that were parsed to produce this key event
    pub raw_bytes: Vec<u8>,
    /// Text content for printable characters or bracketed paste
    pub text: Option<String>,
}

impl KeyEvent {
    /// Create a new KeyEvent with the specified key, raw bytes, and optional text
    pub fn new(key: Key, raw_bytes: Vec<u8>, text: Option<String>) -> Self {
        Self {
            key,
            raw_bytes,
            text,
        }
    }

    /// Create a KeyEvent for a simple key without text content
    pub fn simple(key: Key, raw_bytes: Vec<u8>) -> Self {
        Self::new(key, raw_bytes, None)
    }

    /// Create a KeyEvent with text content
    pub fn with_text(key: Key, raw_bytes: Vec<u8>, text: String) -> Self {
        Self::new(key, raw_bytes, Some(text))
    }

    /// Create the event for one printable character.
    pub fn char(ch: char) -> Self {
        let mut raw = [0u8; 4];
        let bytes = ch.encode_utf8(&mut raw).as_bytes().to_vec();
        Self::with_text(Key::NotDefined, bytes, ch.to_string())
    }

    /// Create the event for a bound key with no text.
    pub fn key(key: Key) -> Self {
        Self::simple(key, Vec::new())
    }

    /// Check if this key event has associated text content
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Get the text content, returning an empty string if none exists
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Characters this event would insert into the line, if any.
    ///
    /// Control characters are never insertable; a pasted block keeps only
    /// its printable characters.
    pub fn printable_chars(&self) -> Option<Vec<char>> {
        match self.key {
            Key::NotDefined | Key::BracketedPaste => {
                let chars: Vec<char> = self
                    .text_or_empty()
                    .chars()
                    .filter(|c| !c.is_control())
                    .collect();
                (!chars.is_empty()).then_some(chars)
            }
            _ => None,
        }
    }
}

impl Default for KeyEvent {
    fn default() -> Self {
        Self {
            key: Key::NotDefined,
            raw_bytes: Vec::new(),
            text: None,
        }
    }
}
