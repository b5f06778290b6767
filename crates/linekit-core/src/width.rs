//! Prompt width measurement.
//!
//! Buffer characters always take one column each. Prompts may contain
//! escape sequences or wide characters, so their width is pluggable.

use std::sync::Arc;

use unicode_width::UnicodeWidthStr;

/// Maps a prompt string to the number of columns it occupies.
pub type WidthFn = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// One column per character.
pub fn char_count_width(text: &str) -> usize {
    text.chars().count()
}

/// East Asian wide characters count as two columns, combining marks as zero.
pub fn unicode_display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Skips `ESC [ ... final` sequences so colored prompts measure correctly.
pub fn ansi_aware_width(text: &str) -> usize {
    let mut visible = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&c) {
                    break;
                }
            }
            continue;
        }
        visible.push(ch);
    }
    unicode_display_width(&visible)
}

pub fn default_width_fn() -> WidthFn {
    Arc::new(char_count_width)
}
