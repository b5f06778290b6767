// Drives the editor through the mock console, with keys decoded from raw
// terminal bytes the way the Unix backend does it.

use linekit_core::{EditError, EditorContext};
use linekit_io::{Key, KeyParser, MockConsole, TerminalSignal};
use pretty_assertions::assert_eq;

fn console_with_bytes(bytes: &[u8]) -> MockConsole {
    let console = MockConsole::new();
    let mut parser = KeyParser::new();
    let mut events = parser.feed(bytes);
    events.extend(parser.flush());
    console.queue_key_events(&events);
    console
}

#[test]
fn test_read_line_from_mock_console() {
    let mut editor = EditorContext::default();
    let console = MockConsole::new();
    console.queue_text_input("hi");
    console.queue_key(Key::Enter);

    let mut terminal = console.clone();
    let line = editor.read_line("> ", &mut terminal).unwrap();

    assert_eq!(line, "hi\n");
    assert_eq!(console.get_output_string(), "> hi\n");
    assert!(!console.is_raw_mode());
    assert_eq!(console.raw_mode_entries(), 1);
}

#[test]
fn test_arrow_keys_from_raw_bytes() {
    let mut editor = EditorContext::default();
    let mut console = console_with_bytes(b"ab\x1b[D\x1b[Dx\r");

    assert_eq!(editor.read_line("> ", &mut console).unwrap(), "xab\n");
}

#[test]
fn test_meta_word_motion_from_raw_bytes() {
    let mut editor = EditorContext::default();
    let mut console = console_with_bytes(b"one two\x1bbX\r");

    assert_eq!(editor.read_line("> ", &mut console).unwrap(), "one Xtwo\n");
}

#[test]
fn test_history_recall_with_up_arrow() {
    let mut editor = EditorContext::default();
    editor.add_history("make test");
    let mut console = console_with_bytes(b"\x1b[A\r");

    assert_eq!(editor.read_line("$ ", &mut console).unwrap(), "make test\n");
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_utf8_input() {
    let mut editor = EditorContext::default();
    let mut console = console_with_bytes("héllo\r".as_bytes());

    assert_eq!(editor.read_line("> ", &mut console).unwrap(), "héllo\n");
}

#[test]
fn test_quit_byte_raises_signal() {
    let mut editor = EditorContext::default();
    let console = console_with_bytes(b"abc\x1c");
    let mut terminal = console.clone();

    let err = editor.read_line("> ", &mut terminal).unwrap_err();

    assert!(matches!(err, EditError::Interrupted(TerminalSignal::Quit)));
    assert_eq!(console.raised_signals(), vec![TerminalSignal::Quit]);
    assert!(!console.is_raw_mode());
}

#[test]
fn test_not_interactive_console() {
    let mut editor = EditorContext::default();
    let console = MockConsole::new();
    console.set_interactive(false);
    let mut terminal = console.clone();

    let err = editor.read_line("> ", &mut terminal).unwrap_err();
    assert!(matches!(err, EditError::NotInteractive));
    assert_eq!(console.raw_mode_entries(), 0);
}
