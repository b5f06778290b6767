use linekit::prelude::*;
use linekit::ansi_aware_width;

fn editor_on(console: &MockConsole) -> LineEditorBuilder {
    LineEditor::builder().with_terminal(Box::new(console.clone()))
}

#[test]
fn test_history_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");

    let console = MockConsole::new();
    console.queue_text_input("ls -la");
    console.queue_key(Key::Enter);
    let mut editor = editor_on(&console).with_history_file(&path).build().unwrap();
    assert_eq!(editor.read_line("$ ").unwrap(), "ls -la\n");
    assert_eq!(editor.save_history().unwrap(), 1);

    let console = MockConsole::new();
    console.queue_key(Key::Up);
    console.queue_key(Key::Enter);
    let mut editor = editor_on(&console).with_history_file(&path).build().unwrap();
    assert_eq!(editor.context().history().len(), 1);
    assert_eq!(editor.read_line("$ ").unwrap(), "ls -la\n");
}

#[test]
fn test_builder_hooks_are_installed() {
    let console = MockConsole::new();
    console.queue_text_input("tmp  ");
    console.queue_key(Key::Enter);

    let mut editor = editor_on(&console)
        .with_display_hook(|line: &mut String| {
            if line.is_empty() {
                line.push_str("cd ");
            }
        })
        .with_commit_hook(|line: &mut String| {
            let trimmed = line.trim_end().len();
            (trimmed < line.len()).then(|| {
                line.truncate(trimmed);
                trimmed
            })
        })
        .build()
        .unwrap();

    assert_eq!(editor.read_line("> ").unwrap(), "cd tmp\n");
    assert_eq!(editor.context().history().newest(), Some("cd tmp"));
}

#[test]
fn test_without_tab_hook() {
    let console = MockConsole::new();
    console.queue_text_input("a");
    console.queue_key(Key::Tab);
    console.queue_text_input("b");
    console.queue_key(Key::Enter);

    let mut editor = editor_on(&console).without_tab_hook().build().unwrap();
    assert_eq!(editor.read_line("> ").unwrap(), "ab\n");
}

#[test]
fn test_width_function_measures_prompt() {
    let console = MockConsole::new();
    console.queue_key(Key::Tab);
    console.queue_key(Key::Enter);
    let mut editor = editor_on(&console).build().unwrap();

    // Eleven characters, two of them visible.
    let prompt = "\x1b[31m> \x1b[0m";
    editor.set_width_function(ansi_aware_width);
    assert_eq!(editor.read_line(prompt).unwrap(), " ".repeat(6) + "\n");

    console.queue_key(Key::Tab);
    console.queue_key(Key::Enter);
    editor.set_width_function(|text: &str| text.chars().count());
    assert_eq!(editor.read_line(prompt).unwrap(), " ".repeat(5) + "\n");
}

#[test]
fn test_screen_width_limits() {
    let console = MockConsole::new();
    let mut editor = editor_on(&console).build().unwrap();

    assert!(matches!(
        editor.set_screen_width(20),
        Err(ConfigError::ScreenWidthTooSmall { width: 20, .. })
    ));
    editor.set_screen_width(21).unwrap();
    assert_eq!(editor.context().config().screen_width, 21);
}

#[test]
fn test_interrupt_releases_terminal() {
    let console = MockConsole::new();
    console.queue_text_input("abc");
    console.queue_key(Key::ControlBackslash);
    let mut editor = editor_on(&console).build().unwrap();

    let err = editor.read_line("> ").unwrap_err();
    assert!(matches!(err, EditError::Interrupted(TerminalSignal::Quit)));
    assert!(!console.is_raw_mode());
}

#[test]
fn test_end_of_input_returns_empty_line() {
    let console = linekit::create_mock_terminal();
    let mut editor = editor_on(&console).build().unwrap();

    assert_eq!(editor.read_line("> ").unwrap(), "");
    assert_eq!(console.get_output_string(), "> \n");
}
