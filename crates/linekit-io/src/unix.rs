use std::collections::VecDeque;
use std::io;
use std::os::unix::io::RawFd;

use linekit_core::{
    ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, KeyEvent, RawModeGuard,
    SignalBridge, TerminalSignal,
};
use log::{debug, trace};

use crate::key_parser::KeyParser;

/// How long a lone ESC waits for the rest of an escape sequence.
const ESCAPE_TIMEOUT_MS: i32 = 50;

const READ_CHUNK: usize = 64;

/// The process's controlling terminal on stdin/stdout.
pub struct UnixTerminal {
    stdin_fd: RawFd,
    stdout_fd: RawFd,
    key_parser: KeyParser,
    pending: VecDeque<KeyEvent>,
}

impl UnixTerminal {
    pub fn new() -> ConsoleResult<Self> {
        Ok(Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            key_parser: KeyParser::new(),
            pending: VecDeque::new(),
        })
    }

    fn enter_raw_mode(fd: RawFd) -> io::Result<libc::termios> {
        let mut original_termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut raw = original_termios;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON | libc::IXOFF | libc::BRKINT | libc::ISTRIP);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(original_termios)
    }

    /// Wait up to `timeout_ms` for input. `false` on timeout.
    fn poll_input(&self, timeout_ms: i32) -> ConsoleResult<bool> {
        let mut poll_fd = libc::pollfd {
            fd: self.stdin_fd,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            let result = unsafe { libc::poll(&mut poll_fd, 1, timeout_ms) };
            if result >= 0 {
                return Ok(result > 0);
            }
            let error = io::Error::last_os_error();
            if error.raw_os_error() != Some(libc::EINTR) {
                return Err(ConsoleError::IoError(error));
            }
        }
    }

    /// Blocking read. `0` means end of input.
    fn read_bytes(&self, buffer: &mut [u8]) -> ConsoleResult<usize> {
        loop {
            let result = unsafe {
                libc::read(
                    self.stdin_fd,
                    buffer.as_mut_ptr() as *mut libc::c_void,
                    buffer.len(),
                )
            };
            if result >= 0 {
                return Ok(result as usize);
            }
            let error = io::Error::last_os_error();
            if error.raw_os_error() != Some(libc::EINTR) {
                return Err(ConsoleError::IoError(error));
            }
        }
    }

    fn write_bytes_direct(&self, bytes: &[u8]) -> ConsoleResult<()> {
        let mut written = 0;
        while written < bytes.len() {
            let result = unsafe {
                libc::write(
                    self.stdout_fd,
                    bytes[written..].as_ptr() as *const libc::c_void,
                    bytes.len() - written,
                )
            };

            if result == -1 {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EINTR) => continue,
                    _ => return Err(ConsoleError::IoError(error)),
                }
            }
            written += result as usize;
        }
        Ok(())
    }
}

impl ConsoleInput for UnixTerminal {
    fn is_interactive(&self) -> bool {
        unsafe { libc::isatty(self.stdin_fd) == 1 && libc::isatty(self.stdout_fd) == 1 }
    }

    fn enable_raw_mode(&mut self) -> ConsoleResult<RawModeGuard> {
        let stdin_fd = self.stdin_fd;
        let original_termios = Self::enter_raw_mode(stdin_fd)?;
        self.key_parser.reset();
        self.pending.clear();

        let restore_fn = move || unsafe {
            let _ = libc::tcsetattr(stdin_fd, libc::TCSANOW, &original_termios);
        };
        Ok(RawModeGuard::new(restore_fn, "Unix termios".to_string()))
    }

    fn read_key(&mut self) -> ConsoleResult<Option<KeyEvent>> {
        let mut buffer = [0u8; READ_CHUNK];
        loop {
            if let Some(event) = self.pending.pop_front() {
                trace!("key {:?} {:?}", event.key, event.raw_bytes);
                return Ok(Some(event));
            }

            if self.key_parser.has_pending() && !self.poll_input(ESCAPE_TIMEOUT_MS)? {
                let flushed = self.key_parser.flush();
                self.pending.extend(flushed);
                continue;
            }

            let count = self.read_bytes(&mut buffer)?;
            if count == 0 {
                let flushed = self.key_parser.flush();
                if flushed.is_empty() {
                    debug!("stdin reached end of input");
                    return Ok(None);
                }
                self.pending.extend(flushed);
                continue;
            }
            let events = self.key_parser.feed(&buffer[..count]);
            self.pending.extend(events);
        }
    }
}

impl ConsoleOutput for UnixTerminal {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        let translated = translate_newlines(text);
        self.write_bytes_direct(translated.as_bytes())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        // Writes go straight to the descriptor.
        Ok(())
    }
}

impl SignalBridge for UnixTerminal {
    fn raise(&mut self, signal: TerminalSignal) -> ConsoleResult<()> {
        let number = match signal {
            TerminalSignal::Interrupt => libc::SIGINT,
            TerminalSignal::Quit => libc::SIGQUIT,
            TerminalSignal::Suspend => libc::SIGTSTP,
        };
        debug!("raising {signal}");
        if unsafe { libc::raise(number) } != 0 {
            return Err(ConsoleError::IoError(io::Error::last_os_error()));
        }
        Ok(())
    }
}

/// Terminal line ending for every `\n` not already preceded by `\r`.
fn translate_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let mut previous = None;
    for ch in text.chars() {
        if ch == '\n' && previous != Some('\r') {
            out.push('\r');
        }
        out.push(ch);
        previous = Some(ch);
    }
    out
}
