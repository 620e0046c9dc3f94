use crate::command::Outcome;
use crate::completion::{self, Suggestion};
use crate::interpreter::Interpreter;
use crate::stream::{
    BACKSPACE, ByteStream, CANCEL, CANCEL_ECHO, ERASE, ESCAPE, NEWLINE, TAB, is_printable,
    is_separator,
};
use anyhow::Result;
use std::time::Duration;
use tracing::trace;

/// What a single [`Session::poll`] ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// The line is still being edited (or nothing arrived).
    Pending,
    /// Ctrl-C discarded the line.
    Cancelled,
    /// A line was finished and handed to the interpreter.
    Dispatched(Outcome),
}

/// Progress through an arrow-key sequence, `ESC [ A..D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum EscapeState {
    #[default]
    Idle,
    Introducer,
    Bracket,
}

/// Editing state of one input stream, kept between polls.
///
/// The session owns the partially typed line and a few flags; the caller owns
/// the session and hands it, together with the stream, to every
/// [`poll`](Self::poll). Each stream needs its own session, while one
/// [`Interpreter`] can serve any number of them.
#[derive(Debug)]
pub struct Session {
    buffer: String,
    /// The prompt must be printed (and the buffer reset) before reading more.
    awaiting_prompt: bool,
    /// The previous key event was a tab with nothing typed since.
    tab_pending: bool,
    escape: EscapeState,
    /// The last line was ended by CR, so a directly following LF belongs to it.
    after_cr: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            awaiting_prompt: true,
            tab_pending: false,
            escape: EscapeState::Idle,
            after_cr: false,
        }
    }

    /// The line typed so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_awaiting_prompt(&self) -> bool {
        self.awaiting_prompt
    }

    pub fn has_pending_tab(&self) -> bool {
        self.tab_pending
    }

    /// Process whatever input is buffered on `stream` and return without waiting
    /// for more.
    ///
    /// Printable bytes are appended and echoed until the stream runs dry or a
    /// line terminator finishes the line, which is then dispatched through
    /// `interpreter`. Cancel, backspace, tab and escape each end the poll right
    /// after they are handled; later bytes stay queued for the next poll.
    pub fn poll<S: ByteStream>(&mut self, interpreter: &Interpreter, stream: &mut S) -> Result<LineEvent> {
        let config = interpreter.config();

        if self.awaiting_prompt {
            self.awaiting_prompt = false;
            self.tab_pending = false;
            self.buffer.clear();
            stream.write_all(config.prompt.as_bytes())?;
        }

        if self.escape != EscapeState::Idle {
            self.continue_escape(stream, config.escape_timeout);
        }

        let mut finished = false;
        while stream.available() > 0 {
            let Some(byte) = stream.read_byte() else {
                break;
            };
            let after_cr = std::mem::take(&mut self.after_cr);

            match byte {
                CANCEL => {
                    stream.write_all(CANCEL_ECHO.as_bytes())?;
                    self.buffer.clear();
                    self.awaiting_prompt = true;
                    return Ok(LineEvent::Cancelled);
                }
                BACKSPACE => {
                    if self.buffer.pop().is_some() {
                        stream.write_all(&[ERASE])?;
                    }
                    return Ok(LineEvent::Pending);
                }
                TAB => {
                    self.complete(interpreter, stream)?;
                    self.tab_pending = true;
                    return Ok(LineEvent::Pending);
                }
                ESCAPE => {
                    self.escape = EscapeState::Introducer;
                    self.continue_escape(stream, config.escape_timeout);
                    return Ok(LineEvent::Pending);
                }
                b'\n' if after_cr => continue,
                byte if is_separator(byte) => {
                    stream.write_all(NEWLINE.as_bytes())?;
                    self.awaiting_prompt = true;
                    self.after_cr = byte == b'\r';
                    finished = true;
                    break;
                }
                byte if is_printable(byte) => {
                    self.buffer.push(char::from(byte));
                    stream.write_all(&[byte])?;
                    self.tab_pending = false;
                }
                other => {
                    trace!(byte = other, "dropped control byte");
                    if config.show_unknown_codes {
                        write!(stream, "{{0x{:02X}}}", other)?;
                    }
                }
            }
        }

        if !finished {
            return Ok(LineEvent::Pending);
        }

        let line = std::mem::take(&mut self.buffer);
        let outcome = interpreter.process(&line, stream)?;
        Ok(LineEvent::Dispatched(outcome))
    }

    fn complete<S: ByteStream>(&mut self, interpreter: &Interpreter, stream: &mut S) -> Result<()> {
        match completion::suggest(&self.buffer, interpreter.registry(), self.tab_pending) {
            Suggestion::Nothing => {}
            Suggestion::Insert(text) => {
                self.buffer.push_str(&text);
                stream.write_all(text.as_bytes())?;
            }
            Suggestion::List(names) => {
                write!(
                    stream,
                    "{}{}{}{}{}",
                    NEWLINE,
                    names.join(" "),
                    NEWLINE,
                    interpreter.config().prompt,
                    self.buffer
                )?;
            }
        }
        Ok(())
    }

    /// Consume as much of `ESC [ A..D` as has arrived. A byte that does not fit
    /// the sequence is left unread and ends it; running out of input keeps the
    /// partial state for the next poll.
    fn continue_escape<S: ByteStream>(&mut self, stream: &mut S, timeout: Duration) {
        while self.escape != EscapeState::Idle {
            let Some(next) = stream.peek_byte_timeout(timeout) else {
                trace!(state = ?self.escape, "escape sequence incomplete");
                return;
            };
            match (self.escape, next) {
                (EscapeState::Introducer, b'[') => {
                    stream.read_byte();
                    self.escape = EscapeState::Bracket;
                }
                (EscapeState::Bracket, b'A'..=b'D') => {
                    stream.read_byte();
                    trace!(key = %char::from(next), "arrow key ignored");
                    self.escape = EscapeState::Idle;
                }
                _ => self.escape = EscapeState::Idle,
            }
        }
    }
}
