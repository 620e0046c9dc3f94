use std::io::Write;
use std::time::Duration;

/// Line ending written after every output line, matching a serial `println`.
pub const NEWLINE: &str = "\r\n";

/// Ctrl-C.
pub const CANCEL: u8 = 0x03;
pub const BACKSPACE: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const ESCAPE: u8 = 0x1B;

/// Byte written to erase the last echoed character.
pub const ERASE: u8 = 0x7F;

/// Echo written when a line is cancelled.
pub const CANCEL_ECHO: &str = "^C\r\n";

/// Terminal reset: clears the screen and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1bc";

/// Returns true for the bytes accepted into a line.
pub fn is_printable(byte: u8) -> bool {
    (b' '..=b'~').contains(&byte)
}

/// Returns true for the line terminators.
pub fn is_separator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Abstraction over a pollable, half-duplex byte stream such as a UART.
///
/// Input is pulled one byte at a time and only when [`available`](Self::available)
/// reports something buffered; output goes through [`Write`] on the same stream,
/// so echo and command output interleave the way a terminal expects.
///
/// None of the input methods may block, with the single exception of
/// [`peek_byte_timeout`](Self::peek_byte_timeout), which waits at most for the
/// given duration.
pub trait ByteStream: Write {
    /// Number of bytes ready to be read right now.
    fn available(&mut self) -> usize;

    /// Consume the next byte, or `None` if nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;

    /// Look at the next byte without consuming it.
    fn peek_byte(&mut self) -> Option<u8>;

    /// Look at the next byte, allowing it up to `timeout` to arrive.
    ///
    /// The default implementation does not wait at all. Transports that can
    /// wait on their receive path should override it.
    fn peek_byte_timeout(&mut self, timeout: Duration) -> Option<u8> {
        let _ = timeout;
        self.peek_byte()
    }
}
