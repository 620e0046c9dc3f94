use crate::stream::{BACKSPACE, ByteStream, ERASE};
use std::collections::VecDeque;
use std::io::{Read, Result as IoResult, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

/// Memory-backed stream: bytes queued with [`feed`](Self::feed) are read back by
/// the session, everything the session writes is captured.
///
/// Useful for tests and for bridging a transport that delivers bytes in chunks.
#[derive(Debug, Default)]
pub struct MemStream {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl MemStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if they had just arrived on the wire.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Everything written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drain the captured output as text, lossily converting non-UTF-8 bytes.
    pub fn take_output(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.output)).into_owned()
    }
}

impl Write for MemStream {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.output.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl ByteStream for MemStream {
    fn available(&mut self) -> usize {
        self.input.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.input.front().copied()
    }
}

/// Host transport over the process's stdin and stdout.
///
/// A background thread blocks on stdin and forwards each byte over a channel,
/// so polling never waits. The terminal is expected to be in raw mode. Raw-mode
/// keyboards send DEL for the backspace key; it is delivered as the backspace
/// control code.
pub struct StdioStream {
    rx: Receiver<u8>,
    pending: VecDeque<u8>,
    closed: bool,
    stdout: std::io::Stdout,
}

impl StdioStream {
    /// Start the stdin reader thread.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut stdin = std::io::stdin();
            let mut buf = [0u8; 64];
            loop {
                let n = match stdin.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => n,
                };
                for &byte in &buf[..n] {
                    if tx.send(byte).is_err() {
                        return;
                    }
                }
            }
        });
        Self::from_receiver(rx)
    }

    /// Read input from `rx` instead of stdin; output still goes to stdout.
    /// The stream counts as closed once every sender is dropped.
    pub fn from_receiver(rx: Receiver<u8>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
            closed: false,
            stdout: std::io::stdout(),
        }
    }

    /// True once stdin has reached end of file and every byte has been read.
    pub fn is_closed(&mut self) -> bool {
        self.pump();
        self.closed && self.pending.is_empty()
    }

    fn pump(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(byte) => self.pending.push_back(translate(byte)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
    }
}

fn translate(byte: u8) -> u8 {
    if byte == ERASE { BACKSPACE } else { byte }
}

impl Write for StdioStream {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.stdout.write_all(data)?;
        self.stdout.flush()?;
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        self.stdout.flush()
    }
}

impl ByteStream for StdioStream {
    fn available(&mut self) -> usize {
        self.pump();
        self.pending.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.pump();
        self.pending.pop_front()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.pump();
        self.pending.front().copied()
    }

    fn peek_byte_timeout(&mut self, timeout: Duration) -> Option<u8> {
        if let Some(byte) = self.peek_byte() {
            return Some(byte);
        }
        if self.closed {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(byte) => {
                self.pending.push_back(translate(byte));
                self.pending.front().copied()
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_stream_reads_in_order() {
        let mut stream = MemStream::new();
        stream.feed(b"ab");
        assert_eq!(stream.available(), 2);
        assert_eq!(stream.peek_byte(), Some(b'a'));
        assert_eq!(stream.read_byte(), Some(b'a'));
        assert_eq!(stream.peek_byte_timeout(Duration::from_secs(1)), Some(b'b'));
        assert_eq!(stream.read_byte(), Some(b'b'));
        assert_eq!(stream.read_byte(), None);
        assert_eq!(stream.peek_byte_timeout(Duration::ZERO), None);
    }

    #[test]
    fn test_mem_stream_captures_output() {
        let mut stream = MemStream::new();
        write!(stream, "> ").unwrap();
        assert_eq!(stream.output(), b"> ");
        assert_eq!(stream.take_output(), "> ");
        assert!(stream.output().is_empty());
    }

    #[test]
    fn test_peek_timeout_gives_up_when_nothing_arrives() {
        let (tx, rx) = mpsc::channel();
        let mut stream = StdioStream::from_receiver(rx);

        let started = std::time::Instant::now();
        assert_eq!(stream.peek_byte_timeout(Duration::from_millis(20)), None);
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(stream.available(), 0);
        assert!(!stream.is_closed());
        drop(tx);
    }

    #[test]
    fn test_peek_timeout_sees_late_byte_without_consuming_it() {
        let (tx, rx) = mpsc::channel();
        let mut stream = StdioStream::from_receiver(rx);

        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            tx.send(b'[').unwrap();
        });
        assert_eq!(stream.peek_byte_timeout(Duration::from_secs(5)), Some(b'['));
        sender.join().unwrap();

        assert_eq!(stream.available(), 1);
        assert_eq!(stream.read_byte(), Some(b'['));
        assert!(stream.is_closed());
    }

    #[test]
    fn test_receiver_stream_translates_delete() {
        let (tx, rx) = mpsc::channel();
        let mut stream = StdioStream::from_receiver(rx);
        tx.send(0x7F).unwrap();
        tx.send(b'a').unwrap();
        drop(tx);

        assert_eq!(stream.read_byte(), Some(BACKSPACE));
        assert_eq!(stream.read_byte(), Some(b'a'));
        assert!(stream.is_closed());
        assert_eq!(stream.peek_byte_timeout(Duration::from_millis(1)), None);
    }

    #[test]
    fn test_raw_mode_delete_becomes_backspace() {
        assert_eq!(translate(0x7F), 0x08);
        assert_eq!(translate(b'a'), b'a');
    }
}
