//! An interactive command line for devices reached over a single byte stream.
//!
//! This crate turns a pollable, half-duplex byte stream (a UART, a socket, or the
//! local terminal in raw mode) into a small shell: typed characters are echoed,
//! backspace erases, tab completes command names, Ctrl-C cancels the line, and a
//! finished line is dispatched to a registered handler.
//!
//! The main pieces are:
//! - [`Registry`], the table of installed commands;
//! - [`Interpreter`], which owns a registry and dispatches finished lines;
//! - [`Session`], the per-stream editing state that is polled repeatedly
//!   against a [`ByteStream`] and never waits for input.
//!
//! ```
//! use serial_console::{Interpreter, LineEvent, MemStream, Outcome, Session};
//!
//! let interpreter = Interpreter::default();
//! let mut session = Session::new();
//! let mut stream = MemStream::new();
//!
//! stream.feed(b"help clear\r");
//! let event = session.poll(&interpreter, &mut stream).unwrap();
//! assert_eq!(event, LineEvent::Dispatched(Outcome::Success));
//! ```

mod builtin;
pub mod command;
pub mod completion;
pub mod config;
pub mod io_adapters;
mod interpreter;
pub mod registry;
pub mod session;
pub mod stream;

pub use command::{Command, Handler, Outcome};
pub use config::EditorConfig;
pub use interpreter::Interpreter;
pub use io_adapters::{MemStream, StdioStream};
pub use registry::{Registry, RegistrationError};
pub use session::{LineEvent, Session};
pub use stream::ByteStream;
