use crate::command::Outcome;
use crate::config::EditorConfig;
use crate::registry::Registry;
use crate::stream::NEWLINE;
use std::io::Write;
use tracing::debug;

/// Adapter that lets a built-in command type act as a [`Handler`](crate::Handler).
///
/// Only supports commands defined in this crate, see `builtin.rs`.
pub(crate) struct Builtin<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Builtin<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Dispatches finished lines to the commands of a [`Registry`].
///
/// The interpreter owns the registry and the editor settings. It is shared,
/// read-only, by every [`Session`](crate::Session) polling against it.
///
/// Example
/// ```
/// use serial_console::{Interpreter, Outcome};
/// use std::io::Write;
/// let mut sh = Interpreter::default();
/// sh.registry_mut().install("ping", |_params, out| {
///     write!(out, "pong\r\n")?;
///     Ok(true)
/// });
/// let mut out = Vec::new();
/// assert_eq!(sh.process("ping", &mut out).unwrap(), Outcome::Success);
/// assert_eq!(out, b"pong\r\n");
/// ```
#[derive(Debug)]
pub struct Interpreter {
    registry: Registry,
    config: EditorConfig,
}

impl Interpreter {
    /// Create an interpreter around an already populated registry.
    pub fn new(registry: Registry, config: EditorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for installing commands before the first poll.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Run one finished line.
    ///
    /// The first space-separated token names the command; the trimmed rest of
    /// the line is handed to its handler. Unknown commands and rejected
    /// parameters are reported on `out` and in the returned [`Outcome`]; only a
    /// failing write is an error.
    pub fn process(&self, line: &str, out: &mut dyn Write) -> anyhow::Result<Outcome> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Outcome::Blank);
        }

        let (name, params) = match line.split_once(' ') {
            Some((name, params)) => (name, params.trim()),
            None => (line, ""),
        };

        let Some(command) = self.registry.lookup_exact(name) else {
            debug!(name, "unknown command");
            write!(out, "Unknown command '{}'{}", name, NEWLINE)?;
            return Ok(Outcome::UnknownCommand);
        };

        if command.handler().call(params, out, &self.registry)? {
            debug!(name, params, "command succeeded");
            Ok(Outcome::Success)
        } else {
            debug!(name, params, "command rejected its parameters");
            write!(out, "Invalid usage of '{}'{}", name, NEWLINE)?;
            write!(out, "Type 'help {}' for more information{}", name, NEWLINE)?;
            Ok(Outcome::UsageError)
        }
    }
}

impl Default for Interpreter {
    /// An interpreter with the built-in `clear` and `help` commands and the
    /// default editor settings.
    fn default() -> Self {
        Self::new(Registry::with_builtins(), EditorConfig::default())
    }
}
