use crate::registry::Registry;
use anyhow::Result;
use std::fmt;
use std::io::Write;

/// Something that can run a command line's parameters.
///
/// `params` is the trimmed remainder of the line after the command name (empty
/// when none was given). Output goes to `out`, the same stream the user types
/// on. `registry` gives read access to every installed command, which is what
/// `help` needs.
///
/// Return `Ok(true)` when the parameters were accepted and `Ok(false)` when they
/// were not; the dispatcher prints a usage hint for the latter. `Err` is kept for
/// transport failures and aborts the current poll.
///
/// Closures of the shape `Fn(&str, &mut dyn Write) -> Result<bool>` implement
/// this trait, so handlers can capture whatever context they need.
pub trait Handler {
    fn call(&self, params: &str, out: &mut dyn Write, registry: &Registry) -> Result<bool>;
}

impl<F> Handler for F
where
    F: Fn(&str, &mut dyn Write) -> Result<bool>,
{
    fn call(&self, params: &str, out: &mut dyn Write, _registry: &Registry) -> Result<bool> {
        self(params, out)
    }
}

/// A registered name, handler and description.
///
/// Commands are created by [`Registry::install`] and never change afterwards.
pub struct Command {
    name: String,
    description: String,
    handler: Box<dyn Handler>,
}

impl Command {
    pub(crate) fn new(name: String, description: String, handler: Box<dyn Handler>) -> Self {
        Self {
            name,
            description,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form text shown by `help <name>`. May be empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Result of dispatching one finished line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line was empty after trimming; nothing was looked up or printed.
    Blank,
    /// The handler accepted its parameters.
    Success,
    /// The handler rejected its parameters and a usage hint was printed.
    UsageError,
    /// No command with that name is installed.
    UnknownCommand,
}
