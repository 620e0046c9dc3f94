use crate::command::Handler;
use crate::interpreter::Builtin;
use crate::registry::Registry;
use crate::stream::{CLEAR_SCREEN, NEWLINE};
use anyhow::Result;
use std::io::Write;
use tracing::{trace, warn};

/// Commands every console ships with.
///
/// Parameters are whitespace-separated tokens taken literally: words such as
/// `help`, `--help` or `--` are ordinary tokens. A builtin that cannot be built
/// from its tokens counts as a usage error; the dispatcher then points the user
/// at `help <name>`.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "clear".
    fn name() -> &'static str;

    /// Text printed by `help <name>`.
    fn description() -> &'static str;

    /// Build the command from its parameter tokens, `None` on bad arity.
    fn from_params(params: &[&str]) -> Option<Self>;

    /// Executes the command.
    fn execute(self, out: &mut dyn Write, registry: &Registry) -> Result<()>;
}

impl<T: BuiltinCommand> Handler for Builtin<T> {
    fn call(&self, params: &str, out: &mut dyn Write, registry: &Registry) -> Result<bool> {
        let tokens: Vec<&str> = params.split_whitespace().collect();
        let Some(cmd) = T::from_params(&tokens) else {
            trace!(name = T::name(), params, "builtin rejected parameters");
            return Ok(false);
        };
        cmd.execute(out, registry)?;
        Ok(true)
    }
}

pub(crate) fn install_builtins(registry: &mut Registry) {
    install::<Clear>(registry);
    install::<Help>(registry);
}

fn install<T: BuiltinCommand + 'static>(registry: &mut Registry) {
    if let Err(err) = registry.try_install(T::name(), T::description(), Builtin::<T>::default()) {
        warn!(%err, "builtin not installed");
    }
}

/// Clear the terminal screen. Takes no parameters.
pub struct Clear;

impl BuiltinCommand for Clear {
    fn name() -> &'static str {
        "clear"
    }

    fn description() -> &'static str {
        "clear\t: clear screen"
    }

    fn from_params(params: &[&str]) -> Option<Self> {
        params.is_empty().then_some(Clear)
    }

    fn execute(self, out: &mut dyn Write, _registry: &Registry) -> Result<()> {
        out.write_all(CLEAR_SCREEN.as_bytes())?;
        Ok(())
    }
}

/// List installed commands, or describe one of them.
pub struct Help {
    /// Command to describe. Lists every command when omitted.
    pub command: Option<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "help\t: list commands, or 'help <command>' for details"
    }

    fn from_params(params: &[&str]) -> Option<Self> {
        match params {
            [] => Some(Help { command: None }),
            [name] => Some(Help {
                command: Some(name.to_string()),
            }),
            _ => None,
        }
    }

    fn execute(self, out: &mut dyn Write, registry: &Registry) -> Result<()> {
        let Some(name) = self.command else {
            write!(out, "{}{}", registry.names().join(" "), NEWLINE)?;
            write!(out, "Type 'help <command>' for details{}", NEWLINE)?;
            return Ok(());
        };

        match registry.lookup_exact(&name) {
            Some(command) if command.description().is_empty() => {
                write!(out, "No description for '{}'{}", name, NEWLINE)?
            }
            Some(command) => write!(out, "{}{}", command.description(), NEWLINE)?,
            None => write!(out, "Unknown command '{}'{}", name, NEWLINE)?,
        }
        Ok(())
    }
}
