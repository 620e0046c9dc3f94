use crate::command::{Command, Handler};
use anyhow::Result;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Why [`Registry::try_install`] refused a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("command name is empty")]
    Empty,
    #[error("command name '{0}' contains whitespace")]
    Whitespace(String),
    #[error("command '{0}' is already installed")]
    Duplicate(String),
}

/// Ordered table of installed commands.
///
/// Names are unique, case-sensitive and single-token. Insertion order is kept
/// for listing (`help`, completion candidates) but does not affect lookup.
/// There is no removal: a registry is filled once, before the first poll, and
/// only read afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    /// An empty registry, without even the built-in commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `clear` and `help` commands.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtin::install_builtins(&mut registry);
        registry
    }

    /// Install a command with an empty description.
    ///
    /// Returns `false`, leaving the registry untouched, if the trimmed name is
    /// empty, contains whitespace, or is already taken.
    pub fn install<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: Fn(&str, &mut dyn Write) -> Result<bool> + 'static,
    {
        self.install_with_description(name, "", handler)
    }

    /// Install a command with a description shown by `help <name>`.
    pub fn install_with_description<F>(&mut self, name: &str, description: &str, handler: F) -> bool
    where
        F: Fn(&str, &mut dyn Write) -> Result<bool> + 'static,
    {
        self.try_install(name, description, handler).is_ok()
    }

    /// Like [`install_with_description`](Self::install_with_description), but
    /// says why a command was refused and accepts any [`Handler`].
    pub fn try_install(
        &mut self,
        name: &str,
        description: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), RegistrationError> {
        self.insert(name, description, Box::new(handler))
            .inspect_err(|err| debug!(%err, "rejected command registration"))
    }

    fn insert(
        &mut self,
        name: &str,
        description: &str,
        handler: Box<dyn Handler>,
    ) -> Result<(), RegistrationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistrationError::Empty);
        }
        if name.contains(char::is_whitespace) {
            return Err(RegistrationError::Whitespace(name.to_string()));
        }
        if self.lookup_exact(name).is_some() {
            return Err(RegistrationError::Duplicate(name.to_string()));
        }

        debug!(name, "installed command");
        self.commands.push(Command::new(
            name.to_string(),
            description.trim().to_string(),
            handler,
        ));
        Ok(())
    }

    /// Find a command by its exact name.
    pub fn lookup_exact(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name() == name)
    }

    /// Names starting with `prefix`, in insertion order. An empty prefix matches
    /// every name.
    pub fn lookup_by_prefix(&self, prefix: &str) -> Vec<&str> {
        self.commands
            .iter()
            .map(Command::name)
            .filter(|name| name.starts_with(prefix))
            .collect()
    }

    /// All names, in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.lookup_by_prefix("")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(_params: &str, _out: &mut dyn Write) -> Result<bool> {
        Ok(true)
    }

    fn reject(_params: &str, _out: &mut dyn Write) -> Result<bool> {
        Ok(false)
    }

    #[test]
    fn test_duplicate_install_keeps_first_handler() {
        let mut registry = Registry::new();
        assert!(registry.install("led", accept));
        assert!(!registry.install("led", reject));
        assert_eq!(registry.len(), 1);

        let mut out = Vec::new();
        let command = registry.lookup_exact("led").unwrap();
        assert!(command.handler().call("", &mut out, &registry).unwrap());
    }

    #[test]
    fn test_install_trims_name_and_description() {
        let mut registry = Registry::new();
        assert!(registry.install_with_description("  reboot ", "  restart the board ", accept));

        let command = registry.lookup_exact("reboot").unwrap();
        assert_eq!(command.name(), "reboot");
        assert_eq!(command.description(), "restart the board");
    }

    #[test]
    fn test_install_rejects_malformed_names() {
        let mut registry = Registry::new();
        assert!(!registry.install("", accept));
        assert!(!registry.install("   ", accept));
        assert!(!registry.install("set led", accept));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_try_install_reports_reason() {
        let mut registry = Registry::new();
        assert_eq!(registry.try_install(" ", "", accept), Err(RegistrationError::Empty));
        assert_eq!(
            registry.try_install("a b", "", accept),
            Err(RegistrationError::Whitespace("a b".to_string()))
        );
        assert_eq!(registry.try_install("a", "", accept), Ok(()));
        assert_eq!(
            registry.try_install(" a ", "", accept),
            Err(RegistrationError::Duplicate("a".to_string()))
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut registry = Registry::new();
        assert!(registry.install("Led", accept));
        assert!(registry.install("led", accept));
        assert!(registry.lookup_exact("LED").is_none());
        assert_eq!(registry.names(), vec!["Led", "led"]);
    }

    #[test]
    fn test_lookup_by_prefix_keeps_insertion_order() {
        let mut registry = Registry::new();
        registry.install("getAll", accept);
        registry.install("set", accept);
        registry.install("get", accept);

        assert_eq!(registry.lookup_by_prefix("ge"), vec!["getAll", "get"]);
        assert_eq!(registry.lookup_by_prefix(""), vec!["getAll", "set", "get"]);
        assert!(registry.lookup_by_prefix("x").is_empty());
    }

    #[test]
    fn test_with_builtins() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.names(), vec!["clear", "help"]);
    }
}
