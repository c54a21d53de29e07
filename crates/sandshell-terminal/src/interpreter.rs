//! Command trait, output type, environment, and registry.

use std::collections::HashMap;
use std::time::Duration;

use sandshell_types::error::{Result, ShellError};
use sandshell_vfs::{ResolvedPath, Sandbox, VirtualPath};

use crate::clock::Clock;

/// Output produced by a command.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Text, one transcript line per `\n`-separated line. A single trailing
    /// newline does not produce an extra line.
    Text(String),
    /// Ready-split lines, pushed as-is (blank lines included).
    Lines(Vec<String>),
    /// Command produced no visible output.
    None,
    /// Signal to reset the transcript.
    Clear,
    /// Signal to shut the interpreter down.
    Exit,
    /// Hand a resolved file to the external single-file editor.
    OpenEditor(ResolvedPath),
    /// Immediate text plus lines delivered later by the session.
    Scheduled {
        text: String,
        pending: Vec<ScheduledLine>,
    },
}

/// A line of output due some time after the command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledLine {
    /// Delay measured from the moment the command finished.
    pub delay: Duration,
    pub text: String,
}

/// Session state lent to every command for one invocation.
pub struct Environment<'a> {
    /// Current virtual directory. Only `cd` writes it.
    pub cwd: &'a mut VirtualPath,
    /// The sandbox every path must be resolved through.
    pub sandbox: &'a Sandbox,
    /// Read-only view of the registered commands (for `help`).
    pub registry: &'a CommandRegistry,
    /// Executed lines in order, including the current one.
    pub history: &'a [String],
    /// Wall clock and uptime source.
    pub clock: &'a dyn Clock,
}

impl Environment<'_> {
    /// Resolve a user-supplied path against the current directory.
    pub fn resolve(&self, input: &str) -> Result<ResolvedPath> {
        self.sandbox.resolve(self.cwd, input)
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "cp <src> <dst>").
    fn usage(&self) -> &str;

    /// Command category for grouping.
    fn category(&self) -> &str {
        "general"
    }

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;

    /// Usage error for this command.
    fn usage_error(&self) -> ShellError {
        ShellError::usage(self.usage())
    }
}

/// Registry of available commands, in registration order.
///
/// Built once at startup. Names are unique: registering a name twice is a
/// configuration error.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Fails if the name is already taken.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let name = cmd.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ShellError::DuplicateCommand(name));
        }
        self.index.insert(name, self.commands.len());
        self.commands.push(cmd);
        Ok(())
    }

    /// Look a command up by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.index.get(name).map(|&i| self.commands[i].as_ref())
    }

    /// All commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Split an input line into (command name, arguments).
///
/// Arguments are separated by whitespace; there is no quoting.
pub fn tokenize(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}
