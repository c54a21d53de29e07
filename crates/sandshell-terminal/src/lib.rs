//! Command interpreter and terminal session.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. A `ShellSession` tokenizes
//! each input line, resolves the command name, dispatches `execute()`, and
//! records the outcome in its transcript.

pub mod clock;
mod commands;
mod history_nav;
mod interpreter;
pub mod network_commands;
mod notify;
mod session;
pub mod system_commands;
pub mod text_commands;

/// Register all built-in commands (fs, text, system, network) into a registry.
pub use commands::register_builtins;
/// Wall clock and uptime source for time-dependent commands.
pub use clock::{Clock, FixedClock, SystemClock};
/// Arrow-key recall over processed lines.
pub use history_nav::HistoryNavigator;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text, signals, delayed lines).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Shared mutable environment passed to every command.
pub use interpreter::Environment;
/// A line delivered after a delay.
pub use interpreter::ScheduledLine;
pub use interpreter::tokenize;
/// Register network commands (ping, ssh) into a registry.
pub use network_commands::{HostResolver, register_network_commands};
/// Synchronous publish point for processed lines.
pub use notify::NotificationBus;
/// One interpreter session with transcript and history.
pub use session::{ECHO_PREFIX, ShellSession};
/// Register system information commands into a registry.
pub use system_commands::register_system_commands;
/// Register text commands (grep, head, tail, diff) into a registry.
pub use text_commands::register_text_commands;
