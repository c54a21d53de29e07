//! Interactive shell session: dispatch, transcript, and history.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use sandshell_types::error::{Result, ShellError};
use sandshell_vfs::{ResolvedPath, Sandbox, VirtualPath};

use crate::clock::{Clock, SystemClock};
use crate::interpreter::{CommandOutput, CommandRegistry, Environment, tokenize};
use crate::notify::NotificationBus;

/// Prefix of the transcript line that echoes each input.
pub const ECHO_PREFIX: &str = "> ";

#[derive(Debug)]
struct PendingLine {
    due: Instant,
    text: String,
}

/// One interpreter session.
///
/// Owns the current virtual directory, the history, and the transcript.
/// Lines are processed one at a time and each runs to completion before
/// [`ShellSession::process`] returns.
pub struct ShellSession {
    registry: CommandRegistry,
    sandbox: Sandbox,
    clock: Box<dyn Clock>,
    cwd: VirtualPath,
    history: Vec<String>,
    transcript: Vec<String>,
    bus: NotificationBus,
    scheduled: VecDeque<PendingLine>,
    editor_request: Option<ResolvedPath>,
    cleared: bool,
    exit_requested: bool,
}

impl ShellSession {
    /// Start a session at `/` over `sandbox`.
    pub fn new(registry: CommandRegistry, sandbox: Sandbox) -> Self {
        Self {
            registry,
            sandbox,
            clock: Box::new(SystemClock::new()),
            cwd: VirtualPath::root(),
            history: Vec::new(),
            transcript: Vec::new(),
            bus: NotificationBus::new(),
            scheduled: VecDeque::new(),
            editor_request: None,
            cleared: false,
            exit_requested: false,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Process one input line.
    ///
    /// Blank lines are ignored. Otherwise the line is echoed, recorded in
    /// history, dispatched, and finally published to subscribers. Handler
    /// failures (including panics) become a single transcript line.
    pub fn process(&mut self, line: &str) {
        let trimmed = line.trim();
        let Some((name, args)) = tokenize(trimmed) else {
            return;
        };

        self.transcript.push(format!("{ECHO_PREFIX}{trimmed}"));
        self.history.push(trimmed.to_string());
        log::debug!("dispatch {name} ({} args)", args.len());

        match self.dispatch(name, &args) {
            Ok(output) => self.apply(output),
            Err(ShellError::Usage(usage)) => self.transcript.push(format!("usage: {usage}")),
            Err(e @ ShellError::UnknownCommand(_)) => self.transcript.push(e.to_string()),
            Err(e) => {
                log::warn!("{name} failed: {e}");
                self.transcript.push(format!("Error in {name}: {e}"));
            },
        }

        self.bus.publish(trimmed);
    }

    fn dispatch(&mut self, name: &str, args: &[&str]) -> Result<CommandOutput> {
        let cmd = self
            .registry
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;
        let mut env = Environment {
            cwd: &mut self.cwd,
            sandbox: &self.sandbox,
            registry: &self.registry,
            history: &self.history,
            clock: self.clock.as_ref(),
        };
        panic::catch_unwind(AssertUnwindSafe(|| cmd.execute(args, &mut env)))
            .unwrap_or_else(|payload| Err(ShellError::Command(panic_message(payload.as_ref()))))
    }

    fn apply(&mut self, output: CommandOutput) {
        match output {
            CommandOutput::Text(text) => self.push_text(&text),
            CommandOutput::Lines(lines) => self.transcript.extend(lines),
            CommandOutput::None => {},
            CommandOutput::Clear => {
                self.transcript.clear();
                self.cleared = true;
            },
            CommandOutput::Exit => self.exit_requested = true,
            CommandOutput::OpenEditor(path) => self.editor_request = Some(path),
            CommandOutput::Scheduled { text, pending } => {
                self.push_text(&text);
                let now = Instant::now();
                for line in pending {
                    self.scheduled.push_back(PendingLine {
                        due: now + line.delay,
                        text: line.text,
                    });
                }
            },
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string());
        self.transcript.extend(lines);
    }

    /// Move every scheduled line due at `now` into the transcript.
    /// Returns how many lines were delivered.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while self.scheduled.front().is_some_and(|p| p.due <= now) {
            if let Some(line) = self.scheduled.pop_front() {
                self.transcript.push(line.text);
                delivered += 1;
            }
        }
        delivered
    }

    /// Deliver all scheduled lines immediately.
    pub fn flush_scheduled(&mut self) {
        let lines = self.scheduled.drain(..).map(|p| p.text);
        self.transcript.extend(lines);
    }

    /// When the next scheduled line becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.scheduled.front().map(|p| p.due)
    }

    pub fn has_scheduled(&self) -> bool {
        !self.scheduled.is_empty()
    }

    /// Register a callback for processed lines.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.bus.subscribe(callback);
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cwd(&self) -> &VirtualPath {
        &self.cwd
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Take the file handed off by the last `nano`, if any.
    pub fn take_editor_request(&mut self) -> Option<ResolvedPath> {
        self.editor_request.take()
    }

    /// Whether a `clear` ran since the last call.
    pub fn take_cleared(&mut self) -> bool {
        std::mem::take(&mut self.cleared)
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "command panicked".to_string()
    }
}
