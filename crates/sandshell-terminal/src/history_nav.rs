//! Up/down arrow recall over processed command lines.

use std::cell::RefCell;
use std::rc::Rc;

use crate::session::ShellSession;

/// Cursor over previously processed lines.
///
/// The index sits one past the newest entry after each new line, so the
/// first `up` recalls the most recent command.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    entries: Vec<String>,
    index: usize,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a shared navigator to a session's notifications.
    pub fn attach(nav: &Rc<RefCell<HistoryNavigator>>, session: &mut ShellSession) {
        let nav = Rc::clone(nav);
        session.subscribe(move |line| nav.borrow_mut().record(line));
    }

    pub fn record(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.index = self.entries.len();
    }

    /// Step back; stays on the oldest entry once reached.
    pub fn up(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.index = self.index.saturating_sub(1);
        Some(&self.entries[self.index])
    }

    /// Step forward; past the newest entry yields an empty line.
    pub fn down(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.index = (self.index + 1).min(self.entries.len());
        Some(self.entries.get(self.index).map_or("", String::as_str))
    }
}
