//! Terminal front end: prompt, transcript printing, scheduled output, and
//! the nano and arrow-key handoffs.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use sandshell_terminal::{HistoryNavigator, ShellSession, tokenize};

use crate::editor;
use crate::input::{self, Arrow};
use crate::missions::MissionTracker;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const USER: &str = "usuario1";

pub struct Repl {
    session: ShellSession,
    nav: Rc<RefCell<HistoryNavigator>>,
    missions: Rc<RefCell<MissionTracker>>,
    hostname: String,
    prompt: String,
    printed: usize,
}

impl Repl {
    pub fn new(mut session: ShellSession, hostname: &str, prompt: &str) -> Self {
        let nav = Rc::new(RefCell::new(HistoryNavigator::new()));
        HistoryNavigator::attach(&nav, &mut session);
        let missions = Rc::new(RefCell::new(MissionTracker::tutorial()));
        MissionTracker::attach(&missions, &mut session);
        Self {
            session,
            nav,
            missions,
            hostname: hostname.to_string(),
            prompt: prompt.to_string(),
            printed: 0,
        }
    }

    fn prompt(&self) -> String {
        format!(
            "{USER}@{}:{}{}",
            self.hostname,
            self.session.cwd(),
            self.prompt
        )
    }

    /// Read lines until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        let mut recalled: Option<String> = None;
        loop {
            write!(out, "{}", self.prompt())?;
            if let Some(line) = &recalled {
                write!(out, "{line}")?;
            }
            out.flush()?;

            let mut raw = String::new();
            if input.read_line(&mut raw)? == 0 {
                writeln!(out)?;
                break;
            }
            let line = raw.trim_end_matches(['\r', '\n']);

            if let Some(arrows) = input::parse_arrows(line) {
                recalled = self.recall(&arrows);
                writeln!(out)?;
                continue;
            }
            // An empty line accepts the recalled command.
            let line = match recalled.take() {
                Some(prev) if line.trim().is_empty() => prev,
                _ => line.to_string(),
            };

            self.submit(&line, out)?;
            self.open_editor(input, out)?;
            if self.session.exit_requested() {
                log::info!("exit requested");
                break;
            }
        }
        Ok(())
    }

    fn recall(&self, arrows: &[Arrow]) -> Option<String> {
        let mut nav = self.nav.borrow_mut();
        let mut line = None;
        for arrow in arrows {
            let step = match arrow {
                Arrow::Up => nav.up(),
                Arrow::Down => nav.down(),
            };
            line = step.map(str::to_string);
        }
        line.filter(|l| !l.is_empty())
    }

    fn submit<W: Write>(&mut self, line: &str, out: &mut W) -> Result<()> {
        let echoed = tokenize(line.trim()).is_some();
        self.session.process(line);
        if self.session.take_cleared() {
            write!(out, "{CLEAR_SCREEN}")?;
            self.printed = 0;
        } else if echoed {
            // The terminal already shows what was typed.
            self.printed += 1;
        }
        self.print_new(out)?;

        // Scheduled lines finish printing before the next prompt. The session
        // only queues them; this front end is the one place that sleeps.
        while let Some(due) = self.session.next_due() {
            std::thread::sleep(due.saturating_duration_since(Instant::now()));
            self.session.poll(Instant::now());
            self.print_new(out)?;
        }

        for message in self.missions.borrow_mut().take_messages() {
            writeln!(out, "\n{message}\n")?;
        }
        Ok(())
    }

    fn print_new<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let transcript = self.session.transcript();
        for line in transcript.get(self.printed..).unwrap_or_default() {
            writeln!(out, "{line}")?;
        }
        self.printed = transcript.len();
        out.flush()?;
        Ok(())
    }

    fn open_editor<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        let Some(path) = self.session.take_editor_request() else {
            return Ok(());
        };
        match editor::edit(self.session.sandbox(), &path, input, out) {
            Ok(outcome) => log::debug!("editor closed {path}: {outcome:?}"),
            Err(e) => {
                log::warn!("editor failed on {path}: {e:#}");
                writeln!(out, "Error in nano: {e:#}")?;
            },
        }
        Ok(())
    }

    pub fn session(&self) -> &ShellSession {
        &self.session
    }
}
