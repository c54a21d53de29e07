//! Simulated system information commands.

use chrono::{Datelike, NaiveDate};
use sandshell_types::error::{Result, ShellError};

use crate::commands::single_arg;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register system commands.
pub fn register_system_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(UptimeCmd))?;
    reg.register(Box::new(AptGetCmd))?;
    reg.register(Box::new(AptCmd))?;
    reg.register(Box::new(SystemctlCmd))?;
    reg.register(Box::new(DfCmd))?;
    reg.register(Box::new(CalCmd))?;
    reg.register(Box::new(DateCmd))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// uptime
// ---------------------------------------------------------------------------

struct UptimeCmd;
impl Command for UptimeCmd {
    fn name(&self) -> &str {
        "uptime"
    }
    fn description(&self) -> &str {
        "Show how long the system has been running"
    }
    fn usage(&self) -> &str {
        "uptime"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let secs = env.clock.uptime().as_secs();
        let days = secs / 86400;
        let hours = (secs % 86400) / 3600;
        let minutes = (secs % 3600) / 60;
        Ok(CommandOutput::Text(format!(
            "up {days} days, {hours} hours, {minutes} minutes"
        )))
    }
}

// ---------------------------------------------------------------------------
// apt-get / apt
// ---------------------------------------------------------------------------

struct AptGetCmd;
impl Command for AptGetCmd {
    fn name(&self) -> &str {
        "apt-get"
    }
    fn description(&self) -> &str {
        "Package cache maintenance"
    }
    fn usage(&self) -> &str {
        "apt-get <clean|autoclean|autoremove>"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let msg = match single_arg(self, args)? {
            "clean" => "Cleaning package caches...",
            "autoclean" => "Autoclean complete.",
            "autoremove" => "Orphaned packages removed.",
            _ => return Err(self.usage_error()),
        };
        Ok(CommandOutput::Text(msg.to_string()))
    }
}

struct AptCmd;
impl Command for AptCmd {
    fn name(&self) -> &str {
        "apt"
    }
    fn description(&self) -> &str {
        "Refresh or upgrade packages"
    }
    fn usage(&self) -> &str {
        "apt <update|upgrade>"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let msg = match single_arg(self, args)? {
            "update" => "Reading package lists...",
            "upgrade" => "Upgrading packages...",
            _ => return Err(self.usage_error()),
        };
        Ok(CommandOutput::Text(msg.to_string()))
    }
}

// ---------------------------------------------------------------------------
// systemctl
// ---------------------------------------------------------------------------

struct SystemctlCmd;
impl Command for SystemctlCmd {
    fn name(&self) -> &str {
        "systemctl"
    }
    fn description(&self) -> &str {
        "Show service status"
    }
    fn usage(&self) -> &str {
        "systemctl status <service>"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ["status", svc] = args else {
            return Err(self.usage_error());
        };
        Ok(CommandOutput::Text(format!(
            "● {svc}.service - Simulated service\n   \
             Loaded: loaded (/etc/systemd/system/{svc}.service)\n   \
             Active: active (running)"
        )))
    }
}

// ---------------------------------------------------------------------------
// df
// ---------------------------------------------------------------------------

struct DfCmd;
impl Command for DfCmd {
    fn name(&self) -> &str {
        "df"
    }
    fn description(&self) -> &str {
        "Report disk usage"
    }
    fn usage(&self) -> &str {
        "df -h"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if !args.contains(&"-h") {
            return Err(self.usage_error());
        }
        Ok(CommandOutput::Text(
            "Filesystem      Size  Used Avail Use% Mounted on\n\
             rootfs          50G   20G   30G   40% /"
                .to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// cal / date
// ---------------------------------------------------------------------------

struct CalCmd;
impl Command for CalCmd {
    fn name(&self) -> &str {
        "cal"
    }
    fn description(&self) -> &str {
        "Show a calendar for the current month"
    }
    fn usage(&self) -> &str {
        "cal"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let today = env.clock.now().date_naive();
        Ok(CommandOutput::Text(month_grid(today.year(), today.month())?))
    }
}

/// Render a month as a Sunday-first weekday grid.
fn month_grid(year: i32, month: u32) -> Result<String> {
    let invalid = || ShellError::Command(format!("invalid date {year}-{month}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let days = next.signed_duration_since(first).num_days() as u32;

    let title = first.format("%B %Y").to_string();
    let mut out = vec![format!("{title:^20}").trim_end().to_string()];
    out.push("Su Mo Tu We Th Fr Sa".to_string());

    let offset = first.weekday().num_days_from_sunday() as usize;
    let mut row: Vec<String> = vec!["  ".to_string(); offset];
    for day in 1..=days {
        row.push(format!("{day:>2}"));
        if row.len() == 7 {
            out.push(row.join(" "));
            row.clear();
        }
    }
    if !row.is_empty() {
        out.push(row.join(" "));
    }
    Ok(out.join("\n"))
}

struct DateCmd;
impl Command for DateCmd {
    fn name(&self) -> &str {
        "date"
    }
    fn description(&self) -> &str {
        "Show the current date and time"
    }
    fn usage(&self) -> &str {
        "date"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let now = env.clock.now();
        Ok(CommandOutput::Text(
            now.format("%a %b %e %H:%M:%S %Y").to_string(),
        ))
    }
}
