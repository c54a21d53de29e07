//! Simulated network commands: ping, ssh.
//!
//! Nothing here touches the network. Host names are checked against a
//! [`HostResolver`] and the replies are canned.

use std::time::Duration;

use sandshell_types::error::Result;

use crate::commands::single_arg;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, ScheduledLine};

const PING_COUNT: u32 = 4;
const PING_INTERVAL: Duration = Duration::from_millis(200);

/// Register network commands resolving `localhost` and `*{host_suffix}`.
pub fn register_network_commands(reg: &mut CommandRegistry, host_suffix: &str) -> Result<()> {
    let resolver = HostResolver::new(host_suffix);
    reg.register(Box::new(PingCmd {
        resolver: resolver.clone(),
    }))?;
    reg.register(Box::new(SshCmd { resolver }))?;
    Ok(())
}

/// Decides which host names the simulated network knows.
#[derive(Debug, Clone)]
pub struct HostResolver {
    suffix: String,
}

impl HostResolver {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
        }
    }

    pub fn is_resolvable(&self, host: &str) -> bool {
        host == "localhost" || (!self.suffix.is_empty() && host.ends_with(&self.suffix))
    }
}

/// Round-trip time in ms for a reply, stable for a given host and sequence.
fn reply_time(host: &str, seq: u32) -> f64 {
    let seed = host
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    let spread = seed.wrapping_add(seq.wrapping_mul(17)) % 49;
    0.1 + f64::from(spread) / 10.0
}

// ---------------------------------------------------------------------------
// ping
// ---------------------------------------------------------------------------

struct PingCmd {
    resolver: HostResolver,
}

impl Command for PingCmd {
    fn name(&self) -> &str {
        "ping"
    }
    fn description(&self) -> &str {
        "Send echo requests to a host"
    }
    fn usage(&self) -> &str {
        "ping <host>"
    }
    fn category(&self) -> &str {
        "network"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let host = single_arg(self, args)?;
        if !self.resolver.is_resolvable(host) {
            return Ok(CommandOutput::Text(format!(
                "ping: could not resolve host {host}"
            )));
        }
        let reply = |seq: u32| {
            format!(
                "64 bytes from {host}: icmp_seq={seq} time={:.1} ms",
                reply_time(host, seq)
            )
        };
        let mut pending: Vec<ScheduledLine> = (2..=PING_COUNT)
            .map(|seq| ScheduledLine {
                delay: PING_INTERVAL * (seq - 1),
                text: reply(seq),
            })
            .collect();
        let summary = PING_INTERVAL * PING_COUNT;
        pending.push(ScheduledLine {
            delay: summary,
            text: format!("--- {host} ping statistics ---"),
        });
        pending.push(ScheduledLine {
            delay: summary,
            text: format!(
                "{PING_COUNT} packets transmitted, {PING_COUNT} received, 0% packet loss"
            ),
        });
        Ok(CommandOutput::Scheduled {
            text: reply(1),
            pending,
        })
    }
}

// ---------------------------------------------------------------------------
// ssh
// ---------------------------------------------------------------------------

struct SshCmd {
    resolver: HostResolver,
}

impl Command for SshCmd {
    fn name(&self) -> &str {
        "ssh"
    }
    fn description(&self) -> &str {
        "Open a remote session"
    }
    fn usage(&self) -> &str {
        "ssh <user>@<host>"
    }
    fn category(&self) -> &str {
        "network"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let target = single_arg(self, args)?;
        let Some((user, host)) = target.split_once('@') else {
            return Err(self.usage_error());
        };
        if user.is_empty() || host.is_empty() {
            return Err(self.usage_error());
        }
        if !self.resolver.is_resolvable(host) {
            return Ok(CommandOutput::Text(format!(
                "ssh: could not resolve host {host}"
            )));
        }
        Ok(CommandOutput::Text(format!(
            "Password for {user}@{host}:\nAuthentication successful."
        )))
    }
}
