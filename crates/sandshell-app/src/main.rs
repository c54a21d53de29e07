//! sandshell entry point.
//!
//! Opens the sandbox, seeds the scenario files, and runs an interactive
//! shell on stdin/stdout. Logs go to stderr (`RUST_LOG` overrides the
//! default `warn` filter).

mod editor;
mod input;
mod missions;
mod repl;
mod vfs_setup;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use repl::Repl;
use sandshell_terminal::{CommandRegistry, ShellSession, register_builtins};
use sandshell_types::config::ShellConfig;
use sandshell_vfs::Sandbox;

#[derive(Parser, Debug)]
#[command(name = "sandshell", version, about = "Sandboxed Unix-like shell emulator")]
struct Cli {
    /// Sandbox root directory (default from config, or ./ubuntu_sim).
    #[arg(long)]
    root: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip creating the scenario directories and files.
    #[arg(long)]
    no_seed: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };

    // Resolve sandbox root from CLI arg, SANDSHELL_ROOT env var, or config.
    if let Some(root) = cli
        .root
        .or_else(|| std::env::var_os("SANDSHELL_ROOT").map(PathBuf::from))
    {
        config.sandbox_root = root;
    }

    let sandbox = Sandbox::open(&config.sandbox_root)?;
    if cli.no_seed {
        log::info!("seeding skipped");
    } else {
        vfs_setup::seed_sandbox(&sandbox, &config.seed)?;
    }

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry, &config.host_suffix)?;
    log::info!("{} commands registered", registry.len());

    let session = ShellSession::new(registry, sandbox);
    let mut repl = Repl::new(session, &config.hostname, &config.prompt);
    repl.run(&mut io::stdin().lock(), &mut io::stdout().lock())?;
    log::info!(
        "session ended after {} commands",
        repl.session().history().len()
    );
    Ok(())
}
