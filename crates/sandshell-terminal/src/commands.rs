//! Built-in file system and shell commands.

use sandshell_types::error::{Result, ShellError};
use sandshell_vfs::{EntryKind, ResolvedPath};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register all built-in commands (fs, text, shell, system, network).
///
/// `host_suffix` is the domain suffix the simulated resolver accepts.
pub fn register_builtins(reg: &mut CommandRegistry, host_suffix: &str) -> Result<()> {
    reg.register(Box::new(CdCmd))?;
    reg.register(Box::new(LsCmd))?;
    reg.register(Box::new(PwdCmd))?;
    reg.register(Box::new(MkdirCmd))?;
    reg.register(Box::new(RmdirCmd))?;
    reg.register(Box::new(TouchCmd))?;
    reg.register(Box::new(RmCmd))?;
    reg.register(Box::new(CpCmd))?;
    reg.register(Box::new(MvCmd))?;
    reg.register(Box::new(CatCmd))?;
    reg.register(Box::new(EchoCmd))?;
    crate::text_commands::register_text_commands(reg)?;
    reg.register(Box::new(ClearCmd))?;
    reg.register(Box::new(ExitCmd))?;
    crate::network_commands::register_network_commands(reg, host_suffix)?;
    crate::system_commands::register_system_commands(reg)?;
    reg.register(Box::new(HistoryCmd))?;
    reg.register(Box::new(HelpCmd))?;
    reg.register(Box::new(NanoCmd))?;
    Ok(())
}

/// Exactly one argument, or the command's usage error.
pub(crate) fn single_arg<'a>(cmd: &dyn Command, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => Err(cmd.usage_error()),
    }
}

/// Exactly two arguments, or the command's usage error.
pub(crate) fn two_args<'a>(cmd: &dyn Command, args: &[&'a str]) -> Result<(&'a str, &'a str)> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(cmd.usage_error()),
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change working directory"
    }
    fn usage(&self) -> &str {
        "cd <path>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let target = env.resolve(single_arg(self, args)?)?;
        if !env.sandbox.is_dir(&target) {
            return Err(ShellError::Command(format!(
                "directory does not exist: {target}"
            )));
        }
        *env.cwd = target.virtual_path().clone();
        Ok(CommandOutput::Text(format!("current directory: {}", env.cwd)))
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let dir = match args {
            [] => env.resolve(".")?,
            [path] => env.resolve(path)?,
            _ => return Err(self.usage_error()),
        };
        let entries = env
            .sandbox
            .read_dir(&dir)
            .map_err(|e| ShellError::Command(format!("listing error: {e}")))?;
        let dirs = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Directory)
            .map(|e| format!("{}/", e.name));
        let files = entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.name.clone());
        let names: Vec<String> = dirs.chain(files).collect();
        if names.is_empty() {
            return Ok(CommandOutput::None);
        }
        Ok(CommandOutput::Text(names.join("   ")))
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(env.cwd.to_string()))
    }
}

// ---------------------------------------------------------------------------
// mkdir / rmdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn usage(&self) -> &str {
        "mkdir <name>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(single_arg(self, args)?)?;
        env.sandbox.create_dir(&path)?;
        Ok(CommandOutput::Text("directory created".to_string()))
    }
}

struct RmdirCmd;
impl Command for RmdirCmd {
    fn name(&self) -> &str {
        "rmdir"
    }
    fn description(&self) -> &str {
        "Remove an empty directory"
    }
    fn usage(&self) -> &str {
        "rmdir <name>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(single_arg(self, args)?)?;
        if env.cwd.segments().starts_with(path.virtual_path().segments()) {
            return Err(ShellError::Command(format!(
                "{path}: is the current directory or one of its parents"
            )));
        }
        env.sandbox.remove_dir(&path)?;
        Ok(CommandOutput::Text("directory removed".to_string()))
    }
}

// ---------------------------------------------------------------------------
// touch / rm
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn description(&self) -> &str {
        "Create an empty file"
    }
    fn usage(&self) -> &str {
        "touch <name>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(single_arg(self, args)?)?;
        env.sandbox.create_file(&path)?;
        Ok(CommandOutput::Text("file created".to_string()))
    }
}

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Remove a file"
    }
    fn usage(&self) -> &str {
        "rm <name>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(single_arg(self, args)?)?;
        if env.sandbox.is_dir(&path) {
            return Err(ShellError::Command(format!("{path}: is a directory")));
        }
        env.sandbox.remove_file(&path)?;
        Ok(CommandOutput::Text("file removed".to_string()))
    }
}

// ---------------------------------------------------------------------------
// cp / mv
// ---------------------------------------------------------------------------

/// Resolve a copy/move destination; a directory receives the source name.
fn destination(env: &Environment<'_>, src: &ResolvedPath, dst: &str) -> Result<ResolvedPath> {
    let dst = env.resolve(dst)?;
    match src.virtual_path().file_name() {
        Some(name) if env.sandbox.is_dir(&dst) => env
            .sandbox
            .resolve_virtual(dst.virtual_path().child(name)),
        _ => Ok(dst),
    }
}

struct CpCmd;
impl Command for CpCmd {
    fn name(&self) -> &str {
        "cp"
    }
    fn description(&self) -> &str {
        "Copy a file (overwrites the destination)"
    }
    fn usage(&self) -> &str {
        "cp <src> <dst>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (src, dst) = two_args(self, args)?;
        let src = env.resolve(src)?;
        if env.sandbox.is_dir(&src) {
            return Err(ShellError::Command(format!("{src}: is a directory")));
        }
        if !env.sandbox.is_file(&src) {
            return Err(ShellError::NotFound(src.to_string()));
        }
        let dst = destination(env, &src, dst)?;
        env.sandbox.copy(&src, &dst)?;
        Ok(CommandOutput::Text("copy complete".to_string()))
    }
}

struct MvCmd;
impl Command for MvCmd {
    fn name(&self) -> &str {
        "mv"
    }
    fn description(&self) -> &str {
        "Move or rename a file"
    }
    fn usage(&self) -> &str {
        "mv <src> <dst>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (src, dst) = two_args(self, args)?;
        let src = env.resolve(src)?;
        if !env.sandbox.exists(&src) {
            return Err(ShellError::NotFound(src.to_string()));
        }
        let dst = destination(env, &src, dst)?;
        if dst == src {
            return Ok(CommandOutput::None);
        }
        env.sandbox.rename(&src, &dst)?;
        Ok(CommandOutput::Text("move complete".to_string()))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display file contents"
    }
    fn usage(&self) -> &str {
        "cat <file>"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(single_arg(self, args)?)?;
        Ok(CommandOutput::Text(env.sandbox.read_to_string(&path)?))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print text, or write it to a file"
    }
    fn usage(&self) -> &str {
        "echo <text> [> file]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(self.usage_error());
        }
        // Split on the first `>` token; later ones belong to the file name.
        let Some(split) = args.iter().position(|&a| a == ">") else {
            return Ok(CommandOutput::Text(unquote(&args.join(" ")).to_string()));
        };
        let text = args[..split].join(" ");
        let file = args[split + 1..].join(" ");
        if file.is_empty() {
            return Err(self.usage_error());
        }
        let path = env.resolve(&file)?;
        env.sandbox.write(&path, unquote(text.trim()).as_bytes())?;
        Ok(CommandOutput::Text(format!("written to {file}")))
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(text: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .filter(|_| text.len() >= 2)
        .find_map(|q| text.strip_prefix(q).and_then(|t| t.strip_suffix(q)))
        .unwrap_or(text)
}

// ---------------------------------------------------------------------------
// clear / exit
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear terminal output"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Leave the shell"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit)
    }
}

// ---------------------------------------------------------------------------
// history / help
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "Show previously executed commands"
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        // The last entry is this invocation.
        let previous = env.history.split_last().map_or(&[][..], |(_, rest)| rest);
        if previous.is_empty() {
            return Ok(CommandOutput::None);
        }
        Ok(CommandOutput::Text(previous.join("\n")))
    }
}

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "List available commands"
    }
    fn usage(&self) -> &str {
        "help [category]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let category = match args {
            [] => None,
            [c] => Some(*c),
            _ => return Err(self.usage_error()),
        };
        let lines: Vec<String> = env
            .registry
            .iter()
            .filter(|c| category.is_none_or(|cat| c.category() == cat))
            .map(|c| format!("{:<10} {:<32} {}", c.name(), c.usage(), c.description()))
            .collect();
        if lines.is_empty() {
            return Err(ShellError::Command(format!(
                "no commands in category {}",
                category.unwrap_or_default()
            )));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// nano
// ---------------------------------------------------------------------------

struct NanoCmd;
impl Command for NanoCmd {
    fn name(&self) -> &str {
        "nano"
    }
    fn description(&self) -> &str {
        "Edit a file"
    }
    fn usage(&self) -> &str {
        "nano <file>"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(single_arg(self, args)?)?;
        if env.sandbox.is_dir(&path) {
            return Err(ShellError::Command(format!("{path}: is a directory")));
        }
        Ok(CommandOutput::OpenEditor(path))
    }
}
