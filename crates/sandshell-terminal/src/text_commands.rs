//! Line-oriented text commands: grep, head, tail, diff.

use sandshell_types::error::{Result, ShellError};

use crate::commands::two_args;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register text commands.
pub fn register_text_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(GrepCmd))?;
    reg.register(Box::new(HeadCmd))?;
    reg.register(Box::new(TailCmd))?;
    reg.register(Box::new(DiffCmd))?;
    Ok(())
}

fn lines_output(lines: Vec<&str>) -> CommandOutput {
    if lines.is_empty() {
        CommandOutput::None
    } else {
        CommandOutput::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

/// Parse `-n <N> <file>`.
fn count_and_file<'a>(cmd: &dyn Command, args: &[&'a str]) -> Result<(usize, &'a str)> {
    match args {
        ["-n", n, file] => {
            let n = n.parse::<usize>().map_err(|_| cmd.usage_error())?;
            Ok((n, file))
        },
        _ => Err(cmd.usage_error()),
    }
}

// ---------------------------------------------------------------------------
// grep
// ---------------------------------------------------------------------------

struct GrepCmd;
impl Command for GrepCmd {
    fn name(&self) -> &str {
        "grep"
    }
    fn description(&self) -> &str {
        "Print lines containing a literal pattern"
    }
    fn usage(&self) -> &str {
        "grep <pattern> <file>"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (pattern, file) = two_args(self, args)?;
        let content = env.sandbox.read_to_string(&env.resolve(file)?)?;
        Ok(lines_output(
            content.lines().filter(|l| l.contains(pattern)).collect(),
        ))
    }
}

// ---------------------------------------------------------------------------
// head / tail
// ---------------------------------------------------------------------------

struct HeadCmd;
impl Command for HeadCmd {
    fn name(&self) -> &str {
        "head"
    }
    fn description(&self) -> &str {
        "Print the first N lines of a file"
    }
    fn usage(&self) -> &str {
        "head -n <N> <file>"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (n, file) = count_and_file(self, args)?;
        let content = env.sandbox.read_to_string(&env.resolve(file)?)?;
        Ok(lines_output(content.lines().take(n).collect()))
    }
}

struct TailCmd;
impl Command for TailCmd {
    fn name(&self) -> &str {
        "tail"
    }
    fn description(&self) -> &str {
        "Print the last N lines of a file"
    }
    fn usage(&self) -> &str {
        "tail -n <N> <file>"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (n, file) = count_and_file(self, args)?;
        let content = env.sandbox.read_to_string(&env.resolve(file)?)?;
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines_output(lines[start..].to_vec()))
    }
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

struct DiffCmd;
impl Command for DiffCmd {
    fn name(&self) -> &str {
        "diff"
    }
    fn description(&self) -> &str {
        "Compare two files line by line"
    }
    fn usage(&self) -> &str {
        "diff <file1> <file2>"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (a, b) = two_args(self, args)?;
        let (a, b) = (env.resolve(a)?, env.resolve(b)?);
        if !env.sandbox.is_file(&a) || !env.sandbox.is_file(&b) {
            return Err(ShellError::Command(
                "one of the files does not exist".to_string(),
            ));
        }
        let left = env.sandbox.read_to_string(&a)?;
        let right = env.sandbox.read_to_string(&b)?;

        // Only the common prefix length is compared.
        let diffs: Vec<String> = left
            .lines()
            .zip(right.lines())
            .enumerate()
            .filter(|(_, (l, r))| l != r)
            .map(|(i, _)| format!("{}c difference", i + 1))
            .collect();
        if diffs.is_empty() {
            return Ok(CommandOutput::Text("files are identical".to_string()));
        }
        Ok(CommandOutput::Text(diffs.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandshell_vfs::{Sandbox, VirtualPath};

    struct Fixture {
        _dir: tempfile::TempDir,
        sandbox: Sandbox,
        registry: CommandRegistry,
        cwd: VirtualPath,
        clock: crate::clock::SystemClock,
    }

    fn setup() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("three.txt"), "uno\ndos\ntres\n").unwrap();
        std::fs::write(dir.path().join("other.txt"), "uno\nDOS\ntres\ncuatro\n").unwrap();
        std::fs::write(dir.path().join("gaps.txt"), "\n\nuno\n\n").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut registry = CommandRegistry::new();
        register_text_commands(&mut registry).unwrap();
        Fixture {
            _dir: dir,
            sandbox,
            registry,
            cwd: VirtualPath::root(),
            clock: crate::clock::SystemClock::new(),
        }
    }

    fn exec(fx: &mut Fixture, line: &str) -> Result<CommandOutput> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = parts.split_first().unwrap();
        let mut env = Environment {
            cwd: &mut fx.cwd,
            sandbox: &fx.sandbox,
            registry: &fx.registry,
            history: &[],
            clock: &fx.clock,
        };
        fx.registry.get(name).unwrap().execute(args, &mut env)
    }

    fn text(out: Result<CommandOutput>) -> String {
        match out.unwrap() {
            CommandOutput::Text(s) => s,
            _ => panic!("expected text"),
        }
    }

    fn lines(out: Result<CommandOutput>) -> Vec<String> {
        match out.unwrap() {
            CommandOutput::Lines(l) => l,
            _ => panic!("expected lines"),
        }
    }

    fn is_empty(out: Result<CommandOutput>) -> bool {
        matches!(out, Ok(CommandOutput::None))
    }

    #[test]
    fn grep_matches_literal_substring() {
        let mut fx = setup();
        assert_eq!(lines(exec(&mut fx, "grep os three.txt")), ["dos"]);
        assert!(is_empty(exec(&mut fx, "grep .* three.txt")));
    }

    #[test]
    fn grep_missing_file_is_error() {
        let mut fx = setup();
        assert!(matches!(
            exec(&mut fx, "grep x nope.txt"),
            Err(ShellError::NotFound(_))
        ));
    }

    #[test]
    fn grep_wrong_arity_is_usage() {
        let mut fx = setup();
        assert!(matches!(exec(&mut fx, "grep x"), Err(ShellError::Usage(_))));
    }

    #[test]
    fn head_takes_first_lines() {
        let mut fx = setup();
        assert_eq!(lines(exec(&mut fx, "head -n 2 three.txt")), ["uno", "dos"]);
    }

    #[test]
    fn head_zero_prints_nothing() {
        let mut fx = setup();
        assert!(is_empty(exec(&mut fx, "head -n 0 three.txt")));
    }

    #[test]
    fn tail_beyond_length_prints_all() {
        let mut fx = setup();
        assert_eq!(
            lines(exec(&mut fx, "tail -n 100 three.txt")),
            ["uno", "dos", "tres"]
        );
        assert_eq!(lines(exec(&mut fx, "tail -n 1 three.txt")), ["tres"]);
    }

    #[test]
    fn blank_lines_are_kept() {
        let mut fx = setup();
        assert_eq!(lines(exec(&mut fx, "head -n 2 gaps.txt")), ["", ""]);
        assert_eq!(lines(exec(&mut fx, "head -n 1 gaps.txt")), [""]);
        assert_eq!(lines(exec(&mut fx, "tail -n 1 gaps.txt")), [""]);
        assert_eq!(lines(exec(&mut fx, "tail -n 2 gaps.txt")), ["uno", ""]);
    }

    #[test]
    fn head_tail_reject_malformed_count() {
        let mut fx = setup();
        for line in [
            "head -n x three.txt",
            "head -n -1 three.txt",
            "tail 3 three.txt",
            "tail -n 3",
        ] {
            assert!(
                matches!(exec(&mut fx, line), Err(ShellError::Usage(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn head_missing_file_is_error() {
        let mut fx = setup();
        assert!(matches!(
            exec(&mut fx, "head -n 1 nope.txt"),
            Err(ShellError::NotFound(_))
        ));
    }

    #[test]
    fn diff_reports_differing_lines_within_shorter_length() {
        let mut fx = setup();
        assert_eq!(text(exec(&mut fx, "diff three.txt other.txt")), "2c difference");
    }

    #[test]
    fn diff_identical_files() {
        let mut fx = setup();
        assert_eq!(
            text(exec(&mut fx, "diff three.txt three.txt")),
            "files are identical"
        );
    }

    #[test]
    fn diff_missing_file() {
        let mut fx = setup();
        for line in ["diff three.txt nope.txt", "diff three.txt sub"] {
            match exec(&mut fx, line) {
                Err(ShellError::Command(msg)) => {
                    assert_eq!(msg, "one of the files does not exist")
                },
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
