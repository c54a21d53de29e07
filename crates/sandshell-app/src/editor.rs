//! Line-based single-file editor behind `nano`.
//!
//! The whole file is loaded into a buffer (empty when the file does not
//! exist yet). Typed lines are appended; `:wq` writes the buffer back and
//! `:q` discards it.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use sandshell_vfs::{ResolvedPath, Sandbox};

/// How an editing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Saved,
    Discarded,
}

pub fn edit<R: BufRead, W: Write>(
    sandbox: &Sandbox,
    path: &ResolvedPath,
    input: &mut R,
    out: &mut W,
) -> Result<EditOutcome> {
    let mut buffer: Vec<String> = if sandbox.is_file(path) {
        sandbox
            .read_to_string(path)
            .with_context(|| format!("reading {path}"))?
            .lines()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    writeln!(out, "-- {path} -- :wq save, :q quit, :p print, :d delete last line")?;
    print_buffer(&buffer, out)?;

    loop {
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // End of input without :wq.
            return Ok(EditOutcome::Discarded);
        }
        match line.trim_end_matches(['\r', '\n']) {
            ":wq" => {
                let mut text = buffer.join("\n");
                if !text.is_empty() {
                    text.push('\n');
                }
                sandbox
                    .write(path, text.as_bytes())
                    .with_context(|| format!("saving {path}"))?;
                writeln!(out, "written to {path}")?;
                return Ok(EditOutcome::Saved);
            },
            ":q" => return Ok(EditOutcome::Discarded),
            ":p" => print_buffer(&buffer, out)?,
            ":d" => {
                buffer.pop();
            },
            text => buffer.push(text.to_string()),
        }
    }
}

fn print_buffer<W: Write>(buffer: &[String], out: &mut W) -> Result<()> {
    for (i, line) in buffer.iter().enumerate() {
        writeln!(out, "{:>4}  {line}", i + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandshell_vfs::VirtualPath;
    use std::io::Cursor;

    fn setup(existing: Option<&str>) -> (tempfile::TempDir, Sandbox, ResolvedPath) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        let path = sandbox.resolve(&VirtualPath::root(), "notes.txt").unwrap();
        if let Some(text) = existing {
            sandbox.write(&path, text.as_bytes()).unwrap();
        }
        (dir, sandbox, path)
    }

    fn run(sandbox: &Sandbox, path: &ResolvedPath, keys: &str) -> (EditOutcome, String) {
        let mut input = Cursor::new(keys.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = edit(sandbox, path, &mut input, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn new_file_saved_on_wq() {
        let (_d, sandbox, path) = setup(None);
        let (outcome, out) = run(&sandbox, &path, "hola\nmundo\n:wq\n");
        assert_eq!(outcome, EditOutcome::Saved);
        assert!(out.contains("written to /notes.txt"));
        assert_eq!(sandbox.read_to_string(&path).unwrap(), "hola\nmundo\n");
    }

    #[test]
    fn existing_contents_are_kept_and_extended() {
        let (_d, sandbox, path) = setup(Some("uno\ndos"));
        let (_, out) = run(&sandbox, &path, ":d\ntres\n:wq\n");
        assert!(out.contains("   1  uno"));
        assert_eq!(sandbox.read_to_string(&path).unwrap(), "uno\ntres\n");
    }

    #[test]
    fn quit_discards_changes() {
        let (_d, sandbox, path) = setup(Some("original"));
        let (outcome, _) = run(&sandbox, &path, "extra\n:q\n");
        assert_eq!(outcome, EditOutcome::Discarded);
        assert_eq!(sandbox.read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn end_of_input_discards() {
        let (_d, sandbox, path) = setup(None);
        let (outcome, _) = run(&sandbox, &path, "unsaved\n");
        assert_eq!(outcome, EditOutcome::Discarded);
        assert!(!sandbox.exists(&path));
    }
}
