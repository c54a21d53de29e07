//! Scenario seeding for a fresh sandbox.
//!
//! Seeding is idempotent: existing directories and files are left alone.

use sandshell_types::config::SeedConfig;
use sandshell_types::error::Result;
use sandshell_vfs::{Sandbox, VirtualPath};

/// Create the scenario directories and files inside the sandbox.
///
/// Directories are created when missing. Seed files are written only when
/// absent, so edits made in earlier sessions survive. Returns the number of
/// files written.
pub fn seed_sandbox(sandbox: &Sandbox, seed: &SeedConfig) -> Result<usize> {
    for dir in &seed.dirs {
        let path = sandbox.resolve_virtual(VirtualPath::parse(dir))?;
        sandbox.create_dir_all(&path)?;
    }

    let mut written = 0;
    for file in &seed.files {
        let path = sandbox.resolve_virtual(VirtualPath::parse(&file.path))?;
        if sandbox.exists(&path) {
            continue;
        }
        let parent = sandbox.resolve_virtual(path.virtual_path().parent())?;
        sandbox.create_dir_all(&parent)?;
        sandbox.write(&path, file.contents.as_bytes())?;
        written += 1;
    }
    log::info!(
        "seeded {} dirs, wrote {written} of {} files",
        seed.dirs.len(),
        seed.files.len()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandshell_types::config::SeedFile;

    fn open() -> (tempfile::TempDir, Sandbox) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path().join("ubuntu_sim")).unwrap();
        (dir, sandbox)
    }

    #[test]
    fn default_seed_builds_scenario() {
        let (_d, sandbox) = open();
        let written = seed_sandbox(&sandbox, &SeedConfig::default()).unwrap();
        assert_eq!(written, 3);
        let root = sandbox.root();
        assert!(root.join("home/usuario1/Documentos").is_dir());
        assert!(root.join("var/spool/mail").is_dir());
        assert!(root.join("home/usuario1/Documentos/IPS_El_Bohío.txt").is_file());
        assert!(root.join("var/lib/apt/archives/nano_1.0.deb").is_file());
    }

    #[test]
    fn reseeding_keeps_user_edits() {
        let (_d, sandbox) = open();
        let seed = SeedConfig::default();
        seed_sandbox(&sandbox, &seed).unwrap();
        let file = sandbox.root().join("home/usuario1/Documentos/IPS_El_Bohío.txt");
        std::fs::write(&file, "edited").unwrap();
        assert_eq!(seed_sandbox(&sandbox, &seed).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "edited");
    }

    #[test]
    fn seed_file_creates_missing_parents() {
        let (_d, sandbox) = open();
        let seed = SeedConfig {
            dirs: Vec::new(),
            files: vec![SeedFile {
                path: "/etc/motd".into(),
                contents: "hola".into(),
            }],
        };
        seed_sandbox(&sandbox, &seed).unwrap();
        assert_eq!(
            std::fs::read_to_string(sandbox.root().join("etc/motd")).unwrap(),
            "hola"
        );
    }

    #[test]
    fn seed_paths_cannot_climb_out() {
        let (d, sandbox) = open();
        let seed = SeedConfig {
            dirs: vec!["../../escaped".into()],
            files: Vec::new(),
        };
        seed_sandbox(&sandbox, &seed).unwrap();
        assert!(!d.path().join("escaped").exists());
        assert!(sandbox.root().join("escaped").is_dir());
    }
}
