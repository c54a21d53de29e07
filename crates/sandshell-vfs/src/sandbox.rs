//! Physical sandbox root and the file operations scoped beneath it.
//!
//! Every user-supplied path goes through [`Sandbox::resolve`]. The virtual
//! path is normalized lexically first, then joined onto the root and
//! canonicalized (allowing a missing tail), and finally checked to still
//! lie under the root. Only a [`ResolvedPath`] is accepted by the file
//! operations, so handlers cannot hand-build physical paths.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sandshell_types::error::{Result, ShellError};

use crate::VirtualPath;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry returned by [`Sandbox::read_dir`].
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// A virtual path together with its checked physical location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    virt: VirtualPath,
    physical: PathBuf,
}

impl ResolvedPath {
    pub fn virtual_path(&self) -> &VirtualPath {
        &self.virt
    }

    /// Physical location, guaranteed to be the sandbox root or below it.
    pub fn physical(&self) -> &Path {
        &self.physical
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.virt, f)
    }
}

/// A physical directory that confines all shell file activity.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Open (creating if needed) the sandbox rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let root = fs::canonicalize(root)?;
        log::info!("sandbox root: {}", root.display());
        Ok(Self { root })
    }

    /// Canonical physical root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `input` relative to `cwd` into a checked path.
    pub fn resolve(&self, cwd: &VirtualPath, input: &str) -> Result<ResolvedPath> {
        self.resolve_virtual(cwd.join(input))
    }

    /// Check an already-normalized virtual path.
    pub fn resolve_virtual(&self, virt: VirtualPath) -> Result<ResolvedPath> {
        let mut joined = self.root.clone();
        for segment in virt.segments() {
            joined.push(segment);
        }
        let physical = canonicalize_allow_missing(&joined)
            .map_err(|_| self.escape(&virt, "unresolvable link"))?;
        if !physical.starts_with(&self.root) {
            return Err(self.escape(&virt, "outside root"));
        }
        Ok(ResolvedPath { virt, physical })
    }

    fn escape(&self, virt: &VirtualPath, why: &str) -> ShellError {
        log::warn!("rejected path {virt} ({why})");
        ShellError::PathEscape(virt.to_string())
    }

    pub fn exists(&self, path: &ResolvedPath) -> bool {
        path.physical.exists()
    }

    pub fn is_dir(&self, path: &ResolvedPath) -> bool {
        path.physical.is_dir()
    }

    pub fn is_file(&self, path: &ResolvedPath) -> bool {
        path.physical.is_file()
    }

    /// List a directory in storage order.
    pub fn read_dir(&self, path: &ResolvedPath) -> Result<Vec<DirEntry>> {
        if path.physical.is_file() {
            return Err(ShellError::NotADirectory(path.virt.to_string()));
        }
        let iter = fs::read_dir(&path.physical).map_err(|e| io_err(path, e))?;
        let mut entries = Vec::new();
        for entry in iter {
            let entry = entry.map_err(|e| io_err(path, e))?;
            // Dangling links are listed as files.
            let meta = fs::metadata(entry.path())
                .or_else(|_| entry.metadata())
                .map_err(|e| io_err(path, e))?;
            let kind = if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    /// Read a whole file as text (lossy UTF-8).
    pub fn read_to_string(&self, path: &ResolvedPath) -> Result<String> {
        let data = fs::read(&path.physical).map_err(|e| io_err(path, e))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Replace a file's contents, creating it if absent.
    pub fn write(&self, path: &ResolvedPath, contents: &[u8]) -> Result<()> {
        fs::write(&path.physical, contents).map_err(|e| io_err(path, e))
    }

    /// Create an empty file; an existing file keeps its contents.
    pub fn create_file(&self, path: &ResolvedPath) -> Result<()> {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path.physical)
            .map(drop)
            .map_err(|e| io_err(path, e))
    }

    pub fn create_dir(&self, path: &ResolvedPath) -> Result<()> {
        fs::create_dir(&path.physical).map_err(|e| io_err(path, e))
    }

    /// Create a directory and its missing parents.
    pub fn create_dir_all(&self, path: &ResolvedPath) -> Result<()> {
        fs::create_dir_all(&path.physical).map_err(|e| io_err(path, e))
    }

    /// Remove an empty directory. The root itself is never removed.
    pub fn remove_dir(&self, path: &ResolvedPath) -> Result<()> {
        if path.virt.is_root() {
            return Err(ShellError::Command("cannot remove the root directory".into()));
        }
        fs::remove_dir(&path.physical).map_err(|e| io_err(path, e))
    }

    pub fn remove_file(&self, path: &ResolvedPath) -> Result<()> {
        fs::remove_file(&path.physical).map_err(|e| io_err(path, e))
    }

    /// Copy a file, overwriting `dst`. `src` and `dst` must be different
    /// files: the destination is truncated before the source is read.
    pub fn copy(&self, src: &ResolvedPath, dst: &ResolvedPath) -> Result<u64> {
        if src.physical == dst.physical {
            return Err(ShellError::Command(format!(
                "{} and {} are the same file",
                src.virt, dst.virt
            )));
        }
        fs::copy(&src.physical, &dst.physical).map_err(|e| io_err(dst, e))
    }

    pub fn rename(&self, src: &ResolvedPath, dst: &ResolvedPath) -> Result<()> {
        if src.virt.is_root() {
            return Err(ShellError::Command("cannot move the root directory".into()));
        }
        fs::rename(&src.physical, &dst.physical).map_err(|e| io_err(dst, e))
    }
}

fn io_err(path: &ResolvedPath, err: io::Error) -> ShellError {
    ShellError::from_io(path.virt.to_string(), err)
}

/// Canonicalize `path`, tolerating a tail of components that do not exist
/// yet. The tail is already lexically normalized by [`VirtualPath`].
///
/// `symlink_metadata` is used for the existence check so that a dangling
/// link is reported instead of being treated as a missing component.
fn canonicalize_allow_missing(path: &Path) -> io::Result<PathBuf> {
    if fs::symlink_metadata(path).is_ok() {
        return fs::canonicalize(path);
    }
    let mut current = path;
    while let Some(parent) = current.parent() {
        if fs::symlink_metadata(parent).is_ok() {
            let canonical_parent = fs::canonicalize(parent)?;
            let remainder = path.strip_prefix(parent).unwrap_or_else(|_| Path::new(""));
            return Ok(canonical_parent.join(remainder));
        }
        current = parent;
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (tempfile::TempDir, Sandbox) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path().join("root")).unwrap();
        (dir, sandbox)
    }

    #[test]
    fn open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a/b/root");
        let sandbox = Sandbox::open(&root).unwrap();
        assert!(sandbox.root().is_dir());
    }

    #[test]
    fn resolve_root_is_root() {
        let (_dir, sb) = setup();
        let r = sb.resolve(&VirtualPath::root(), "/").unwrap();
        assert_eq!(r.physical(), sb.root());
        assert_eq!(r.to_string(), "/");
    }

    #[test]
    fn resolve_missing_path_stays_inside() {
        let (_dir, sb) = setup();
        let r = sb.resolve(&VirtualPath::root(), "not/yet/here.txt").unwrap();
        assert!(r.physical().starts_with(sb.root()));
        assert!(r.physical().ends_with("not/yet/here.txt"));
    }

    #[test]
    fn dotdot_from_root_clamps() {
        let (_dir, sb) = setup();
        let r = sb.resolve(&VirtualPath::root(), "../../../../..").unwrap();
        assert_eq!(r.physical(), sb.root());
    }

    #[test]
    fn normalization_matches_absolute() {
        let (_dir, sb) = setup();
        let a = sb.resolve(&VirtualPath::root(), "./a/../a/b").unwrap();
        let b = sb.resolve(&VirtualPath::root(), "/a/b").unwrap();
        assert_eq!(a.physical(), b.physical());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_rejected() {
        let (dir, sb) = setup();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, sb.root().join("link")).unwrap();
        let err = sb.resolve(&VirtualPath::root(), "/link/secret.txt").unwrap_err();
        assert!(matches!(err, ShellError::PathEscape(_)));
        let err = sb.resolve(&VirtualPath::root(), "link").unwrap_err();
        assert!(matches!(err, ShellError::PathEscape(_)));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_rejected() {
        let (dir, sb) = setup();
        let target = dir.path().join("nowhere.txt");
        std::os::unix::fs::symlink(&target, sb.root().join("dangling")).unwrap();
        let err = sb.resolve(&VirtualPath::root(), "dangling").unwrap_err();
        assert!(matches!(err, ShellError::PathEscape(_)));
        let root = sb.resolve(&VirtualPath::root(), "/").unwrap();
        let entries = sb.read_dir(&root).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_allowed() {
        let (_dir, sb) = setup();
        fs::create_dir(sb.root().join("real")).unwrap();
        std::os::unix::fs::symlink(sb.root().join("real"), sb.root().join("alias")).unwrap();
        let r = sb.resolve(&VirtualPath::root(), "alias").unwrap();
        assert_eq!(r.physical(), sb.root().join("real"));
    }

    #[test]
    fn write_read_round_trip() {
        let (_dir, sb) = setup();
        let p = sb.resolve(&VirtualPath::root(), "f.txt").unwrap();
        sb.write(&p, b"hi").unwrap();
        assert_eq!(sb.read_to_string(&p).unwrap(), "hi");
        assert!(sb.is_file(&p));
    }

    #[test]
    fn read_missing_is_not_found_with_virtual_path() {
        let (_dir, sb) = setup();
        let p = sb.resolve(&VirtualPath::root(), "/docs/none.txt").unwrap();
        match sb.read_to_string(&p).unwrap_err() {
            ShellError::NotFound(v) => assert_eq!(v, "/docs/none.txt"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn create_file_keeps_contents() {
        let (_dir, sb) = setup();
        let p = sb.resolve(&VirtualPath::root(), "keep.txt").unwrap();
        sb.write(&p, b"data").unwrap();
        sb.create_file(&p).unwrap();
        assert_eq!(sb.read_to_string(&p).unwrap(), "data");
    }

    #[test]
    fn read_dir_reports_kinds() {
        let (_dir, sb) = setup();
        let root = VirtualPath::root();
        sb.create_dir(&sb.resolve(&root, "d").unwrap()).unwrap();
        sb.write(&sb.resolve(&root, "f").unwrap(), b"abc").unwrap();
        let mut entries = sb.read_dir(&sb.resolve(&root, "/").unwrap()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[test]
    fn read_dir_on_file_is_not_a_directory() {
        let (_dir, sb) = setup();
        let f = sb.resolve(&VirtualPath::root(), "f").unwrap();
        sb.write(&f, b"abc").unwrap();
        match sb.read_dir(&f) {
            Err(ShellError::NotADirectory(p)) => assert_eq!(p, "/f"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn copy_onto_itself_is_refused() {
        let (_dir, sb) = setup();
        let f = sb.resolve(&VirtualPath::root(), "f").unwrap();
        sb.write(&f, b"precious").unwrap();
        let same = sb.resolve(&VirtualPath::root(), "./f").unwrap();
        assert!(matches!(sb.copy(&f, &same), Err(ShellError::Command(_))));
        assert_eq!(sb.read_to_string(&f).unwrap(), "precious");
    }

    #[test]
    fn remove_non_empty_dir_is_fs_error() {
        let (_dir, sb) = setup();
        let root = VirtualPath::root();
        let d = sb.resolve(&root, "d").unwrap();
        sb.create_dir(&d).unwrap();
        sb.write(&sb.resolve(&root, "d/f").unwrap(), b"x").unwrap();
        assert!(matches!(sb.remove_dir(&d), Err(ShellError::Fs { .. })));
        assert!(sb.is_dir(&d));
    }

    #[test]
    fn root_cannot_be_removed() {
        let (_dir, sb) = setup();
        let root = sb.resolve(&VirtualPath::root(), "/").unwrap();
        assert!(sb.remove_dir(&root).is_err());
        assert!(sb.root().is_dir());
    }

    #[test]
    fn copy_overwrites_and_rename_moves() {
        let (_dir, sb) = setup();
        let root = VirtualPath::root();
        let a = sb.resolve(&root, "a").unwrap();
        let b = sb.resolve(&root, "b").unwrap();
        sb.write(&a, b"new").unwrap();
        sb.write(&b, b"old").unwrap();
        sb.copy(&a, &b).unwrap();
        assert_eq!(sb.read_to_string(&b).unwrap(), "new");
        let c = sb.resolve(&root, "c").unwrap();
        sb.rename(&a, &c).unwrap();
        assert!(!sb.exists(&a));
        assert!(sb.exists(&c));
    }

    proptest! {
        #[test]
        fn dotdot_chains_never_escape(depth in 0usize..6, ups in 0usize..16) {
            let (_dir, sb) = setup();
            let cwd = VirtualPath::parse(&"x/".repeat(depth));
            let input = vec![".."; ups].join("/");
            let r = sb.resolve(&cwd, &input).unwrap();
            prop_assert!(r.physical().starts_with(sb.root()));
        }
    }
}
