//! Sandboxed file system for sandshell.
//!
//! The user sees a `/`-rooted virtual path space. Every virtual path is
//! mapped onto a physical directory (the sandbox root) and checked so that
//! no operation reaches outside it.

mod path;
mod sandbox;

pub use path::VirtualPath;
pub use sandbox::{DirEntry, EntryKind, ResolvedPath, Sandbox};
