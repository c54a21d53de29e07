//! Normalized virtual paths.

use std::fmt;

/// A `/`-rooted, normalized virtual path.
///
/// Holds no empty, `.` or `..` segments. Two paths are equal iff their
/// segment sequences are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    /// The virtual root `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `input` as a path from the root, whether or not it starts
    /// with `/`.
    pub fn parse(input: &str) -> Self {
        let mut path = Self::root();
        path.push_components(input);
        path
    }

    /// Resolve `input` against `self`.
    ///
    /// Absolute inputs restart at the root. `..` pops one segment and is a
    /// no-op at the root.
    pub fn join(&self, input: &str) -> Self {
        let mut path = if is_absolute(input) {
            Self::root()
        } else {
            self.clone()
        };
        path.push_components(input);
        path
    }

    /// Append a single literal entry name.
    pub fn child(&self, name: &str) -> Self {
        self.join(name.trim_start_matches(['/', '\\']))
    }

    pub fn parent(&self) -> Self {
        let mut path = self.clone();
        path.segments.pop();
        path
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` at the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn push_components(&mut self, input: &str) {
        for component in input.split(['/', '\\']) {
            match component {
                "" | "." => {},
                ".." => {
                    self.segments.pop();
                },
                other => self.segments.push(other.to_string()),
            }
        }
    }
}

fn is_absolute(input: &str) -> bool {
    input.starts_with('/') || input.starts_with('\\')
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
