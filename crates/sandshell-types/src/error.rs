//! Error types for sandshell.

use std::io;

/// Errors produced by the shell and its filesystem boundary.
///
/// Handler failures never escape a processed line: the session renders
/// them into the transcript. Only configuration and startup errors reach
/// the binary.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Wrong argument count or shape. Carries the usage text.
    #[error("usage: {0}")]
    Usage(String),

    /// A resolved path would leave the sandbox root.
    #[error("path escapes sandbox: {0}")]
    PathEscape(String),

    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    /// Handler-reported failure with a complete, human-readable message.
    #[error("{0}")]
    Command(String),

    /// Any other storage failure (permission, non-empty directory, I/O).
    #[error("{path}: {source}")]
    Fs {
        /// Virtual path the operation targeted.
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("command not recognized: {0}")]
    UnknownCommand(String),

    /// Two commands registered under the same name.
    #[error("duplicate command registration: {0}")]
    DuplicateCommand(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ShellError {
    /// Classify a storage error against the virtual path it concerned.
    pub fn from_io(path: impl Into<String>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => ShellError::NotFound(path),
            _ => ShellError::Fs { path, source: err },
        }
    }

    /// Short usage error constructor.
    pub fn usage(text: &str) -> Self {
        ShellError::Usage(text.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
