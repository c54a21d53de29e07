//! Foundation types for sandshell.
//!
//! This crate holds what every other sandshell crate shares: the error
//! taxonomy and the TOML-backed shell configuration.

pub mod config;
pub mod error;
