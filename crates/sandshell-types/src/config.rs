//! Shell configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock scenario: an Ubuntu-like scaffold under `ubuntu_sim/`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Top-level shell configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Physical directory every command is confined to.
    pub sandbox_root: PathBuf,
    /// Prompt printed before each input line.
    pub prompt: String,
    /// Host names ending in this suffix (or `localhost`) resolve.
    pub host_suffix: String,
    /// Name reported by the simulated system.
    pub hostname: String,
    /// Scaffold written into the sandbox before the first command.
    pub seed: SeedConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            sandbox_root: PathBuf::from("ubuntu_sim"),
            prompt: "$ ".to_string(),
            host_suffix: ".com".to_string(),
            hostname: "ubuntu-sim".to_string(),
            seed: SeedConfig::default(),
        }
    }
}

/// Directories and files the scenario needs before first use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Virtual directories, created with their parents.
    pub dirs: Vec<String>,
    /// Files written only when absent.
    pub files: Vec<SeedFile>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let dirs = [
            "/home/usuario1/Documentos",
            "/var/lib/apt/archives",
            "/var/lib/apt/lists",
            "/var/lib/dpkg",
            "/var/spool/mail",
        ];
        let mut files = vec![SeedFile {
            path: "/home/usuario1/Documentos/IPS_El_Bohío.txt".to_string(),
            contents: "# IPs asignadas al Departamento de Ventas - El Bohío\n\n\
                       192.168.10.10   pc_ventas_1\n\
                       192.168.10.11   pc_ventas_2\n"
                .to_string(),
        }];
        for pkg in ["nano_1.0.deb", "htop_1.0.deb"] {
            files.push(SeedFile {
                path: format!("/var/lib/apt/archives/{pkg}"),
                contents: format!("Contenido simulado de {pkg}"),
            });
        }
        Self {
            dirs: dirs.iter().map(|d| d.to_string()).collect(),
            files,
        }
    }
}

/// A single seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    /// Virtual path of the file.
    pub path: String,
    #[serde(default)]
    pub contents: String,
}

impl ShellConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ShellConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.sandbox_root.as_os_str().is_empty() {
            return Err(ShellError::Config("sandbox_root must not be empty".into()));
        }
        if self.prompt.is_empty() {
            return Err(ShellError::Config("prompt must not be empty".into()));
        }
        if let Some(bad) = self.seed.files.iter().find(|f| f.path.trim().is_empty()) {
            return Err(ShellError::Config(format!(
                "seed file with empty path (contents: {:?})",
                bad.contents
            )));
        }
        Ok(())
    }
}
