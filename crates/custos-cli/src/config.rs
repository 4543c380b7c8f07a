//! Optional TOML configuration.
//!
//! Resolution order:
//! 1. `--config PATH`, which must exist
//! 2. `config.toml` in the XDG config dir (`~/.config/custos/`), if present
//! 3. Empty defaults
//!
//! Command-line flags always win over file values.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

/// Values that would otherwise have to be repeated on every invocation.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Identity recorded as the attestation creator.
    pub(crate) creator_id: Option<String>,
    /// Version recorded alongside the creator id.
    pub(crate) creator_version: Option<String>,
    /// Organization policy file.
    pub(crate) org_policy: Option<PathBuf>,
    /// Directory of project policy files.
    pub(crate) projects_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default location.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .wrap_err_with(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// The organization policy path from the flag or the config file.
    pub(crate) fn org_policy(&self, flag: Option<&Path>) -> Result<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.org_policy.clone())
            .ok_or_else(|| eyre!("no organization policy: pass --org or set org_policy"))
    }

    /// The project policy directory from the flag or the config file.
    pub(crate) fn projects_dir(&self, flag: Option<&Path>) -> Result<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.projects_dir.clone())
            .ok_or_else(|| eyre!("no project policy directory: pass --projects or set projects_dir"))
    }

    /// The creator id from the flag or the config file.
    pub(crate) fn creator_id(&self, flag: Option<&str>) -> Result<String> {
        flag.map(str::to_owned)
            .or_else(|| self.creator_id.clone())
            .ok_or_else(|| eyre!("no creator id: pass --creator-id or set creator_id"))
    }
}

fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "custos", "custos")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
