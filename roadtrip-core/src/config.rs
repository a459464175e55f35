use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::DomainError;

/// Environment variable consulted when the secrets file has no key.
pub const API_KEY_ENV: &str = "SHECODES_API_KEY";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API key for the SheCodes service.
    ///
    /// Example TOML:
    /// api_key = "..."
    pub api_key: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "roadtrip-planner", "roadtrip-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the stored API key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }
}

/// A single credential source: yields a key if this source has one.
type KeySource = fn() -> Option<String>;

/// Resolve the SheCodes API key.
///
/// Sources are tried in order: the secrets file first, then the process
/// environment. The first non-empty value wins. An unreadable or malformed
/// secrets file counts as absence, never as a failure.
pub fn resolve_api_key() -> Result<String, DomainError> {
    resolve_from(&[key_from_secrets_file, key_from_env])
}

fn resolve_from(sources: &[KeySource]) -> Result<String, DomainError> {
    sources.iter().find_map(|source| source()).ok_or_else(|| {
        DomainError::Configuration(format!(
            "Missing API key. Run `roadtrip configure` to store it, \
             or set the {API_KEY_ENV} environment variable."
        ))
    })
}

fn key_from_secrets_file() -> Option<String> {
    let cfg = Config::load().ok()?;
    cfg.api_key.and_then(non_empty)
}

fn key_from_env() -> Option<String> {
    env::var(API_KEY_ENV).ok().and_then(non_empty)
}

fn non_empty(key: String) -> Option<String> {
    if key.trim().is_empty() { None } else { Some(key) }
}
