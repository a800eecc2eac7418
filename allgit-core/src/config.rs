//! Configuration management for allgit
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (ALLGIT_*)
//! 3. Config file (~/.config/allgit/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Git invocation settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Executable used wherever a command line starts with `git`
    pub path: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            path: "git".to_string(),
        }
    }
}

/// Refresh scheduling settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Upper bound on simultaneous probes; 0 means one task per repository
    pub max_concurrent_probes: usize,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Git configuration
    pub git: GitConfig,

    /// Refresh configuration
    pub refresh: RefreshConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/allgit/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("allgit").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - ALLGIT_GIT_PATH: git executable
    /// - ALLGIT_MAX_CONCURRENT_PROBES: probe concurrency bound
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(git_path) = lookup("ALLGIT_GIT_PATH") {
            self.git.path = git_path;
        }

        if let Some(value) = lookup("ALLGIT_MAX_CONCURRENT_PROBES") {
            self.refresh.max_concurrent_probes = value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "ALLGIT_MAX_CONCURRENT_PROBES must be a non-negative integer, got '{}'",
                    value
                ))
            })?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        git_path: Option<String>,
        max_concurrent_probes: Option<usize>,
    ) -> Self {
        if let Some(path) = git_path {
            self.git.path = path;
        }

        if let Some(limit) = max_concurrent_probes {
            self.refresh.max_concurrent_probes = limit;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        git_path: Option<String>,
        max_concurrent_probes: Option<usize>,
    ) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(git_path, max_concurrent_probes))
    }

    /// The probe concurrency bound, if one is configured
    pub fn probe_limit(&self) -> Option<usize> {
        match self.refresh.max_concurrent_probes {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.git.path, "git");
        assert_eq!(config.refresh.max_concurrent_probes, 0);
        assert_eq!(config.probe_limit(), None);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(Some("/opt/git/bin/git".to_string()), Some(4));

        assert_eq!(config.git.path, "/opt/git/bin/git");
        assert_eq!(config.probe_limit(), Some(4));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_overrides_from(|key| match key {
                "ALLGIT_GIT_PATH" => Some("/usr/local/bin/git".to_string()),
                "ALLGIT_MAX_CONCURRENT_PROBES" => Some(" 8 ".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.git.path, "/usr/local/bin/git");
        assert_eq!(config.refresh.max_concurrent_probes, 8);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let result = Config::default().with_overrides_from(|key| {
            (key == "ALLGIT_MAX_CONCURRENT_PROBES").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_beats_env() {
        let config = Config::default()
            .with_overrides_from(|key| (key == "ALLGIT_GIT_PATH").then(|| "env-git".to_string()))
            .unwrap()
            .with_cli_overrides(Some("cli-git".to_string()), None);
        assert_eq!(config.git.path, "cli-git");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[git]
path = "/usr/bin/git"

[refresh]
max_concurrent_probes = 16
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.git.path, "/usr/bin/git");
        assert_eq!(config.refresh.max_concurrent_probes, 16);
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[refresh]
max_concurrent_probes = 2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // git.path should use default
        assert_eq!(config.git.path, "git");
        assert_eq!(config.probe_limit(), Some(2));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[git]\npath = \"git2\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.git.path, "git2");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\nmax_concurrent_probes = \"many\"\n").unwrap();

        assert!(matches!(Config::load_from_file(&path), Err(Error::Config(_))));
    }
}
