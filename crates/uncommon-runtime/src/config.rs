// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to every module name
pub const DEFAULT_SUFFIX: &str = ".js";

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "uncommon.toml";

/// What a load does when the fetcher cannot produce source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Return an empty export mapping and cache nothing
    #[default]
    Silent,
    /// Fail with `LoaderError::ModuleNotFound`
    Report,
}

impl std::str::FromStr for FetchFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "report" => Ok(Self::Report),
            other => Err(ConfigError::Invalid {
                key: "fetch_failure".to_string(),
                reason: format!("expected 'silent' or 'report', got '{}'", other),
            }),
        }
    }
}

/// Configuration for a [`crate::LoaderRuntime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Source suffix appended to module names
    pub suffix: String,

    /// Directory file-backed fetchers resolve paths against
    pub root: PathBuf,

    /// Fetch failure handling
    pub fetch_failure: FetchFailurePolicy,

    /// Reject empty module names instead of returning empty exports
    pub strict_names: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            root: PathBuf::from("."),
            fetch_failure: FetchFailurePolicy::Silent,
            strict_names: false,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from default locations.
    ///
    /// Later sources override earlier ones: defaults, the user config file,
    /// `./uncommon.toml`, `explicit`, then `UNCOMMON_*` environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut sources = Vec::new();
        if let Some(user_config) = user_config_path() {
            if user_config.exists() {
                sources.push(user_config);
            }
        }
        let project_config = PathBuf::from(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            sources.push(project_config);
        }
        if let Some(path) = explicit {
            sources.push(path.to_path_buf());
        }

        Self::load_from(&sources, |key| std::env::var(key).ok())
    }

    /// Layer `sources` in order over the defaults, then apply overrides from
    /// `lookup`. Keys a file leaves out keep the value of an earlier layer.
    pub fn load_from<F>(sources: &[PathBuf], lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = toml::Table::new();
        for path in sources {
            let table = read_table(path)?;
            // Each layer must deserialize on its own
            toml::Value::Table(table.clone())
                .try_into::<LoaderConfig>()
                .map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            merged.extend(table);
        }

        let mut config: LoaderConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: sources.last().cloned().unwrap_or_default(),
                source,
            })?;

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a single TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: LoaderConfig = toml::Value::Table(read_table(path)?)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `UNCOMMON_ROOT`, `UNCOMMON_SUFFIX` and `UNCOMMON_FETCH_FAILURE`
    /// from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("UNCOMMON_ROOT") {
            self.root = PathBuf::from(root);
        }
        if let Some(suffix) = lookup("UNCOMMON_SUFFIX") {
            self.suffix = suffix;
        }
        if let Some(policy) = lookup("UNCOMMON_FETCH_FAILURE") {
            self.fetch_failure = policy.parse()?;
        }
        Ok(())
    }

    /// Check invariants the loader relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suffix.is_empty() {
            return Err(ConfigError::Invalid {
                key: "suffix".to_string(),
                reason: "suffix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    content.parse::<toml::Table>().map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Per-user config file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("uncommon").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.suffix, ".js");
        assert_eq!(config.fetch_failure, FetchFailurePolicy::Silent);
        assert!(!config.strict_names);
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("uncommon.toml");
        std::fs::write(&path, "root = \"scripts\"\nfetch_failure = \"report\"\n").unwrap();

        let config = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("scripts"));
        assert_eq!(config.fetch_failure, FetchFailurePolicy::Report);
        assert_eq!(config.suffix, ".js");
    }

    #[test]
    fn test_from_file_rejects_empty_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("uncommon.toml");
        std::fs::write(&path, "suffix = \"\"\n").unwrap();

        let err = LoaderConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "suffix"));
    }

    #[test]
    fn test_from_file_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("uncommon.toml");
        std::fs::write(&path, "strict_names = \"maybe\"\n").unwrap();

        assert!(matches!(
            LoaderConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_layers_in_order() {
        let dir = tempdir().unwrap();
        let user = dir.path().join("config.toml");
        let project = dir.path().join("uncommon.toml");
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&user, "root = \"user\"\nsuffix = \".mjs\"\nstrict_names = true\n").unwrap();
        std::fs::write(&project, "root = \"project\"\n").unwrap();
        std::fs::write(&explicit, "root = \"explicit\"\nfetch_failure = \"report\"\n").unwrap();

        let sources = vec![user, project, explicit];
        let config = LoaderConfig::load_from(&sources, |_| None).unwrap();
        assert_eq!(config.root, PathBuf::from("explicit"));
        assert_eq!(config.suffix, ".mjs");
        assert!(config.strict_names);
        assert_eq!(config.fetch_failure, FetchFailurePolicy::Report);

        let config = LoaderConfig::load_from(&sources, |key| match key {
            "UNCOMMON_ROOT" => Some("env".to_string()),
            "UNCOMMON_FETCH_FAILURE" => Some("silent".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.root, PathBuf::from("env"));
        assert_eq!(config.fetch_failure, FetchFailurePolicy::Silent);
        assert_eq!(config.suffix, ".mjs");
    }

    #[test]
    fn test_load_from_no_sources_is_default() {
        let config = LoaderConfig::load_from(&[], |_| None).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_load_from_blames_bad_layer() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("config.toml");
        let good = dir.path().join("explicit.toml");
        std::fs::write(&bad, "strict_names = \"maybe\"\n").unwrap();
        std::fs::write(&good, "root = \"x\"\n").unwrap();

        let err = LoaderConfig::load_from(&[bad.clone(), good], |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if *path == bad));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("UNCOMMON_ROOT", "/srv/modules"),
            ("UNCOMMON_SUFFIX", ".mjs"),
            ("UNCOMMON_FETCH_FAILURE", "Report"),
        ]
        .into_iter()
        .collect();

        let mut config = LoaderConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/modules"));
        assert_eq!(config.suffix, ".mjs");
        assert_eq!(config.fetch_failure, FetchFailurePolicy::Report);
    }

    #[test]
    fn test_bad_policy_override() {
        let mut config = LoaderConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "UNCOMMON_FETCH_FAILURE").then(|| "loud".to_string())
        });
        assert!(result.is_err());
    }
}
