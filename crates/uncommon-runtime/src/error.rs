// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loading runtime

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors surfaced to callers of the loader
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Module name was empty (only raised when strict names are enabled)
    #[error("Invalid module name: a module name must be a non-empty string")]
    InvalidModuleName,

    /// Caller supplied a name that already carries the source suffix
    #[error("Unable to load the module '{name}', because the module name must not end with {suffix}")]
    ReservedSuffix {
        /// The rejected module name
        name: String,
        /// The reserved suffix
        suffix: String,
    },

    /// Source text could not be fetched (only raised by the `report` fetch policy)
    #[error("Cannot find module '{path}'")]
    ModuleNotFound {
        /// Resolved module path
        path: String,
        /// Why the fetch failed
        #[source]
        source: FetchError,
    },

    /// The module body raised while running its top-level code
    #[error("Unable to load {path}.")]
    ModuleExecution {
        /// Resolved module path
        path: String,
        /// What the module raised
        #[source]
        source: ScriptError,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LoaderError {
    /// The resolved path this error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::ModuleNotFound { path, .. } | Self::ModuleExecution { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Errors raised from inside a module body
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A value thrown by the module's own code
    #[error("{0}")]
    Thrown(String),

    /// Type error (wrong argument type, calling a non-function)
    #[error("TypeError: {0}")]
    Type(String),

    /// Source text could not be understood by the evaluator
    #[error("SyntaxError: {0}")]
    Syntax(String),

    /// A nested load performed by the module failed
    #[error(transparent)]
    Load(Box<LoaderError>),
}

impl ScriptError {
    /// Create a thrown error
    pub fn thrown(msg: impl Into<String>) -> Self {
        Self::Thrown(msg.into())
    }

    /// Create a new TypeError
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    /// Create a new SyntaxError
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }
}

impl From<LoaderError> for ScriptError {
    fn from(err: LoaderError) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Fetch failures reported by a [`crate::Fetcher`]
#[derive(Debug, Error)]
pub enum FetchError {
    /// Nothing exists at the path
    #[error("no source at '{0}'")]
    NotFound(String),

    /// The transport failed while reading
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Requested path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::LoaderConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// A config value is out of range
    #[error("Invalid config value for '{key}': {reason}")]
    Invalid {
        /// Offending key
        key: String,
        /// Why it was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_message_names_path() {
        let err = LoaderError::ModuleExecution {
            path: "broken.js".to_string(),
            source: ScriptError::thrown("boom"),
        };
        assert_eq!(err.to_string(), "Unable to load broken.js.");
        assert_eq!(err.path(), Some("broken.js"));
    }

    #[test]
    fn test_reserved_suffix_message() {
        let err = LoaderError::ReservedSuffix {
            name: "foo.js".to_string(),
            suffix: ".js".to_string(),
        };
        assert!(err.to_string().contains("must not end with .js"));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_nested_source_chain_has_no_duplicates() {
        let inner = LoaderError::ModuleExecution {
            path: "inner.js".to_string(),
            source: ScriptError::thrown("boom"),
        };
        let outer = LoaderError::ModuleExecution {
            path: "outer.js".to_string(),
            source: inner.into(),
        };

        let mut chain = vec![outer.to_string()];
        let mut source = std::error::Error::source(&outer);
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        assert_eq!(chain, vec!["Unable to load outer.js.", "Unable to load inner.js.", "boom"]);
    }

    #[test]
    fn test_nested_load_error_converts() {
        let inner = LoaderError::InvalidModuleName;
        let script: ScriptError = inner.into();
        assert!(matches!(script, ScriptError::Load(_)));
    }
}
