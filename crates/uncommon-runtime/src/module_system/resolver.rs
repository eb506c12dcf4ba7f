// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module name validation and path resolution

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};

/// Map a module name to its source path.
///
/// Returns `Ok(None)` for an empty name unless `strict_names` is set. A name
/// that already carries the suffix is always rejected so the suffix is never
/// doubled.
pub fn module_path(name: &str, config: &LoaderConfig) -> Result<Option<String>> {
    if name.is_empty() {
        return if config.strict_names {
            Err(LoaderError::InvalidModuleName)
        } else {
            Ok(None)
        };
    }

    if name.ends_with(config.suffix.as_str()) {
        return Err(LoaderError::ReservedSuffix {
            name: name.to_string(),
            suffix: config.suffix.clone(),
        });
    }

    Ok(Some(format!("{}{}", name, config.suffix)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_suffix() {
        let config = LoaderConfig::default();
        assert_eq!(module_path("math", &config).unwrap().as_deref(), Some("math.js"));
        assert_eq!(
            module_path("lib/util", &config).unwrap().as_deref(),
            Some("lib/util.js")
        );
    }

    #[test]
    fn test_rejects_suffix() {
        let config = LoaderConfig::default();
        let err = module_path("foo.js", &config).unwrap_err();
        assert!(matches!(err, LoaderError::ReservedSuffix { ref name, .. } if name == "foo.js"));
        // Only the exact suffix is reserved
        assert!(module_path("foo.json", &config).is_ok());
    }

    #[test]
    fn test_empty_name() {
        let mut config = LoaderConfig::default();
        assert!(module_path("", &config).unwrap().is_none());

        config.strict_names = true;
        assert!(matches!(
            module_path("", &config),
            Err(LoaderError::InvalidModuleName)
        ));
    }

    #[test]
    fn test_custom_suffix() {
        let config = LoaderConfig {
            suffix: ".mjs".to_string(),
            ..LoaderConfig::default()
        };
        assert_eq!(module_path("app", &config).unwrap().as_deref(), Some("app.mjs"));
        assert!(module_path("app.mjs", &config).is_err());
        assert_eq!(module_path("app.js", &config).unwrap().as_deref(), Some("app.js.mjs"));
    }
}
