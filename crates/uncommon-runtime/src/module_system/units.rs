// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Built-in evaluators
//!
//! - [`UnitRegistry`] - compiled module bodies registered ahead of time by path
//! - [`JsonEvaluator`] - source text is a JSON object of exports

use crate::error::ScriptError;
use crate::module_system::sandbox::{Convention, Evaluator, ModuleSource, Scope};
use crate::value::Value;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// A compiled module body
pub type ModuleUnit = dyn Fn(&ModuleSource<'_>, &mut Scope<'_>) -> Result<(), ScriptError>;

/// Pre-registered module bodies keyed by resolved path.
///
/// The fetched text is still required (a path that cannot be fetched never
/// reaches the evaluator) and is handed to the unit, which may ignore it.
/// Paths without a unit go to the fallback evaluator, or fail.
#[derive(Default)]
pub struct UnitRegistry {
    units: HashMap<String, Rc<ModuleUnit>>,
    fallback: Option<Rc<dyn Evaluator>>,
}

impl UnitRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that defers unregistered paths to `fallback`
    pub fn with_fallback(fallback: Rc<dyn Evaluator>) -> Self {
        Self {
            units: HashMap::new(),
            fallback: Some(fallback),
        }
    }

    /// Register the body for `path`, replacing any previous one
    pub fn register<F>(&mut self, path: impl Into<String>, unit: F) -> &mut Self
    where
        F: Fn(&ModuleSource<'_>, &mut Scope<'_>) -> Result<(), ScriptError> + 'static,
    {
        self.units.insert(path.into(), Rc::new(unit));
        self
    }

    /// Whether a body is registered for `path`
    pub fn contains(&self, path: &str) -> bool {
        self.units.contains_key(path)
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Evaluator for UnitRegistry {
    fn evaluate(
        &self,
        source: &ModuleSource<'_>,
        scope: &mut Scope<'_>,
    ) -> Result<(), ScriptError> {
        if let Some(unit) = self.units.get(source.path) {
            return unit(source, scope);
        }
        match &self.fallback {
            Some(fallback) => fallback.evaluate(source, scope),
            None => Err(ScriptError::syntax(format!(
                "no compiled unit registered for {}",
                source.path
            ))),
        }
    }
}

/// Evaluates source text as a JSON object.
///
/// Native modules export every member of the object. Foreign modules write
/// every member into the host global namespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEvaluator;

impl Evaluator for JsonEvaluator {
    fn evaluate(
        &self,
        source: &ModuleSource<'_>,
        scope: &mut Scope<'_>,
    ) -> Result<(), ScriptError> {
        let json: serde_json::Value = serde_json::from_str(source.text)
            .map_err(|e| ScriptError::syntax(format!("{}: {}", source.path, e)))?;
        let serde_json::Value::Object(members) = json else {
            return Err(ScriptError::syntax(format!(
                "{}: module source must be a JSON object",
                source.path
            )));
        };

        debug!("Evaluating {} JSON members from {}", members.len(), source.path);
        match scope.convention() {
            Convention::Native => {
                for (name, value) in &members {
                    scope.export(name, Value::from_json(value))?;
                }
            }
            Convention::Foreign => {
                let globals = scope.globals();
                for (name, value) in &members {
                    globals.set(name, Value::from_json(value));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoaderError;
    use crate::fetch::MemoryFetcher;
    use crate::module_system::LoaderRuntime;

    #[test]
    fn test_registry_runs_unit_with_source_text() {
        let fetcher = MemoryFetcher::with_sources([("greeting.js", "hello")]);
        let mut registry = UnitRegistry::new();
        registry.register("greeting.js", |source, scope| {
            scope.export("text", source.text.to_uppercase())
        });
        assert!(registry.contains("greeting.js"));

        let mut runtime = LoaderRuntime::new(Rc::new(fetcher), Rc::new(registry));
        let exports = runtime.require("greeting").unwrap();
        assert_eq!(exports.get("text"), Some(&Value::from("HELLO")));
    }

    #[test]
    fn test_registry_without_unit_fails() {
        let fetcher = MemoryFetcher::with_sources([("orphan.js", "")]);
        let mut runtime = LoaderRuntime::new(Rc::new(fetcher), Rc::new(UnitRegistry::new()));
        let err = runtime.require("orphan").unwrap_err();
        assert!(matches!(
            err,
            LoaderError::ModuleExecution { source: ScriptError::Syntax(_), .. }
        ));
    }

    #[test]
    fn test_registry_falls_back() {
        let fetcher = MemoryFetcher::with_sources([("data.js", r#"{"answer": 42}"#)]);
        let registry = UnitRegistry::with_fallback(Rc::new(JsonEvaluator));
        let mut runtime = LoaderRuntime::new(Rc::new(fetcher), Rc::new(registry));
        let exports = runtime.require("data").unwrap();
        assert_eq!(exports.get("answer"), Some(&Value::Number(42.0)));
    }

    #[test]
    fn test_json_foreign_writes_globals() {
        let fetcher =
            MemoryFetcher::with_sources([("legacy.js", r#"{"Lib": "v1", "Other": true}"#)]);
        let mut runtime = LoaderRuntime::new(Rc::new(fetcher), Rc::new(JsonEvaluator));
        let exports = runtime.require_foreign("legacy", "Lib").unwrap();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports.get("Lib"), Some(&Value::from("v1")));
        assert_eq!(runtime.globals().get("Other"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_json_rejects_non_object() {
        let fetcher = MemoryFetcher::with_sources([("list.js", "[1, 2]"), ("bad.js", "{")]);
        let mut runtime = LoaderRuntime::new(Rc::new(fetcher), Rc::new(JsonEvaluator));
        assert!(runtime.require("list").is_err());
        assert!(runtime.require("bad").is_err());
        assert!(runtime.store(Convention::Native).is_empty());
    }
}
