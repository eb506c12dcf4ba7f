// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module execution sandbox
//!
//! A module body never sees the [`LoaderRuntime`] itself. It runs against a
//! [`Scope`] that exposes exactly the capabilities injected for its
//! convention:
//!
//! - `require` / `require_foreign` - load further modules by name
//! - `exports` - the export container (native convention only)
//! - `globals` - the shared host namespace
//!
//! Whatever the body raises is handed back untouched; translating it into a
//! loader error is the caller's job.

use crate::error::{Result, ScriptError};
use crate::globals::GlobalNamespace;
use crate::module_system::loader::LoaderRuntime;
use crate::value::{ExportMap, Exports, Value};
use std::rc::Rc;

/// How a module publishes its exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// Writes into an injected export container
    Native,
    /// Writes into the host global namespace; exports are adapted afterwards
    Foreign,
}

/// Fetched source text of a module
#[derive(Debug, Clone, Copy)]
pub struct ModuleSource<'a> {
    /// Resolved path
    pub path: &'a str,
    /// Source text as returned by the fetcher
    pub text: &'a str,
}

/// Turns fetched source text into running module code
pub trait Evaluator {
    /// Run the module's top-level code against `scope`
    fn evaluate(
        &self,
        source: &ModuleSource<'_>,
        scope: &mut Scope<'_>,
    ) -> std::result::Result<(), ScriptError>;
}

/// Capabilities injected into a running module body
pub struct Scope<'a> {
    runtime: &'a mut LoaderRuntime,
    path: &'a str,
    exports: Option<&'a mut ExportMap>,
}

impl Scope<'_> {
    /// Path of the module being executed
    pub fn path(&self) -> &str {
        self.path
    }

    /// Which convention the module is being loaded under
    pub fn convention(&self) -> Convention {
        if self.exports.is_some() {
            Convention::Native
        } else {
            Convention::Foreign
        }
    }

    /// Load a native-convention module by name
    pub fn require(&mut self, name: &str) -> Result<Exports> {
        self.runtime.load(name, None)
    }

    /// Load a foreign-convention module by name, extracting `export_name`
    pub fn require_foreign(&mut self, name: &str, export_name: &str) -> Result<Exports> {
        self.runtime.load(name, Some(export_name))
    }

    /// The export container, if this module was loaded natively
    pub fn exports(&mut self) -> Option<&mut ExportMap> {
        self.exports.as_deref_mut()
    }

    /// Assign `exports.<name> = value`
    pub fn export(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> std::result::Result<(), ScriptError> {
        match self.exports.as_deref_mut() {
            Some(exports) => {
                exports.set(name, value);
                Ok(())
            }
            None => Err(ScriptError::type_error(format!(
                "cannot assign exports.{} in {}: exports is not defined",
                name, self.path
            ))),
        }
    }

    /// The shared host global namespace
    pub fn globals(&self) -> Rc<dyn GlobalNamespace> {
        Rc::clone(self.runtime.globals())
    }
}

/// Run `source` under `convention`.
///
/// Returns the populated export container for native modules and `None` for
/// foreign ones.
pub(crate) fn execute(
    runtime: &mut LoaderRuntime,
    evaluator: &dyn Evaluator,
    source: &ModuleSource<'_>,
    convention: Convention,
) -> std::result::Result<Option<ExportMap>, ScriptError> {
    let mut container = match convention {
        Convention::Native => Some(ExportMap::new()),
        Convention::Foreign => None,
    };

    let mut scope = Scope {
        runtime,
        path: source.path,
        exports: container.as_mut(),
    };
    evaluator.evaluate(source, &mut scope)?;

    Ok(container)
}
