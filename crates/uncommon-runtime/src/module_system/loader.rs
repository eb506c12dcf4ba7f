// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - fetches, caches and executes modules

use crate::config::{FetchFailurePolicy, LoaderConfig};
use crate::error::{LoaderError, Result};
use crate::fetch::Fetcher;
use crate::globals::{GlobalNamespace, HostGlobals};
use crate::module_system::adapter::adapt_foreign_exports;
use crate::module_system::cache::CacheStore;
use crate::module_system::resolver::module_path;
use crate::module_system::sandbox::{self, Convention, Evaluator, ModuleSource};
use crate::value::{ExportMap, Exports};
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Owns both module caches and drives every load.
///
/// A module is fetched and executed at most once per convention for the
/// lifetime of the runtime. The runtime is single-threaded: module bodies
/// call back into it through their [`sandbox::Scope`] and nested loads run
/// to completion before the outer body continues.
pub struct LoaderRuntime {
    /// Loader configuration
    config: LoaderConfig,
    /// Source transport
    fetcher: Rc<dyn Fetcher>,
    /// Turns source text into running code
    evaluator: Rc<dyn Evaluator>,
    /// Namespace shared with foreign-convention modules
    globals: Rc<dyn GlobalNamespace>,
    /// Modules using the native export convention
    native: CacheStore,
    /// Modules using the foreign export convention
    foreign: CacheStore,
}

impl LoaderRuntime {
    /// Create a runtime with default configuration and an empty global namespace
    pub fn new(fetcher: Rc<dyn Fetcher>, evaluator: Rc<dyn Evaluator>) -> Self {
        Self {
            config: LoaderConfig::default(),
            fetcher,
            evaluator,
            globals: Rc::new(HostGlobals::new()),
            native: CacheStore::new(),
            foreign: CacheStore::new(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing global namespace with loaded modules
    pub fn with_globals(mut self, globals: Rc<dyn GlobalNamespace>) -> Self {
        self.globals = globals;
        self
    }

    /// Load a module by name.
    ///
    /// With `foreign_export_name` the module is loaded under the foreign
    /// convention and the named global becomes its only export. An empty
    /// export name counts as absent.
    #[instrument(skip(self), level = "debug")]
    pub fn load(&mut self, name: &str, foreign_export_name: Option<&str>) -> Result<Exports> {
        match module_path(name, &self.config)? {
            Some(path) => self.resolve(&path, foreign_export_name),
            None => Ok(Rc::new(ExportMap::new())),
        }
    }

    /// Load a native-convention module
    pub fn require(&mut self, name: &str) -> Result<Exports> {
        self.load(name, None)
    }

    /// Load a foreign-convention module, extracting `export_name`
    pub fn require_foreign(&mut self, name: &str, export_name: &str) -> Result<Exports> {
        self.load(name, Some(export_name))
    }

    /// Load the module at an already-resolved path
    pub fn resolve(&mut self, path: &str, foreign_export_name: Option<&str>) -> Result<Exports> {
        if path.is_empty() {
            return Ok(Rc::new(ExportMap::new()));
        }

        let foreign_export_name = foreign_export_name.filter(|name| !name.is_empty());
        let convention = match foreign_export_name {
            Some(_) => Convention::Foreign,
            None => Convention::Native,
        };

        if let Some(record) = self.store(convention).lookup(path) {
            return Ok(match &record.exports {
                Some(exports) => {
                    debug!("Cache hit for {}", path);
                    Rc::clone(exports)
                }
                None => {
                    // Reentrant load of a module whose body is still running
                    warn!("Cyclic load of {}; returning empty exports", path);
                    Rc::new(ExportMap::new())
                }
            });
        }

        let text = match self.fetcher.fetch(path) {
            Ok(text) => {
                debug!("Fetched {} ({} bytes)", path, text.len());
                text
            }
            Err(err) => {
                return match self.config.fetch_failure {
                    FetchFailurePolicy::Silent => {
                        debug!("Fetch failed for {}: {}", path, err);
                        Ok(Rc::new(ExportMap::new()))
                    }
                    FetchFailurePolicy::Report => Err(LoaderError::ModuleNotFound {
                        path: path.to_string(),
                        source: err,
                    }),
                };
            }
        };

        let id = self.store_mut(convention).insert(path);
        debug!("Provisionally cached {} as {:?} module #{}", path, convention, id);

        let evaluator = Rc::clone(&self.evaluator);
        let source = ModuleSource { path, text: &text };
        let container = match sandbox::execute(self, evaluator.as_ref(), &source, convention) {
            Ok(container) => container,
            Err(err) => {
                self.store_mut(convention).evict(id);
                warn!("Evicted {} after failed execution: {}", path, err);
                return Err(LoaderError::ModuleExecution {
                    path: path.to_string(),
                    source: err,
                });
            }
        };

        let exports = match foreign_export_name {
            Some(export_name) => adapt_foreign_exports(self.globals.as_ref(), export_name),
            None => container.unwrap_or_default(),
        };
        let exports = Rc::new(exports);
        self.store_mut(convention).finalize(id, Rc::clone(&exports));
        debug!("Loaded {} ({} exports)", path, exports.len());

        Ok(exports)
    }

    /// The cache store for a convention
    pub fn store(&self, convention: Convention) -> &CacheStore {
        match convention {
            Convention::Native => &self.native,
            Convention::Foreign => &self.foreign,
        }
    }

    fn store_mut(&mut self, convention: Convention) -> &mut CacheStore {
        match convention {
            Convention::Native => &mut self.native,
            Convention::Foreign => &mut self.foreign,
        }
    }

    /// Drop every cached module in both stores
    pub fn clear(&mut self) {
        self.native.clear();
        self.foreign.clear();
    }

    /// The global namespace shared with modules
    pub fn globals(&self) -> &Rc<dyn GlobalNamespace> {
        &self.globals
    }

    /// The active configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}
