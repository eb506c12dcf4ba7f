// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # uncommon-runtime
//!
//! A lazy, cached module loader. Modules reference each other by name:
//!
//! - `load("math")` fetches `math.js` once, runs it, and caches its exports
//! - native modules write into an injected `exports` container
//! - foreign (legacy) modules publish a value in a shared global namespace,
//!   which the loader copies out under a caller-supplied name
//! - a module that fails while running is evicted, so the next load retries
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use uncommon_runtime::{LoaderRuntime, MemoryFetcher, NativeFunction, UnitRegistry, Value};
//!
//! let fetcher = MemoryFetcher::with_sources([("math.js", "")]);
//! let mut units = UnitRegistry::new();
//! units.register("math.js", |_, scope| {
//!     scope.export("add", NativeFunction::new("add", |args| {
//!         let a = args.first().and_then(Value::as_number).unwrap_or(0.0);
//!         let b = args.get(1).and_then(Value::as_number).unwrap_or(0.0);
//!         Ok(Value::Number(a + b))
//!     }))
//! });
//!
//! let mut runtime = LoaderRuntime::new(Rc::new(fetcher), Rc::new(units));
//! let math = runtime.require("math").unwrap();
//! let sum = math.call("add", &[2.0.into(), 3.0.into()]).unwrap();
//! assert_eq!(sum, Value::Number(5.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fetch;
pub mod globals;
pub mod module_system;
pub mod value;

// Re-exports
pub use config::{FetchFailurePolicy, LoaderConfig};
pub use error::{ConfigError, FetchError, LoaderError, Result, ScriptError};
pub use fetch::{Fetcher, FileFetcher, MemoryFetcher};
pub use globals::{GlobalNamespace, HostGlobals};
pub use module_system::{
    CacheStore, Convention, Evaluator, JsonEvaluator, LoaderRuntime, ModuleRecord, ModuleSource,
    Scope, UnitRegistry,
};
pub use value::{ExportMap, Exports, NativeFunction, Value};

/// Version of the uncommon runtime
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
