// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module system implementation
//!
//! ## Native convention
//! - module body receives `require` and an `exports` container
//! - whatever it assigns into `exports` is the module's exports
//!
//! ## Foreign convention
//! - module body receives `require` only
//! - it publishes a value in the host global namespace
//! - the named global is copied out after the body finishes

mod adapter;
mod cache;
mod loader;
mod resolver;
mod sandbox;
mod units;

pub use adapter::adapt_foreign_exports;
pub use cache::{CacheStore, ModuleRecord};
pub use loader::LoaderRuntime;
pub use resolver::module_path;
pub use sandbox::{Convention, Evaluator, ModuleSource, Scope};
pub use units::{JsonEvaluator, ModuleUnit, UnitRegistry};
