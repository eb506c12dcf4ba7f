// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Foreign export adapter

use crate::globals::GlobalNamespace;
use crate::value::{ExportMap, Value};

/// Build the exports of a foreign-convention module.
///
/// Copies whatever `globals` holds under `export_name` right now into a fresh
/// mapping under the same name. The module is not required to have set it:
/// a value left behind by an earlier load is copied as-is, and a missing
/// global becomes `undefined`.
pub fn adapt_foreign_exports(globals: &dyn GlobalNamespace, export_name: &str) -> ExportMap {
    let value = globals.get(export_name).unwrap_or(Value::Undefined);
    let mut exports = ExportMap::new();
    exports.set(export_name, value);
    exports
}
