// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache stores

use crate::value::Exports;

/// One loaded (or currently loading) module
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Resolved source path, unique within the owning store
    pub path: String,
    /// Insertion-order identity, unique within the owning store
    pub id: u64,
    /// Finalized exports; `None` while the module body is still running
    pub exports: Option<Exports>,
}

impl ModuleRecord {
    /// Whether the module body has finished running
    pub fn is_loaded(&self) -> bool {
        self.exports.is_some()
    }
}

/// Insertion-ordered collection of module records for one export convention.
///
/// No two records share a path. Ids are never reused, even after an
/// eviction, so evicting by id can only ever remove the record it was
/// handed.
#[derive(Debug)]
pub struct CacheStore {
    records: Vec<ModuleRecord>,
    next_id: u64,
}

impl CacheStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Find the record for `path`
    pub fn lookup(&self, path: &str) -> Option<&ModuleRecord> {
        self.records.iter().find(|record| record.path == path)
    }

    /// Append a provisional record for `path` and return its id
    pub fn insert(&mut self, path: &str) -> u64 {
        debug_assert!(self.lookup(path).is_none(), "duplicate cache path {path}");
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(ModuleRecord {
            path: path.to_string(),
            id,
            exports: None,
        });
        id
    }

    /// Set the exports of a provisional record
    pub fn finalize(&mut self, id: u64, exports: Exports) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.exports = Some(exports);
                true
            }
            None => false,
        }
    }

    /// Remove a record by identity
    pub fn evict(&mut self, id: u64) -> Option<ModuleRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.records.iter()
    }

    /// Get all cached module paths
    pub fn paths(&self) -> Vec<String> {
        self.records.iter().map(|record| record.path.clone()).collect()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Get the number of cached modules
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
