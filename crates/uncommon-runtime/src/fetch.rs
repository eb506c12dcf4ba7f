// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Source fetchers
//!
//! The loader never touches a transport directly. It asks a [`Fetcher`] for
//! the text at a resolved path and blocks until the answer comes back.

use crate::error::FetchError;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Synchronous "fetch text at path" primitive
pub trait Fetcher {
    /// Fetch the source text stored at `path`
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetches module sources from a directory on disk
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    /// Create a fetcher rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path.trim_start_matches('/'));
        debug!("Reading module source from {}", full.display());

        match std::fs::read_to_string(&full) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(e) => Err(FetchError::Io {
                path: path.to_string(),
                source: e,
            }),
        }
    }
}

/// In-memory sources, mainly for embedding and tests.
///
/// Sources can be added or removed while a runtime holds the fetcher, and
/// every call to [`Fetcher::fetch`] is counted.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    sources: RefCell<BTreeMap<String, String>>,
    fetches: Cell<usize>,
}

impl MemoryFetcher {
    /// Create a fetcher with no sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher pre-populated with `(path, text)` pairs
    pub fn with_sources<I, P, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        let fetcher = Self::new();
        for (path, text) in sources {
            fetcher.insert(path, text);
        }
        fetcher
    }

    /// Add or replace the source at `path`
    pub fn insert(&self, path: impl Into<String>, text: impl Into<String>) {
        self.sources.borrow_mut().insert(path.into(), text.into());
    }

    /// Remove the source at `path`
    pub fn remove(&self, path: &str) -> Option<String> {
        self.sources.borrow_mut().remove(path)
    }

    /// How many times `fetch` has been called, successful or not
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.fetches.set(self.fetches.get() + 1);
        self.sources
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}
