// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host global namespace
//!
//! Foreign-convention modules publish their API by writing a named value into
//! a namespace shared by every module. The runtime never owns that namespace
//! outright; it holds a handle to whatever implementation the host injects.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Shared, mutable name-to-value namespace
pub trait GlobalNamespace {
    /// Read a global
    fn get(&self, name: &str) -> Option<Value>;

    /// Write a global, returning the previous value
    fn set(&self, name: &str, value: Value) -> Option<Value>;

    /// Remove a global
    fn remove(&self, name: &str) -> Option<Value>;

    /// Whether a global is defined
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Default in-process global namespace
#[derive(Debug, Default)]
pub struct HostGlobals {
    values: RefCell<HashMap<String, Value>>,
}

impl HostGlobals {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of defined globals
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether no globals are defined
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl GlobalNamespace for HostGlobals {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.borrow().get(name).cloned()
    }

    fn set(&self, name: &str, value: Value) -> Option<Value> {
        self.values.borrow_mut().insert(name.to_string(), value)
    }

    fn remove(&self, name: &str) -> Option<Value> {
        self.values.borrow_mut().remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let globals = HostGlobals::new();
        assert!(globals.is_empty());
        assert!(globals.set("jQuery", Value::from("1.12")).is_none());
        assert!(globals.contains("jQuery"));
        assert_eq!(globals.get("jQuery"), Some(Value::from("1.12")));
        assert_eq!(globals.set("jQuery", Value::from("3.7")), Some(Value::from("1.12")));
        assert_eq!(globals.len(), 1);
        assert_eq!(globals.remove("jQuery"), Some(Value::from("3.7")));
        assert!(!globals.contains("jQuery"));
    }
}
