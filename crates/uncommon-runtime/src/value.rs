// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Values exchanged between modules.
//!
//! A module's exports are an [`ExportMap`]. Once a load finalizes, the map is
//! frozen behind an `Rc` and handed to every caller as [`Exports`], so two
//! loads of the same cached module can be compared with `Rc::ptr_eq`.

use crate::error::ScriptError;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Shared, finalized exports of a loaded module
pub type Exports = Rc<ExportMap>;

/// Signature of a host-implemented function callable from module code
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, ScriptError>;

/// A value stored in an export mapping or the host global namespace.
#[derive(Clone, Default)]
pub enum Value {
    /// undefined
    #[default]
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Nested object, e.g. another module's exports
    Object(Rc<ExportMap>),
    /// Callable function
    Function(NativeFunction),
}

impl Value {
    /// Returns true if this value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if this value is a function.
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// The number inside, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string inside, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the type of this value as a string.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    /// Call this value with the given arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, ScriptError> {
        match self {
            Value::Function(func) => func.call(args),
            other => Err(ScriptError::type_error(format!(
                "{} is not a function",
                other.type_of()
            ))),
        }
    }

    /// Build a value from parsed JSON.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(obj) => {
                let map = obj
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect();
                Value::Object(Rc::new(ExportMap { entries: map }))
            }
        }
    }

    /// Convert to JSON for display. Functions become `"[Function: name]"`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => map.to_json(),
            Value::Function(func) => serde_json::Value::String(func.to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(map) => fmt::Debug::fmt(map, f),
            Value::Function(func) => write!(f, "{}", func),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Exports> for Value {
    fn from(exports: Exports) -> Self {
        Value::Object(exports)
    }
}

impl From<NativeFunction> for Value {
    fn from(func: NativeFunction) -> Self {
        Value::Function(func)
    }
}

/// A named host function.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    /// Wrap a closure as a callable value
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + 'static,
    {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    /// The function's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> Result<Value, ScriptError> {
        (self.func)(args)
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "[Function (anonymous)]")
        } else {
            write!(f, "[Function: {}]", self.name)
        }
    }
}

/// Name-to-value export mapping.
///
/// Module bodies populate it through the injected container; after a load
/// finalizes it is only ever reachable through a shared [`Exports`] handle.
#[derive(Clone, Default, PartialEq)]
pub struct ExportMap {
    entries: BTreeMap<String, Value>,
}

impl ExportMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an export by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Assign an export, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    /// Whether an export with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of exports
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was exported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exported names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Call the exported function `name`
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ScriptError> {
        match self.entries.get(name) {
            Some(value) => value.call(args),
            None => Err(ScriptError::type_error(format!("{} is not a function", name))),
        }
    }

    /// Convert to a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl fmt::Debug for ExportMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ExportMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_native_function() {
        let add = NativeFunction::new("add", |args| {
            let a = args.first().and_then(Value::as_number).unwrap_or(0.0);
            let b = args.get(1).and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::Number(a + b))
        });
        let value = Value::from(add);
        assert_eq!(value.call(&[2.0.into(), 3.0.into()]).unwrap(), Value::Number(5.0));
        assert_eq!(value.type_of(), "function");
    }

    #[test]
    fn test_call_non_function() {
        let err = Value::Number(1.0).call(&[]).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: number is not a function");
    }

    #[test]
    fn test_export_map_set_get() {
        let mut map = ExportMap::new();
        assert!(map.is_empty());
        map.set("version", "1.0");
        map.set("answer", 42.0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("version").and_then(Value::as_str), Some("1.0"));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["answer", "version"]);
        assert!(map.call("missing", &[]).is_err());
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::json!({
            "name": "lib",
            "tags": ["a", "b"],
            "nested": { "ok": true }
        });
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_function_to_json() {
        let func = NativeFunction::new("greet", |_| Ok(Value::Undefined));
        assert_eq!(Value::from(func).to_json(), serde_json::json!("[Function: greet]"));
        assert_eq!(Value::Undefined.to_json(), serde_json::Value::Null);
    }
}
