//! Ordered parameter mappings and their wire encoding.
//!
//! # Design
//! Canvas takes its arguments as form fields whose names encode nesting with
//! brackets (`assignment[name]`, `include[]`, `rubric[criteria][0][points]`).
//! `Params` keeps insertion order and a duplicate-key policy, `Nested` writes
//! bracketed keys under a prefix, and `FormEncode` lets option structs
//! describe themselves so endpoint methods never format keys by hand.

use std::fmt;

/// A single parameter value. Lists flatten to repeated keys on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Empty strings and empty lists count as absent for optional parameters.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Str(s) => s.is_empty(),
            ParamValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    fn flatten_into(&self, key: &str, out: &mut Vec<(String, String)>) {
        match self {
            ParamValue::List(items) => {
                for item in items {
                    item.flatten_into(key, out);
                }
            }
            scalar => out.push((key.to_string(), scalar.to_string())),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Str(v.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

macro_rules! int_param {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::Int(i64::from(v))
            }
        })*
    };
}

int_param!(i32, i64, u8, u16, u32);

/// Unsigned values past `i64::MAX` keep their exact digits as text.
macro_rules! wide_param {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                i64::try_from(v)
                    .map(ParamValue::Int)
                    .unwrap_or_else(|_| ParamValue::Str(v.to_string()))
            }
        })*
    };
}

wide_param!(u64, usize);

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add `value` under `key`. An existing key is replaced when `overwrite`
    /// is set; otherwise its value becomes (or is extended as) a list.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<ParamValue>, overwrite: bool) {
        let key = key.into();
        let value = value.into();
        let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) else {
            self.entries.push((key, value));
            return;
        };
        let slot = &mut self.entries[idx].1;
        if overwrite {
            *slot = value;
            return;
        }
        match slot {
            ParamValue::List(items) => items.push(value),
            existing => {
                let first = std::mem::replace(existing, ParamValue::List(Vec::new()));
                *existing = ParamValue::List(vec![first, value]);
            }
        }
    }

    /// Like `add`, but does nothing for `None` or an empty value.
    pub fn add_optional<V: Into<ParamValue>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
        overwrite: bool,
    ) {
        if let Some(value) = value {
            let value = value.into();
            if !value.is_empty() {
                self.add(key, value, overwrite);
            }
        }
    }

    /// Insert every entry of `other`, replacing existing keys.
    pub fn merge(&mut self, other: Params) {
        for (key, value) in other.entries {
            self.add(key, value, true);
        }
    }

    /// Append a pair without looking at existing keys. Used where the server
    /// groups repeated `[]` keys by their relative order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Scoped writer producing `prefix[key]` names.
    pub fn nest(&mut self, prefix: impl Into<String>) -> Nested<'_> {
        Nested {
            params: self,
            prefix: prefix.into(),
        }
    }

    /// Encode a structured options value into this mapping.
    pub fn encode(&mut self, value: &impl FormEncode) {
        value.encode(self);
    }

    /// Flatten into ordered wire pairs; list values repeat their key.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            value.flatten_into(key, &mut out);
        }
        out
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.add(k, v, true);
        }
        params
    }
}

/// Writer that prefixes every key with `prefix[...]`.
pub struct Nested<'a> {
    params: &'a mut Params,
    prefix: String,
}

impl Nested<'_> {
    fn key(&self, key: &str) -> String {
        format!("{}[{}]", self.prefix, key)
    }

    pub fn add(&mut self, key: &str, value: impl Into<ParamValue>) -> &mut Self {
        let key = self.key(key);
        self.params.add(key, value, true);
        self
    }

    pub fn add_optional<V: Into<ParamValue>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        let key = self.key(key);
        self.params.add_optional(key, value, true);
        self
    }

    /// Write `values` as the array field `prefix[key][]`; nothing for an
    /// empty list.
    pub fn add_array<V: Into<ParamValue>>(&mut self, key: &str, values: Vec<V>) -> &mut Self {
        let key = format!("{}[]", self.key(key));
        self.params.add_optional(key, Some(values), true);
        self
    }

    pub fn push(&mut self, key: &str, value: impl Into<ParamValue>) -> &mut Self {
        let key = self.key(key);
        self.params.push(key, value);
        self
    }

    /// Deeper scope: `prefix[key][...]`.
    pub fn nest(&mut self, key: &str) -> Nested<'_> {
        let prefix = self.key(key);
        Nested {
            params: &mut *self.params,
            prefix,
        }
    }
}

/// Structured request options that know their form-field encoding.
pub trait FormEncode {
    fn encode(&self, params: &mut Params);
}
