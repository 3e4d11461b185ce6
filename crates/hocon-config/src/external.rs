//! Values from outside the document: environment snapshots and the like.
//!
//! The resolver never reads process state. Callers that want `${HOME}`
//! to work capture a snapshot themselves and pass it in.

use crate::path::Path;
use crate::value::Value;
use hocon_origin::Origin;
use indexmap::IndexMap;

/// Consulted for substitutions that the document itself can't satisfy.
pub trait ExternalLookup {
    fn lookup(&self, path: &Path) -> Option<Value>;
}

/// No external values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternal;

impl ExternalLookup for NoExternal {
    fn lookup(&self, _path: &Path) -> Option<Value> {
        None
    }
}

/// A snapshot of environment variables.
///
/// Variable names are single keys, so `${HOME}` matches `HOME` but
/// `${a.b}` never matches a variable named `a.b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: IndexMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EnvSnapshot {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The snapshot as a flat object of strings.
    pub fn to_value(&self) -> Value {
        Value::object(
            self.vars
                .iter()
                .map(|(k, v)| (k.clone(), Value::string(v.clone(), Origin::environment())))
                .collect(),
            Origin::environment(),
        )
    }
}

impl ExternalLookup for EnvSnapshot {
    fn lookup(&self, path: &Path) -> Option<Value> {
        if path.len() != 1 {
            return None;
        }
        self.get(path.first())
            .map(|v| Value::string(v, Origin::environment()))
    }
}

/// A resolved object can stand in for the environment, e.g. a set of
/// system properties.
impl ExternalLookup for Value {
    fn lookup(&self, path: &Path) -> Option<Value> {
        self.peek_path(path)
            .ok()
            .flatten()
            .filter(|v| v.is_resolved())
            .cloned()
    }
}
