//! Typed access to a configuration tree.

use crate::error::ConfigError;
use crate::external::{ExternalLookup, NoExternal};
use crate::path::Path;
use crate::render::RenderOptions;
use crate::resolve::{ResolveOptions, resolve_against};
use crate::transform::transform;
use crate::value::{Number, Value, ValueKind, ValueType};
use hocon_origin::Origin;
use indexmap::IndexMap;
use num_traits::ToPrimitive;

/// A configuration: a root object plus typed accessors.
///
/// Accessors take path expressions (`"db.host"`) and apply the default
/// conversions, so `"8080"` reads as a number and `{"0": a, "1": b}` reads
/// as a list. Reading anything that still contains substitutions fails
/// with [`ConfigError::NotResolved`]; call [`Config::resolve`] first.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: Value,
}

impl Config {
    /// Wrap an object (or an object merge stack).
    pub fn from_value(root: Value) -> Result<Config, ConfigError> {
        if root.value_type() != ValueType::Object {
            return Err(ConfigError::WrongType {
                path: Some("(root)".to_string()),
                expected: ValueType::Object,
                found: root.value_type(),
                origin: Some(root.origin().clone()),
            });
        }
        Ok(Config { root })
    }

    pub fn empty() -> Config {
        Config {
            root: Value::empty_object(Origin::generic("empty config")),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Merge `fallback` below this config.
    pub fn with_fallback(&self, fallback: impl AsRef<Value>) -> Config {
        Config {
            root: self.root.with_fallback(fallback.as_ref()),
        }
    }

    pub fn with_fallbacks<I, V>(&self, fallbacks: I) -> Config
    where
        I: IntoIterator<Item = V>,
        V: AsRef<Value>,
    {
        fallbacks
            .into_iter()
            .fold(self.clone(), |merged, fallback| merged.with_fallback(fallback))
    }

    pub fn is_resolved(&self) -> bool {
        self.root.is_resolved()
    }

    /// Resolve every substitution against this config itself.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        self.resolve_with_options(&ResolveOptions::default())
    }

    pub fn resolve_with_options(&self, options: &ResolveOptions) -> Result<Config, ConfigError> {
        self.resolve_with_external(options, &NoExternal)
    }

    /// Resolve, consulting `external` for substitutions the config lacks
    /// when `options.use_environment_fallback` is set.
    pub fn resolve_with_external(
        &self,
        options: &ResolveOptions,
        external: &dyn ExternalLookup,
    ) -> Result<Config, ConfigError> {
        let resolved = resolve_against(&self.root, &self.root, options, external)?;
        self.rewrap(resolved)
    }

    /// Resolve this config, looking substitutions up in `source`.
    pub fn resolve_with(&self, source: &Config, options: &ResolveOptions) -> Result<Config, ConfigError> {
        let resolved = resolve_against(&self.root, &source.root, options, &NoExternal)?;
        self.rewrap(resolved)
    }

    /// Nothing left after resolving means an empty config; any other
    /// non-object is the same error [`Config::from_value`] reports.
    fn rewrap(&self, resolved: Option<Value>) -> Result<Config, ConfigError> {
        match resolved {
            Some(root) => Config::from_value(root),
            None => Ok(Config {
                root: Value::empty_object(self.root.origin().clone()),
            }),
        }
    }

    /// True if `path` holds a value other than null.
    pub fn has_path(&self, path: &str) -> Result<bool, ConfigError> {
        let path = Path::parse(path)?;
        Ok(self.root.peek_path(&path)?.is_some_and(|v| !v.is_null()))
    }

    /// True if `path` holds any value, null included.
    pub fn has_path_or_null(&self, path: &str) -> Result<bool, ConfigError> {
        let path = Path::parse(path)?;
        Ok(self.root.peek_path(&path)?.is_some())
    }

    /// The raw value at `path`; null is returned as is.
    pub fn get_value(&self, path: &str) -> Result<Value, ConfigError> {
        let parsed = Path::parse(path)?;
        let value = self.peek(&parsed)?;
        check_resolved(&parsed, &value)?;
        Ok(value)
    }

    pub fn get_string(&self, path: &str) -> Result<String, ConfigError> {
        let value = self.find(path, ValueType::String)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, ConfigError> {
        let value = self.find(path, ValueType::Boolean)?;
        Ok(value.as_bool().unwrap_or_default())
    }

    pub fn get_number(&self, path: &str) -> Result<Number, ConfigError> {
        let value = self.find(path, ValueType::Number)?;
        value.as_number().cloned().ok_or_else(|| wrong_type(path, ValueType::Number, &value))
    }

    /// A number as `i64`. Fractions are truncated; out-of-range values
    /// are a [`ConfigError::BadValue`].
    pub fn get_i64(&self, path: &str) -> Result<i64, ConfigError> {
        let value = self.find(path, ValueType::Number)?;
        let out_of_range = |number: &Number| ConfigError::BadValue {
            path: path.to_string(),
            message: format!("{number} is out of range for a 64-bit integer"),
            origin: Some(value.origin().clone()),
        };
        match value.as_number() {
            Some(Number::Int(i)) => Ok(*i),
            Some(number @ Number::Double(d)) => {
                d.trunc().to_i64().ok_or_else(|| out_of_range(number))
            }
            Some(number @ Number::BigInt(b)) => b.to_i64().ok_or_else(|| out_of_range(number)),
            None => Err(wrong_type(path, ValueType::Number, &value)),
        }
    }

    pub fn get_f64(&self, path: &str) -> Result<f64, ConfigError> {
        Ok(self.get_number(path)?.to_f64())
    }

    pub fn get_list(&self, path: &str) -> Result<Vec<Value>, ConfigError> {
        let value = self.find(path, ValueType::List)?;
        Ok(value.as_list().map(<[Value]>::to_vec).unwrap_or_default())
    }

    pub fn get_object(&self, path: &str) -> Result<IndexMap<String, Value>, ConfigError> {
        let value = self.find(path, ValueType::Object)?;
        value
            .as_object()
            .cloned()
            .ok_or_else(|| wrong_type(path, ValueType::Object, &value))
    }

    /// The object at `path` as a config of its own.
    pub fn get_config(&self, path: &str) -> Result<Config, ConfigError> {
        let value = self.find(path, ValueType::Object)?;
        Config::from_value(value)
    }

    /// A list whose every element reads as a string.
    pub fn get_string_list(&self, path: &str) -> Result<Vec<String>, ConfigError> {
        self.get_list(path)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let converted = transform(item, ValueType::String);
                converted
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(&format!("{path}[{i}]"), ValueType::String, item))
            })
            .collect()
    }

    /// Top-level keys, in document order.
    pub fn keys(&self) -> Vec<&str> {
        self.root
            .as_object()
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        self.root.render(options)
    }

    fn peek(&self, path: &Path) -> Result<Value, ConfigError> {
        match self.root.peek_path(path)? {
            Some(value) => Ok(value.clone()),
            None => Err(ConfigError::Missing {
                path: path.render(),
                set_to_null: false,
                origin: Some(self.root.origin().clone()),
            }),
        }
    }

    /// The value at `path` converted to `expected`.
    fn find(&self, path: &str, expected: ValueType) -> Result<Value, ConfigError> {
        let parsed = Path::parse(path)?;
        let value = self.peek(&parsed)?;
        check_resolved(&parsed, &value)?;

        if value.is_null() && expected != ValueType::Null {
            return Err(ConfigError::Missing {
                path: parsed.render(),
                set_to_null: true,
                origin: Some(value.origin().clone()),
            });
        }

        let converted = transform(&value, expected);
        if converted.value_type() != expected {
            return Err(wrong_type(&parsed.render(), expected, &value));
        }
        Ok(converted)
    }
}

impl AsRef<Value> for Config {
    fn as_ref(&self) -> &Value {
        &self.root
    }
}

impl From<Config> for Value {
    fn from(config: Config) -> Value {
        config.root
    }
}

fn check_resolved(path: &Path, value: &Value) -> Result<(), ConfigError> {
    if value.is_resolved() {
        return Ok(());
    }
    let what = match value.kind() {
        ValueKind::Reference { expr, .. } => format!("substitution {expr}"),
        ValueKind::Concatenation(_) => "concatenation".to_string(),
        _ => "unmerged value".to_string(),
    };
    Err(ConfigError::NotResolved {
        path: Some(path.render()),
        message: format!(
            "'{}' holds an unresolved {what}; resolve the configuration before reading it",
            path.render()
        ),
        origin: Some(value.origin().clone()),
    })
}

fn wrong_type(path: &str, expected: ValueType, value: &Value) -> ConfigError {
    ConfigError::WrongType {
        path: Some(path.to_string()),
        expected,
        found: value.value_type(),
        origin: Some(value.origin().clone()),
    }
}
