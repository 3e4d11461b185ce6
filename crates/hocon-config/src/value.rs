//! The value tree.
//!
//! A [`Value`] is a cheap handle onto an immutable node. Nodes are never
//! mutated after construction: merging and resolving build new nodes and
//! share unchanged subtrees. Node identity ([`Value::ptr_eq`]) is what the
//! resolver memoizes on; value equality ignores origins.

use crate::error::ConfigError;
use crate::path::Path;
use hocon_origin::Origin;
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use std::fmt;
use std::sync::Arc;

/// The concrete type of a value, as seen by accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Object,
    List,
    Number,
    Boolean,
    Null,
    String,
    /// A substitution, concatenation or merge that still needs resolving
    Unresolved,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Object => "object",
            ValueType::List => "list",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
            ValueType::String => "string",
            ValueType::Unresolved => "unresolved",
        };
        f.write_str(name)
    }
}

/// A numeric value.
///
/// Equality is numeric across variants: `Int(1)`, `Double(1.0)` and
/// `BigInt(1)` are all equal.
#[derive(Debug, Clone)]
pub enum Number {
    Int(i64),
    Double(f64),
    BigInt(BigInt),
}

impl Number {
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Double(d) => *d,
            Number::BigInt(b) => b.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// The value as an `i64`, if it is a whole number in range.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::Double(_) => self.whole().and_then(|b| b.to_i64()),
            Number::BigInt(b) => b.to_i64(),
        }
    }

    pub fn is_whole(&self) -> bool {
        self.whole().is_some()
    }

    fn whole(&self) -> Option<BigInt> {
        match self {
            Number::Int(i) => Some(BigInt::from(*i)),
            Number::Double(d) if d.is_finite() && d.fract() == 0.0 => BigInt::from_f64(*d),
            Number::Double(_) => None,
            Number::BigInt(b) => Some(b.clone()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => match (self.whole(), other.whole()) {
                (Some(a), Some(b)) => a == b,
                _ => self.to_f64() == other.to_f64(),
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::BigInt(b) => write!(f, "{b}"),
            Number::Double(d) if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e16 => {
                write!(f, "{d:.1}")
            }
            Number::Double(d) => write!(f, "{d}"),
        }
    }
}

/// A `${path}` or `${?path}` substitution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubstitutionExpression {
    pub path: Path,
    /// True for `${?path}`
    pub optional: bool,
}

impl SubstitutionExpression {
    pub fn new(path: Path, optional: bool) -> Self {
        SubstitutionExpression { path, optional }
    }
}

impl fmt::Display for SubstitutionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "${{?{}}}", self.path.render())
        } else {
            write!(f, "${{{}}}", self.path.render())
        }
    }
}

/// The variants a value can take.
#[derive(Debug, Clone)]
pub enum ValueKind {
    Null,
    Boolean(bool),
    Number {
        number: Number,
        /// Source text of the number, kept for string concatenation
        original: Option<String>,
    },
    String(String),
    List(Vec<Value>),
    Object {
        entries: IndexMap<String, Value>,
        /// Set once a concrete non-object fallback has been merged below
        /// this object; later fallbacks are then dropped.
        ignores_fallbacks: bool,
    },
    Reference {
        expr: SubstitutionExpression,
        /// Number of leading path keys added by [`Value::relativized`]
        prefix_length: usize,
    },
    /// Adjacent pieces joined at resolve time. Never nested, always at
    /// least two pieces, at least one of them unmergeable.
    Concatenation(Vec<Value>),
    /// A merge stack, first element wins. Never nested, never empty.
    DelayedMerge(Vec<Value>),
    /// A merge stack whose first element is an object.
    DelayedMergeObject(Vec<Value>),
}

#[derive(Debug)]
struct Node {
    kind: ValueKind,
    origin: Origin,
    resolved: bool,
}

/// An immutable configuration value.
#[derive(Clone)]
pub struct Value(Arc<Node>);

impl Value {
    pub(crate) fn from_kind(kind: ValueKind, origin: Origin) -> Value {
        let resolved = match &kind {
            ValueKind::Null
            | ValueKind::Boolean(_)
            | ValueKind::Number { .. }
            | ValueKind::String(_) => true,
            ValueKind::List(items) => items.iter().all(Value::is_resolved),
            ValueKind::Object { entries, .. } => entries.values().all(Value::is_resolved),
            ValueKind::Reference { .. }
            | ValueKind::Concatenation(_)
            | ValueKind::DelayedMerge(_)
            | ValueKind::DelayedMergeObject(_) => false,
        };
        Value(Arc::new(Node {
            kind,
            origin,
            resolved,
        }))
    }

    pub fn null(origin: Origin) -> Value {
        Value::from_kind(ValueKind::Null, origin)
    }

    pub fn boolean(value: bool, origin: Origin) -> Value {
        Value::from_kind(ValueKind::Boolean(value), origin)
    }

    pub fn int(value: i64, origin: Origin) -> Value {
        Value::number(Number::Int(value), None, origin)
    }

    pub fn double(value: f64, origin: Origin) -> Value {
        Value::number(Number::Double(value), None, origin)
    }

    /// A number, optionally keeping the text it was parsed from.
    pub fn number(number: Number, original: Option<String>, origin: Origin) -> Value {
        Value::from_kind(ValueKind::Number { number, original }, origin)
    }

    pub fn string(value: impl Into<String>, origin: Origin) -> Value {
        Value::from_kind(ValueKind::String(value.into()), origin)
    }

    pub fn list(items: Vec<Value>, origin: Origin) -> Value {
        Value::from_kind(ValueKind::List(items), origin)
    }

    pub fn object(entries: IndexMap<String, Value>, origin: Origin) -> Value {
        Value::object_with_flag(entries, false, origin)
    }

    pub fn empty_object(origin: Origin) -> Value {
        Value::object(IndexMap::new(), origin)
    }

    pub(crate) fn object_with_flag(
        entries: IndexMap<String, Value>,
        ignores_fallbacks: bool,
        origin: Origin,
    ) -> Value {
        Value::from_kind(
            ValueKind::Object {
                entries,
                ignores_fallbacks,
            },
            origin,
        )
    }

    /// A `${path}` (or `${?path}` when `optional`) substitution.
    pub fn reference(path: Path, optional: bool, origin: Origin) -> Value {
        Value::from_kind(
            ValueKind::Reference {
                expr: SubstitutionExpression::new(path, optional),
                prefix_length: 0,
            },
            origin,
        )
    }

    /// Build a merge stack node. The stack must already be flattened.
    pub(crate) fn delayed_merge(stack: Vec<Value>) -> Value {
        let origin = Origin::merge_all(stack.iter().map(Value::origin)).unwrap_or_default();
        let object_like = stack.first().is_some_and(Value::is_object_like);
        if object_like {
            Value::from_kind(ValueKind::DelayedMergeObject(stack), origin)
        } else {
            Value::from_kind(ValueKind::DelayedMerge(stack), origin)
        }
    }

    pub fn kind(&self) -> &ValueKind {
        &self.0.kind
    }

    pub fn origin(&self) -> &Origin {
        &self.0.origin
    }

    /// True if no substitution, concatenation or merge stack is reachable.
    pub fn is_resolved(&self) -> bool {
        self.0.resolved
    }

    /// The same value with a different origin.
    pub fn with_origin(&self, origin: Origin) -> Value {
        Value(Arc::new(Node {
            kind: self.0.kind.clone(),
            origin,
            resolved: self.0.resolved,
        }))
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn value_type(&self) -> ValueType {
        match &self.0.kind {
            ValueKind::Null => ValueType::Null,
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::Number { .. } => ValueType::Number,
            ValueKind::String(_) => ValueType::String,
            ValueKind::List(_) => ValueType::List,
            ValueKind::Object { .. } | ValueKind::DelayedMergeObject(_) => ValueType::Object,
            ValueKind::Reference { .. }
            | ValueKind::Concatenation(_)
            | ValueKind::DelayedMerge(_) => ValueType::Unresolved,
        }
    }

    /// Substitutions, concatenations and merge stacks can't be merged
    /// until they are resolved.
    pub fn is_unmergeable(&self) -> bool {
        matches!(
            self.0.kind,
            ValueKind::Reference { .. }
                | ValueKind::Concatenation(_)
                | ValueKind::DelayedMerge(_)
                | ValueKind::DelayedMergeObject(_)
        )
    }

    pub(crate) fn is_object_like(&self) -> bool {
        matches!(
            self.0.kind,
            ValueKind::Object { .. } | ValueKind::DelayedMergeObject(_)
        )
    }

    /// The elements of a merge stack.
    pub(crate) fn merge_stack(&self) -> Option<&[Value]> {
        match &self.0.kind {
            ValueKind::DelayedMerge(stack) | ValueKind::DelayedMergeObject(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.0.kind, ValueKind::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.0.kind {
            ValueKind::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.0.kind {
            ValueKind::Number { number, .. } => Some(number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.0.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.0.kind {
            ValueKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// The entries of a concrete object.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match &self.0.kind {
            ValueKind::Object { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Child of a concrete object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|entries| entries.get(key))
    }

    /// Text used when this value is joined into a string, `None` for
    /// lists, objects and unresolved values.
    pub(crate) fn transform_to_string(&self) -> Option<String> {
        match &self.0.kind {
            ValueKind::Null => Some("null".to_string()),
            ValueKind::Boolean(b) => Some(b.to_string()),
            ValueKind::Number { number, original } => {
                Some(original.clone().unwrap_or_else(|| number.to_string()))
            }
            ValueKind::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Look up `path` below this object without resolving anything.
    ///
    /// `Ok(None)` if some key is absent or the path runs into a
    /// non-object; `NotResolved` if it runs into an unresolved value.
    pub fn peek_path(&self, path: &Path) -> Result<Option<&Value>, ConfigError> {
        let mut current = self;
        for (depth, key) in path.keys().enumerate() {
            match &current.0.kind {
                ValueKind::Object { entries, .. } => match entries.get(key) {
                    Some(child) => current = child,
                    None => return Ok(None),
                },
                ValueKind::Reference { .. }
                | ValueKind::Concatenation(_)
                | ValueKind::DelayedMerge(_)
                | ValueKind::DelayedMergeObject(_) => {
                    let reached = path.sub_path_range(0, depth).map(|p| p.render());
                    let message = match &reached {
                        Some(prefix) => format!(
                            "'{prefix}' has not been resolved; resolve the configuration before reading '{}'",
                            path.render()
                        ),
                        None => format!(
                            "The configuration has not been resolved; resolve it before reading '{}'",
                            path.render()
                        ),
                    };
                    return Err(ConfigError::NotResolved {
                        path: Some(path.render()),
                        message,
                        origin: Some(current.origin().clone()),
                    });
                }
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Wrap this value in a single-key object.
    pub fn at_key(&self, key: impl Into<String>) -> Value {
        let mut entries = IndexMap::new();
        entries.insert(key.into(), self.clone());
        Value::object(entries, self.origin().clone())
    }

    /// Wrap this value in nested objects so it sits at `path`.
    pub fn at_path(&self, path: &Path) -> Value {
        let keys: Vec<&str> = path.keys().collect();
        keys.iter()
            .rev()
            .fold(self.clone(), |inner, key| inner.at_key(*key))
    }

    /// Graft this value below `prefix`: every substitution path gets
    /// `prefix` in front and remembers how many keys were added.
    pub fn relativized(&self, prefix: &Path) -> Value {
        if self.is_resolved() {
            return self.clone();
        }
        let map_all = |values: &[Value]| -> Vec<Value> {
            values.iter().map(|v| v.relativized(prefix)).collect()
        };
        let kind = match &self.0.kind {
            ValueKind::Reference {
                expr,
                prefix_length,
            } => ValueKind::Reference {
                expr: SubstitutionExpression::new(expr.path.prepend(prefix), expr.optional),
                prefix_length: prefix_length + prefix.len(),
            },
            ValueKind::List(items) => ValueKind::List(map_all(items)),
            ValueKind::Object {
                entries,
                ignores_fallbacks,
            } => ValueKind::Object {
                entries: entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.relativized(prefix)))
                    .collect(),
                ignores_fallbacks: *ignores_fallbacks,
            },
            ValueKind::Concatenation(pieces) => ValueKind::Concatenation(map_all(pieces)),
            ValueKind::DelayedMerge(stack) => ValueKind::DelayedMerge(map_all(stack)),
            ValueKind::DelayedMergeObject(stack) => ValueKind::DelayedMergeObject(map_all(stack)),
            _ => return self.clone(),
        };
        Value::from_kind(kind, self.origin().clone())
    }

    /// A copy of this object with `value` stored at `path`, creating
    /// intermediate objects as needed.
    pub fn with_value(&self, path: &Path, value: Value) -> Result<Value, ConfigError> {
        let ValueKind::Object {
            entries,
            ignores_fallbacks,
        } = &self.0.kind
        else {
            return Err(ConfigError::WrongType {
                path: Some(path.render()),
                expected: ValueType::Object,
                found: self.value_type(),
                origin: Some(self.origin().clone()),
            });
        };

        let key = path.first();
        let child = match path.remainder() {
            None => value,
            Some(rest) => match entries.get(key) {
                Some(existing) if existing.as_object().is_some() => {
                    existing.with_value(&rest, value)?
                }
                _ => value.at_path(&rest),
            },
        };

        let mut new_entries = entries.clone();
        new_entries.insert(key.to_string(), child);
        Ok(Value::object_with_flag(
            new_entries,
            *ignores_fallbacks,
            self.origin().clone(),
        ))
    }

    /// A copy of this object without the value at `path`. Unchanged if
    /// there is nothing there.
    pub fn without_path(&self, path: &Path) -> Value {
        let ValueKind::Object {
            entries,
            ignores_fallbacks,
        } = &self.0.kind
        else {
            return self.clone();
        };

        let key = path.first();
        let mut new_entries = entries.clone();
        match path.remainder() {
            Some(rest) => match entries.get(key) {
                Some(child) if child.as_object().is_some() => {
                    let new_child = child.without_path(&rest);
                    if new_child.ptr_eq(child) {
                        return self.clone();
                    }
                    new_entries.insert(key.to_string(), new_child);
                }
                _ => return self.clone(),
            },
            None => {
                if new_entries.shift_remove(key).is_none() {
                    return self.clone();
                }
            }
        }
        Value::object_with_flag(new_entries, *ignores_fallbacks, self.origin().clone())
    }

    /// The value a `path += element` field expands to: `${?path} [element]`.
    pub fn self_append(path: &Path, element: Value) -> Value {
        let origin = element.origin().clone();
        let previous = Value::reference(path.clone(), true, origin.clone());
        let list = Value::list(vec![element], origin.clone());
        Value::from_kind(ValueKind::Concatenation(vec![previous, list]), origin)
    }
}

impl AsRef<Value> for Value {
    fn as_ref(&self) -> &Value {
        self
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (&self.0.kind, &other.0.kind) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a == b,
            (ValueKind::Number { number: a, .. }, ValueKind::Number { number: b, .. }) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::List(a), ValueKind::List(b)) => a == b,
            (ValueKind::Object { entries: a, .. }, ValueKind::Object { entries: b, .. }) => a == b,
            (ValueKind::Reference { expr: a, .. }, ValueKind::Reference { expr: b, .. }) => a == b,
            (ValueKind::Concatenation(a), ValueKind::Concatenation(b))
            | (ValueKind::DelayedMerge(a), ValueKind::DelayedMerge(b))
            | (ValueKind::DelayedMergeObject(a), ValueKind::DelayedMergeObject(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0.kind, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn o() -> Origin {
        Origin::generic("test")
    }

    fn p(expr: &str) -> Path {
        Path::parse(expr).unwrap()
    }

    fn obj(entries: Vec<(&str, Value)>) -> Value {
        Value::object(
            entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            o(),
        )
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = Value::string("x", Origin::file("a.conf").with_line(1));
        let b = Value::string("x", Origin::file("b.conf").with_line(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_equality_across_variants() {
        assert_eq!(Number::Int(3), Number::Double(3.0));
        assert_eq!(Number::BigInt(BigInt::from(3)), Number::Int(3));
        assert_ne!(Number::Double(3.5), Number::Int(3));
        assert_eq!(
            Value::number(Number::Int(1), Some("1".into()), o()),
            Value::double(1.0, o())
        );
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Int(-4).to_string(), "-4");
        assert_eq!(Number::Double(2.0).to_string(), "2.0");
        assert_eq!(Number::Double(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_number_to_i64() {
        assert_eq!(Number::Double(4.0).to_i64(), Some(4));
        assert_eq!(Number::Double(4.5).to_i64(), None);
        let huge = "123456789012345678901234567890".parse::<BigInt>().unwrap();
        assert_eq!(Number::BigInt(huge).to_i64(), None);
    }

    #[test]
    fn test_object_equality_is_order_insensitive() {
        let a = obj(vec![("x", Value::int(1, o())), ("y", Value::int(2, o()))]);
        let b = obj(vec![("y", Value::int(2, o())), ("x", Value::int(1, o()))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolved_status() {
        let reference = Value::reference(p("a"), false, o());
        assert!(!reference.is_resolved());
        assert!(!obj(vec![("x", reference.clone())]).is_resolved());
        assert!(!Value::list(vec![reference], o()).is_resolved());
        assert!(obj(vec![("x", Value::int(1, o()))]).is_resolved());
    }

    #[test]
    fn test_substitution_display() {
        assert_eq!(SubstitutionExpression::new(p("a.b"), false).to_string(), "${a.b}");
        assert_eq!(SubstitutionExpression::new(p("a"), true).to_string(), "${?a}");
    }

    #[test]
    fn test_peek_path() {
        let root = obj(vec![("a", obj(vec![("b", Value::int(1, o()))]))]);
        assert_eq!(root.peek_path(&p("a.b")).unwrap(), Some(&Value::int(1, o())));
        assert_eq!(root.peek_path(&p("a.c")).unwrap(), None);
        assert_eq!(root.peek_path(&p("a.b.c")).unwrap(), None);
    }

    #[test]
    fn test_peek_path_through_unresolved() {
        let root = obj(vec![("a", Value::reference(p("x"), false, o()))]);
        assert!(matches!(
            root.peek_path(&p("a.b")),
            Err(ConfigError::NotResolved { .. })
        ));
        // reaching the reference itself is fine
        assert!(root.peek_path(&p("a")).unwrap().is_some());
    }

    #[test]
    fn test_at_path() {
        let v = Value::int(1, o()).at_path(&p("a.b"));
        assert_eq!(v, obj(vec![("a", obj(vec![("b", Value::int(1, o()))]))]));
    }

    #[test]
    fn test_with_value_creates_intermediates() {
        let root = obj(vec![("a", obj(vec![("x", Value::int(1, o()))]))]);
        let updated = root.with_value(&p("a.y.z"), Value::int(2, o())).unwrap();
        assert_eq!(updated.peek_path(&p("a.x")).unwrap(), Some(&Value::int(1, o())));
        assert_eq!(updated.peek_path(&p("a.y.z")).unwrap(), Some(&Value::int(2, o())));
        // the original is untouched
        assert_eq!(root.peek_path(&p("a.y")).unwrap(), None);
    }

    #[test]
    fn test_with_value_on_non_object() {
        let err = Value::int(1, o()).with_value(&p("a"), Value::int(2, o()));
        assert!(matches!(err, Err(ConfigError::WrongType { .. })));
    }

    #[test]
    fn test_without_path() {
        let root = obj(vec![
            ("a", obj(vec![("x", Value::int(1, o())), ("y", Value::int(2, o()))])),
            ("b", Value::int(3, o())),
        ]);
        let removed = root.without_path(&p("a.x"));
        assert_eq!(removed.peek_path(&p("a.x")).unwrap(), None);
        assert_eq!(removed.peek_path(&p("a.y")).unwrap(), Some(&Value::int(2, o())));

        let untouched = root.without_path(&p("nope.x"));
        assert!(untouched.ptr_eq(&root));
    }

    #[test]
    fn test_relativized_prefixes_references() {
        let doc = obj(vec![("a", Value::reference(p("b"), false, o()))]);
        let grafted = doc.relativized(&p("inc.sub"));
        match grafted.get("a").unwrap().kind() {
            ValueKind::Reference {
                expr,
                prefix_length,
            } => {
                assert_eq!(expr.path, p("inc.sub.b"));
                assert_eq!(*prefix_length, 2);
            }
            other => panic!("expected a reference, got {other:?}"),
        }
    }

    #[test]
    fn test_relativized_keeps_resolved_identity() {
        let doc = obj(vec![("a", Value::int(1, o()))]);
        assert!(doc.relativized(&p("x")).ptr_eq(&doc));
    }

    #[test]
    fn test_self_append_shape() {
        let v = Value::self_append(&p("a"), Value::string("x", o()));
        match v.kind() {
            ValueKind::Concatenation(pieces) => {
                assert_eq!(pieces.len(), 2);
                assert_eq!(pieces[0], Value::reference(p("a"), true, o()));
                assert_eq!(pieces[1], Value::list(vec![Value::string("x", o())], o()));
            }
            other => panic!("expected a concatenation, got {other:?}"),
        }
    }

    #[test]
    fn test_transform_to_string() {
        assert_eq!(Value::null(o()).transform_to_string().as_deref(), Some("null"));
        assert_eq!(
            Value::number(Number::Double(1.0), Some("1.00".into()), o())
                .transform_to_string()
                .as_deref(),
            Some("1.00")
        );
        assert_eq!(Value::list(vec![], o()).transform_to_string(), None);
    }
}
