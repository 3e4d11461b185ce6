//! Substitution resolution.
//!
//! Resolving walks a value tree once and replaces every substitution,
//! concatenation and merge stack with a concrete value:
//!
//! - a substitution is looked up in the resolution root (resolving only
//!   what lies along its path), then optionally in an external snapshot
//! - a concatenation joins its resolved pieces
//! - a merge stack resolves its elements top to bottom; while a
//!   substitution or concatenation at element `i` is resolved, a lookup
//!   that lands on the stack itself sees only elements below `i`, which is
//!   what makes `a = ${a} [x]` work. Object elements see the whole merge,
//!   so `a = { x: 1, y: ${a.x} }` is not a self-reference
//!
//! Results are memoized per node identity, and a substitution that needs
//! its own value with nothing below it is reported as a cycle.

mod context;
mod memo;
mod source;

use crate::error::ConfigError;
use crate::external::{ExternalLookup, NoExternal};
use crate::path::Path;
use crate::value::Value;
use context::{ResolveContext, ResolveError};
use source::ResolveSource;
use tracing::debug;

/// Options for one resolve call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Leave unresolvable substitutions in place instead of failing.
    pub allow_unresolved: bool,
    /// Consult the external lookup for substitutions the document lacks.
    pub use_environment_fallback: bool,
    /// Resolve only what lies along this path.
    pub restrict_to_path: Option<Path>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_unresolved(mut self, allow: bool) -> Self {
        self.allow_unresolved = allow;
        self
    }

    pub fn with_environment_fallback(mut self, use_env: bool) -> Self {
        self.use_environment_fallback = use_env;
        self
    }

    pub fn with_restrict_to_path(mut self, path: Path) -> Self {
        self.restrict_to_path = Some(path);
        self
    }
}

impl Value {
    /// Resolve this value against itself.
    ///
    /// `None` only when the value is an optional substitution with nothing
    /// to refer to.
    pub fn resolve(&self, options: &ResolveOptions) -> Result<Option<Value>, ConfigError> {
        resolve_against(self, self, options, &NoExternal)
    }
}

/// Resolve `value` against itself, falling back to `external`.
pub fn resolve_with_external(
    value: &Value,
    options: &ResolveOptions,
    external: &dyn ExternalLookup,
) -> Result<Option<Value>, ConfigError> {
    resolve_against(value, value, options, external)
}

/// Resolve `value`, looking substitutions up in `root`.
pub fn resolve_against(
    value: &Value,
    root: &Value,
    options: &ResolveOptions,
    external: &dyn ExternalLookup,
) -> Result<Option<Value>, ConfigError> {
    if value.is_resolved() {
        return Ok(Some(value.clone()));
    }

    debug!(
        allow_unresolved = options.allow_unresolved,
        use_environment_fallback = options.use_environment_fallback,
        restrict_to_path = ?options.restrict_to_path,
        origin = %value.origin(),
        "resolving substitutions"
    );

    let source = ResolveSource::new(root.clone(), external);
    let mut context = ResolveContext::new(options.clone(), source);
    match context.resolve(value, options.restrict_to_path.as_ref()) {
        Ok(resolved) => Ok(resolved),
        Err(ResolveError::Config(err)) => {
            debug!(error = %err, "resolve failed");
            Err(err)
        }
        Err(ResolveError::NotPossible) => Err(ConfigError::NotResolved {
            path: None,
            message: "Substitutions could not be resolved because they depend on each other".to_string(),
            origin: Some(value.origin().clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::EnvSnapshot;
    use crate::value::ValueKind;
    use hocon_origin::Origin;

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

    fn int(i: i64) -> Value {
        Value::int(i, o())
    }

    fn s(text: &str) -> Value {
        Value::string(text, o())
    }

    fn r(expr: &str) -> Value {
        Value::reference(p(expr), false, o())
    }

    fn opt(expr: &str) -> Value {
        Value::reference(p(expr), true, o())
    }

    fn concat(pieces: Vec<Value>) -> Value {
        Value::concatenate(pieces).unwrap().unwrap()
    }

    fn resolve(value: &Value) -> Result<Value, ConfigError> {
        value
            .resolve(&ResolveOptions::default())
            .map(|v| v.expect("root resolved to nothing"))
    }

    #[test]
    fn test_simple_reference() {
        let root = obj(vec![("a", int(1)), ("b", r("a"))]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved, obj(vec![("a", int(1)), ("b", int(1))]));
        assert!(resolved.is_resolved());
    }

    #[test]
    fn test_nested_reference_chain() {
        let root = obj(vec![
            ("a", obj(vec![("b", r("c.d"))])),
            ("c", obj(vec![("d", r("e"))])),
            ("e", s("end")),
        ]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.peek_path(&p("a.b")).unwrap(), Some(&s("end")));
    }

    #[test]
    fn test_reference_to_object() {
        let root = obj(vec![
            ("base", obj(vec![("x", int(1))])),
            ("copy", r("base")),
        ]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.get("copy"), Some(&obj(vec![("x", int(1))])));
    }

    #[test]
    fn test_already_resolved_returns_same_node() {
        let root = obj(vec![("a", int(1))]);
        let resolved = resolve(&root).unwrap();
        assert!(resolved.ptr_eq(&root));
    }

    #[test]
    fn test_missing_mandatory_reference() {
        let root = obj(vec![("a", r("nope"))]);
        let err = resolve(&root).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnresolvedSubstitution { ref expression, .. } if expression == "${nope}"
        ));
    }

    #[test]
    fn test_missing_optional_reference_drops_key() {
        let root = obj(vec![("a", opt("missing")), ("b", int(2))]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved, obj(vec![("b", int(2))]));
    }

    #[test]
    fn test_optional_in_list_is_dropped() {
        let root = obj(vec![("l", Value::list(vec![int(1), opt("missing"), int(3)], o()))]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.get("l"), Some(&Value::list(vec![int(1), int(3)], o())));
    }

    #[test]
    fn test_cycle_is_reported() {
        let root = obj(vec![("a", r("b")), ("b", r("a"))]);
        match resolve(&root).unwrap_err() {
            ConfigError::CyclicSubstitution { trace, .. } => {
                assert!(trace.contains(&"${a}".to_string()));
                assert!(trace.contains(&"${b}".to_string()));
            }
            other => panic!("expected a cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_direct_self_reference_is_a_cycle() {
        let root = obj(vec![("a", r("a"))]);
        assert!(matches!(
            resolve(&root),
            Err(ConfigError::CyclicSubstitution { .. })
        ));
    }

    #[test]
    fn test_self_append_without_previous_value() {
        let root = obj(vec![("a", Value::self_append(&p("a"), s("x")))]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.get("a"), Some(&Value::list(vec![s("x")], o())));
    }

    #[test]
    fn test_self_reference_sees_value_below() {
        // a = [0], then a = ${a} [1]
        let below = obj(vec![("a", Value::list(vec![int(0)], o()))]);
        let above = obj(vec![("a", concat(vec![r("a"), Value::list(vec![int(1)], o())]))]);
        let merged = above.with_fallback(&below);
        assert!(matches!(merged.get("a").unwrap().kind(), ValueKind::DelayedMerge(_)));

        let resolved = resolve(&merged).unwrap();
        assert_eq!(resolved.get("a"), Some(&Value::list(vec![int(0), int(1)], o())));
    }

    #[test]
    fn test_chained_self_references() {
        // a = [0]; a = ${a} [1]; a = ${a} [2]
        let layer0 = obj(vec![("a", Value::list(vec![int(0)], o()))]);
        let layer1 = obj(vec![("a", concat(vec![r("a"), Value::list(vec![int(1)], o())]))]);
        let layer2 = obj(vec![("a", concat(vec![r("a"), Value::list(vec![int(2)], o())]))]);
        let merged = layer2.with_fallback(&layer1).with_fallback(&layer0);

        let resolved = resolve(&merged).unwrap();
        assert_eq!(
            resolved.get("a"),
            Some(&Value::list(vec![int(0), int(1), int(2)], o()))
        );
    }

    #[test]
    fn test_self_referencing_string_concatenation() {
        // path = "/usr/bin"; path = ${path}":/opt/bin"
        let below = obj(vec![("path", s("/usr/bin"))]);
        let above = obj(vec![("path", concat(vec![r("path"), s(":/opt/bin")]))]);
        let resolved = resolve(&above.with_fallback(&below)).unwrap();
        assert_eq!(resolved.get("path"), Some(&s("/usr/bin:/opt/bin")));
    }

    #[test]
    fn test_self_reference_into_object_below() {
        // a = { x: 1 }; a = { y: ${a.x} }
        let below = obj(vec![("a", obj(vec![("x", int(1))]))]);
        let above = obj(vec![("a", obj(vec![("y", r("a.x"))]))]);
        let resolved = resolve(&above.with_fallback(&below)).unwrap();
        assert_eq!(resolved.get("a"), Some(&obj(vec![("x", int(1)), ("y", int(1))])));
    }

    #[test]
    fn test_child_reference_in_object_layer_sees_whole_merge() {
        // base = { z: 0 }; a = ${base}; a = { x: 1, y: ${a.x} }
        let below = obj(vec![("base", obj(vec![("z", int(0))])), ("a", r("base"))]);
        let above = obj(vec![("a", obj(vec![("x", int(1)), ("y", r("a.x"))]))]);
        let merged = above.with_fallback(&below);
        assert!(matches!(
            merged.get("a").unwrap().kind(),
            ValueKind::DelayedMergeObject(_)
        ));

        let resolved = resolve(&merged).unwrap();
        assert_eq!(
            resolved.get("a"),
            Some(&obj(vec![("x", int(1)), ("y", int(1)), ("z", int(0))]))
        );
    }

    #[test]
    fn test_child_reference_reaches_layer_below() {
        // base = { z: 0 }; a = ${base}; a = { y: ${a.z} }
        let below = obj(vec![("base", obj(vec![("z", int(0))])), ("a", r("base"))]);
        let above = obj(vec![("a", obj(vec![("y", r("a.z"))]))]);
        let resolved = resolve(&above.with_fallback(&below)).unwrap();
        assert_eq!(
            resolved.get("a"),
            Some(&obj(vec![("y", int(0)), ("z", int(0))]))
        );
    }

    #[test]
    fn test_optional_override_falls_back() {
        // a = 1; a = ${?missing}
        let below = obj(vec![("a", int(1))]);
        let above = obj(vec![("a", opt("missing"))]);
        let resolved = resolve(&above.with_fallback(&below)).unwrap();
        assert_eq!(resolved.get("a"), Some(&int(1)));
    }

    #[test]
    fn test_reference_resolving_to_object_merges_with_object_below() {
        let root = obj(vec![
            ("base", obj(vec![("x", int(1))])),
            ("child", r("base")),
        ])
        .with_fallback(&obj(vec![("child", obj(vec![("y", int(2))]))]));
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.get("child"), Some(&obj(vec![("x", int(1)), ("y", int(2))])));
    }

    #[test]
    fn test_string_concatenation_with_reference() {
        let root = obj(vec![
            ("host", s("example.com")),
            ("port", Value::number(crate::value::Number::Int(8080), Some("8080".into()), o())),
            ("url", concat(vec![s("http://"), r("host"), s(":"), r("port")])),
        ]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.get("url"), Some(&s("http://example.com:8080")));
    }

    #[test]
    fn test_concatenation_type_error_surfaces() {
        let root = obj(vec![
            ("l", Value::list(vec![int(1)], o())),
            ("bad", concat(vec![r("l"), s("x")])),
        ]);
        assert!(matches!(
            resolve(&root),
            Err(ConfigError::WrongType { path: None, .. })
        ));
    }

    #[test]
    fn test_shared_references_are_equal() {
        let root = obj(vec![
            ("target", obj(vec![("x", int(1))])),
            ("one", r("target")),
            ("two", r("target")),
        ]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.get("one"), resolved.get("two"));
    }

    #[test]
    fn test_allow_unresolved_keeps_references() {
        let root = obj(vec![("a", r("missing")), ("b", int(1)), ("c", r("b"))]);
        let options = ResolveOptions::new().with_allow_unresolved(true);
        let resolved = root.resolve(&options).unwrap().unwrap();
        assert_eq!(resolved.get("a"), Some(&r("missing")));
        assert_eq!(resolved.get("c"), Some(&int(1)));
        assert!(!resolved.is_resolved());
    }

    #[test]
    fn test_allow_unresolved_keeps_cycles() {
        let root = obj(vec![("a", r("b")), ("b", r("a"))]);
        let options = ResolveOptions::new().with_allow_unresolved(true);
        let resolved = root.resolve(&options).unwrap().unwrap();
        assert!(!resolved.is_resolved());
    }

    #[test]
    fn test_allow_unresolved_keeps_partial_concatenation() {
        let root = obj(vec![("a", concat(vec![s("x"), r("missing"), s("y")]))]);
        let options = ResolveOptions::new().with_allow_unresolved(true);
        let resolved = root.resolve(&options).unwrap().unwrap();
        assert!(matches!(
            resolved.get("a").unwrap().kind(),
            ValueKind::Concatenation(pieces) if pieces.len() == 3
        ));
    }

    #[test]
    fn test_allow_unresolved_keeps_unresolved_stack_remainder() {
        // a = 3; a = ${m2}; a = ${?gone}; a = ${m1}
        let merged = obj(vec![("a", r("m1"))])
            .with_fallback(&obj(vec![("a", opt("gone"))]))
            .with_fallback(&obj(vec![("a", r("m2"))]))
            .with_fallback(&obj(vec![("a", int(3))]));
        assert!(matches!(
            merged.get("a").unwrap().kind(),
            ValueKind::DelayedMerge(stack) if stack.len() == 4
        ));

        let options = ResolveOptions::new().with_allow_unresolved(true);
        let resolved = merged.resolve(&options).unwrap().unwrap();
        assert!(!resolved.is_resolved());
        match resolved.get("a").unwrap().kind() {
            ValueKind::DelayedMerge(stack) => {
                assert_eq!(stack.as_slice(), &[r("m1"), r("m2"), int(3)]);
            }
            other => panic!("expected a delayed merge, got {other:?}"),
        }

        let strict = merged.resolve(&ResolveOptions::default());
        assert!(matches!(
            strict,
            Err(ConfigError::UnresolvedSubstitution { ref expression, .. }) if expression == "${m1}"
        ));
    }

    #[test]
    fn test_environment_fallback() {
        let root = obj(vec![("home", r("HOME"))]);
        let env = EnvSnapshot::from_vars([("HOME", "/home/me")]);

        let without = resolve_with_external(&root, &ResolveOptions::default(), &env);
        assert!(matches!(without, Err(ConfigError::UnresolvedSubstitution { .. })));

        let options = ResolveOptions::new().with_environment_fallback(true);
        let resolved = resolve_with_external(&root, &options, &env).unwrap().unwrap();
        assert_eq!(resolved.get("home"), Some(&s("/home/me")));
    }

    #[test]
    fn test_document_wins_over_environment() {
        let root = obj(vec![("HOME", s("doc")), ("home", r("HOME"))]);
        let env = EnvSnapshot::from_vars([("HOME", "env")]);
        let options = ResolveOptions::new().with_environment_fallback(true);
        let resolved = resolve_with_external(&root, &options, &env).unwrap().unwrap();
        assert_eq!(resolved.get("home"), Some(&s("doc")));
    }

    #[test]
    fn test_relativized_reference_falls_back_to_root() {
        // an included document { x: ${shared} } grafted under "inc"
        let included = obj(vec![("x", r("shared"))]).relativized(&p("inc"));
        let root = obj(vec![("shared", int(7)), ("inc", included)]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.peek_path(&p("inc.x")).unwrap(), Some(&int(7)));
    }

    #[test]
    fn test_relativized_reference_prefers_grafted_sibling() {
        let included = obj(vec![("x", r("y")), ("y", int(1))]).relativized(&p("inc"));
        let root = obj(vec![("y", int(2)), ("inc", included)]);
        let resolved = resolve(&root).unwrap();
        assert_eq!(resolved.peek_path(&p("inc.x")).unwrap(), Some(&int(1)));
    }

    #[test]
    fn test_relativized_environment_lookup_strips_prefix() {
        let included = obj(vec![("x", r("HOME"))]).relativized(&p("inc"));
        let root = obj(vec![("inc", included)]);
        let env = EnvSnapshot::from_vars([("HOME", "/h")]);
        let options = ResolveOptions::new().with_environment_fallback(true);
        let resolved = resolve_with_external(&root, &options, &env).unwrap().unwrap();
        assert_eq!(resolved.peek_path(&p("inc.x")).unwrap(), Some(&s("/h")));
    }

    #[test]
    fn test_restrict_to_path() {
        let root = obj(vec![("a", r("b")), ("b", int(1)), ("c", r("missing"))]);
        let options = ResolveOptions::new().with_restrict_to_path(p("a"));
        let resolved = root.resolve(&options).unwrap().unwrap();
        assert_eq!(resolved.get("a"), Some(&int(1)));
        // outside the restriction nothing is touched, so no error either
        assert_eq!(resolved.get("c"), Some(&r("missing")));
    }

    #[test]
    fn test_resolve_against_other_root() {
        let value = obj(vec![("a", r("shared"))]);
        let source = obj(vec![("shared", s("from source"))]);
        let resolved = resolve_against(&value, &source, &ResolveOptions::default(), &NoExternal)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.get("a"), Some(&s("from source")));
    }

    #[test]
    fn test_top_level_optional_is_absent() {
        let lone = Value::reference(p("nothing"), true, o());
        assert_eq!(lone.resolve(&ResolveOptions::default()).unwrap(), None);
    }

    #[test]
    fn test_idempotent() {
        let root = obj(vec![("a", int(1)), ("b", r("a")), ("c", concat(vec![r("a"), s("!")]))]);
        let once = resolve(&root).unwrap();
        let twice = resolve(&once).unwrap();
        assert_eq!(once, twice);
        assert!(twice.ptr_eq(&once));
    }
}
