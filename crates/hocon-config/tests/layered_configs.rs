//! End-to-end behaviour: producers, fallback layering, resolution and
//! typed reads working together.

use hocon_config::{
    Config, ConfigError, EnvSnapshot, Origin, Path, RenderOptions, ResolveOptions, Value, ValueKind,
    from_json, parse_json, parse_properties,
};
use serde_json::json;

fn o() -> Origin {
    Origin::generic("test")
}

fn p(expr: &str) -> Path {
    Path::parse(expr).unwrap()
}

fn reference(expr: &str) -> Value {
    Value::reference(p(expr), false, o())
}

#[test]
fn reference_sees_sibling() {
    // { a: 1, b: ${a} }
    let root = from_json(json!({"a": 1}), o())
        .with_value(&p("b"), reference("a"))
        .unwrap();
    let config = Config::from_value(root).unwrap().resolve().unwrap();
    assert_eq!(config.get_i64("b").unwrap(), 1);
}

#[test]
fn optional_self_append_starts_empty() {
    // { a: ${?a} ["x"] }
    let root = Value::self_append(&p("a"), Value::string("x", o())).at_key("a");
    let config = Config::from_value(root).unwrap().resolve().unwrap();
    assert_eq!(config.get_string_list("a").unwrap(), vec!["x"]);
}

#[test]
fn append_across_layers() {
    // defaults: { plugins: ["core"] }, overrides: { plugins += "extra" }
    let defaults = from_json(json!({"plugins": ["core"]}), Origin::file("defaults.json"));
    let overrides = Value::self_append(&p("plugins"), Value::string("extra", o())).at_key("plugins");
    let config = Config::from_value(overrides.with_fallback(&defaults))
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(config.get_string_list("plugins").unwrap(), vec!["core", "extra"]);
}

#[test]
fn mutual_references_are_a_cycle() {
    // { a: ${b}, b: ${a} }
    let root = reference("b")
        .at_key("a")
        .with_value(&p("b"), reference("a"))
        .unwrap();
    let err = Config::from_value(root).unwrap().resolve().unwrap_err();
    assert!(matches!(err, ConfigError::CyclicSubstitution { .. }));
    let message = err.to_string();
    assert!(message.contains("${a}"), "{message}");
    assert!(message.contains("${b}"), "{message}");
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("H-1-5"));
}

#[test]
fn missing_optional_is_dropped() {
    // { a: ${?missing} }
    let root = Value::reference(p("missing"), true, o()).at_key("a");
    let config = Config::from_value(root).unwrap().resolve().unwrap();
    assert!(!config.has_path_or_null("a").unwrap());
    assert!(config.keys().is_empty());
}

#[test]
fn numeric_object_concatenates_with_list() {
    // { foo.0: "x", foo.1: "y" } followed by ["z"]
    let props = parse_properties("foo.0=x\nfoo.1=y\n", "list.properties").unwrap();
    let numeric = props.get("foo").unwrap().clone();
    let joined = Value::concatenate(vec![
        numeric,
        Value::list(vec![Value::string("z", o())], o()),
    ])
    .unwrap()
    .unwrap();
    let expected = Value::list(
        ["x", "y", "z"].iter().map(|s| Value::string(*s, o())).collect(),
        o(),
    );
    assert_eq!(joined, expected);
}

#[test]
fn nested_objects_merge_recursively() {
    let winner = from_json(json!({"a": {"x": 1}}), o());
    let fallback = from_json(json!({"a": {"y": 2}}), o());
    assert_eq!(
        winner.with_fallback(&fallback),
        from_json(json!({"a": {"x": 1, "y": 2}}), o())
    );
}

#[test]
fn shared_references_resolve_equal() {
    let root = from_json(json!({"target": {"deep": [1, 2]}}), o())
        .with_value(&p("one"), reference("target"))
        .unwrap()
        .with_value(&p("two"), reference("target"))
        .unwrap();
    let resolved = root.resolve(&ResolveOptions::default()).unwrap().unwrap();
    let one = resolved.get("one").unwrap();
    let two = resolved.get("two").unwrap();
    assert_eq!(one, two);
    assert!(one.ptr_eq(two));
}

#[test]
fn layers_from_every_producer() {
    let cli = parse_properties("server.port=9090\n", "cli.properties").unwrap();
    let file = parse_json(
        r#"{"server": {"port": 8080, "host": "example.com"}, "name": "svc"}"#,
        "app.json",
    )
    .unwrap();
    let url = Value::concatenate(vec![
        Value::string("http://", o()),
        reference("server.host"),
        Value::string(":", o()),
        reference("server.port"),
    ])
    .unwrap()
    .unwrap();
    let derived = url.at_path(&p("server.url"));

    let config = Config::from_value(cli)
        .unwrap()
        .with_fallbacks([derived, file])
        .resolve()
        .unwrap();

    assert_eq!(config.get_i64("server.port").unwrap(), 9090);
    assert_eq!(config.get_string("server.url").unwrap(), "http://example.com:9090");
    assert_eq!(config.get_string("name").unwrap(), "svc");

    let port = config.get_value("server.port").unwrap();
    assert_eq!(port.origin().description(), "cli.properties: 1");
}

#[test]
fn environment_snapshot_fills_gaps() {
    let root = reference("HOME").at_key("home");
    let env = EnvSnapshot::from_vars([("HOME", "/home/me")]);
    let options = ResolveOptions::new().with_environment_fallback(true);
    let config = Config::from_value(root)
        .unwrap()
        .resolve_with_external(&options, &env)
        .unwrap();
    assert_eq!(config.get_string("home").unwrap(), "/home/me");
}

#[test]
fn partial_resolution_keeps_unresolved_nodes() {
    let root = reference("missing")
        .at_key("a")
        .with_value(&p("b"), Value::int(1, o()))
        .unwrap()
        .with_value(&p("c"), reference("b"))
        .unwrap();
    let options = ResolveOptions::new().with_allow_unresolved(true);
    let config = Config::from_value(root)
        .unwrap()
        .resolve_with_options(&options)
        .unwrap();
    assert!(!config.is_resolved());
    assert_eq!(config.get_i64("c").unwrap(), 1);
    assert!(matches!(config.get_value("a"), Err(ConfigError::NotResolved { .. })));
    assert!(matches!(
        config.root().get("a").map(Value::kind),
        Some(ValueKind::Reference { .. })
    ));
}

#[test]
fn unresolved_merge_renders_for_debugging() {
    let root = reference("b")
        .at_key("a")
        .with_fallback(&from_json(json!({"a": 1}), Origin::file("base.json")));
    let rendered = root.render(&RenderOptions::defaults());
    assert!(rendered.contains("# unresolved merge of 2 values follows ("));
    assert!(rendered.contains("# ) end of unresolved merge"));
}
