//! End-to-end registration and rendering scenarios.

use std::thread;

use minijinja::{context, Value};
use serde_json::json;
use standout_compose::{Config, Executor, FunctionTable, Kind, Prefixes, Registry};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn template_renders_data() {
    init_tracing();
    let mut registry = Registry::new();
    registry
        .register_template("test", "Hello, {{ name }}!")
        .unwrap();

    let test = registry
        .template("test")
        .expect(r#"template "test" was not registered"#);
    assert_eq!(
        test.render(context! { name => "world" }).unwrap(),
        "Hello, world!"
    );
}

#[test]
fn template_includes_partials_that_include_each_other() {
    init_tracing();
    let mut registry = Registry::new();
    let partials = [
        ("foo", "foo"),
        ("bar", "bar"),
        ("baz", "baz"),
        (
            "foobarbaz",
            r#"{% include "partials/foo" %}{% include "partials/bar" %}{% include "partials/baz" %}"#,
        ),
    ];
    for (name, source) in partials {
        registry.register_partial(name, source).unwrap();
        assert!(
            registry.partial(name).is_some(),
            "partial {name:?} was not registered"
        );
    }

    registry
        .register_template(
            "test",
            r#"{% include "partials/foo" %} {% include "partials/bar" %} {% include "partials/baz" %} {% include "partials/foobarbaz" %}"#,
        )
        .unwrap();

    let test = registry.template("test").unwrap();
    assert_eq!(test.render(context! {}).unwrap(), "foo bar baz foobarbaz");
}

#[test]
fn composite_partial_registered_first() {
    let mut registry = Registry::new();
    registry
        .register_partial(
            "foobarbaz",
            r#"{% include "partials/foo" %}{% include "partials/bar" %}{% include "partials/baz" %}"#,
        )
        .unwrap();
    for name in ["foo", "bar", "baz"] {
        registry.register_partial(name, name).unwrap();
    }

    assert_eq!(
        registry
            .render(Kind::Partial, "foobarbaz", context! {})
            .unwrap(),
        "foobarbaz"
    );
}

#[test]
fn template_renders_inside_layout() {
    init_tracing();
    let mut registry = Registry::new();
    registry.register_partial("foo", "foo").unwrap();
    registry
        .register_layout(
            "header",
            r#"<h2>{% block content %}{% endblock %} {% include "partials/foo" %}</h2>"#,
        )
        .unwrap();
    assert!(registry.layout("header").is_some());

    registry
        .register_template(
            "test",
            r#"{% extends "layouts/header" %}{% block content %}test{% endblock %}"#,
        )
        .unwrap();

    let test = registry.template("test").unwrap();
    assert_eq!(test.render(context! {}).unwrap(), "<h2>test foo</h2>");
}

#[test]
fn layout_scenario_in_reverse_order() {
    let mut registry = Registry::new();
    registry
        .register_template(
            "test",
            r#"{% extends "layouts/header" %}{% block content %}test{% endblock %}"#,
        )
        .unwrap();
    registry
        .register_layout(
            "header",
            r#"<h2>{% block content %}{% endblock %} {% include "partials/foo" %}</h2>"#,
        )
        .unwrap();
    registry.register_partial("foo", "foo").unwrap();

    assert_eq!(
        registry.render(Kind::Template, "test", context! {}).unwrap(),
        "<h2>test foo</h2>"
    );
}

#[test]
fn artifacts_are_interchangeable_executors() {
    let mut registry = Registry::new();
    registry.register_template("t", "T{{ n }}").unwrap();
    registry.register_partial("p", "P{{ n }}").unwrap();
    registry.register_layout("l", "L{{ n }}").unwrap();

    let executors: Vec<&dyn Executor> = vec![
        registry.template("t").unwrap(),
        registry.partial("p").unwrap(),
        registry.layout("l").unwrap(),
    ];

    let mut out = Vec::new();
    for executor in executors {
        executor.execute(&mut out, context! { n => 1 }).unwrap();
    }
    assert_eq!(out, b"T1P1L1");
}

#[test]
fn merged_subtree_renders_by_name() {
    let mut registry = Registry::new();
    registry.register_partial("row", "<{{ label }}>").unwrap();
    registry.register_template("t", "").unwrap();

    let mut out = Vec::new();
    registry
        .template("t")
        .unwrap()
        .execute_named("partials/row", &mut out, context! { label => "x" })
        .unwrap();
    assert_eq!(out, b"<x>");
}

#[test]
fn serde_data_reaches_templates() {
    let mut registry = Registry::new();
    registry
        .register_partial("item", "{{ item.name }}={{ item.qty }}")
        .unwrap();
    registry
        .register_template(
            "list",
            r#"{% for item in items %}{% include "partials/item" %}{% if not loop.last %}, {% endif %}{% endfor %}"#,
        )
        .unwrap();

    let data = json!({
        "items": [
            {"name": "apples", "qty": 3},
            {"name": "pears", "qty": 5},
        ]
    });
    let output = registry
        .render(Kind::Template, "list", Value::from_serialize(&data))
        .unwrap();
    assert_eq!(output, "apples=3, pears=5");
}

#[test]
fn output_is_html_escaped_in_templates_and_partials() {
    let mut registry = Registry::new();
    registry.register_partial("foo", "{{ v }}").unwrap();
    registry
        .register_template("test", r#"<p>{{ v }}|{% include "partials/foo" %}</p>"#)
        .unwrap();

    let output = registry
        .render(Kind::Template, "test", context! { v => "<b>&" })
        .unwrap();
    assert_eq!(output, "<p>&lt;b&gt;&amp;|&lt;b&gt;&amp;</p>");
}

#[test]
fn missing_field_is_render_error() {
    let mut registry = Registry::new();
    registry.register_template("t", "{{ user.name }}").unwrap();

    let err = registry
        .render(Kind::Template, "t", context! {})
        .unwrap_err();
    assert!(err.is_render());
}

#[test]
fn missing_include_is_render_error() {
    let mut registry = Registry::new();
    registry
        .register_template("t", r#"{% include "partials/nowhere" %}"#)
        .unwrap();

    let err = registry
        .render(Kind::Template, "t", context! {})
        .unwrap_err();
    assert!(err.is_render());
}

#[test]
fn reset_forgets_names() {
    let mut registry = Registry::new();
    registry.register_partial("foo", "old foo").unwrap();
    registry.register_layout("main", "main").unwrap();
    registry.register_template("t", r#"{% include "partials/foo" %}"#).unwrap();

    registry.reset();

    for kind in Kind::ALL {
        assert_eq!(registry.names(kind).count(), 0, "{kind} names remain");
    }

    // Reusing names behaves as if fresh.
    registry.register_template("t", r#"{% include "partials/foo" %}"#).unwrap();
    registry.register_partial("foo", "new foo").unwrap();
    assert_eq!(
        registry.render(Kind::Template, "t", context! {}).unwrap(),
        "new foo"
    );
    assert!(!registry.template("t").unwrap().contains("layouts/main"));
}

#[test]
fn independent_registries_do_not_share_state() {
    let mut first = Registry::new();
    let mut second = Registry::new();
    first.register_partial("foo", "first").unwrap();
    second.register_partial("foo", "second").unwrap();
    first.register_template("t", r#"{% include "partials/foo" %}"#).unwrap();
    second.register_template("t", r#"{% include "partials/foo" %}"#).unwrap();

    assert_eq!(first.render(Kind::Template, "t", context! {}).unwrap(), "first");
    assert_eq!(second.render(Kind::Template, "t", context! {}).unwrap(), "second");
}

#[test]
fn custom_prefixes_from_config() {
    let config = Config::from_yaml(
        r#"
prefixes:
  partial: "_"
  layout: "layout:"
"#,
    )
    .unwrap();
    let mut registry = Registry::with_config(config);
    assert_eq!(registry.prefixes(), &Prefixes::new("_", "layout:"));

    registry.register_partial("row", "row").unwrap();
    registry
        .register_layout("page", r#"[{% block body %}{% endblock %}]"#)
        .unwrap();
    registry
        .register_template(
            "t",
            r#"{% extends "layout:page" %}{% block body %}{% include "_row" %}{% endblock %}"#,
        )
        .unwrap();

    assert_eq!(
        registry.render(Kind::Template, "t", context! {}).unwrap(),
        "[row]"
    );
}

#[test]
fn function_table_reaches_partials_and_layouts() {
    let mut table = FunctionTable::with_defaults();
    table.add_function("upper", Value::from_function(|s: String| s.to_uppercase()));
    let mut registry = Registry::with_functions(table);

    registry
        .register_partial("shout", r#"{{ upper(word) }}"#)
        .unwrap();
    registry
        .register_layout("page", r#"{% block body %}{% endblock %}{{ "!" | nl }}"#)
        .unwrap();
    registry
        .register_template(
            "t",
            r#"{% extends "layouts/page" %}{% block body %}{% include "partials/shout" %}{% endblock %}"#,
        )
        .unwrap();

    assert_eq!(
        registry
            .render(Kind::Template, "t", context! { word => "hey" })
            .unwrap(),
        "HEY!\n"
    );
}

#[test]
fn concurrent_rendering_after_registration() {
    let mut registry = Registry::new();
    registry.register_partial("n", "#{{ n }}").unwrap();
    registry
        .register_template("t", r#"{% include "partials/n" %}"#)
        .unwrap();
    let registry = &registry;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                scope.spawn(move || registry.render(Kind::Template, "t", context! { n }).unwrap())
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("#{n}"));
        }
    });
}
