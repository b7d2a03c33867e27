//! Integration tests for the framekit interpreter.
//!
//! Methods are written in the emitted language, parsed with the backend
//! front end, and executed against a small demo runtime:
//! - construction, setters, initializers
//! - method calls and void methods
//! - disposal scopes: exactly-once release on every exit path
//! - error propagation from native behaviors

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use framekit_eval::{EvalError, Interpreter, Runtime, Value};
use framekit_lexer::Lexer;
use framekit_parser::Parser;
use framekit_types::ast::MethodDecl;
use framekit_types::{Primitive, SourceFile, TypeCatalog, TypeDescriptor, TypeName};
use parking_lot::Mutex;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Parse a method (panics on parse errors).
fn parse(source: &str) -> MethodDecl {
    let sf = SourceFile::new("test", source);
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    if result.errors.has_errors() {
        panic!(
            "parse errors:\n{}",
            result
                .errors
                .errors
                .iter()
                .map(|e| format!("  [{}] {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
    result.method.expect("no method after successful parse")
}

fn int() -> TypeName {
    Primitive::Int32.type_name()
}

fn double() -> TypeName {
    Primitive::Double.type_name()
}

fn string() -> TypeName {
    Primitive::String.type_name()
}

fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(
            TypeDescriptor::class("Demo.Widget")
                .constructor(&[])
                .constructor(&[("Number", int()), ("Amount", double())])
                .constructor(&[("Number", int()), ("Amount", double()), ("Name", string())])
                .member("Number", int())
                .member("Amount", double())
                .member("Name", string()),
        )
        .with(
            TypeDescriptor::class("Demo.Resource")
                .constructor(&[])
                .constructor(&[("Label", string())])
                .member("Label", string())
                .method("Fail", &[], None)
                .disposable(),
        )
        .with(
            TypeDescriptor::class("Demo.Consumer")
                .constructor(&[])
                .method("Take", &[("resource", "Demo.Resource".into())], None),
        )
}

/// Demo runtime; disposals are recorded by resource label.
fn runtime(log: &Arc<Mutex<Vec<String>>>) -> Runtime {
    let disposed = Arc::clone(log);
    Runtime::new(catalog())
        .method("Demo.Resource", "Fail", |_, _| {
            Err(EvalError::thrown("resource failure"))
        })
        .method("Demo.Consumer", "Take", |this, args| {
            this.set_field("taken", args[0].clone());
            Ok(Value::Null)
        })
        .on_dispose("Demo.Resource", move |this| {
            let label = this.field("Label").unwrap_or(Value::Null);
            disposed.lock().push(label.to_string());
            Ok(())
        })
}

fn run(rt: &Runtime, source: &str, args: &[Value]) -> Result<Value, EvalError> {
    Interpreter::new(rt).invoke(&parse(source), args)
}

fn new_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

// ══════════════════════════════════════════════════════════════════════════════
// Construction
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn builds_with_zero_argument_constructor() {
    let rt = runtime(&new_log());
    let value = run(
        &rt,
        "public Demo.Widget Build() { var widget = new Demo.Widget(); return widget; }",
        &[],
    )
    .unwrap();
    let widget = value.as_object().expect("object");
    assert_eq!(widget.type_name().as_str(), "Demo.Widget");
    assert_eq!(widget.field("Number"), Some(Value::Int(0)));
}

#[test]
fn parameters_flow_into_fields() {
    let rt = runtime(&new_log());
    let value = run(
        &rt,
        r#"public Demo.Widget Create(System.Int32 int32, System.Double double, System.String string)
{
    return new Demo.Widget(int32, double, "Kent");
}"#,
        &[Value::Int(14), Value::Double(1.23), Value::from("Beck")],
    )
    .unwrap();
    let widget = value.as_object().unwrap();
    assert_eq!(widget.field("Number"), Some(Value::Int(14)));
    assert_eq!(widget.field("Amount"), Some(Value::Double(1.23)));
    assert_eq!(widget.field("Name"), Some(Value::from("Kent")));
}

#[test]
fn setters_and_initializers_apply_in_order() {
    let rt = runtime(&new_log());
    let value = run(
        &rt,
        r#"public Demo.Widget Create(System.Int32 int32, System.Double double)
{
    var widget = new Demo.Widget() { Number = 1 };
    widget.Number = int32;
    widget.Amount = double;
    return widget;
}"#,
        &[Value::Int(11), Value::Double(1.22)],
    )
    .unwrap();
    let widget = value.as_object().unwrap();
    assert_eq!(widget.field("Number"), Some(Value::Int(11)));
    assert_eq!(widget.field("Amount"), Some(Value::Double(1.22)));
}

#[test]
fn void_method_returns_null() {
    let rt = runtime(&new_log());
    let value = run(
        &rt,
        "public void DoStuff(Demo.Consumer consumer) { var resource = new Demo.Resource(); consumer.Take(resource); }",
        &[Value::Object(rt.construct(&"Demo.Consumer".into(), &[]).unwrap())],
    )
    .unwrap();
    assert!(value.is_null());
}

#[test]
fn argument_count_is_checked() {
    let rt = runtime(&new_log());
    let err = run(
        &rt,
        "public Demo.Widget Build() { return new Demo.Widget(); }",
        &[Value::Int(1)],
    )
    .unwrap_err();
    assert_eq!(
        err,
        EvalError::ArgumentMismatch {
            method: "Build".into(),
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn argument_types_are_checked() {
    let rt = runtime(&new_log());
    let err = run(
        &rt,
        "public Demo.Widget Create(System.Int32 int32) { return new Demo.Widget(); }",
        &[Value::from("nope")],
    )
    .unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

#[test]
fn undefined_variable_traps() {
    let rt = runtime(&new_log());
    let err = run(&rt, "public Demo.Widget Build() { return missing; }", &[]).unwrap_err();
    assert_eq!(err, EvalError::UndefinedVariable("missing".into()));
}

#[test]
fn calling_through_null_traps() {
    let rt = runtime(&new_log());
    let err = run(
        &rt,
        "public void Act(Demo.Consumer consumer) { consumer.Take(null); }",
        &[Value::Null],
    )
    .unwrap_err();
    assert_eq!(err, EvalError::NullReference("consumer".into()));
}

// ══════════════════════════════════════════════════════════════════════════════
// Disposal scopes
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn using_releases_once_after_body() {
    let log = new_log();
    let rt = runtime(&log);
    let consumer = rt.construct(&"Demo.Consumer".into(), &[]).unwrap();
    run(
        &rt,
        r#"public void DoStuff(Demo.Consumer consumer)
{
    using (var resource = new Demo.Resource("a"))
    {
        consumer.Take(resource);
    }
}"#,
        &[Value::Object(consumer.clone())],
    )
    .unwrap();

    let taken = consumer.field("taken").unwrap();
    let resource = taken.as_object().unwrap();
    assert_eq!(resource.dispose_count(), 1);
    assert_eq!(*log.lock(), vec!["\"a\"".to_string()]);
}

#[test]
fn using_releases_when_body_fails() {
    let log = new_log();
    let rt = runtime(&log);
    let err = run(
        &rt,
        r#"public void Act(Demo.Consumer consumer)
{
    using (var resource = new Demo.Resource("a"))
    {
        resource.Fail();
    }
}"#,
        &[Value::Null],
    )
    .unwrap_err();
    assert_eq!(err, EvalError::thrown("resource failure"));
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn early_return_releases_and_keeps_value() {
    let log = new_log();
    let rt = runtime(&log);
    let value = run(
        &rt,
        r#"public Demo.Resource Build()
{
    using (var resource = new Demo.Resource("a"))
    {
        return resource;
    }
}"#,
        &[],
    )
    .unwrap();
    assert_eq!(value.as_object().unwrap().dispose_count(), 1);
}

#[test]
fn nested_scopes_release_inner_first() {
    let log = new_log();
    let rt = runtime(&log);
    run(
        &rt,
        r#"public void Act(Demo.Consumer consumer)
{
    using (var outer = new Demo.Resource("outer"))
    {
        using (var inner = new Demo.Resource("inner"))
        {
            consumer.Take(inner);
        }
    }
}"#,
        &[Value::Object(rt.construct(&"Demo.Consumer".into(), &[]).unwrap())],
    )
    .unwrap();
    assert_eq!(
        *log.lock(),
        vec!["\"inner\"".to_string(), "\"outer\"".to_string()]
    );
}

#[test]
fn null_resource_is_skipped() {
    let log = new_log();
    let rt = runtime(&log);
    run(
        &rt,
        "public void Act(Demo.Consumer consumer) { using (Demo.Resource resource = null) { } }",
        &[Value::Null],
    )
    .unwrap();
    assert!(log.lock().is_empty());
}

#[test]
fn body_error_wins_over_dispose_error() {
    let rt = Runtime::new(catalog())
        .method("Demo.Resource", "Fail", |_, _| Err(EvalError::thrown("body")))
        .on_dispose("Demo.Resource", |_| Err(EvalError::thrown("dispose")));
    let source = r#"public void Act(Demo.Consumer consumer)
{
    using (var resource = new Demo.Resource())
    {
        resource.Fail();
    }
}"#;
    assert_eq!(
        run(&rt, source, &[Value::Null]).unwrap_err(),
        EvalError::thrown("body")
    );

    let clean = r#"public void Act(Demo.Consumer consumer)
{
    using (var resource = new Demo.Resource())
    {
    }
}"#;
    assert_eq!(
        run(&rt, clean, &[Value::Null]).unwrap_err(),
        EvalError::thrown("dispose")
    );
}

#[test]
fn panicking_behavior_still_releases() {
    let log = new_log();
    let disposed = Arc::clone(&log);
    let rt = Runtime::new(catalog())
        .method("Demo.Resource", "Fail", |_, _| panic!("native panic"))
        .on_dispose("Demo.Resource", move |_| {
            disposed.lock().push("released".into());
            Ok(())
        });
    let method = parse(
        r#"public void Act(Demo.Consumer consumer)
{
    using (var resource = new Demo.Resource())
    {
        resource.Fail();
    }
}"#,
    );
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        Interpreter::new(&rt).invoke(&method, &[Value::Null])
    }));
    assert!(outcome.is_err());
    assert_eq!(*log.lock(), vec!["released".to_string()]);
}
