//! Integration tests for writing a module's results back out as a script.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use wirescript::{EngineConfig, Error, Module, OverrideMap, SerializableShapes, Value};

fn script_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(filename)
}

fn load(path: &PathBuf, overrides: &[&str]) -> Module {
    Module::from_script(path, OverrideMap::parse(overrides).unwrap())
        .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()))
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_serialize_save_fn_calls() {
    init_logging();
    let original = script_path("pipeline.ws");
    let workdir = TempDir::new().unwrap();

    let mut module = load(&original, &["x=5"]);
    let f1 = module.call_fn("f1", "test").unwrap();
    let written = module.serialize(workdir.path(), &original).unwrap();
    assert_eq!(written, workdir.path().join("pipeline.ws"));

    let mut module2 = load(&written, &[]);
    assert_eq!(module2.call_fn("f1", "test").unwrap(), f1);
    assert_eq!(f1, Value::Int(7));
}

#[test]
fn test_serialize_skip_objects() {
    init_logging();
    let original = script_path("pipeline.ws");
    let workdir = TempDir::new().unwrap();

    let mut module = load(&original, &[]);
    let obj_id = module.call_fn("obj_id", "test").unwrap();
    let written = module.serialize(workdir.path(), &original).unwrap();
    assert_eq!(module.cache().keys().collect::<Vec<_>>(), vec!["obj", "obj_id"]);

    let mut module2 = load(&written, &[]);
    // obj_id is saved, obj has no literal form and is left out.
    assert_eq!(module2.cache().keys().collect::<Vec<_>>(), vec!["obj_id"]);
    assert_eq!(module2.call_fn("obj_id", "test").unwrap(), obj_id);

    let text = fs::read_to_string(&written).unwrap();
    assert!(text.contains("auto obj() {\n    return object();\n}"));
    assert!(!text.contains("return id(obj);"));
}

#[test]
fn test_frozen_entries_keep_call_order() {
    let original = script_path("pipeline.ws");
    let workdir = TempDir::new().unwrap();

    let mut module = load(&original, &["x=3"]);
    for name in ["ret_x", "z", "f2", "f1"] {
        module.call_fn(name, "test").unwrap();
    }
    let written = module.serialize(workdir.path(), &original).unwrap();

    let module2 = load(&written, &[]);
    let order: Vec<&str> = module2.cache().keys().map(String::as_str).collect();
    assert_eq!(order, vec!["ret_x", "z", "f2", "f1"]);
    assert_eq!(module2.cache().get("f2"), Some(&Value::Int(12)));
}

#[test]
fn test_reload_resolves_unfrozen_functions() {
    let original = script_path("pipeline.ws");
    let workdir = TempDir::new().unwrap();

    let mut module = load(&original, &["x=2"]);
    module.call_fn("z", "test").unwrap();
    let written = module.serialize(workdir.path(), &original).unwrap();

    // f2 was never called, so it is carried over and now depends on frozen z.
    let mut module2 = load(&written, &["x=1"]);
    assert_eq!(module2.call_fn("f2", "test").unwrap(), Value::Int(1 + 4));
}

#[test]
fn test_override_beats_frozen() {
    let original = script_path("pipeline.ws");
    let workdir = TempDir::new().unwrap();

    let mut module = load(&original, &["x=5"]);
    module.call_fn("f1", "test").unwrap();
    let written = module.serialize(workdir.path(), &original).unwrap();

    let mut module2 = load(&written, &["f1=100"]);
    assert!(!module2.is_cached("f1"));
    assert_eq!(module2.call_fn("f1", "test").unwrap(), Value::Int(100));
}

#[test]
fn test_serialize_nested_directory_is_created() {
    let original = script_path("report.ws");
    let workdir = TempDir::new().unwrap();
    let target = workdir.path().join("runs").join("001");

    let mut module = load(&original, &[]);
    let summary = module.call_fn("summary", "test").unwrap();
    module.call_fn("unstable", "test").unwrap();
    let written = module.serialize(&target, &original).unwrap();
    assert!(written.starts_with(&target));

    let mut module2 = load(&written, &[]);
    // The infinite float has no literal and is recomputed from frozen `total`.
    assert_eq!(
        module2.cache().keys().collect::<Vec<_>>(),
        vec!["samples", "total", "mean", "summary"]
    );
    assert_eq!(module2.call_fn("summary", "test").unwrap(), summary);
    assert_eq!(module2.call_fn("unstable", "test").unwrap(), Value::float(f64::INFINITY));
}

#[test]
fn test_serializable_whitelist() {
    let original = script_path("report.ws");
    let workdir = TempDir::new().unwrap();

    let config = EngineConfig::new().with_serializable(SerializableShapes::SCALARS);
    let mut module = Module::from_script_with_config(&original, OverrideMap::new(), config).unwrap();
    module.call_fn("summary", "test").unwrap();
    let written = module.serialize(workdir.path(), &original).unwrap();

    let module2 = load(&written, &[]);
    assert_eq!(module2.cache().keys().collect::<Vec<_>>(), vec!["total", "mean"]);
}

#[test]
fn test_serialize_refuses_to_overwrite_source() {
    let workdir = TempDir::new().unwrap();
    let source = workdir.path().join("script.ws");
    fs::write(&source, "int one() { return 1; }\n").unwrap();

    let mut module = load(&source, &[]);
    module.call_fn("one", "test").unwrap();
    let err = module.serialize(workdir.path(), &source).unwrap_err();
    assert!(matches!(err, Error::WouldOverwriteSource(_)));
    assert_eq!(fs::read_to_string(&source).unwrap(), "int one() { return 1; }\n");
}

#[test]
fn test_serialize_twice_is_stable() {
    let original = script_path("pipeline.ws");
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let mut module = load(&original, &["x=5"]);
    module.call_fn("f1", "test").unwrap();
    let first = module.serialize(first_dir.path(), &original).unwrap();

    let mut module2 = load(&first, &[]);
    module2.call_fn("f1", "test").unwrap();
    let second = module2.serialize(second_dir.path(), &first).unwrap();

    let first_text = fs::read_to_string(&first).unwrap();
    let second_text = fs::read_to_string(&second).unwrap();
    assert_eq!(first_text.matches("\n[frozen]\n").count(), 1);
    assert_eq!(second_text.matches("\n[frozen]\n").count(), 1);
}

#[test]
fn test_serialize_override_names_that_are_not_identifiers() {
    init_logging();
    let original = script_path("pipeline.ws");
    let workdir = TempDir::new().unwrap();

    let overrides = OverrideMap::from_pairs([
        ("lr-rate", Value::Int(3)),
        ("return", Value::Int(3)),
        ("model.dim", Value::Int(3)),
        ("x", Value::Int(3)),
    ]);
    let mut module = Module::from_script(&original, overrides).unwrap();
    for name in ["lr-rate", "return", "model.dim", "f1"] {
        module.call_fn(name, "test").unwrap();
    }
    let written = module.serialize(workdir.path(), &original).unwrap();

    let module2 = load(&written, &[]);
    assert_eq!(module2.cache().keys().collect::<Vec<_>>(), vec!["f1"]);
    assert_eq!(module2.cache()["f1"], Value::Int(5));
}
