//! Parser integration tests over the scripts in test_scripts/.

use std::fs;
use std::path::PathBuf;

use wirescript::{Parser, SignatureRegistry};
use wirescript_parser::ast::{Expr, Item, Stmt};

fn load_script(filename: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(filename);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

#[test]
fn test_pipeline_parses() {
    let source = load_script("pipeline.ws");
    let script = Parser::parse(&source).unwrap_or_else(|e| panic!("{}", e.display_with_source(&source)));

    let names: Vec<&str> = script.items().iter().map(Item::name).collect();
    assert_eq!(
        names,
        vec!["f1", "f2", "z", "ret_x", "loop1", "loop2", "obj", "obj_id"]
    );
    assert_eq!(script.globals().count(), 0);
}

#[test]
fn test_report_parses() {
    let source = load_script("report.ws");
    let script = Parser::parse(&source).unwrap_or_else(|e| panic!("{}", e.display_with_source(&source)));

    assert_eq!(script.globals().count(), 2);
    let samples = script.functions().find(|f| f.name.name == "samples").unwrap();
    assert_eq!(samples.return_type.to_string(), "int[]");
    assert!(matches!(samples.body.stmts[1], Stmt::For(_)));
    assert!(matches!(samples.params[0].default, Some(Expr::Literal(_))));
}

#[test]
fn test_registry_from_scripts() {
    for filename in ["pipeline.ws", "report.ws"] {
        let source = load_script(filename);
        let script = Parser::parse(&source).unwrap();
        let registry = SignatureRegistry::load(&script).unwrap();
        assert_eq!(registry.len(), script.functions().count());
        assert_eq!(registry.frozen().count(), 0);
        for function in registry.iter() {
            assert!(source.contains(&function.source));
        }
    }
}

#[test]
fn test_error_report_points_at_source() {
    let source = "int f(int x) {\n    return x +;\n}\n";
    let errors = Parser::parse(source).unwrap_err();
    let rendered = errors.display_with_source(source);
    assert!(rendered.contains("2 |     return x +;"));
}

#[test]
fn test_lenient_parse_keeps_good_items() {
    let source = "int good() { return 1; }\nint bad( { }\nint also_good(int good) { return good; }\n";
    let (script, errors) = Parser::parse_lenient(source);
    assert_eq!(errors.len(), 1);
    let names: Vec<&str> = script.items().iter().map(Item::name).collect();
    assert_eq!(names, vec!["good", "also_good"]);
}
