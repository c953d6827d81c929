//! Functions available to every script.
//!
//! A script function with the same name shadows the builtin.

use std::cmp::Ordering;

use wirescript_core::{RuntimeError, Value};
use wirescript_parser::ast::BinaryOp;

use super::ops;

/// Names of all builtins.
pub const BUILTINS: &[&str] = &[
    "object", "id", "len", "str", "int", "float", "abs", "min", "max", "print",
];

/// Call a builtin. Returns `None` when `name` is not a builtin.
pub(crate) fn call(name: &str, args: Vec<Value>) -> Option<Result<Value, RuntimeError>> {
    let result = match name {
        "object" => arity(name, &args, 0).map(|_| Value::new_object("object")),
        "id" => arity(name, &args, 1).and_then(|_| id(&args[0])),
        "len" => arity(name, &args, 1).and_then(|_| len(&args[0])),
        "str" => arity(name, &args, 1).map(|_| Value::String(args[0].to_string())),
        "int" => arity(name, &args, 1).and_then(|_| to_int(&args[0])),
        "float" => arity(name, &args, 1).and_then(|_| to_float(&args[0])),
        "abs" => arity(name, &args, 1).and_then(|_| abs(&args[0])),
        "min" => extreme(name, args, Ordering::Less),
        "max" => extreme(name, args, Ordering::Greater),
        "print" => {
            let line: Vec<String> = args.iter().map(Value::to_string).collect();
            println!("{}", line.join(" "));
            Ok(Value::Null)
        }
        _ => return None,
    };
    Some(result)
}

fn arity(name: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount {
            function: name.to_string(),
            expected: expected.to_string(),
            actual: args.len(),
        })
    }
}

fn id(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Object(handle) => i64::try_from(handle.id())
            .map(Value::Int)
            .map_err(|_| RuntimeError::IntegerOverflow { op: "id".to_string() }),
        other => Err(mismatch("object", other)),
    }
}

fn len(value: &Value) -> Result<Value, RuntimeError> {
    let n = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Dict(entries) => entries.len(),
        other => return Err(mismatch("string, array or dictionary", other)),
    };
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| RuntimeError::IntegerOverflow { op: "len".to_string() })
}

fn to_int(value: &Value) -> Result<Value, RuntimeError> {
    let invalid = || RuntimeError::InvalidConversion {
        value: value.to_string(),
        target: "int",
    };
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(f) => {
            let t = f.0.trunc();
            if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                Ok(Value::Int(t as i64))
            } else {
                Err(invalid())
            }
        }
        Value::String(s) => s.trim().parse().map(Value::Int).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn to_float(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(Value::float(value.as_float().unwrap_or_default())),
        Value::Bool(b) => Ok(Value::float(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Value::float)
            .map_err(|_| RuntimeError::InvalidConversion {
                value: value.to_string(),
                target: "float",
            }),
        _ => Err(RuntimeError::InvalidConversion {
            value: value.to_string(),
            target: "float",
        }),
    }
}

fn abs(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::IntegerOverflow { op: "abs".to_string() }),
        Value::Float(f) => Ok(Value::float(f.0.abs())),
        other => Err(mismatch("number", other)),
    }
}

/// `min`/`max` over the arguments, or over the elements of a single array.
fn extreme(name: &str, args: Vec<Value>, keep: Ordering) -> Result<Value, RuntimeError> {
    let candidates = match <[Value; 1]>::try_from(args) {
        Ok([Value::Array(items)]) => items,
        Ok([single]) => vec![single],
        Err(args) => args,
    };

    let mut best: Option<Value> = None;
    for candidate in candidates {
        best = Some(match best {
            None => candidate,
            Some(current) => {
                if ops::compare(BinaryOp::Less, &candidate, &current)? == keep {
                    candidate
                } else {
                    current
                }
            }
        });
    }
    best.ok_or_else(|| RuntimeError::ArgumentCount {
        function: name.to_string(),
        expected: "at least 1".to_string(),
        actual: 0,
    })
}

fn mismatch(expected: &str, actual: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        call(name, args).expect("builtin exists")
    }

    #[test]
    fn unknown_name_is_not_a_builtin() {
        assert!(call("f1", vec![]).is_none());
    }

    #[test]
    fn objects_have_stable_distinct_ids() {
        let a = run("object", vec![]).unwrap();
        let b = run("object", vec![]).unwrap();
        let id_a = run("id", vec![a.clone()]).unwrap();
        assert_eq!(run("id", vec![a]).unwrap(), id_a);
        assert_ne!(run("id", vec![b]).unwrap(), id_a);
        assert!(run("id", vec![Value::Int(1)]).is_err());
    }

    #[test]
    fn conversions() {
        assert_eq!(run("int", vec![Value::float(3.9)]), Ok(Value::Int(3)));
        assert_eq!(run("int", vec![" 42 ".into()]), Ok(Value::Int(42)));
        assert!(matches!(
            run("int", vec!["x".into()]),
            Err(RuntimeError::InvalidConversion { target: "int", .. })
        ));
        assert_eq!(run("float", vec![Value::Int(2)]), Ok(Value::float(2.0)));
        assert_eq!(run("str", vec![Value::Int(7)]), Ok(Value::from("7")));
        assert_eq!(run("len", vec!["abc".into()]), Ok(Value::Int(3)));
    }

    #[test]
    fn min_max() {
        assert_eq!(run("min", vec![Value::Int(3), Value::Int(1), Value::Int(2)]), Ok(Value::Int(1)));
        assert_eq!(
            run("max", vec![Value::Array(vec![Value::Int(3), Value::float(4.5)])]),
            Ok(Value::float(4.5))
        );
        assert_eq!(run("max", vec![Value::Int(5)]), Ok(Value::Int(5)));
        assert!(run("min", vec![]).is_err());
    }

    #[test]
    fn arity_is_checked() {
        assert!(matches!(
            run("abs", vec![]),
            Err(RuntimeError::ArgumentCount { actual: 0, .. })
        ));
        assert_eq!(run("abs", vec![Value::Int(-4)]), Ok(Value::Int(4)));
    }
}
