//! Operator semantics.
//!
//! Integer arithmetic is checked. Mixing an int with a float promotes to
//! float. `+` also concatenates strings and arrays.

use std::cmp::Ordering;

use wirescript_core::{RuntimeError, Value};
use wirescript_parser::ast::{BinaryOp, UnaryOp};

/// Apply a non short-circuit binary operator.
pub(crate) fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    use BinaryOp::*;
    match op {
        Equal => Ok(Value::Bool(values_equal(&left, &right))),
        NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
        Less | LessEqual | Greater | GreaterEqual => {
            let ordering = compare(op, &left, &right)?;
            Ok(Value::Bool(match op {
                Less => ordering == Ordering::Less,
                LessEqual => ordering != Ordering::Greater,
                Greater => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        Add => add(left, right),
        Sub | Mul | Div | Mod | Pow => arithmetic(op, &left, &right),
        LogicalOr => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        LogicalAnd => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
    }
}

pub(crate) fn unary(op: UnaryOp, operand: Value) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (UnaryOp::LogicalNot, v) => Ok(Value::Bool(!v.is_truthy())),
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| overflow(op)),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::float(-f.0)),
        (UnaryOp::Plus, v @ (Value::Int(_) | Value::Float(_))) => Ok(v),
        (_, v) => Err(RuntimeError::TypeMismatch {
            expected: format!("number for unary '{op}'"),
            actual: v.type_name().to_string(),
        }),
    }
}

/// Read `object[key]`.
pub(crate) fn index(object: &Value, key: &Value) -> Result<Value, RuntimeError> {
    match (object, key) {
        (Value::Array(items), Value::Int(i)) => element(items, *i).cloned(),
        (Value::Dict(entries), Value::String(k)) => entries
            .get(k)
            .cloned()
            .ok_or_else(|| RuntimeError::KeyNotFound { key: k.clone() }),
        (Value::String(s), Value::Int(i)) => {
            let len = s.chars().count();
            usize::try_from(*i)
                .ok()
                .and_then(|n| s.chars().nth(n))
                .map(|c| Value::String(c.to_string()))
                .ok_or(RuntimeError::IndexOutOfRange { index: *i, len })
        }
        (Value::Array(_) | Value::String(_), other) => Err(RuntimeError::TypeMismatch {
            expected: "int index".to_string(),
            actual: other.type_name().to_string(),
        }),
        (Value::Dict(_), other) => Err(RuntimeError::TypeMismatch {
            expected: "string key".to_string(),
            actual: other.type_name().to_string(),
        }),
        (other, _) => Err(not_indexable(other)),
    }
}

/// Walk `keys` into `slot` for assignment.
///
/// The last dictionary key is inserted (as `null`) when absent.
pub(crate) fn index_mut<'v>(
    mut slot: &'v mut Value,
    keys: &[Value],
) -> Result<&'v mut Value, RuntimeError> {
    for (n, key) in keys.iter().enumerate() {
        let last = n + 1 == keys.len();
        slot = match (slot, key) {
            (Value::Array(items), Value::Int(i)) => element_mut(items, *i)?,
            (Value::Dict(entries), Value::String(k)) => {
                if last {
                    entries.entry(k.clone()).or_insert(Value::Null)
                } else {
                    entries
                        .get_mut(k)
                        .ok_or_else(|| RuntimeError::KeyNotFound { key: k.clone() })?
                }
            }
            (Value::Array(_), other) => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "int index".to_string(),
                    actual: other.type_name().to_string(),
                });
            }
            (Value::Dict(_), other) => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "string key".to_string(),
                    actual: other.type_name().to_string(),
                });
            }
            (other, _) => return Err(not_indexable(other)),
        };
    }
    Ok(slot)
}

/// Equality with int/float promotion. Objects compare by identity.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == b.0,
        _ => left == right,
    }
}

/// Order two numbers or two strings.
pub(crate) fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Ordering, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => a
                .partial_cmp(&b)
                .ok_or_else(|| unsupported(op, left, right)),
            _ => Err(unsupported(op, left, right)),
        },
    }
}

fn add(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::String(mut a), Value::String(b)) => {
            a.push_str(&b);
            Ok(Value::String(a))
        }
        (Value::Array(mut a), Value::Array(b)) => {
            a.extend(b);
            Ok(Value::Array(a))
        }
        (left, right) => arithmetic(BinaryOp::Add, &left, &right),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        return int_arithmetic(op, *a, *b);
    }
    let (Some(a), Some(b)) = (left.as_float(), right.as_float()) else {
        return Err(unsupported(op, left, right));
    };
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::Pow => a.powf(b),
        _ => return Err(unsupported(op, left, right)),
    };
    Ok(Value::float(result))
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div | BinaryOp::Mod if b == 0 => return Err(RuntimeError::DivisionByZero),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Mod => a.checked_rem(b),
        BinaryOp::Pow if b < 0 => return Ok(Value::float((a as f64).powf(b as f64))),
        BinaryOp::Pow => u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp)),
        _ => {
            return Err(RuntimeError::UnsupportedOperands {
                op: op.to_string(),
                left: "int",
                right: "int",
            });
        }
    };
    result
        .map(Value::Int)
        .ok_or_else(|| RuntimeError::IntegerOverflow { op: op.to_string() })
}

fn element(items: &[Value], index: i64) -> Result<&Value, RuntimeError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or(RuntimeError::IndexOutOfRange {
            index,
            len: items.len(),
        })
}

fn element_mut(items: &mut [Value], index: i64) -> Result<&mut Value, RuntimeError> {
    let len = items.len();
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get_mut(i))
        .ok_or(RuntimeError::IndexOutOfRange { index, len })
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperands {
        op: op.to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn not_indexable(value: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: "array, dictionary or string".to_string(),
        actual: value.type_name().to_string(),
    }
}

fn overflow(op: UnaryOp) -> RuntimeError {
    RuntimeError::IntegerOverflow { op: op.to_string() }
}
