//! Tree-walking evaluation over `serde_json::Value`.
//!
//! Missing members and out-of-range indexes evaluate to `null`. `&&` and `||`
//! short-circuit and yield the deciding operand. Arithmetic stays integral
//! while both operands are integers and the result is exact.

use super::parser::{BinaryOp, Expr, UnaryOp};
use crate::comparer::compare_json;
use crate::error::{Result, SeqError};
use serde_json::{Number, Value};
use std::cmp::Ordering;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else { return None };
        n.as_i64().map(Self::Int).or_else(|| n.as_f64().map(Self::Float))
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

fn float(value: f64) -> Result<Value> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| SeqError::invalid(format!("arithmetic produced a non-finite number ({value})")))
}

/// JavaScript-style truthiness.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (Num::of(a), Num::of(b)) {
        (Some(x), Some(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn member(target: &Value, name: &str) -> Value {
    match (target, name) {
        (Value::Object(fields), _) => fields.get(name).cloned().unwrap_or(Value::Null),
        (Value::Array(items), "length") => Value::from(items.len()),
        (Value::String(s), "length") => Value::from(s.chars().count()),
        _ => Value::Null,
    }
}

fn index(target: &Value, at: &Value) -> Value {
    let slot = at.as_u64().and_then(|i| usize::try_from(i).ok());
    match (target, slot, at) {
        (Value::Array(items), Some(i), _) => items.get(i).cloned().unwrap_or(Value::Null),
        (Value::String(s), Some(i), _) => s.chars().nth(i).map_or(Value::Null, |c| Value::from(c.to_string())),
        (Value::Object(fields), _, Value::String(name)) => fields.get(name).cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn arithmetic(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    if op == BinaryOp::Add && (a.is_string() || b.is_string()) {
        return Ok(Value::from(text(a) + &text(b)));
    }
    let (Some(x), Some(y)) = (Num::of(a), Num::of(b)) else {
        return Err(SeqError::invalid(format!("cannot apply {op:?} to {a} and {b}")));
    };
    if let (Num::Int(x), Num::Int(y)) = (x, y) {
        let exact = match op {
            BinaryOp::Add => x.checked_add(y),
            BinaryOp::Sub => x.checked_sub(y),
            BinaryOp::Mul => x.checked_mul(y),
            BinaryOp::Div if y != 0 && x.checked_rem(y) == Some(0) => x.checked_div(y),
            BinaryOp::Rem if y == 0 => return Err(SeqError::invalid("remainder by zero")),
            BinaryOp::Rem => x.checked_rem(y),
            _ => None,
        };
        if let Some(v) = exact {
            return Ok(Value::from(v));
        }
    }
    let (x, y) = (x.as_f64(), y.as_f64());
    match op {
        BinaryOp::Add => float(x + y),
        BinaryOp::Sub => float(x - y),
        BinaryOp::Mul => float(x * y),
        BinaryOp::Div => float(x / y),
        BinaryOp::Rem => float(x % y),
        _ => Err(SeqError::invalid(format!("{op:?} is not arithmetic"))),
    }
}

fn negate(value: &Value) -> Result<Value> {
    match Num::of(value) {
        Some(Num::Int(i)) => i.checked_neg().map_or_else(|| float(-Num::Int(i).as_f64()), |n| Ok(Value::from(n))),
        Some(Num::Float(f)) => float(-f),
        None => Err(SeqError::invalid(format!("cannot negate {value}"))),
    }
}

/// Evaluate `expr` with `args` bound to the parameters by position.
///
/// Parameters beyond `args` are `null`.
pub(crate) fn eval(expr: &Expr, args: &[Value]) -> Result<Value> {
    Ok(match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Param(i) => args.get(*i).cloned().unwrap_or(Value::Null),
        Expr::Member(target, name) => member(&eval(target, args)?, name),
        Expr::Index(target, at) => index(&eval(target, args)?, &eval(at, args)?),
        Expr::Unary(UnaryOp::Not, inner) => Value::Bool(!truthy(&eval(inner, args)?)),
        Expr::Unary(UnaryOp::Neg, inner) => negate(&eval(inner, args)?)?,
        Expr::Conditional(cond, then, otherwise) => {
            if truthy(&eval(cond, args)?) {
                eval(then, args)?
            } else {
                eval(otherwise, args)?
            }
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            let left = eval(lhs, args)?;
            if truthy(&left) { eval(rhs, args)? } else { left }
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            let left = eval(lhs, args)?;
            if truthy(&left) { left } else { eval(rhs, args)? }
        }
        Expr::Binary(op, lhs, rhs) => {
            let (a, b) = (eval(lhs, args)?, eval(rhs, args)?);
            match op {
                BinaryOp::Eq => Value::Bool(loose_eq(&a, &b)),
                BinaryOp::Ne => Value::Bool(!loose_eq(&a, &b)),
                BinaryOp::Lt => Value::Bool(compare_json(&a, &b) == Ordering::Less),
                BinaryOp::Le => Value::Bool(compare_json(&a, &b) != Ordering::Greater),
                BinaryOp::Gt => Value::Bool(compare_json(&a, &b) == Ordering::Greater),
                BinaryOp::Ge => Value::Bool(compare_json(&a, &b) != Ordering::Less),
                _ => arithmetic(*op, &a, &b)?,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_division_falls_back_to_float_when_inexact() {
        assert_eq!(arithmetic(BinaryOp::Div, &json!(6), &json!(3)).ok(), Some(json!(2)));
        assert_eq!(arithmetic(BinaryOp::Div, &json!(7), &json!(2)).ok(), Some(json!(3.5)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(arithmetic(BinaryOp::Div, &json!(1), &json!(0)).is_err());
    }

    #[test]
    fn missing_members_are_null() {
        assert_eq!(member(&json!({"a": 1}), "b"), Value::Null);
        assert_eq!(member(&json!([1, 2, 3]), "length"), json!(3));
    }
}
