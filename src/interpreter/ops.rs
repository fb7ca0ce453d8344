//! Operator semantics on runtime values
//!
//! Every function returns `None` when the operation is not defined for its
//! operands; the evaluator then falls back to the expression's own text.
//!
//! # Numeric Promotion
//!
//! - `Int ⊕ Int` stays `Int` and wraps at 32 bits; division truncates toward zero
//! - an integral pair with a `Long` on either side is computed in 64 bits
//! - if either side is `Double`, both are widened and the result is `Double`
//! - `+` with any non-numeric operand concatenates the textual forms
//! - division or remainder by zero (integral or floating) is undefined

use crate::parser::ast::{BinOp, CastTarget, UnaryOp};
use crate::runtime::Value;
use std::cmp::Ordering;

pub fn binary(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => arithmetic(op, left, right),
        BinOp::Eq => equals(left, right).map(Value::Bool),
        BinOp::Ne => equals(left, right).map(|eq| Value::Bool(!eq)),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let ordering = compare(left, right)?;
            let result = match op {
                BinOp::Lt => ordering == Ordering::Less,
                BinOp::Le => ordering != Ordering::Greater,
                BinOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Some(Value::Bool(result))
        }
        BinOp::And => Some(Value::Bool(left.as_bool()? && right.as_bool()?)),
        BinOp::Or => Some(Value::Bool(left.as_bool()? || right.as_bool()?)),
    }
}

fn arithmetic(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            let n = match op {
                BinOp::Add => a.wrapping_add(b),
                BinOp::Sub => a.wrapping_sub(b),
                BinOp::Mul => a.wrapping_mul(b),
                BinOp::Div if b == 0 => return None,
                BinOp::Div => a.wrapping_div(b),
                BinOp::Mod if b == 0 => return None,
                BinOp::Mod => a.wrapping_rem(b),
                _ => return None,
            };
            Some(Value::Int(n))
        }
        (Value::Int(_) | Value::Long(_), Value::Int(_) | Value::Long(_)) => {
            let a = left.as_long()?;
            let b = right.as_long()?;
            let n = match op {
                BinOp::Add => a.wrapping_add(b),
                BinOp::Sub => a.wrapping_sub(b),
                BinOp::Mul => a.wrapping_mul(b),
                BinOp::Div if b == 0 => return None,
                BinOp::Div => a.wrapping_div(b),
                BinOp::Mod if b == 0 => return None,
                BinOp::Mod => a.wrapping_rem(b),
                _ => return None,
            };
            Some(Value::Long(n))
        }
        _ if left.is_numeric() && right.is_numeric() => {
            let a = left.as_f64()?;
            let b = right.as_f64()?;
            let d = match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div if b == 0.0 => return None,
                BinOp::Div => a / b,
                BinOp::Mod if b == 0.0 => return None,
                BinOp::Mod => a % b,
                _ => return None,
            };
            Some(Value::Double(d))
        }
        _ if op == BinOp::Add => Some(Value::Text(format!("{}{}", left, right))),
        _ => None,
    }
}

fn equals(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Int(_) | Value::Long(_), Value::Int(_) | Value::Long(_)) => Some(left.as_long()? == right.as_long()?),
        _ if left.is_numeric() && right.is_numeric() => Some(left.as_f64()? == right.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Text(a), Value::Text(b)) => Some(a == b),
        _ => None,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(_) | Value::Long(_), Value::Int(_) | Value::Long(_)) => Some(left.as_long()?.cmp(&right.as_long()?)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

pub fn unary(op: UnaryOp, operand: &Value) -> Option<Value> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(n)) => Some(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Long(n)) => Some(Value::Long(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Double(d)) => Some(Value::Double(-d)),
        (UnaryOp::Plus, v) if v.is_numeric() => Some(v.clone()),
        (UnaryOp::Not, Value::Bool(b)) => Some(Value::Bool(!b)),
        _ => None,
    }
}

/// Integral casts truncate toward zero and narrow by dropping high bits;
/// `(double)`-style casts widen
pub fn cast(target: CastTarget, operand: &Value) -> Option<Value> {
    match (target, operand) {
        (CastTarget::Int, Value::Double(d)) => Some(Value::Int(*d as i32)),
        (CastTarget::Int, v) => v.as_long().map(|n| Value::Int(n as i32)),
        (CastTarget::Long, Value::Double(d)) => Some(Value::Long(*d as i64)),
        (CastTarget::Long, v) => v.as_long().map(Value::Long),
        (CastTarget::Floating, v) => v.as_f64().map(Value::Double),
    }
}

/// Conversion applied when `value` is stored into a variable that currently
/// holds `current`. Widening always applies; `narrow` adds the implicit cast
/// a compound assignment performs (`int x; x += 1.5`).
pub fn assignment_conversion(current: &Value, value: Value, narrow: bool) -> Value {
    let converted = match (current, &value) {
        (Value::Long(_), Value::Int(n)) => Some(Value::Long(i64::from(*n))),
        (Value::Double(_), Value::Int(_) | Value::Long(_)) => value.as_f64().map(Value::Double),
        (Value::Int(_), Value::Long(_) | Value::Double(_)) if narrow => cast(CastTarget::Int, &value),
        (Value::Long(_), Value::Double(_)) if narrow => cast(CastTarget::Long, &value),
        _ => None,
    };
    converted.unwrap_or(value)
}

/// Widening applied to the initializer of a primitive declaration
pub fn declaration_conversion(type_name: &str, value: Value) -> Value {
    let converted = match (type_name, &value) {
        ("double" | "float" | "Double" | "Float", Value::Int(_) | Value::Long(_)) => value.as_f64().map(Value::Double),
        ("long" | "Long", Value::Int(n)) => Some(Value::Long(i64::from(*n))),
        _ => None,
    };
    converted.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion() {
        assert_eq!(binary(BinOp::Add, &Value::Int(1), &Value::Int(2)), Some(Value::Int(3)));
        assert_eq!(
            binary(BinOp::Add, &Value::Int(1), &Value::Double(2.0)),
            Some(Value::Double(3.0))
        );
        assert_eq!(
            binary(BinOp::Add, &Value::text("n="), &Value::Int(3)),
            Some(Value::text("n=3"))
        );
        assert_eq!(
            binary(BinOp::Add, &Value::Double(0.5), &Value::text("x")),
            Some(Value::text("0.5x"))
        );
    }

    #[test]
    fn test_integer_division_truncates_toward_zero() {
        assert_eq!(binary(BinOp::Div, &Value::Int(7), &Value::Int(2)), Some(Value::Int(3)));
        assert_eq!(binary(BinOp::Div, &Value::Int(-7), &Value::Int(2)), Some(Value::Int(-3)));
        assert_eq!(binary(BinOp::Mod, &Value::Int(-7), &Value::Int(2)), Some(Value::Int(-1)));
    }

    #[test]
    fn test_division_by_zero_is_undefined() {
        assert_eq!(binary(BinOp::Div, &Value::Int(1), &Value::Int(0)), None);
        assert_eq!(binary(BinOp::Mod, &Value::Int(1), &Value::Int(0)), None);
        assert_eq!(binary(BinOp::Div, &Value::Double(1.0), &Value::Int(0)), None);
    }

    #[test]
    fn test_text_only_supports_plus() {
        assert_eq!(binary(BinOp::Sub, &Value::text("a"), &Value::Int(1)), None);
        assert_eq!(binary(BinOp::Mul, &Value::text("a"), &Value::text("b")), None);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(BinOp::Le, &Value::Int(3), &Value::Int(3)), Some(Value::Bool(true)));
        assert_eq!(binary(BinOp::Gt, &Value::Double(2.5), &Value::Int(3)), Some(Value::Bool(false)));
        assert_eq!(binary(BinOp::Eq, &Value::Int(2), &Value::Double(2.0)), Some(Value::Bool(true)));
        assert_eq!(binary(BinOp::Lt, &Value::text("a"), &Value::text("b")), None);
    }

    #[test]
    fn test_unary_and_cast() {
        assert_eq!(unary(UnaryOp::Neg, &Value::Int(4)), Some(Value::Int(-4)));
        assert_eq!(unary(UnaryOp::Not, &Value::Bool(true)), Some(Value::Bool(false)));
        assert_eq!(unary(UnaryOp::Neg, &Value::text("x")), None);
        assert_eq!(cast(CastTarget::Int, &Value::Double(-3.9)), Some(Value::Int(-3)));
        assert_eq!(cast(CastTarget::Int, &Value::Long(4_294_967_297)), Some(Value::Int(1)));
        assert_eq!(cast(CastTarget::Long, &Value::Int(-2)), Some(Value::Long(-2)));
        assert_eq!(cast(CastTarget::Floating, &Value::Int(2)), Some(Value::Double(2.0)));
        assert_eq!(cast(CastTarget::Int, &Value::text("1")), None);
    }

    #[test]
    fn test_int_wraps_at_32_bits() {
        assert_eq!(
            binary(BinOp::Add, &Value::Int(i32::MAX), &Value::Int(1)),
            Some(Value::Int(i32::MIN))
        );
        assert_eq!(
            binary(BinOp::Mul, &Value::Int(65_536), &Value::Int(65_536)),
            Some(Value::Int(0))
        );
        assert_eq!(
            binary(BinOp::Add, &Value::Long(i64::from(i32::MAX)), &Value::Int(1)),
            Some(Value::Long(2_147_483_648))
        );
        assert_eq!(binary(BinOp::Lt, &Value::Int(1), &Value::Long(2)), Some(Value::Bool(true)));
    }

    #[test]
    fn test_assignment_conversions() {
        assert_eq!(
            assignment_conversion(&Value::Long(0), Value::Int(5), false),
            Value::Long(5)
        );
        assert_eq!(
            assignment_conversion(&Value::Double(0.0), Value::Int(2), false),
            Value::Double(2.0)
        );
        assert_eq!(
            assignment_conversion(&Value::Int(0), Value::Double(2.5), true),
            Value::Int(2)
        );
        assert_eq!(
            assignment_conversion(&Value::Int(0), Value::text("s"), true),
            Value::text("s")
        );
        assert_eq!(declaration_conversion("long", Value::Int(7)), Value::Long(7));
        assert_eq!(declaration_conversion("double", Value::Int(7)), Value::Double(7.0));
        assert_eq!(declaration_conversion("String", Value::Int(7)), Value::Int(7));
    }
}
