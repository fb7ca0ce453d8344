//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the closed set of values the
//! fallback interpreter manipulates. Values are tagged and owned; collections
//! hold their elements by value.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer, wrapping like Java `int`
//! - [`Value::Long`]: 64-bit signed integer (`long`, `L` literals)
//! - [`Value::Double`]: 64-bit float
//! - [`Value::Bool`]: boolean
//! - [`Value::Text`]: string, also used for unevaluated expression text
//! - [`Value::List`]: ordered list
//! - [`Value::Map`]: key/value map, iterated in insertion order
//!
//! # Textual Form
//!
//! [`Display`](std::fmt::Display) renders values the way Java's string
//! conversion does: doubles always carry a fractional part (`3.0`) and switch
//! to `1.0E10` notation outside `[1e-3, 1e7)`, lists render as `[a, b]` and
//! maps as `{k=v, k2=v2}`.

use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Text(String),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    pub fn empty_map() -> Self {
        Value::Map(Vec::new())
    }

    /// Java-flavoured type name, used in log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Long(_) | Value::Double(_))
    }

    /// Integral value widened to i64, returns None for non-integral values
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value widened to f64, returns None for non-numeric values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Insert or replace `key` in a map value. Returns false if `self` is not a map.
    pub fn map_put(&mut self, key: Value, value: Value) -> bool {
        let Value::Map(entries) = self else {
            return false;
        };
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        true
    }

    /// Append to a list value. Returns false if `self` is not a list.
    pub fn list_push(&mut self, value: Value) -> bool {
        let Value::List(items) = self else {
            return false;
        };
        items.push(value);
        true
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(d) => f.write_str(&format_double(*d)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Render a double the way `Double.toString` does
pub fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = d.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = format!("{}", d);
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let scientific = format!("{:e}", d);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{}E{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
            None => scientific,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_formatting_matches_java() {
        assert_eq!(format_double(3.0), "3.0");
        assert_eq!(format_double(0.1), "0.1");
        assert_eq!(format_double(-2.5), "-2.5");
        assert_eq!(format_double(0.0), "0.0");
        assert_eq!(format_double(1234567.0), "1234567.0");
        assert_eq!(format_double(1e7), "1.0E7");
        assert_eq!(format_double(12345678.9), "1.23456789E7");
        assert_eq!(format_double(0.0001), "1.0E-4");
        assert_eq!(format_double(f64::INFINITY), "Infinity");
        assert_eq!(format_double(f64::NAN), "NaN");
    }

    #[test]
    fn test_collection_display() {
        let mut list = Value::empty_list();
        list.list_push(Value::Int(1));
        list.list_push(Value::text("two"));
        assert_eq!(list.to_string(), "[1, two]");

        let mut map = Value::empty_map();
        map.map_put(Value::text("a"), Value::Int(1));
        map.map_put(Value::text("b"), Value::Double(2.0));
        map.map_put(Value::text("a"), Value::Int(3));
        assert_eq!(map.to_string(), "{a=3, b=2.0}");
    }

    #[test]
    fn test_mutators_reject_wrong_container() {
        let mut text = Value::text("x");
        assert!(!text.list_push(Value::Int(1)));
        assert!(!text.map_put(Value::Int(1), Value::Int(2)));
        assert_eq!(text, Value::text("x"));
    }
}
