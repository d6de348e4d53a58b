//! Dynamically typed scalar values exchanged with the engine
//!
//! The automation interface marshals every property and command result as a
//! variant. This module narrows that to the scalar shapes the engine actually
//! produces: nothing, booleans, integers, reals and strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value read from or written to the engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value (an empty variant or an empty table cell)
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Real(f64),
    /// String value
    Str(String),
}

impl Value {
    /// Parse a literal the way a user would type it on the command line
    ///
    /// `true`/`false` become booleans, integral numbers become integers, other
    /// numbers become reals and everything else is kept as a string. An empty
    /// input yields [`Value::Empty`].
    pub fn parse_literal(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(integer) = trimmed.parse::<i64>() {
            return Value::Integer(integer);
        }
        if let Some(real) = Value::parse_finite(trimmed) {
            return Value::Real(real);
        }
        Value::Str(text.to_string())
    }

    /// Parse a finite real number
    ///
    /// `NaN`, `inf` and `Infinity` spellings are names, not numbers.
    pub fn parse_finite(text: &str) -> Option<f64> {
        text.parse::<f64>().ok().filter(|real| real.is_finite())
    }

    /// Whether this is [`Value::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// The boolean payload, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The numeric payload widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Real(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Real(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(Value::parse_literal("true"), Value::Bool(true));
        assert_eq!(Value::parse_literal("FALSE"), Value::Bool(false));
        assert_eq!(Value::parse_literal("42"), Value::Integer(42));
        assert_eq!(Value::parse_literal("-7"), Value::Integer(-7));
        assert_eq!(Value::parse_literal("2.5"), Value::Real(2.5));
        assert_eq!(Value::parse_literal("Drill"), Value::Str("Drill".to_string()));
        assert_eq!(Value::parse_literal("   "), Value::Empty);
    }

    #[test]
    fn test_non_finite_spellings_are_text() {
        for text in ["NaN", "nan", "inf", "-Infinity"] {
            assert_eq!(Value::parse_literal(text), Value::Str(text.to_string()));
        }
        assert_eq!(Value::parse_finite("1e3"), Some(1000.0));
        assert_eq!(Value::parse_finite("1e999"), None);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Real(1.5).as_i64(), None);
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::default().is_empty());
        assert_eq!(Value::from(None::<i64>), Value::Empty);
    }

    #[test]
    fn test_json_representation_is_untagged() {
        assert_eq!(serde_json::to_string(&Value::Integer(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Value::from("x")).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&Value::Empty).unwrap(), "null");

        let parsed: Value = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, Value::Bool(true));
        let parsed: Value = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Value::Empty);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::Real(0.25).to_string(), "0.25");
        assert_eq!(Value::from("Station1").to_string(), "Station1");
    }
}
