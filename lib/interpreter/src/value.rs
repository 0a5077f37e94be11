use std::fmt;
use std::fmt::{Display, Formatter};

use parser::LiteralValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
        }
    }

    /// Values of different kinds are never equal; there is no coercion.
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{:.3}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&LiteralValue<'_>> for Value {
    fn from(literal: &LiteralValue<'_>) -> Self {
        match literal {
            LiteralValue::Number(n) => (*n).into(),
            LiteralValue::Str(s) => (*s).into(),
            LiteralValue::Boolean(b) => (*b).into(),
            LiteralValue::Nil => Value::Nil,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::from(3.0).to_string(), "3.000");
        assert_eq!(Value::from(-0.5).to_string(), "-0.500");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::from("raw \"content\"").to_string(), "raw \"content\"");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Nil.to_string(), "nil");
    }

    #[test]
    fn equality_never_coerces() {
        assert!(!Value::from(1.0).equals(&Value::from("1")));
        assert!(!Value::from(false).equals(&Value::Nil));
        assert!(!Value::from(0.0).equals(&Value::from(false)));
        assert!(Value::Nil.equals(&Value::Nil));
        assert!(Value::from("ab").equals(&Value::from("ab".to_string())));
        assert!(!Value::from(f64::NAN).equals(&Value::from(f64::NAN)));
    }

    #[test]
    fn literals_become_owned_values() {
        let source = String::from("\"borrowed\"");
        let value = Value::from(&LiteralValue::Str(&source[1..9]));
        drop(source);
        assert_eq!(value, Value::Str("borrowed".to_string()));
    }
}
