//! Runtime value representation for the stackvm machine.
//!
//! Values are what live on the data stack and in address spaces during
//! execution.

use std::cmp::Ordering;
use std::fmt;

use crate::array::Array;

/// The element kind of an [`Array`]. Arrays never hold other arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Integer,
    Float,
    Character,
}

impl ElementKind {
    /// The value every slot of a fresh array of this kind holds.
    pub fn zero(self) -> Value {
        match self {
            ElementKind::Integer => Value::Integer(0),
            ElementKind::Float => Value::Float(0.0),
            ElementKind::Character => Value::Character('\0'),
        }
    }

    /// The matching [`ValueKind`].
    pub fn value_kind(self) -> ValueKind {
        match self {
            ElementKind::Integer => ValueKind::Integer,
            ElementKind::Float => ValueKind::Float,
            ElementKind::Character => ValueKind::Character,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value_kind(), f)
    }
}

/// The kind tag of any [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Float,
    Character,
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Character => "character",
            ValueKind::Array => "array",
        })
    }
}

/// Runtime value.
///
/// An `Array` value owns its storage. Cloning a value clones the array, so
/// two slots never share one array.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed 64-bit integer.
    Integer(i64),
    /// IEEE 754 64-bit float.
    Float(f64),
    /// Unicode scalar value.
    Character(char),
    /// Fixed-size homogeneous array.
    Array(Array),
}

/// A value viewed as a number, for arithmetic and comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Numeric ordering. Integer pairs compare exactly; anything involving
    /// a float compares as `f64`, so NaN is unordered.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

impl Value {
    /// Returns the kind tag for this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Character(_) => ValueKind::Character,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Numeric view of a primitive value. Characters convert to their code
    /// point. Arrays have no numeric view.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Integer(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Character(c) => Some(Number::Int(*c as i64)),
            Value::Array(_) => None,
        }
    }

    /// Interpret this value as a whole number (array index, character code).
    ///
    /// Returns `None` for arrays, fractional floats and non-finite floats.
    pub fn as_whole(&self) -> Option<i64> {
        match self.as_number()? {
            Number::Int(i) => Some(i),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
            Number::Float(_) => None,
        }
    }

    /// Interpret this value as a character for output. Floats truncate
    /// toward zero, the same as [`char_from_code`].
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Character(c) => Some(*c),
            Value::Integer(i) => u32::try_from(*i).ok().and_then(char::from_u32),
            Value::Float(f) => char_from_code(*f),
            Value::Array(_) => None,
        }
    }
}

/// Convert a numeric operand to a character, truncating toward zero.
pub fn char_from_code(code: f64) -> Option<char> {
    if !code.is_finite() || code < 0.0 || code > u32::MAX as f64 {
        return None;
    }
    char::from_u32(code.trunc() as u32)
}

/// Text form of a float: whole values keep a `.0` suffix, non-finite values
/// print as `inf`, `-inf` and `nan`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Character(c) => write!(f, "{c}"),
            Value::Array(array) => write!(f, "{array}"),
        }
    }
}
