//! Literal values: the only things a variable can hold during evaluation.

use crate::types::Type;
use crate::values::format::{format_double, format_float};
use alloc::string::String;
use core::fmt;
use ecow::EcoString;

/// A compile-time constant.
///
/// `Char` holds a UTF-16 code unit, matching the runtime representation, so
/// lone surrogates produced by string indexing survive evaluation unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// "No value": the result of loops, empty blocks and unmatched branches.
    Unit,
    Boolean(bool),
    Char(u16),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    UByte(u8),
    UShort(u16),
    UInt(u32),
    ULong(u64),
    Float(f32),
    Double(f64),
    String(EcoString),
}

impl Literal {
    pub fn string(s: impl Into<EcoString>) -> Self {
        Literal::String(s.into())
    }

    pub fn char(c: char) -> Self {
        let mut buf = [0u16; 2];
        Literal::Char(c.encode_utf16(&mut buf)[0])
    }

    /// The type a literal of this shape is declared with.
    pub fn ty(&self) -> Type<'static> {
        match self {
            Literal::Unit => Type::UNIT,
            Literal::Boolean(_) => Type::BOOLEAN,
            Literal::Char(_) => Type::CHAR,
            Literal::Byte(_) => Type::BYTE,
            Literal::Short(_) => Type::SHORT,
            Literal::Int(_) => Type::INT,
            Literal::Long(_) => Type::LONG,
            Literal::UByte(_) => Type::UBYTE,
            Literal::UShort(_) => Type::USHORT,
            Literal::UInt(_) => Type::UINT,
            Literal::ULong(_) => Type::ULONG,
            Literal::Float(_) => Type::FLOAT,
            Literal::Double(_) => Type::DOUBLE,
            Literal::String(_) => Type::STRING,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Literal::Unit)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the literal the way it would be written in source.
    pub fn to_source(&self) -> String {
        match self {
            Literal::Unit => String::from("Unit"),
            Literal::Char(c) => alloc::format!("'{}'", char_to_string(*c).escape_default()),
            Literal::Byte(v) => alloc::format!("{}.toByte()", v),
            Literal::Short(v) => alloc::format!("{}.toShort()", v),
            Literal::Long(v) => alloc::format!("{}L", v),
            Literal::UByte(v) => alloc::format!("{}u.toUByte()", v),
            Literal::UShort(v) => alloc::format!("{}u.toUShort()", v),
            Literal::UInt(v) => alloc::format!("{}u", v),
            Literal::ULong(v) => alloc::format!("{}uL", v),
            Literal::Float(v) => alloc::format!("{}f", format_float(*v)),
            Literal::String(s) => alloc::format!("\"{}\"", s.escape_default()),
            Literal::Boolean(_) | Literal::Int(_) | Literal::Double(_) => alloc::format!("{}", self),
        }
    }
}

/// Decode a single UTF-16 unit, replacing unpaired surrogates.
pub(crate) fn char_to_string(unit: u16) -> String {
    char::decode_utf16([unit])
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

impl fmt::Display for Literal {
    /// Runtime `toString()` of the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Unit => f.write_str("kotlin.Unit"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Char(c) => f.write_str(&char_to_string(*c)),
            Literal::Byte(v) => write!(f, "{}", v),
            Literal::Short(v) => write!(f, "{}", v),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Long(v) => write!(f, "{}", v),
            Literal::UByte(v) => write!(f, "{}", v),
            Literal::UShort(v) => write!(f, "{}", v),
            Literal::UInt(v) => write!(f, "{}", v),
            Literal::ULong(v) => write!(f, "{}", v),
            Literal::Float(v) => f.write_str(&format_float(*v)),
            Literal::Double(v) => f.write_str(&format_double(*v)),
            Literal::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.into())
    }
}
