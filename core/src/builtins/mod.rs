//! Primitive operations, resolved by name and operand types.
//!
//! Builtins are the bodiless functions owned by primitive types, `String` and the
//! intrinsics package. A call reaches [`dispatch`] with its operands in order,
//! receiver first, each tagged with the type the callee declares for it. The
//! declared types select the overload; the values must match them.
//!
//! Semantics follow the JVM: integer arithmetic wraps, shift counts are masked,
//! `Byte` and `Short` operands widen to `Int`, mixed operands widen to the wider
//! type, floating point follows IEEE 754, and strings are sequences of UTF-16
//! code units.

mod numeric;
mod strings;


use crate::evaluator::RuntimeError;
use crate::types::{Type, TypeKind};
use crate::values::Literal;
use alloc::string::String;
use core::fmt::Write;
use numeric::{Arith, Compare, Num};
use thiserror::Error;

/// One argument of a builtin call.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand<'t> {
    /// Type declared by the callee for this position.
    pub ty: Type<'t>,
    pub value: Literal,
}

impl<'t> Operand<'t> {
    pub fn new(ty: Type<'t>, value: Literal) -> Self {
        Self { ty, value }
    }
}

impl From<Literal> for Operand<'static> {
    /// An operand declared with its value's own type.
    fn from(value: Literal) -> Self {
        Operand {
            ty: value.ty(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuiltinError {
    #[error("builtin {name} called with {arity} operands; only 1 to 3 are supported")]
    UnsupportedArity { name: String, arity: usize },

    #[error("no builtin operation {name}({signature})")]
    UnknownSignature { name: String, signature: String },

    #[error("operand declared as {declared} holds {found}")]
    OperandMismatch { declared: String, found: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Apply the builtin operation `name` to `operands`.
pub fn dispatch(name: &str, operands: &[Operand<'_>]) -> Result<Literal, BuiltinError> {
    for operand in operands {
        if !declared_type_holds(&operand.ty, &operand.value) {
            return Err(BuiltinError::OperandMismatch {
                declared: operand.ty.fq_name().into_owned(),
                found: alloc::format!("{:?}", operand.value),
            });
        }
    }

    let resolved = if !loose_operands_allowed(name, operands) {
        None
    } else {
        match operands {
            [a] => unary(name, &a.value),
            [a, b] => binary(name, &a.value, &b.value)?,
            [a, b, c] => ternary(name, &a.value, &b.value, &c.value)?,
            _ => {
                return Err(BuiltinError::UnsupportedArity {
                    name: name.into(),
                    arity: operands.len(),
                });
            }
        }
    };

    resolved.ok_or_else(|| BuiltinError::UnknownSignature {
        name: name.into(),
        signature: signature(operands),
    })
}

/// Kotlin `equals`: like `==` on values, except that floating point compares
/// bit patterns with all NaNs equal.
pub fn equals(a: &Literal, b: &Literal) -> bool {
    match (a, b) {
        (Literal::Float(x), Literal::Float(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        (Literal::Double(x), Literal::Double(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        _ => a == b,
    }
}

fn declared_type_holds(ty: &Type<'_>, value: &Literal) -> bool {
    match ty.kind {
        TypeKind::Any => true,
        TypeKind::Named(_) => false,
        kind => value.ty().kind == kind,
    }
}

/// `Any`-typed parameters only exist on the equality operations and on
/// `String.plus(Any?)`.
fn loose_operands_allowed(name: &str, operands: &[Operand<'_>]) -> bool {
    let loose = operands.iter().any(|o| o.ty.kind == TypeKind::Any);
    if !loose {
        return true;
    }
    match (name, operands) {
        ("equals" | "EQEQ", [_, _]) => true,
        ("plus", [receiver, _]) => receiver.ty.is_string(),
        _ => false,
    }
}

fn signature(operands: &[Operand<'_>]) -> String {
    let mut out = String::new();
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}", operand.ty.fq_name());
    }
    out
}

fn unary(name: &str, a: &Literal) -> Option<Literal> {
    match name {
        "not" => a.as_bool().map(|b| Literal::Boolean(!b)),
        "unaryMinus" => numeric::negate(a),
        "unaryPlus" => numeric::unary_plus(a),
        "inv" => numeric::inv(a),
        "toString" => Some(Literal::string(alloc::format!("{}", a))),
        "length" => match a {
            Literal::String(s) => Some(Literal::Int(strings::length(s))),
            _ => None,
        },
        "toChar" => numeric::convert(a, TypeKind::Char),
        "toByte" => numeric::convert(a, TypeKind::Byte),
        "toShort" => numeric::convert(a, TypeKind::Short),
        "toInt" => numeric::convert(a, TypeKind::Int),
        "toLong" => numeric::convert(a, TypeKind::Long),
        "toFloat" => numeric::convert(a, TypeKind::Float),
        "toDouble" => numeric::convert(a, TypeKind::Double),
        _ => None,
    }
}

fn binary(name: &str, a: &Literal, b: &Literal) -> Result<Option<Literal>, RuntimeError> {
    if let Some(op) = Arith::from_name(name) {
        return char_arith(op, a, b).map_or_else(|| numeric_arith(op, a, b), |r| Ok(Some(r)));
    }
    if let Some(op) = Compare::from_name(name) {
        return Ok(compare(op, a, b));
    }
    let result = match (name, a, b) {
        ("equals" | "EQEQ", _, _) => Some(Literal::Boolean(equals(a, b))),
        ("ieee754equals", _, _) => numeric::ieee_equals(a, b).map(Literal::Boolean),
        ("and" | "ANDAND", Literal::Boolean(x), Literal::Boolean(y)) => {
            Some(Literal::Boolean(*x && *y))
        }
        ("or" | "OROR", Literal::Boolean(x), Literal::Boolean(y)) => {
            Some(Literal::Boolean(*x || *y))
        }
        ("xor", Literal::Boolean(x), Literal::Boolean(y)) => Some(Literal::Boolean(x ^ y)),
        ("and" | "or" | "xor", _, _) => numeric::bitwise(name, a, b),
        ("shl" | "shr" | "ushr", _, _) => numeric::shift(name, a, b),
        ("compareTo", Literal::Boolean(x), Literal::Boolean(y)) => {
            Some(Literal::Int(ordering_to_int(x.cmp(y))))
        }
        ("compareTo", Literal::Char(x), Literal::Char(y)) => {
            Some(Literal::Int(ordering_to_int(x.cmp(y))))
        }
        ("compareTo", Literal::String(x), Literal::String(y)) => {
            Some(Literal::Int(strings::compare(x, y)))
        }
        ("compareTo", _, _) => numeric::compare_to(a, b).map(Literal::Int),
        ("get", Literal::String(s), Literal::Int(index)) => Some(strings::get(s, *index)?),
        _ => None,
    };
    Ok(result)
}

fn ternary(
    name: &str,
    a: &Literal,
    b: &Literal,
    c: &Literal,
) -> Result<Option<Literal>, RuntimeError> {
    match (name, a, b, c) {
        ("subSequence", Literal::String(s), Literal::Int(start), Literal::Int(end)) => {
            Ok(Some(strings::sub_sequence(s, *start, *end)?))
        }
        _ => Ok(None),
    }
}

/// `Char + Int`, `Char - Int` and `Char - Char`, plus string concatenation.
fn char_arith(op: Arith, a: &Literal, b: &Literal) -> Option<Literal> {
    match (op, a, b) {
        (Arith::Plus, Literal::String(s), other) => Some(strings::concat(s, other)),
        (Arith::Plus, Literal::Char(c), Literal::Int(n)) => {
            Some(Literal::Char(i32::from(*c).wrapping_add(*n) as u16))
        }
        (Arith::Minus, Literal::Char(c), Literal::Int(n)) => {
            Some(Literal::Char(i32::from(*c).wrapping_sub(*n) as u16))
        }
        (Arith::Minus, Literal::Char(x), Literal::Char(y)) => {
            Some(Literal::Int(i32::from(*x) - i32::from(*y)))
        }
        _ => None,
    }
}

fn numeric_arith(op: Arith, a: &Literal, b: &Literal) -> Result<Option<Literal>, RuntimeError> {
    let (Some(x), Some(y)) = (Num::from_literal(a), Num::from_literal(b)) else {
        return Ok(None);
    };
    Ok(numeric::arith(op, x, y)?.map(Num::into_literal))
}

fn compare(op: Compare, a: &Literal, b: &Literal) -> Option<Literal> {
    let ordering = match (a, b) {
        (Literal::Char(x), Literal::Char(y)) => Some(x.cmp(y)),
        _ => numeric::ieee_cmp(Num::from_literal(a)?, Num::from_literal(b)?)?,
    };
    Some(Literal::Boolean(op.holds(ordering)))
}

pub(crate) fn ordering_to_int(ordering: core::cmp::Ordering) -> i32 {
    match ordering {
        core::cmp::Ordering::Less => -1,
        core::cmp::Ordering::Equal => 0,
        core::cmp::Ordering::Greater => 1,
    }
}
