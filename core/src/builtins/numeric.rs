//! Numeric operators, comparisons and conversions.

use crate::evaluator::RuntimeError;
use crate::types::TypeKind;
use crate::values::Literal;
use core::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Arith {
    Plus,
    Minus,
    Times,
    Div,
    Rem,
}

impl Arith {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name {
            "plus" => Some(Arith::Plus),
            "minus" => Some(Arith::Minus),
            "times" => Some(Arith::Times),
            "div" => Some(Arith::Div),
            "rem" => Some(Arith::Rem),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Compare {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Compare {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        match name {
            "less" => Some(Compare::Less),
            "lessOrEqual" => Some(Compare::LessOrEqual),
            "greater" => Some(Compare::Greater),
            "greaterOrEqual" => Some(Compare::GreaterOrEqual),
            _ => None,
        }
    }

    /// `None` means unordered (a NaN operand): every comparison is false.
    pub(super) fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => false,
            (Compare::Less, Some(o)) => o == Ordering::Less,
            (Compare::LessOrEqual, Some(o)) => o != Ordering::Greater,
            (Compare::Greater, Some(o)) => o == Ordering::Greater,
            (Compare::GreaterOrEqual, Some(o)) => o != Ordering::Less,
        }
    }
}

/// A numeric operand after widening `Byte`/`Short` to `Int` and
/// `UByte`/`UShort` to `UInt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Num {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    UInt(u32),
    ULong(u64),
}

/// Ordered by width within the signed and the unsigned family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Int,
    Long,
    Float,
    Double,
    UInt,
    ULong,
}

impl Rank {
    fn is_unsigned(self) -> bool {
        matches!(self, Rank::UInt | Rank::ULong)
    }
}

impl Num {
    pub(super) fn from_literal(lit: &Literal) -> Option<Num> {
        match *lit {
            Literal::Byte(v) => Some(Num::Int(v.into())),
            Literal::Short(v) => Some(Num::Int(v.into())),
            Literal::Int(v) => Some(Num::Int(v)),
            Literal::Long(v) => Some(Num::Long(v)),
            Literal::Float(v) => Some(Num::Float(v)),
            Literal::Double(v) => Some(Num::Double(v)),
            Literal::UByte(v) => Some(Num::UInt(v.into())),
            Literal::UShort(v) => Some(Num::UInt(v.into())),
            Literal::UInt(v) => Some(Num::UInt(v)),
            Literal::ULong(v) => Some(Num::ULong(v)),
            _ => None,
        }
    }

    pub(super) fn into_literal(self) -> Literal {
        match self {
            Num::Int(v) => Literal::Int(v),
            Num::Long(v) => Literal::Long(v),
            Num::Float(v) => Literal::Float(v),
            Num::Double(v) => Literal::Double(v),
            Num::UInt(v) => Literal::UInt(v),
            Num::ULong(v) => Literal::ULong(v),
        }
    }

    fn rank(self) -> Rank {
        match self {
            Num::Int(_) => Rank::Int,
            Num::Long(_) => Rank::Long,
            Num::Float(_) => Rank::Float,
            Num::Double(_) => Rank::Double,
            Num::UInt(_) => Rank::UInt,
            Num::ULong(_) => Rank::ULong,
        }
    }

    fn widen(self, rank: Rank) -> Num {
        match (self, rank) {
            (Num::Int(v), Rank::Long) => Num::Long(v.into()),
            (Num::Int(v), Rank::Float) => Num::Float(v as f32),
            (Num::Int(v), Rank::Double) => Num::Double(v.into()),
            (Num::Long(v), Rank::Float) => Num::Float(v as f32),
            (Num::Long(v), Rank::Double) => Num::Double(v as f64),
            (Num::Float(v), Rank::Double) => Num::Double(v.into()),
            (Num::UInt(v), Rank::ULong) => Num::ULong(v.into()),
            (n, _) => n,
        }
    }
}

/// Widen both operands to the wider of their types. Signed and unsigned
/// operands never mix.
fn promote(a: Num, b: Num) -> Option<(Num, Num)> {
    let (ra, rb) = (a.rank(), b.rank());
    if ra.is_unsigned() != rb.is_unsigned() {
        return None;
    }
    let rank = ra.max(rb);
    Some((a.widen(rank), b.widen(rank)))
}

macro_rules! integral {
    ($op:expr, $x:expr, $y:expr) => {
        match $op {
            Arith::Plus => $x.wrapping_add($y),
            Arith::Minus => $x.wrapping_sub($y),
            Arith::Times => $x.wrapping_mul($y),
            Arith::Div if $y == 0 => return Err(RuntimeError::DivisionByZero),
            Arith::Div => $x.wrapping_div($y),
            Arith::Rem if $y == 0 => return Err(RuntimeError::DivisionByZero),
            Arith::Rem => $x.wrapping_rem($y),
        }
    };
}

macro_rules! floating {
    ($op:expr, $x:expr, $y:expr) => {
        match $op {
            Arith::Plus => $x + $y,
            Arith::Minus => $x - $y,
            Arith::Times => $x * $y,
            Arith::Div => $x / $y,
            Arith::Rem => $x % $y,
        }
    };
}

pub(super) fn arith(op: Arith, a: Num, b: Num) -> Result<Option<Num>, RuntimeError> {
    let Some(operands) = promote(a, b) else {
        return Ok(None);
    };
    let result = match operands {
        (Num::Int(x), Num::Int(y)) => Num::Int(integral!(op, x, y)),
        (Num::Long(x), Num::Long(y)) => Num::Long(integral!(op, x, y)),
        (Num::UInt(x), Num::UInt(y)) => Num::UInt(integral!(op, x, y)),
        (Num::ULong(x), Num::ULong(y)) => Num::ULong(integral!(op, x, y)),
        (Num::Float(x), Num::Float(y)) => Num::Float(floating!(op, x, y)),
        (Num::Double(x), Num::Double(y)) => Num::Double(floating!(op, x, y)),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

/// Ordering for `less` and friends: IEEE, so NaN is unordered.
pub(super) fn ieee_cmp(a: Num, b: Num) -> Option<Option<Ordering>> {
    let ordering = match promote(a, b)? {
        (Num::Int(x), Num::Int(y)) => Some(x.cmp(&y)),
        (Num::Long(x), Num::Long(y)) => Some(x.cmp(&y)),
        (Num::UInt(x), Num::UInt(y)) => Some(x.cmp(&y)),
        (Num::ULong(x), Num::ULong(y)) => Some(x.cmp(&y)),
        (Num::Float(x), Num::Float(y)) => x.partial_cmp(&y),
        (Num::Double(x), Num::Double(y)) => x.partial_cmp(&y),
        _ => return None,
    };
    Some(ordering)
}

/// `compareTo`: a total order where NaN sorts above everything and `-0.0`
/// below `0.0`.
pub(super) fn compare_to(a: &Literal, b: &Literal) -> Option<i32> {
    let ordering = match promote(Num::from_literal(a)?, Num::from_literal(b)?)? {
        (Num::Int(x), Num::Int(y)) => x.cmp(&y),
        (Num::Long(x), Num::Long(y)) => x.cmp(&y),
        (Num::UInt(x), Num::UInt(y)) => x.cmp(&y),
        (Num::ULong(x), Num::ULong(y)) => x.cmp(&y),
        (Num::Float(x), Num::Float(y)) => total_cmp(x.is_nan(), y.is_nan(), || x.total_cmp(&y)),
        (Num::Double(x), Num::Double(y)) => total_cmp(x.is_nan(), y.is_nan(), || x.total_cmp(&y)),
        _ => return None,
    };
    Some(super::ordering_to_int(ordering))
}

fn total_cmp(x_nan: bool, y_nan: bool, ordered: impl FnOnce() -> Ordering) -> Ordering {
    match (x_nan, y_nan) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => ordered(),
    }
}

/// `ieee754equals`: NaN differs from itself, `0.0` equals `-0.0`.
pub(super) fn ieee_equals(a: &Literal, b: &Literal) -> Option<bool> {
    let (x, y) = promote(Num::from_literal(a)?, Num::from_literal(b)?)?;
    Some(x == y)
}

pub(super) fn negate(a: &Literal) -> Option<Literal> {
    match *a {
        Literal::Byte(v) => Some(Literal::Int(-i32::from(v))),
        Literal::Short(v) => Some(Literal::Int(-i32::from(v))),
        Literal::Int(v) => Some(Literal::Int(v.wrapping_neg())),
        Literal::Long(v) => Some(Literal::Long(v.wrapping_neg())),
        Literal::Float(v) => Some(Literal::Float(-v)),
        Literal::Double(v) => Some(Literal::Double(-v)),
        _ => None,
    }
}

pub(super) fn unary_plus(a: &Literal) -> Option<Literal> {
    match *a {
        Literal::Byte(v) => Some(Literal::Int(v.into())),
        Literal::Short(v) => Some(Literal::Int(v.into())),
        Literal::Int(_) | Literal::Long(_) | Literal::Float(_) | Literal::Double(_) => {
            Some(a.clone())
        }
        _ => None,
    }
}

pub(super) fn inv(a: &Literal) -> Option<Literal> {
    match *a {
        Literal::Byte(v) => Some(Literal::Byte(!v)),
        Literal::Short(v) => Some(Literal::Short(!v)),
        Literal::Int(v) => Some(Literal::Int(!v)),
        Literal::Long(v) => Some(Literal::Long(!v)),
        Literal::UByte(v) => Some(Literal::UByte(!v)),
        Literal::UShort(v) => Some(Literal::UShort(!v)),
        Literal::UInt(v) => Some(Literal::UInt(!v)),
        Literal::ULong(v) => Some(Literal::ULong(!v)),
        _ => None,
    }
}

/// `and`, `or`, `xor` on two integers of the same type.
pub(super) fn bitwise(name: &str, a: &Literal, b: &Literal) -> Option<Literal> {
    macro_rules! apply {
        ($x:expr, $y:expr) => {
            match name {
                "and" => $x & $y,
                "or" => $x | $y,
                _ => $x ^ $y,
            }
        };
    }
    match (a, b) {
        (Literal::Byte(x), Literal::Byte(y)) => Some(Literal::Byte(apply!(x, y))),
        (Literal::Short(x), Literal::Short(y)) => Some(Literal::Short(apply!(x, y))),
        (Literal::Int(x), Literal::Int(y)) => Some(Literal::Int(apply!(x, y))),
        (Literal::Long(x), Literal::Long(y)) => Some(Literal::Long(apply!(x, y))),
        (Literal::UByte(x), Literal::UByte(y)) => Some(Literal::UByte(apply!(x, y))),
        (Literal::UShort(x), Literal::UShort(y)) => Some(Literal::UShort(apply!(x, y))),
        (Literal::UInt(x), Literal::UInt(y)) => Some(Literal::UInt(apply!(x, y))),
        (Literal::ULong(x), Literal::ULong(y)) => Some(Literal::ULong(apply!(x, y))),
        _ => None,
    }
}

/// `shl`, `shr`, `ushr` with an `Int` count, masked to the operand width.
/// Unsigned `shr` is logical and unsigned types have no `ushr`.
pub(super) fn shift(name: &str, a: &Literal, b: &Literal) -> Option<Literal> {
    let Literal::Int(count) = *b else {
        return None;
    };
    let count = count as u32;
    match (name, a) {
        ("shl", Literal::Int(x)) => Some(Literal::Int(x.wrapping_shl(count))),
        ("shr", Literal::Int(x)) => Some(Literal::Int(x.wrapping_shr(count))),
        ("ushr", Literal::Int(x)) => Some(Literal::Int((*x as u32).wrapping_shr(count) as i32)),
        ("shl", Literal::Long(x)) => Some(Literal::Long(x.wrapping_shl(count))),
        ("shr", Literal::Long(x)) => Some(Literal::Long(x.wrapping_shr(count))),
        ("ushr", Literal::Long(x)) => {
            Some(Literal::Long((*x as u64).wrapping_shr(count) as i64))
        }
        ("shl", Literal::UInt(x)) => Some(Literal::UInt(x.wrapping_shl(count))),
        ("shr", Literal::UInt(x)) => Some(Literal::UInt(x.wrapping_shr(count))),
        ("shl", Literal::ULong(x)) => Some(Literal::ULong(x.wrapping_shl(count))),
        ("shr", Literal::ULong(x)) => Some(Literal::ULong(x.wrapping_shr(count))),
        _ => None,
    }
}

/// Source of a conversion, keeping the sign so unsigned values convert to
/// floating point by magnitude.
enum Scalar {
    Signed(i64),
    Unsigned(u64),
    Real(f64),
}

/// `toInt()` and friends. Integral narrowing truncates, floating point to
/// integral saturates (NaN becomes 0), and `Byte`, `Short` and `Char` go
/// through `Int` when the source is floating point.
pub(super) fn convert(a: &Literal, target: TypeKind<'_>) -> Option<Literal> {
    let scalar = match *a {
        Literal::Char(v) => Scalar::Signed(v.into()),
        Literal::Byte(v) => Scalar::Signed(v.into()),
        Literal::Short(v) => Scalar::Signed(v.into()),
        Literal::Int(v) => Scalar::Signed(v.into()),
        Literal::Long(v) => Scalar::Signed(v),
        Literal::UByte(v) => Scalar::Unsigned(v.into()),
        Literal::UShort(v) => Scalar::Unsigned(v.into()),
        Literal::UInt(v) => Scalar::Unsigned(v.into()),
        Literal::ULong(v) => Scalar::Unsigned(v),
        Literal::Float(v) => Scalar::Real(v.into()),
        Literal::Double(v) => Scalar::Real(v),
        Literal::Unit | Literal::Boolean(_) | Literal::String(_) => return None,
    };
    let result = match (target, scalar) {
        (TypeKind::Byte, Scalar::Signed(v)) => Literal::Byte(v as i8),
        (TypeKind::Byte, Scalar::Unsigned(v)) => Literal::Byte(v as i8),
        (TypeKind::Byte, Scalar::Real(v)) => Literal::Byte(v as i32 as i8),
        (TypeKind::Short, Scalar::Signed(v)) => Literal::Short(v as i16),
        (TypeKind::Short, Scalar::Unsigned(v)) => Literal::Short(v as i16),
        (TypeKind::Short, Scalar::Real(v)) => Literal::Short(v as i32 as i16),
        (TypeKind::Char, Scalar::Signed(v)) => Literal::Char(v as u16),
        (TypeKind::Char, Scalar::Unsigned(v)) => Literal::Char(v as u16),
        (TypeKind::Char, Scalar::Real(v)) => Literal::Char(v as i32 as u16),
        (TypeKind::Int, Scalar::Signed(v)) => Literal::Int(v as i32),
        (TypeKind::Int, Scalar::Unsigned(v)) => Literal::Int(v as i32),
        (TypeKind::Int, Scalar::Real(v)) => Literal::Int(v as i32),
        (TypeKind::Long, Scalar::Signed(v)) => Literal::Long(v),
        (TypeKind::Long, Scalar::Unsigned(v)) => Literal::Long(v as i64),
        (TypeKind::Long, Scalar::Real(v)) => Literal::Long(v as i64),
        (TypeKind::Float, Scalar::Signed(v)) => Literal::Float(v as f32),
        (TypeKind::Float, Scalar::Unsigned(v)) => Literal::Float(v as f32),
        (TypeKind::Float, Scalar::Real(v)) => Literal::Float(v as f32),
        (TypeKind::Double, Scalar::Signed(v)) => Literal::Double(v as f64),
        (TypeKind::Double, Scalar::Unsigned(v)) => Literal::Double(v as f64),
        (TypeKind::Double, Scalar::Real(v)) => Literal::Double(v),
        _ => return None,
    };
    Some(result)
}
