//! String operations over UTF-16 code units.

use crate::evaluator::RuntimeError;
use crate::values::Literal;
use alloc::string::String;
use alloc::vec::Vec;

pub(super) fn length(s: &str) -> i32 {
    s.encode_utf16().count() as i32
}

/// The code unit at `index`.
pub(super) fn get(s: &str, index: i32) -> Result<Literal, RuntimeError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| s.encode_utf16().nth(i))
        .map(Literal::Char)
        .ok_or_else(|| RuntimeError::IndexOutOfBounds {
            index,
            length: length(s),
        })
}

/// Difference of the first mismatching code units, or of the lengths when one
/// string is a prefix of the other.
pub(super) fn compare(a: &str, b: &str) -> i32 {
    match a
        .encode_utf16()
        .zip(b.encode_utf16())
        .find(|(x, y)| x != y)
    {
        Some((x, y)) => i32::from(x) - i32::from(y),
        None => length(a) - length(b),
    }
}

/// Code units `[start, end)` as a new string.
pub(super) fn sub_sequence(s: &str, start: i32, end: i32) -> Result<Literal, RuntimeError> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let length = units.len() as i32;
    let bad = if start < 0 || start > length {
        Some(start)
    } else if end < start || end > length {
        Some(end)
    } else {
        None
    };
    if let Some(index) = bad {
        return Err(RuntimeError::IndexOutOfBounds { index, length });
    }
    Ok(Literal::string(String::from_utf16_lossy(
        &units[start as usize..end as usize],
    )))
}

/// `String.plus(Any?)`: appends the other operand's string form.
pub(super) fn concat(s: &str, other: &Literal) -> Literal {
    let mut out = String::from(s);
    match other {
        Literal::String(t) => out.push_str(t),
        other => out.push_str(&alloc::format!("{}", other)),
    }
    Literal::string(out)
}
