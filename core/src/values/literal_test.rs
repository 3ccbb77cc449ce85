//! Tests for `Literal` rendering.

use crate::{types::Type, values::Literal};

#[test]
fn test_display_matches_runtime_to_string() {
    assert_eq!(Literal::Int(-7).to_string(), "-7");
    assert_eq!(Literal::Boolean(true).to_string(), "true");
    assert_eq!(Literal::Double(2.0).to_string(), "2.0");
    assert_eq!(Literal::char('x').to_string(), "x");
    assert_eq!(Literal::string("fizbuz").to_string(), "fizbuz");
    assert_eq!(Literal::Unit.to_string(), "kotlin.Unit");
}

#[test]
fn test_source_rendering() {
    assert_eq!(Literal::Int(42).to_source(), "42");
    assert_eq!(Literal::Long(42).to_source(), "42L");
    assert_eq!(Literal::Float(1.5).to_source(), "1.5f");
    assert_eq!(Literal::UInt(3).to_source(), "3u");
    assert_eq!(Literal::char('a').to_source(), "'a'");
    assert_eq!(Literal::string("a\"b").to_source(), "\"a\\\"b\"");
}

#[test]
fn test_literal_types() {
    assert_eq!(Literal::Int(1).ty(), Type::INT);
    assert_eq!(Literal::string("").ty(), Type::STRING);
    assert_eq!(Literal::ULong(1).ty(), Type::ULONG);
    assert_eq!(Literal::Unit.ty(), Type::UNIT);
}

#[test]
fn test_lone_surrogate_is_replaced_when_printed() {
    let lit = Literal::Char(0xD800);
    assert_eq!(lit.to_string(), "\u{FFFD}");
}
