//! Declared types of parameters, locals and call results.
//!
//! The engine never infers types: every type it sees was written down by the
//! front end. Builtin operations are resolved by the fully-qualified names
//! produced here, so `fq_name` must stay stable (`kotlin.Int`, `kotlin.Any?`, ...).

use alloc::borrow::Cow;
use core::fmt;

/// The shape of a type, without nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind<'a> {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    UByte,
    UShort,
    UInt,
    ULong,
    String,
    Unit,
    Any,
    /// Any other class, by fully-qualified name.
    Named(&'a str),
}

/// A declared type: a kind plus a nullability marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type<'a> {
    pub kind: TypeKind<'a>,
    pub nullable: bool,
}

impl<'a> Type<'a> {
    pub const BOOLEAN: Type<'static> = Type::of(TypeKind::Boolean);
    pub const CHAR: Type<'static> = Type::of(TypeKind::Char);
    pub const BYTE: Type<'static> = Type::of(TypeKind::Byte);
    pub const SHORT: Type<'static> = Type::of(TypeKind::Short);
    pub const INT: Type<'static> = Type::of(TypeKind::Int);
    pub const LONG: Type<'static> = Type::of(TypeKind::Long);
    pub const FLOAT: Type<'static> = Type::of(TypeKind::Float);
    pub const DOUBLE: Type<'static> = Type::of(TypeKind::Double);
    pub const UBYTE: Type<'static> = Type::of(TypeKind::UByte);
    pub const USHORT: Type<'static> = Type::of(TypeKind::UShort);
    pub const UINT: Type<'static> = Type::of(TypeKind::UInt);
    pub const ULONG: Type<'static> = Type::of(TypeKind::ULong);
    pub const STRING: Type<'static> = Type::of(TypeKind::String);
    pub const UNIT: Type<'static> = Type::of(TypeKind::Unit);
    pub const ANY: Type<'static> = Type::of(TypeKind::Any);
    pub const NULLABLE_ANY: Type<'static> = Type {
        kind: TypeKind::Any,
        nullable: true,
    };

    /// A non-nullable type of the given kind.
    pub const fn of(kind: TypeKind<'a>) -> Self {
        Type {
            kind,
            nullable: false,
        }
    }

    /// A non-nullable class type.
    pub const fn named(fq_name: &'a str) -> Self {
        Type::of(TypeKind::Named(fq_name))
    }

    /// The same type with the nullability marker set.
    pub const fn nullable(self) -> Self {
        Type {
            kind: self.kind,
            nullable: true,
        }
    }

    /// Signed integral, floating point or char: the types with primitive operators.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Boolean
                | TypeKind::Char
                | TypeKind::Byte
                | TypeKind::Short
                | TypeKind::Int
                | TypeKind::Long
                | TypeKind::Float
                | TypeKind::Double
        ) || self.is_unsigned()
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::UByte | TypeKind::UShort | TypeKind::UInt | TypeKind::ULong
        )
    }

    pub fn is_string(&self) -> bool {
        self.kind == TypeKind::String
    }

    /// Whether values of this type can be held in a variable during evaluation
    /// and substituted back into the tree as a literal.
    pub fn is_constant(&self) -> bool {
        !self.nullable && (self.is_primitive() || self.is_string())
    }

    /// Fully-qualified name including the nullability marker.
    pub fn fq_name(&self) -> Cow<'a, str> {
        let base = match self.kind {
            TypeKind::Boolean => "kotlin.Boolean",
            TypeKind::Char => "kotlin.Char",
            TypeKind::Byte => "kotlin.Byte",
            TypeKind::Short => "kotlin.Short",
            TypeKind::Int => "kotlin.Int",
            TypeKind::Long => "kotlin.Long",
            TypeKind::Float => "kotlin.Float",
            TypeKind::Double => "kotlin.Double",
            TypeKind::UByte => "kotlin.UByte",
            TypeKind::UShort => "kotlin.UShort",
            TypeKind::UInt => "kotlin.UInt",
            TypeKind::ULong => "kotlin.ULong",
            TypeKind::String => "kotlin.String",
            TypeKind::Unit => "kotlin.Unit",
            TypeKind::Any => "kotlin.Any",
            TypeKind::Named(name) => {
                return if self.nullable {
                    Cow::Owned(alloc::format!("{}?", name))
                } else {
                    Cow::Borrowed(name)
                };
            }
        };
        if self.nullable {
            Cow::Owned(alloc::format!("{}?", base))
        } else {
            Cow::Borrowed(base)
        }
    }

    /// Parse a name produced by [`Type::fq_name`] for one of the builtin kinds.
    ///
    /// Returns `None` for class names that are not builtin kinds.
    pub fn from_fq_name(name: &str) -> Option<Type<'static>> {
        let (base, nullable) = match name.strip_suffix('?') {
            Some(base) => (base, true),
            None => (name, false),
        };
        let kind = match base {
            "kotlin.Boolean" => TypeKind::Boolean,
            "kotlin.Char" => TypeKind::Char,
            "kotlin.Byte" => TypeKind::Byte,
            "kotlin.Short" => TypeKind::Short,
            "kotlin.Int" => TypeKind::Int,
            "kotlin.Long" => TypeKind::Long,
            "kotlin.Float" => TypeKind::Float,
            "kotlin.Double" => TypeKind::Double,
            "kotlin.UByte" => TypeKind::UByte,
            "kotlin.UShort" => TypeKind::UShort,
            "kotlin.UInt" => TypeKind::UInt,
            "kotlin.ULong" => TypeKind::ULong,
            "kotlin.String" => TypeKind::String,
            "kotlin.Unit" => TypeKind::Unit,
            "kotlin.Any" => TypeKind::Any,
            _ => return None,
        };
        Some(Type { kind, nullable })
    }
}

impl fmt::Display for Type<'_> {
    /// Short, source-like form (`Int`, `String?`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fq = self.fq_name();
        let short = fq.strip_prefix("kotlin.").unwrap_or(&fq);
        f.write_str(short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_name_round_trips_through_parser() {
        for ty in [Type::INT, Type::STRING, Type::NULLABLE_ANY, Type::ULONG.nullable()] {
            assert_eq!(Type::from_fq_name(&ty.fq_name()), Some(ty));
        }
    }

    #[test]
    fn test_named_types_are_not_builtin() {
        let ty = Type::named("com.example.Point");
        assert_eq!(ty.fq_name(), "com.example.Point");
        assert_eq!(Type::from_fq_name("com.example.Point"), None);
        assert!(!ty.is_constant());
    }

    #[test]
    fn test_constant_types() {
        assert!(Type::INT.is_constant());
        assert!(Type::STRING.is_constant());
        assert!(Type::UINT.is_constant());
        assert!(!Type::INT.nullable().is_constant());
        assert!(!Type::UNIT.is_constant());
        assert!(!Type::ANY.is_constant());
    }

    #[test]
    fn test_display_strips_package() {
        assert_eq!(Type::INT.to_string(), "Int");
        assert_eq!(Type::NULLABLE_ANY.to_string(), "Any?");
    }
}
