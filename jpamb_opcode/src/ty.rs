use crate::{Error, Result};
use std::fmt;

/// The reduced JVM type system the core reasons about.
///
/// Booleans are represented as 0/1 integers internally (see [`crate::Opcode`]
/// and the concrete/abstract value types in the sibling crates); `Type::Boolean`
/// only exists so that the source-side parameter descriptors and the JVM field
/// descriptor grammar round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Short,
    Char,
    Boolean,
    Reference,
    Array(Box<Type>),
    Object(String),
}

impl Type {
    /// Whether this type occupies an integer-valued local/stack slot that the
    /// interval domain can track (§3 Value (abstract)).
    #[must_use]
    pub fn is_tracked_int(&self) -> bool {
        matches!(self, Type::Int | Type::Boolean | Type::Char | Type::Short)
    }

    /// Whether this type is reference-shaped (object, array, or the bare
    /// `Reference` placeholder used for opaque parameter types).
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Reference | Type::Array(_) | Type::Object(_))
    }

    /// Parses a single JVM field descriptor character/sequence, e.g. `I`,
    /// `Z`, `[I`, `Ljava/lang/String;`. Used by [`crate::MethodId::parse`] for
    /// the parameter/return portion of a method identifier.
    pub(crate) fn parse_descriptor(input: &str) -> Result<(Type, &str)> {
        let mut chars = input.chars();
        match chars.next() {
            Some('I') => Ok((Type::Int, chars.as_str())),
            Some('S') => Ok((Type::Short, chars.as_str())),
            Some('C') => Ok((Type::Char, chars.as_str())),
            Some('Z') => Ok((Type::Boolean, chars.as_str())),
            Some('[') => {
                let (elem, rest) = Type::parse_descriptor(chars.as_str())?;
                Ok((Type::Array(Box::new(elem)), rest))
            }
            Some('L') => {
                let rest = chars.as_str();
                let end = rest
                    .find(';')
                    .ok_or_else(|| Error::InvalidTypeDescriptor(input.to_string()))?;
                let classname = rest[..end].to_string();
                Ok((Type::Object(classname), &rest[end + 1..]))
            }
            _ => Err(Error::InvalidTypeDescriptor(input.to_string())),
        }
    }

    /// Maps a textual source type (as produced by the syntactic extractor,
    /// §6 Source-side constants interface) to the abstract domain's notion of
    /// "tracked" vs "opaque". `int` and `boolean` map to `Type::Int`-shaped
    /// tracking; everything else maps to `Type::Reference`.
    #[must_use]
    pub fn from_source_name(name: &str) -> Type {
        match name {
            "int" => Type::Int,
            "boolean" => Type::Boolean,
            "char" => Type::Char,
            "short" => Type::Short,
            "int[]" => Type::Array(Box::new(Type::Int)),
            "char[]" => Type::Array(Box::new(Type::Char)),
            _ => Type::Reference,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Short => write!(f, "short"),
            Type::Char => write!(f, "char"),
            Type::Boolean => write!(f, "boolean"),
            Type::Reference => write!(f, "ref"),
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Object(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitive_descriptors() {
        assert_eq!(Type::parse_descriptor("I").unwrap().0, Type::Int);
        assert_eq!(Type::parse_descriptor("Z").unwrap().0, Type::Boolean);
    }

    #[test]
    fn parses_array_descriptor() {
        let (ty, rest) = Type::parse_descriptor("[II").unwrap();
        assert_eq!(ty, Type::Array(Box::new(Type::Int)));
        assert_eq!(rest, "I");
    }

    #[test]
    fn parses_object_descriptor() {
        let (ty, rest) = Type::parse_descriptor("Ljava/lang/String;V").unwrap();
        assert_eq!(ty, Type::Object("java/lang/String".to_string()));
        assert_eq!(rest, "V");
    }

    #[test]
    fn rejects_unknown_descriptor() {
        assert!(Type::parse_descriptor("Q").is_err());
    }

    #[test]
    fn is_tracked_int_classifies_correctly() {
        assert!(Type::Int.is_tracked_int());
        assert!(Type::Boolean.is_tracked_int());
        assert!(!Type::Reference.is_tracked_int());
        assert!(!Type::Array(Box::new(Type::Int)).is_tracked_int());
    }
}
