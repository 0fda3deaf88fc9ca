use crate::{Error, Result, Type};
use std::fmt;

/// A parameter descriptor as produced by the external syntactic extractor
/// (§6 Source-side constants interface): a name paired with the parameter's
/// textual source type (`"int"`, `"boolean"`, `"int[]"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: String,
    pub source_type: String,
}

impl ParamDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        ParamDescriptor {
            name: name.into(),
            source_type: source_type.into(),
        }
    }

    /// The abstract-domain type this descriptor maps to (§6: `int` and
    /// `boolean` map to the tracked `Int` domain, everything else is opaque).
    #[must_use]
    pub fn abstract_type(&self) -> Type {
        Type::from_source_name(&self.source_type)
    }
}

/// A method identifier in the textual form
/// `package/path/Class.method:(param-types)return-type`.
///
/// Two method identifiers are equal iff every field is equal; identifiers are
/// used as hash keys by the bytecode cache and the CFG registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId {
    pub class_name: String,
    pub method_name: String,
    pub params: Vec<Type>,
    pub return_type: Option<Type>,
}

impl MethodId {
    /// Parses `package/path/Class.method:(param-types)return-type`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMethodId`] if the input does not match the
    /// grammar, and propagates [`Error::InvalidTypeDescriptor`] from a
    /// malformed parameter or return descriptor.
    pub fn parse(input: &str) -> Result<MethodId> {
        let (path, descriptor) = input
            .split_once(':')
            .ok_or_else(|| Error::InvalidMethodId(input.to_string()))?;
        let (class_name, method_name) = path
            .rsplit_once('.')
            .ok_or_else(|| Error::InvalidMethodId(input.to_string()))?;

        let descriptor = descriptor
            .strip_prefix('(')
            .ok_or_else(|| Error::InvalidMethodId(input.to_string()))?;
        let (params_str, return_str) = descriptor
            .split_once(')')
            .ok_or_else(|| Error::InvalidMethodId(input.to_string()))?;

        let mut params = Vec::new();
        let mut rest = params_str;
        while !rest.is_empty() {
            let (ty, remaining) = Type::parse_descriptor(rest)?;
            params.push(ty);
            rest = remaining;
        }

        let return_type = if return_str == "V" {
            None
        } else {
            let (ty, remaining) = Type::parse_descriptor(return_str)?;
            if !remaining.is_empty() {
                return Err(Error::InvalidMethodId(input.to_string()));
            }
            Some(ty)
        };

        Ok(MethodId {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            params,
            return_type,
        })
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:(", self.class_name, self.method_name)?;
        for param in &self.params {
            write!(f, "{param}")?;
        }
        write!(f, ")")?;
        match &self.return_type {
            Some(ty) => write!(f, "{ty}"),
            None => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_method_id() {
        let id = MethodId::parse("pkg/path/Class.method:(I)I").unwrap();
        assert_eq!(id.class_name, "pkg/path/Class");
        assert_eq!(id.method_name, "method");
        assert_eq!(id.params, vec![Type::Int]);
        assert_eq!(id.return_type, Some(Type::Int));
    }

    #[test]
    fn parses_void_return_and_multiple_params() {
        let id = MethodId::parse("pkg/Class.g:(IZ)V").unwrap();
        assert_eq!(id.params, vec![Type::Int, Type::Boolean]);
        assert_eq!(id.return_type, None);
    }

    #[test]
    fn parses_no_params() {
        let id = MethodId::parse("pkg/Class.h:()I").unwrap();
        assert!(id.params.is_empty());
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(MethodId::parse("pkg/Class.method(I)I").is_err());
    }

    #[test]
    fn rejects_missing_dot() {
        assert!(MethodId::parse("pkg/Classmethod:(I)I").is_err());
    }

    #[test]
    fn method_ids_hash_and_compare_by_value() {
        let a = MethodId::parse("pkg/Class.f:(I)I").unwrap();
        let b = MethodId::parse("pkg/Class.f:(I)I").unwrap();
        assert_eq!(a, b);
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
