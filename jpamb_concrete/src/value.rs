use jpamb_opcode::Type;

/// A concrete value: a type tag paired with its payload (§3 Value
/// (concrete)). Booleans, chars, and shorts are all carried as `Int`
/// payloads internally; the type tag is what distinguishes them for
/// assertions and casts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub ty: Type,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Int(i64),
    /// A heap index, or `None` for `null`.
    Reference(Option<usize>),
}

impl Value {
    #[must_use]
    pub fn int(ty: Type, n: i64) -> Self {
        Value {
            ty,
            payload: Payload::Int(n),
        }
    }

    #[must_use]
    pub fn boolean(b: bool) -> Self {
        Value {
            ty: Type::Boolean,
            payload: Payload::Int(i64::from(b)),
        }
    }

    #[must_use]
    pub fn null(ty: Type) -> Self {
        Value {
            ty,
            payload: Payload::Reference(None),
        }
    }

    #[must_use]
    pub fn reference(ty: Type, index: usize) -> Self {
        Value {
            ty,
            payload: Payload::Reference(Some(index)),
        }
    }

    /// Extracts the `i64` payload, asserting that this value is not a
    /// reference (§7: a type mismatch here is an implementation bug, not a
    /// program-level outcome).
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if this value is a reference.
    pub fn as_int(&self) -> crate::Result<i64> {
        match self.payload {
            Payload::Int(n) => Ok(n),
            Payload::Reference(_) => Err(crate::Error::TypeMismatch {
                expected: "int".to_string(),
                actual: self.ty.to_string(),
            }),
        }
    }

    /// Extracts the reference payload, asserting that this value is a
    /// reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if this value is not a
    /// reference.
    pub fn as_reference(&self) -> crate::Result<Option<usize>> {
        match self.payload {
            Payload::Reference(idx) => Ok(idx),
            Payload::Int(_) => Err(crate::Error::TypeMismatch {
                expected: "reference".to_string(),
                actual: self.ty.to_string(),
            }),
        }
    }
}
