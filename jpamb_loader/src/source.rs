use crate::Result;
use jpamb_opcode::{MethodId, Opcode, ParamDescriptor};
use std::collections::BTreeSet;

/// The bytecode loader interface the core consumes (§6 Opcode input).
///
/// An implementation maps a method identifier to its ordered opcode
/// sequence, decoding offsets as 0-based positions into the returned slice.
/// The real loader (reading compiled `.class` files) lives outside this
/// repository's scope; `jpamb_test_util` provides an in-memory
/// implementation used by every other crate's test suite.
pub trait OpcodeSource {
    /// Returns the ordered opcode sequence for `method`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MethodNotFound`] if the method cannot be
    /// resolved.
    fn opcodes(&self, method: &MethodId) -> Result<Vec<Opcode>>;
}

/// The source-side constants interface (§6): an external syntactic
/// extractor produces, per method, the set K of integer literals appearing
/// in the method body and an ordered list of parameter descriptors.
pub trait ConstantsQuery {
    /// Returns `(K, parameter descriptors)` for `method`. K may be empty.
    ///
    /// # Errors
    /// Returns [`crate::Error::ConstantExtractionFailed`] if the method's
    /// source cannot be parsed.
    fn constants(&self, method: &MethodId) -> Result<(BTreeSet<i64>, Vec<ParamDescriptor>)>;
}
