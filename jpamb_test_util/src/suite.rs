use jpamb_loader::{ConstantsQuery, Error, OpcodeSource, Result};
use jpamb_opcode::{MethodId, Opcode, ParamDescriptor};
use std::collections::{BTreeSet, HashMap};

/// An in-memory stand-in for the external bytecode loader and syntactic
/// extractor, built up method by method.
#[derive(Debug, Default, Clone)]
pub struct FixtureSuite {
    opcodes: HashMap<MethodId, Vec<Opcode>>,
    constants: HashMap<MethodId, (BTreeSet<i64>, Vec<ParamDescriptor>)>,
}

impl FixtureSuite {
    #[must_use]
    pub fn new() -> Self {
        FixtureSuite::default()
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodId, opcodes: Vec<Opcode>) -> Self {
        self.opcodes.insert(method, opcodes);
        self
    }

    #[must_use]
    pub fn with_constants(
        mut self,
        method: MethodId,
        k: BTreeSet<i64>,
        params: Vec<ParamDescriptor>,
    ) -> Self {
        self.constants.insert(method, (k, params));
        self
    }
}

impl OpcodeSource for FixtureSuite {
    fn opcodes(&self, method: &MethodId) -> Result<Vec<Opcode>> {
        self.opcodes
            .get(method)
            .cloned()
            .ok_or_else(|| Error::MethodNotFound(method.to_string()))
    }
}

impl ConstantsQuery for FixtureSuite {
    fn constants(&self, method: &MethodId) -> Result<(BTreeSet<i64>, Vec<ParamDescriptor>)> {
        self.constants.get(method).cloned().ok_or_else(|| {
            Error::ConstantExtractionFailed(method.to_string(), "no fixture registered".to_string())
        })
    }
}
