use crate::AbstractValue;
use jpamb_opcode::ProgramCounter;
use std::collections::HashMap;

/// A single abstract activation record: locals, operand stack, and the
/// program counter of the next instruction to execute (§3 Frame), mirroring
/// the concrete interpreter's [`jpamb_concrete::Frame`] with interval-valued
/// slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractFrame {
    locals: HashMap<usize, AbstractValue>,
    stack: Vec<AbstractValue>,
    pub pc: ProgramCounter,
}

impl AbstractFrame {
    #[must_use]
    pub fn new(locals: HashMap<usize, AbstractValue>, pc: ProgramCounter) -> Self {
        AbstractFrame {
            locals,
            stack: Vec::new(),
            pc,
        }
    }

    pub fn push(&mut self, value: AbstractValue) {
        self.stack.push(value);
    }

    /// Pops the top of the operand stack, or `None` if this pass hasn't yet
    /// established one: unlike the concrete interpreter, an empty stack here
    /// is not a bug, just a state the fixed point hasn't caught up to yet.
    pub fn try_pop(&mut self) -> Option<AbstractValue> {
        self.stack.pop()
    }

    #[must_use]
    pub fn try_peek(&self) -> Option<&AbstractValue> {
        self.stack.last()
    }

    #[must_use]
    pub fn try_load(&self, index: usize) -> Option<AbstractValue> {
        self.locals.get(&index).cloned()
    }

    pub fn store(&mut self, index: usize, value: AbstractValue) {
        self.locals.insert(index, value);
    }

    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Pointwise join: locals are unioned by index, a key present on only
    /// one side is kept verbatim rather than widened to top, and the
    /// operand stacks are joined index by index, truncated to the shorter
    /// of the two (§4.2 Join at merge points).
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        self.merge(other, AbstractValue::join)
    }

    #[must_use]
    pub fn widen(&self, other: &Self) -> Self {
        self.merge(other, AbstractValue::widen)
    }

    fn merge(&self, other: &Self, op: impl Fn(&AbstractValue, &AbstractValue) -> AbstractValue) -> Self {
        let mut locals = self.locals.clone();
        for (index, value) in &other.locals {
            locals
                .entry(*index)
                .and_modify(|existing| *existing = op(existing, value))
                .or_insert_with(|| value.clone());
        }
        let depth = self.stack.len().min(other.stack.len());
        let stack = self.stack[..depth]
            .iter()
            .zip(&other.stack[..depth])
            .map(|(a, b)| op(a, b))
            .collect();
        AbstractFrame {
            locals,
            stack,
            pc: self.pc.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_opcode::MethodId;
    use std::sync::Arc;

    fn pc() -> ProgramCounter {
        ProgramCounter::new(Arc::new(MethodId::parse("pkg/C.f:(I)I").unwrap()), 0)
    }

    #[test]
    fn join_keeps_one_sided_local_verbatim() {
        let mut a = AbstractFrame::new(HashMap::new(), pc());
        a.store(0, AbstractValue::point(1, Arc::new(std::collections::BTreeSet::new())));
        let b = AbstractFrame::new(HashMap::new(), pc());
        let joined = a.join(&b);
        assert!(joined.try_load(0).is_some());
    }

    #[test]
    fn join_truncates_stack_to_shorter_depth() {
        let k = Arc::new(std::collections::BTreeSet::new());
        let mut a = AbstractFrame::new(HashMap::new(), pc());
        a.push(AbstractValue::point(1, Arc::clone(&k)));
        a.push(AbstractValue::point(2, Arc::clone(&k)));
        let mut b = AbstractFrame::new(HashMap::new(), pc());
        b.push(AbstractValue::point(3, k));
        let joined = a.join(&b);
        assert_eq!(joined.stack_depth(), 1);
    }
}
