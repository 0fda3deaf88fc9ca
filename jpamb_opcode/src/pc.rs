use crate::MethodId;
use std::fmt;
use std::sync::Arc;

/// A program counter: a method identifier paired with an offset into that
/// method's opcode sequence (§3 Program counter).
///
/// The method identifier is kept behind an `Arc` so that a `ProgramCounter`
/// is cheap to clone and to use as a hash key in the abstract interpreter's
/// per-PC state map and the CFG's offset index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramCounter {
    pub method: Arc<MethodId>,
    pub offset: usize,
}

impl ProgramCounter {
    #[must_use]
    pub fn new(method: Arc<MethodId>, offset: usize) -> Self {
        ProgramCounter { method, offset }
    }

    /// Returns the program counter `delta` offsets further along the same
    /// method. Used after every non-branching, non-returning instruction.
    #[must_use]
    pub fn advance(&self, delta: usize) -> Self {
        ProgramCounter {
            method: Arc::clone(&self.method),
            offset: self.offset + delta,
        }
    }

    /// Returns the program counter at `offset` within the same method.
    /// Used by unconditional and conditional jumps.
    #[must_use]
    pub fn at(&self, offset: usize) -> Self {
        ProgramCounter {
            method: Arc::clone(&self.method),
            offset,
        }
    }
}

impl fmt::Display for ProgramCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MethodId;

    fn method() -> Arc<MethodId> {
        Arc::new(MethodId::parse("pkg/Class.f:(I)I").unwrap())
    }

    #[test]
    fn equality_is_pointwise() {
        let m = method();
        let a = ProgramCounter::new(Arc::clone(&m), 3);
        let b = ProgramCounter::new(Arc::clone(&m), 3);
        assert_eq!(a, b);
        let c = ProgramCounter::new(m, 4);
        assert_ne!(a, c);
    }

    #[test]
    fn advance_and_at() {
        let pc = ProgramCounter::new(method(), 5);
        assert_eq!(pc.advance(1).offset, 6);
        assert_eq!(pc.at(10).offset, 10);
    }
}
