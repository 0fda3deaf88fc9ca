use crate::AbstractFrame;
use jpamb_opcode::ProgramCounter;

/// The full abstract machine state: a call stack of frames, keyed for the
/// worklist by its top frame's program counter (§3 State (abstract)).
///
/// The fixed point is context-insensitive: two states reached via different
/// call paths are merged as soon as they share a top-frame program counter,
/// regardless of what the rest of their call stacks look like (§4.2 Join at
/// merge points). This trades precision for termination on recursive
/// methods such as the fibonacci fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractState {
    frames: Vec<AbstractFrame>,
}

impl AbstractState {
    #[must_use]
    pub fn new(frame: AbstractFrame) -> Self {
        AbstractState { frames: vec![frame] }
    }

    #[must_use]
    pub fn top(&self) -> &AbstractFrame {
        self.frames.last().expect("abstract state always has at least one frame")
    }

    pub fn top_mut(&mut self) -> &mut AbstractFrame {
        self.frames.last_mut().expect("abstract state always has at least one frame")
    }

    pub fn push_frame(&mut self, frame: AbstractFrame) {
        self.frames.push(frame);
    }

    /// Pops the active frame, returning it. `None` if this was the last
    /// frame (the caller is responsible for recognizing a now-empty call
    /// stack as the final return).
    pub fn pop_frame(&mut self) -> AbstractFrame {
        self.frames.pop().expect("abstract state always has at least one frame")
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn pc(&self) -> &ProgramCounter {
        &self.top().pc
    }

    /// Joins two states reached at the same program point, aligning frames
    /// from the top (the frame that must match on `pc` by construction) and
    /// dropping whichever extra ancestor frames the deeper stack has below
    /// that alignment.
    ///
    /// The original interpretation this is grounded on instead zips frames
    /// from the bottom, which discards the *current* frame whenever
    /// recursion depth differs across call paths reaching the same pc; that
    /// is the one frame a join at a matching pc can never discard, so this
    /// implementation aligns from the top instead.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        self.merge(other, AbstractFrame::join)
    }

    #[must_use]
    pub fn widen(&self, other: &Self) -> Self {
        self.merge(other, AbstractFrame::widen)
    }

    fn merge(&self, other: &Self, op: impl Fn(&AbstractFrame, &AbstractFrame) -> AbstractFrame) -> Self {
        let depth = self.frames.len().min(other.frames.len());
        let a = &self.frames[self.frames.len() - depth..];
        let b = &other.frames[other.frames.len() - depth..];
        let frames = a.iter().zip(b).map(|(fa, fb)| op(fa, fb)).collect();
        AbstractState { frames }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_opcode::MethodId;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn frame_at(offset: usize) -> AbstractFrame {
        let method = Arc::new(MethodId::parse("pkg/C.f:(I)I").unwrap());
        AbstractFrame::new(HashMap::new(), ProgramCounter::new(method, offset))
    }

    #[test]
    fn join_aligns_from_the_top_and_drops_deeper_ancestors() {
        let shallow = AbstractState::new(frame_at(5));
        let mut deep = AbstractState::new(frame_at(0));
        deep.push_frame(frame_at(5));
        let joined = shallow.join(&deep);
        assert_eq!(joined.depth(), 1);
        assert_eq!(joined.pc().offset, 5);
    }
}
