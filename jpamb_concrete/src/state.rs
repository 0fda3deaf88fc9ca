use crate::{Error, Frame, Heap, Result};

/// The full machine state driving one concrete run: a heap shared by every
/// frame and a non-empty call stack (§3 Concrete state).
#[derive(Debug, Clone)]
pub struct State {
    pub heap: Heap,
    frames: Vec<Frame>,
}

impl State {
    #[must_use]
    pub fn new(heap: Heap, initial_frame: Frame) -> Self {
        State {
            heap,
            frames: vec![initial_frame],
        }
    }

    /// # Errors
    /// Returns [`Error::NoActiveFrame`] if the call stack is empty.
    pub fn top(&self) -> Result<&Frame> {
        self.frames.last().ok_or(Error::NoActiveFrame)
    }

    /// # Errors
    /// Returns [`Error::NoActiveFrame`] if the call stack is empty.
    pub fn top_mut(&mut self) -> Result<&mut Frame> {
        self.frames.last_mut().ok_or(Error::NoActiveFrame)
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pops the active frame and returns it.
    ///
    /// # Errors
    /// Returns [`Error::NoActiveFrame`] if the call stack is empty.
    pub fn pop_frame(&mut self) -> Result<Frame> {
        self.frames.pop().ok_or(Error::NoActiveFrame)
    }

    #[must_use]
    pub fn has_caller(&self) -> bool {
        self.frames.len() > 1
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
