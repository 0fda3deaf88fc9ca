use crate::{Error, Result};
use std::collections::HashMap;

/// A heap-allocated object. Only int arrays are needed by the supported
/// opcode subset (§4.1 Arrays).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapObject {
    IntArray(Vec<i64>),
}

/// The mapping from non-negative heap index to heap object (§3 Concrete
/// state). Indices are assigned sequentially and never reused within a run.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    objects: HashMap<usize, HeapObject>,
    next_index: usize,
}

impl Heap {
    #[must_use]
    pub fn new() -> Self {
        Heap::default()
    }

    /// Allocates `object` and returns its fresh index.
    pub fn allocate(&mut self, object: HeapObject) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.objects.insert(index, object);
        index
    }

    /// # Errors
    /// Returns [`Error::UndefinedHeapEntry`] if `index` was never allocated.
    pub fn get(&self, index: usize) -> Result<&HeapObject> {
        self.objects
            .get(&index)
            .ok_or(Error::UndefinedHeapEntry(index))
    }

    /// # Errors
    /// Returns [`Error::UndefinedHeapEntry`] if `index` was never allocated.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut HeapObject> {
        self.objects
            .get_mut(&index)
            .ok_or(Error::UndefinedHeapEntry(index))
    }
}
