use crate::Result;
use jpamb_concrete::{CancellationFlag, Frame, Heap, HeapObject, Outcome, State, Value};
use jpamb_loader::{BytecodeCache, OpcodeSource};
use jpamb_opcode::{MethodId, ProgramCounter, Type};
use std::collections::HashMap;
use std::sync::Arc;

/// One concrete argument supplied to [`run`], in method-parameter order
/// (§4.6: "the input tuple populates frame 0's locals in order, with
/// array/object values placed in the heap and references placed in locals").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Int(i64),
    Boolean(bool),
    IntArray(Vec<i64>),
    NullArray,
}

/// Builds the initial concrete state for `method` from `inputs` and runs it
/// to completion under `cache`, honoring `cancel` and `config`'s step cap
/// (§4.6 Concrete-run driver).
///
/// # Errors
/// Propagates a fatal [`jpamb_concrete::Error`] raised while stepping.
pub fn run<S: OpcodeSource>(
    method: &MethodId,
    inputs: &[Input],
    cache: &BytecodeCache<S>,
    cancel: &CancellationFlag,
    step_cap: u32,
) -> Result<Outcome> {
    let mut heap = Heap::new();
    let mut locals = HashMap::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let value = match input {
            Input::Int(n) => Value::int(Type::Int, *n),
            Input::Boolean(b) => Value::boolean(*b),
            Input::IntArray(items) => {
                let elem_ty = Type::Array(Box::new(Type::Int));
                let heap_index = heap.allocate(HeapObject::IntArray(items.clone()));
                Value::reference(elem_ty, heap_index)
            }
            Input::NullArray => Value::null(Type::Array(Box::new(Type::Int))),
        };
        locals.insert(index, value);
    }

    let pc = ProgramCounter::new(Arc::new(method.clone()), 0);
    let mut state = State::new(heap, Frame::new(locals, pc));
    Ok(jpamb_concrete::run(&mut state, cache, cancel, step_cap)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_test_util::div_by_param;

    #[test]
    fn divides_a_concrete_nonzero_argument() {
        let (suite, method) = div_by_param();
        let cache = BytecodeCache::new(suite);
        let cancel = CancellationFlag::new();
        let outcome = run(&method, &[Input::Int(5)], &cache, &cancel, 1_000).unwrap();
        assert_eq!(outcome, Outcome::Ok);
    }

    #[test]
    fn divides_by_a_concrete_zero_argument() {
        let (suite, method) = div_by_param();
        let cache = BytecodeCache::new(suite);
        let cancel = CancellationFlag::new();
        let outcome = run(&method, &[Input::Int(0)], &cache, &cancel, 1_000).unwrap();
        assert_eq!(outcome, Outcome::DivideByZero);
    }
}
