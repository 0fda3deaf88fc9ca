use crate::{Error, Frame, HeapObject, Outcome, Result, State, StepResult, Value};
use jpamb_loader::{BytecodeCache, OpcodeSource};
use jpamb_opcode::{BinaryOp, Condition, Literal, Opcode, ProgramCounter, Type};
use std::collections::HashMap;
use std::sync::Arc;

/// Advances `state` by exactly one opcode (§4.1 Contract).
///
/// # Errors
/// Returns a fatal [`Error`] for any anomaly that is not a specified
/// terminal outcome: stack underflow, an unresolved local or heap entry, a
/// program counter outside its method's opcode range, or an opcode outside
/// the supported subset.
pub fn step<S: OpcodeSource>(state: &mut State, cache: &BytecodeCache<S>) -> Result<StepResult> {
    let pc = state.top()?.pc.clone();
    let opcodes = cache.opcodes(&pc.method)?;
    let opcode = opcodes
        .get(pc.offset)
        .cloned()
        .ok_or(Error::ProgramCounterOutOfRange(pc.offset))?;

    match opcode {
        Opcode::Push(literal) => {
            let value = match literal {
                Literal::Int(n) => Value::int(Type::Int, n),
                Literal::Boolean(b) => Value::boolean(b),
                Literal::Null => Value::null(Type::Reference),
            };
            state.top_mut()?.push(value);
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::Load { index, .. } => {
            let value = state.top()?.load(index)?;
            state.top_mut()?.push(value);
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::Store { index, .. } => {
            let value = state.top_mut()?.pop()?;
            state.top_mut()?.store(index, value);
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::Dup { .. } => {
            let top = state.top()?.peek()?.clone();
            state.top_mut()?.push(top);
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::Incr { index, amount } => {
            let n = state.top()?.load(index)?.as_int()?;
            state
                .top_mut()?
                .store(index, Value::int(Type::Int, n + amount));
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::Binary { op, .. } => step_binary(state, op),
        Opcode::Cast { from, to } => step_cast(state, &from, &to),
        Opcode::Ifz { cond, target } => {
            let n = state.top_mut()?.pop()?.as_int()?;
            if satisfies(cond, n, 0) {
                state.top_mut()?.pc = pc.at(target);
            } else {
                advance(state, 1)?;
            }
            Ok(StepResult::Continued)
        }
        Opcode::If { cond, target } => {
            let rhs = state.top_mut()?.pop()?.as_int()?;
            let lhs = state.top_mut()?.pop()?.as_int()?;
            if satisfies(cond, lhs, rhs) {
                state.top_mut()?.pc = pc.at(target);
            } else {
                advance(state, 1)?;
            }
            Ok(StepResult::Continued)
        }
        Opcode::Goto { target } => {
            state.top_mut()?.pc = pc.at(target);
            Ok(StepResult::Continued)
        }
        Opcode::Return { ty } => step_return(state, ty.is_some()),
        Opcode::New { class_name } if is_assertion_error(&class_name) => {
            Ok(StepResult::Terminal(Outcome::AssertionError))
        }
        Opcode::InvokeSpecial { callee }
            if is_assertion_error(&callee.class_name) && callee.method_name == "<init>" =>
        {
            Ok(StepResult::Terminal(Outcome::AssertionError))
        }
        Opcode::InvokeStatic { callee } => {
            let param_count = callee.params.len();
            let mut args = Vec::with_capacity(param_count);
            for _ in 0..param_count {
                args.push(state.top_mut()?.pop()?);
            }
            args.reverse();
            let mut locals = HashMap::with_capacity(param_count);
            for (index, value) in args.into_iter().enumerate() {
                locals.insert(index, value);
            }
            let callee_pc = ProgramCounter::new(Arc::new(callee), 0);
            state.push_frame(Frame::new(locals, callee_pc));
            Ok(StepResult::Continued)
        }
        Opcode::Get { field, .. } if field == "$assertionsDisabled" => {
            state.top_mut()?.push(Value::boolean(false));
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::NewArray { dim, elem_ty: _ } if dim <= 1 => {
            let len = state.top_mut()?.pop()?.as_int()?;
            let index = state
                .heap
                .allocate(HeapObject::IntArray(vec![0; usize::try_from(len).unwrap_or(0)]));
            state
                .top_mut()?
                .push(Value::reference(Type::Array(Box::new(Type::Int)), index));
            advance(state, 1)?;
            Ok(StepResult::Continued)
        }
        Opcode::ArrayLength => step_array_length(state),
        Opcode::ArrayLoad { .. } => step_array_load(state),
        Opcode::ArrayStore { .. } => step_array_store(state),
        other => Err(Error::UnsupportedOpcode(other)),
    }
}

fn advance(state: &mut State, delta: usize) -> Result<()> {
    let frame = state.top_mut()?;
    frame.pc = frame.pc.advance(delta);
    Ok(())
}

fn is_assertion_error(class_name: &str) -> bool {
    class_name == "java/lang/AssertionError"
}

fn satisfies(cond: Condition, lhs: i64, rhs: i64) -> bool {
    match cond {
        Condition::Eq => lhs == rhs,
        Condition::Ne => lhs != rhs,
        Condition::Lt => lhs < rhs,
        Condition::Le => lhs <= rhs,
        Condition::Gt => lhs > rhs,
        Condition::Ge => lhs >= rhs,
    }
}

/// Floor (truncated-toward-negative-infinity) division (§4.1).
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }
}

/// Floor remainder matching `v1 - floor(v1/v2)*v2` (§4.1).
fn floor_rem(a: i64, b: i64) -> i64 {
    a - floor_div(a, b) * b
}

fn step_binary(state: &mut State, op: BinaryOp) -> Result<StepResult> {
    let v2 = state.top_mut()?.pop()?.as_int()?;
    let v1 = state.top_mut()?.pop()?.as_int()?;
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && v2 == 0 {
        return Ok(StepResult::Terminal(Outcome::DivideByZero));
    }
    let result = match op {
        BinaryOp::Add => v1 + v2,
        BinaryOp::Sub => v1 - v2,
        BinaryOp::Mul => v1 * v2,
        BinaryOp::Div => floor_div(v1, v2),
        BinaryOp::Rem => floor_rem(v1, v2),
    };
    state.top_mut()?.push(Value::int(Type::Int, result));
    advance(state, 1)?;
    Ok(StepResult::Continued)
}

fn step_cast(state: &mut State, from: &Type, to: &Type) -> Result<StepResult> {
    if *from != Type::Int || *to != Type::Short {
        return Err(Error::UnsupportedOpcode(Opcode::Cast {
            from: from.clone(),
            to: to.clone(),
        }));
    }
    let n = state.top_mut()?.pop()?.as_int()?;
    #[allow(clippy::cast_possible_truncation)]
    let truncated = i64::from(n as i16);
    state.top_mut()?.push(Value::int(Type::Short, truncated));
    advance(state, 1)?;
    Ok(StepResult::Continued)
}

fn step_return(state: &mut State, has_value: bool) -> Result<StepResult> {
    let value = if has_value {
        Some(state.top_mut()?.pop()?)
    } else {
        None
    };
    state.pop_frame()?;
    if state.depth() == 0 {
        return Ok(StepResult::Terminal(Outcome::Ok));
    }
    if let Some(value) = value {
        state.top_mut()?.push(value);
    }
    advance(state, 1)?;
    Ok(StepResult::Continued)
}

fn step_array_length(state: &mut State) -> Result<StepResult> {
    let reference = state.top_mut()?.pop()?.as_reference()?;
    let Some(index) = reference else {
        return Ok(StepResult::Terminal(Outcome::NullPointer));
    };
    let HeapObject::IntArray(array) = state.heap.get(index)?;
    #[allow(clippy::cast_possible_wrap)]
    let len = array.len() as i64;
    state.top_mut()?.push(Value::int(Type::Int, len));
    advance(state, 1)?;
    Ok(StepResult::Continued)
}

fn step_array_load(state: &mut State) -> Result<StepResult> {
    let index = state.top_mut()?.pop()?.as_int()?;
    let reference = state.top_mut()?.pop()?.as_reference()?;
    let Some(heap_index) = reference else {
        return Ok(StepResult::Terminal(Outcome::NullPointer));
    };
    let HeapObject::IntArray(array) = state.heap.get(heap_index)?;
    let Ok(position) = usize::try_from(index) else {
        return Ok(StepResult::Terminal(Outcome::OutOfBounds));
    };
    let Some(&element) = array.get(position) else {
        return Ok(StepResult::Terminal(Outcome::OutOfBounds));
    };
    state.top_mut()?.push(Value::int(Type::Int, element));
    advance(state, 1)?;
    Ok(StepResult::Continued)
}

fn step_array_store(state: &mut State) -> Result<StepResult> {
    let value = state.top_mut()?.pop()?.as_int()?;
    let index = state.top_mut()?.pop()?.as_int()?;
    let reference = state.top_mut()?.pop()?.as_reference()?;
    let Some(heap_index) = reference else {
        return Ok(StepResult::Terminal(Outcome::NullPointer));
    };
    let Ok(position) = usize::try_from(index) else {
        return Ok(StepResult::Terminal(Outcome::OutOfBounds));
    };
    let HeapObject::IntArray(array) = state.heap.get_mut(heap_index)?;
    let Some(slot) = array.get_mut(position) else {
        return Ok(StepResult::Terminal(Outcome::OutOfBounds));
    };
    *slot = value;
    advance(state, 1)?;
    Ok(StepResult::Continued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Heap;
    use jpamb_opcode::MethodId;
    use std::sync::Arc;

    struct FixedSource {
        opcodes: Vec<Opcode>,
    }

    impl OpcodeSource for FixedSource {
        fn opcodes(&self, _method: &MethodId) -> jpamb_loader::Result<Vec<Opcode>> {
            Ok(self.opcodes.clone())
        }
    }

    fn harness(opcodes: Vec<Opcode>, locals: HashMap<usize, Value>) -> (State, BytecodeCache<FixedSource>) {
        let method = Arc::new(MethodId::parse("pkg/C.f:(I)I").unwrap());
        let pc = ProgramCounter::new(method, 0);
        let state = State::new(Heap::new(), Frame::new(locals, pc));
        let cache = BytecodeCache::new(FixedSource { opcodes });
        (state, cache)
    }

    #[test]
    fn division_by_zero_is_terminal() {
        let (mut state, cache) = harness(
            vec![Opcode::Binary {
                ty: Type::Int,
                op: BinaryOp::Div,
            }],
            HashMap::new(),
        );
        state.top_mut().unwrap().push(Value::int(Type::Int, 10));
        state.top_mut().unwrap().push(Value::int(Type::Int, 0));
        let result = step(&mut state, &cache).unwrap();
        assert_eq!(result, StepResult::Terminal(Outcome::DivideByZero));
    }

    #[test]
    fn division_floors_toward_negative_infinity() {
        let (mut state, cache) = harness(
            vec![Opcode::Binary {
                ty: Type::Int,
                op: BinaryOp::Div,
            }],
            HashMap::new(),
        );
        state.top_mut().unwrap().push(Value::int(Type::Int, -7));
        state.top_mut().unwrap().push(Value::int(Type::Int, 2));
        step(&mut state, &cache).unwrap();
        assert_eq!(state.top().unwrap().peek().unwrap().as_int().unwrap(), -4);
    }

    #[test]
    fn array_load_out_of_bounds() {
        let (mut state, cache) = harness(vec![Opcode::ArrayLoad { ty: Type::Int }], HashMap::new());
        let index = state.heap.allocate(HeapObject::IntArray(vec![1, 2, 3]));
        state
            .top_mut()
            .unwrap()
            .push(Value::reference(Type::Array(Box::new(Type::Int)), index));
        state.top_mut().unwrap().push(Value::int(Type::Int, 5));
        let result = step(&mut state, &cache).unwrap();
        assert_eq!(result, StepResult::Terminal(Outcome::OutOfBounds));
    }

    #[test]
    fn array_load_null_reference_is_null_pointer() {
        let (mut state, cache) = harness(vec![Opcode::ArrayLoad { ty: Type::Int }], HashMap::new());
        state
            .top_mut()
            .unwrap()
            .push(Value::null(Type::Array(Box::new(Type::Int))));
        state.top_mut().unwrap().push(Value::int(Type::Int, 0));
        let result = step(&mut state, &cache).unwrap();
        assert_eq!(result, StepResult::Terminal(Outcome::NullPointer));
    }

    #[test]
    fn return_with_no_caller_yields_ok() {
        let (mut state, cache) = harness(vec![Opcode::Return { ty: None }], HashMap::new());
        let result = step(&mut state, &cache).unwrap();
        assert_eq!(result, StepResult::Terminal(Outcome::Ok));
    }

    #[test]
    fn return_transfers_value_and_increments_caller_pc() {
        let method = Arc::new(MethodId::parse("pkg/C.f:(I)I").unwrap());
        let caller_pc = ProgramCounter::new(Arc::clone(&method), 3);
        let callee_pc = ProgramCounter::new(method, 0);
        let mut state = State::new(Heap::new(), Frame::new(HashMap::new(), caller_pc));
        state.push_frame(Frame::new(HashMap::new(), callee_pc));
        state.top_mut().unwrap().push(Value::int(Type::Int, 42));
        let cache = BytecodeCache::new(FixedSource {
            opcodes: vec![Opcode::Return {
                ty: Some(Type::Int),
            }],
        });
        let result = step(&mut state, &cache).unwrap();
        assert_eq!(result, StepResult::Continued);
        assert_eq!(state.depth(), 1);
        assert_eq!(state.top().unwrap().peek().unwrap().as_int().unwrap(), 42);
        assert_eq!(state.top().unwrap().pc.offset, 4);
    }

    #[test]
    fn new_assertion_error_is_terminal() {
        let (mut state, cache) = harness(
            vec![Opcode::New {
                class_name: "java/lang/AssertionError".to_string(),
            }],
            HashMap::new(),
        );
        let result = step(&mut state, &cache).unwrap();
        assert_eq!(result, StepResult::Terminal(Outcome::AssertionError));
    }

    #[test]
    fn unsupported_opcode_is_a_fatal_error() {
        let (mut state, cache) = harness(vec![Opcode::Throw], HashMap::new());
        assert!(step(&mut state, &cache).is_err());
    }
}
