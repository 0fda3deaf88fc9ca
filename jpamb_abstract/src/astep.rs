use crate::{AbstractFrame, AbstractState, AbstractValue, Error, Result};
use jpamb_concrete::Outcome;
use jpamb_interval::{Bound, Interval};
use jpamb_loader::{BytecodeCache, OpcodeSource};
use jpamb_opcode::{BinaryOp, Condition, Literal, Opcode, Type};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The result of stepping one abstract state by one opcode: either a
/// successor state, or a terminal outcome it can reach (§4.2).
///
/// A single call to [`astep`] can yield more than one [`Step`] — a
/// conditional branch may have both arms feasible, and a division whose
/// divisor interval straddles zero can reach both "divide by zero" and a
/// normal successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Next(AbstractState),
    Terminal(Outcome),
}

/// Advances `state` by one opcode, yielding every feasible successor and
/// reachable terminal (§4.2 Abstract value semantics).
///
/// Array and heap opcodes are recognized but not modeled: the domain has no
/// representation for array contents, so they yield no successor at all,
/// which is how a branch's analysis goes incomplete rather than wrong
/// (§4.2 Non-goals).
///
/// # Errors
/// Propagates a loader failure, an interval arithmetic error, or an opcode
/// outside the supported subset.
pub fn astep<S: OpcodeSource>(
    state: &AbstractState,
    cache: &BytecodeCache<S>,
    k: &Arc<BTreeSet<i64>>,
) -> Result<Vec<Step>> {
    let pc = state.top().pc.clone();
    let opcodes = cache.opcodes(&pc.method)?;
    let Some(opcode) = opcodes.get(pc.offset).cloned() else {
        return Ok(Vec::new());
    };

    match opcode {
        Opcode::Push(literal) => {
            let value = match literal {
                Literal::Int(n) => AbstractValue::point(n, Arc::clone(k)),
                Literal::Boolean(b) => AbstractValue::point(i64::from(b), Arc::clone(k)),
                Literal::Null => AbstractValue::Untracked,
            };
            Ok(advance_with(state, |frame| frame.push(value)))
        }
        Opcode::Load { index, .. } => {
            let Some(value) = state.top().try_load(index) else {
                return Ok(Vec::new());
            };
            Ok(advance_with(state, |frame| frame.push(value)))
        }
        Opcode::Store { index, .. } => {
            let mut next = state.clone();
            let Some(value) = next.top_mut().try_pop() else {
                return Ok(Vec::new());
            };
            next.top_mut().store(index, value);
            Ok(advance(next))
        }
        Opcode::Dup { .. } => {
            let Some(top) = state.top().try_peek().cloned() else {
                return Ok(Vec::new());
            };
            Ok(advance_with(state, |frame| frame.push(top)))
        }
        Opcode::Incr { index, amount } => {
            let Some(value) = state.top().try_load(index) else {
                return Ok(Vec::new());
            };
            let incremented = match value {
                AbstractValue::Int(interval) => {
                    AbstractValue::Int(add(&interval, &Interval::point(amount, Arc::clone(k)))?)
                }
                AbstractValue::Untracked => AbstractValue::Untracked,
            };
            let mut next = state.clone();
            next.top_mut().store(index, incremented);
            Ok(advance(next))
        }
        Opcode::Binary { op, .. } => step_binary(state, op, k),
        Opcode::Cast { from, to } => step_cast(state, &from, &to),
        Opcode::Ifz { cond, target } => {
            let mut next = state.clone();
            let Some(value) = next.top_mut().try_pop() else {
                return Ok(Vec::new());
            };
            let zero = AbstractValue::point(0, Arc::clone(k));
            Ok(step_branch(next, cond, &value, &zero, target))
        }
        Opcode::If { cond, target } => {
            let mut next = state.clone();
            let Some(rhs) = next.top_mut().try_pop() else {
                return Ok(Vec::new());
            };
            let Some(lhs) = next.top_mut().try_pop() else {
                return Ok(Vec::new());
            };
            Ok(step_branch(next, cond, &lhs, &rhs, target))
        }
        Opcode::Goto { target } => {
            let mut next = state.clone();
            let pc = next.top().pc.clone();
            next.top_mut().pc = pc.at(target);
            Ok(vec![Step::Next(next)])
        }
        Opcode::Return { ty } => Ok(step_return(state, ty.is_some())),
        Opcode::New { class_name } if is_assertion_error(&class_name) => {
            Ok(vec![Step::Terminal(Outcome::AssertionError)])
        }
        Opcode::New { .. } => Ok(Vec::new()),
        Opcode::InvokeSpecial { callee }
            if is_assertion_error(&callee.class_name) && callee.method_name == "<init>" =>
        {
            Ok(vec![Step::Terminal(Outcome::AssertionError)])
        }
        Opcode::InvokeSpecial { callee } => Err(Error::UnsupportedInvokeSpecial(callee)),
        Opcode::InvokeStatic { callee } => {
            let param_count = callee.params.len();
            let mut next = state.clone();
            let mut args = Vec::with_capacity(param_count);
            for _ in 0..param_count {
                let Some(arg) = next.top_mut().try_pop() else {
                    return Ok(Vec::new());
                };
                args.push(arg);
            }
            args.reverse();
            let mut locals = std::collections::HashMap::with_capacity(param_count);
            for (index, value) in args.into_iter().enumerate() {
                locals.insert(index, value);
            }
            let callee_pc = jpamb_opcode::ProgramCounter::new(Arc::new(callee), 0);
            next.push_frame(AbstractFrame::new(locals, callee_pc));
            Ok(vec![Step::Next(next)])
        }
        Opcode::Get { field, .. } if field == "$assertionsDisabled" => {
            let disabled = AbstractValue::point(0, Arc::clone(k));
            Ok(advance_with(state, |frame| frame.push(disabled)))
        }
        Opcode::NewArray { .. } | Opcode::ArrayLoad { .. } | Opcode::ArrayStore { .. } | Opcode::ArrayLength => {
            Ok(Vec::new())
        }
        other => Err(Error::UnsupportedOpcode(other)),
    }
}

fn is_assertion_error(class_name: &str) -> bool {
    class_name == "java/lang/AssertionError"
}

/// Steps every frame-local opcode that just pushes/advances by cloning
/// `state`, mutating its top frame, and advancing the pc by one.
fn advance_with(state: &AbstractState, mutate: impl FnOnce(&mut AbstractFrame)) -> Vec<Step> {
    let mut next = state.clone();
    mutate(next.top_mut());
    advance(next)
}

fn advance(mut state: AbstractState) -> Vec<Step> {
    let pc = state.top().pc.advance(1);
    state.top_mut().pc = pc;
    vec![Step::Next(state)]
}

/// Yields the feasible arms of a two-way branch, using interval feasibility
/// when both operands are tracked ints and exploring both arms conservatively
/// otherwise (§4.2 Ifz/If feasibility table).
fn step_branch(base: AbstractState, cond: Condition, lhs: &AbstractValue, rhs: &AbstractValue, target: usize) -> Vec<Step> {
    let (can_be_true, can_be_false) = match (lhs.interval(), rhs.interval()) {
        (Some(i1), Some(i2)) => feasibility(cond, i1, i2),
        _ => (true, true),
    };

    let mut steps = Vec::with_capacity(2);
    if can_be_true {
        let mut taken = base.clone();
        let pc = taken.top().pc.clone();
        taken.top_mut().pc = pc.at(target);
        steps.push(Step::Next(taken));
    }
    if can_be_false {
        let mut fallthrough = base;
        let pc = fallthrough.top().pc.advance(1);
        fallthrough.top_mut().pc = pc;
        steps.push(Step::Next(fallthrough));
    }
    steps
}

/// `(can_be_true, can_be_false)` for `lhs cond rhs`, generalized from the
/// concrete comparison so it also covers `Ifz` by passing `rhs = [0, 0]`
/// (§4.2 Ifz/If feasibility table).
fn feasibility(cond: Condition, i1: &Interval, i2: &Interval) -> (bool, bool) {
    let singleton_equal = i1.lo() == i1.hi() && i1.lo() == i2.lo() && i2.lo() == i2.hi();
    match cond {
        Condition::Eq => (!i1.meet(i2).is_empty(), !singleton_equal),
        Condition::Ne => (!singleton_equal, !i1.meet(i2).is_empty()),
        Condition::Lt => (i1.lo() < i2.hi(), i1.hi() >= i2.lo()),
        Condition::Ge => (i1.hi() >= i2.lo(), i1.lo() < i2.hi()),
        Condition::Gt => (i1.hi() > i2.lo(), i1.lo() <= i2.hi()),
        Condition::Le => (i1.lo() <= i2.hi(), i1.hi() > i2.lo()),
    }
}

fn step_cast(state: &AbstractState, from: &Type, to: &Type) -> Result<Vec<Step>> {
    if *from != Type::Int || *to != Type::Short {
        return Err(Error::UnsupportedOpcode(Opcode::Cast {
            from: from.clone(),
            to: to.clone(),
        }));
    }
    // i2s narrows the range but we don't model 16-bit wraparound precisely;
    // the value keeps flowing through unchanged, same as the original widened
    // abstraction for non-arithmetic casts.
    if state.top().try_peek().is_none() {
        return Ok(Vec::new());
    }
    Ok(advance_with(state, |_| {}))
}

fn step_return(state: &AbstractState, has_value: bool) -> Vec<Step> {
    let mut next = state.clone();
    let value = if has_value {
        match next.top_mut().try_pop() {
            Some(value) => Some(value),
            None => return Vec::new(),
        }
    } else {
        None
    };
    next.pop_frame();
    if next.depth() == 0 {
        return vec![Step::Terminal(Outcome::Ok)];
    }
    if let Some(value) = value {
        next.top_mut().push(value);
    }
    let pc = next.top().pc.advance(1);
    next.top_mut().pc = pc;
    vec![Step::Next(next)]
}

fn step_binary(state: &AbstractState, op: BinaryOp, k: &Arc<BTreeSet<i64>>) -> Result<Vec<Step>> {
    let mut next = state.clone();
    let Some(rhs) = next.top_mut().try_pop() else {
        return Ok(Vec::new());
    };
    let Some(lhs) = next.top_mut().try_pop() else {
        return Ok(Vec::new());
    };
    let (AbstractValue::Int(v1), AbstractValue::Int(v2)) = (&lhs, &rhs) else {
        return Ok(advance_with(state, |_| {}));
    };

    if matches!(op, BinaryOp::Div | BinaryOp::Rem) {
        let mut steps = Vec::new();
        if v2.contains(0) {
            steps.push(Step::Terminal(Outcome::DivideByZero));
        }
        let nonzero = !(v2.lo() == v2.hi() && v2.lo() == Bound::Finite(0));
        if nonzero {
            let result = if op == BinaryOp::Div { div(v1, v2, k)? } else { rem(v2, k)? };
            let mut with_result = next;
            with_result.top_mut().push(AbstractValue::Int(result));
            steps.extend(advance(with_result));
        }
        return Ok(steps);
    }

    let result = match op {
        BinaryOp::Add => add(v1, v2)?,
        BinaryOp::Sub => sub(v1, v2)?,
        BinaryOp::Mul => mul(v1, v2)?,
        BinaryOp::Div | BinaryOp::Rem => unreachable!("handled above"),
    };
    next.top_mut().push(AbstractValue::Int(result));
    Ok(advance(next))
}

fn add(a: &Interval, b: &Interval) -> Result<Interval> {
    Ok(Interval::new(a.lo().checked_add(b.lo())?, a.hi().checked_add(b.hi())?, Arc::clone(a.k())))
}

fn sub(a: &Interval, b: &Interval) -> Result<Interval> {
    Ok(Interval::new(a.lo().checked_sub(b.hi())?, a.hi().checked_sub(b.lo())?, Arc::clone(a.k())))
}

fn mul(a: &Interval, b: &Interval) -> Result<Interval> {
    let corners = [
        a.lo().checked_mul(b.lo())?,
        a.lo().checked_mul(b.hi())?,
        a.hi().checked_mul(b.lo())?,
        a.hi().checked_mul(b.hi())?,
    ];
    let lo = corners.into_iter().min().expect("four corners");
    let hi = corners.into_iter().max().expect("four corners");
    Ok(Interval::new(lo, hi, Arc::clone(a.k())))
}

/// Floor division, computed exactly when the divisor is a single known
/// value and falling back to top otherwise: the precise image of a range
/// divisor under floor division isn't monotonic in general, and the
/// original analysis this is grounded on only ever computes the exact case
/// (§4.2).
fn div(a: &Interval, b: &Interval, k: &Arc<BTreeSet<i64>>) -> Result<Interval> {
    if b.lo() == b.hi() {
        if let Bound::Finite(divisor) = b.lo() {
            let lo = a.lo().checked_div(Bound::Finite(divisor))?;
            let hi = a.hi().checked_div(Bound::Finite(divisor))?;
            return Ok(Interval::new(lo.min(hi), lo.max(hi), Arc::clone(a.k())));
        }
    }
    Ok(Interval::top(Arc::clone(k)))
}

/// Conservative remainder: bounded in magnitude by the divisor, centered on
/// zero (§4.2). Matches the original analysis, which never narrows this
/// further even for a singleton divisor.
fn rem(b: &Interval, k: &Arc<BTreeSet<i64>>) -> Result<Interval> {
    let abs = |bound: Bound| bound.max(bound.negate());
    let max_abs_divisor = abs(b.lo()).max(abs(b.hi()));
    let lo = max_abs_divisor.negate().checked_add(Bound::Finite(1))?;
    let hi = max_abs_divisor.checked_sub(Bound::Finite(1))?;
    Ok(Interval::new(lo, hi, Arc::clone(k)))
}
