use crate::{Outcome, Result, State, StepResult, step};
use jpamb_loader::{BytecodeCache, OpcodeSource};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// A step cap well above any realistic loop-free method, used to bound a
/// single concrete run (§4.6: "step cap ≥ 10⁵").
pub const DEFAULT_STEP_CAP: u32 = 100_000;

/// The cooperative cancellation signal shared between a fuzzing supervisor
/// and the worker running [`run`] (§5). The supervisor sets it; the worker
/// polls it once per step and never otherwise touches shared state.
#[derive(Debug, Default)]
pub struct CancellationFlag(AtomicBool);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        CancellationFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs `state` to completion under `cache`, checking `cancel` at every step
/// boundary and stopping after `step_cap` steps (§4.6).
///
/// # Errors
/// Propagates any fatal [`crate::Error`] raised by [`step`].
pub fn run<S: OpcodeSource>(
    state: &mut State,
    cache: &BytecodeCache<S>,
    cancel: &CancellationFlag,
    step_cap: u32,
) -> Result<Outcome> {
    for steps_taken in 0..step_cap {
        if cancel.is_cancelled() {
            trace!(steps_taken, "cancellation observed, returning not done");
            return Ok(Outcome::NotDone);
        }
        match step(state, cache)? {
            StepResult::Continued => {}
            StepResult::Terminal(outcome) => return Ok(outcome),
        }
    }
    Ok(Outcome::Star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Frame, Heap};
    use jpamb_opcode::{MethodId, Opcode};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct LoopSource;

    impl OpcodeSource for LoopSource {
        fn opcodes(&self, _method: &MethodId) -> jpamb_loader::Result<Vec<Opcode>> {
            Ok(vec![Opcode::Goto { target: 0 }])
        }
    }

    fn looping_state() -> (State, BytecodeCache<LoopSource>) {
        let method = Arc::new(MethodId::parse("pkg/C.loop:()V").unwrap());
        let pc = jpamb_opcode::ProgramCounter::new(method, 0);
        let state = State::new(Heap::new(), Frame::new(HashMap::new(), pc));
        (state, BytecodeCache::new(LoopSource))
    }

    #[test]
    fn step_cap_exhaustion_yields_star() {
        let (mut state, cache) = looping_state();
        let cancel = CancellationFlag::new();
        let outcome = run(&mut state, &cache, &cancel, 50).unwrap();
        assert_eq!(outcome, Outcome::Star);
    }

    #[test]
    fn cancellation_is_observed_before_the_next_step() {
        let (mut state, cache) = looping_state();
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let outcome = run(&mut state, &cache, &cancel, 50).unwrap();
        assert_eq!(outcome, Outcome::NotDone);
    }
}
