use crate::{astep, AbstractFrame, AbstractState, AbstractValue, Result, Step};
use jpamb_concrete::Outcome;
use jpamb_loader::{BytecodeCache, ConstantsQuery, OpcodeSource};
use jpamb_opcode::{MethodId, ProgramCounter};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// A pass cap well above any realistic convergence (§4.2, §8: "≈100 passes").
/// Each pass processes every currently-dirty program point exactly once, so
/// this bounds the number of times any single loop header can be widened.
pub const MAX_PASSES: u32 = 100;

/// Runs the worklist fixed point for `method`'s entry state and returns the
/// set of terminal outcomes it can reach.
///
/// An empty result means the analysis never observed a terminal outcome and
/// never observed a back-edge either — typically because every reachable
/// path dead-ends on an unmodeled heap opcode — so the caller should fall
/// back to the concrete interpreter (§4.2 Outcome semantics). A result
/// containing only [`Outcome::Star`] means either the pass cap was hit or a
/// loop was observed with no terminal ever reached on any path.
///
/// # Errors
/// Propagates a fatal [`crate::Error`] raised while stepping any reachable
/// state.
pub fn analyze<S, C>(
    method: &MethodId,
    cache: &BytecodeCache<S>,
    constants: &C,
    max_passes: u32,
) -> Result<HashSet<Outcome>>
where
    S: OpcodeSource,
    C: ConstantsQuery,
{
    let (k, params) = constants.constants(method)?;
    let k = Arc::new(k);

    let mut locals = HashMap::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        locals.insert(index, AbstractValue::initial_param(&param.abstract_type(), &k));
    }
    let entry_pc = ProgramCounter::new(Arc::new(method.clone()), 0);
    let initial_state = AbstractState::new(AbstractFrame::new(locals, entry_pc.clone()));

    let mut per_pc: HashMap<ProgramCounter, AbstractState> = HashMap::new();
    per_pc.insert(entry_pc.clone(), initial_state);
    let mut dirty: HashSet<ProgramCounter> = HashSet::from([entry_pc]);
    let mut stabilized: HashSet<ProgramCounter> = HashSet::new();
    let mut outcomes: HashSet<Outcome> = HashSet::new();
    let mut saw_back_edge = false;

    for pass in 0..max_passes {
        if dirty.is_empty() {
            debug!(pass, "fixed point reached");
            break;
        }
        let work: Vec<ProgramCounter> = dirty.drain().collect();
        let mut staged: HashMap<ProgramCounter, AbstractState> = HashMap::new();

        for pc in &work {
            let state = per_pc.get(pc).expect("dirty pc always has a recorded state").clone();
            for step in astep(&state, cache, &k)? {
                match step {
                    Step::Terminal(outcome) => {
                        outcomes.insert(outcome);
                    }
                    Step::Next(next_state) => {
                        if is_back_edge(&state, &next_state) {
                            saw_back_edge = true;
                        }
                        let next_pc = next_state.pc().clone();
                        staged
                            .entry(next_pc)
                            .and_modify(|existing| *existing = existing.join(&next_state))
                            .or_insert(next_state);
                    }
                }
            }
        }

        for (pc, incoming) in staged {
            let inserted_new = !per_pc.contains_key(&pc);
            let changed = if inserted_new {
                per_pc.insert(pc.clone(), incoming);
                true
            } else {
                let existing = per_pc.get(&pc).expect("just checked contains_key");
                let merged = if stabilized.contains(&pc) {
                    existing.widen(&incoming)
                } else {
                    existing.join(&incoming)
                };
                let changed = merged != *existing;
                if changed {
                    per_pc.insert(pc.clone(), merged);
                }
                changed
            };
            if changed {
                dirty.insert(pc);
            }
        }

        stabilized.extend(work);

        if pass + 1 == max_passes && !dirty.is_empty() {
            debug!(pass, "pass cap exhausted without convergence");
            outcomes.insert(Outcome::Star);
        }
    }

    if outcomes.is_empty() && saw_back_edge {
        outcomes.insert(Outcome::Star);
    }
    Ok(outcomes)
}

/// Whether `before -> after` is an intraprocedural backward jump: the same
/// frame depth and method, landing at or before the offset it jumped from.
/// A call (depth grows) or a return (depth shrinks) is never a back-edge
/// even though a self-recursive call also revisits offset 0 of the same
/// method.
fn is_back_edge(before: &AbstractState, after: &AbstractState) -> bool {
    before.depth() == after.depth()
        && before.pc().method == after.pc().method
        && after.pc().offset <= before.pc().offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_test_util::{array_oob, div_by_param, infinite_loop, loop_with_back_edge, recursive_fib};

    #[test]
    fn division_by_parameter_with_a_known_nonzero_divisor_proves_no_crash() {
        // K = {10} pins the parameter's initial interval to exactly [10, 10],
        // so the divisor can never be zero: the analysis proves this branch
        // safe rather than merely failing to disprove it.
        let (suite, method) = div_by_param();
        let cache = BytecodeCache::new(suite.clone());
        let outcomes = analyze(&method, &cache, &suite, MAX_PASSES).unwrap();
        assert_eq!(outcomes, HashSet::from([Outcome::Ok]));
    }

    #[test]
    fn infinite_loop_with_no_terminal_yields_star() {
        let (suite, method) = infinite_loop();
        let cache = BytecodeCache::new(suite.clone());
        let outcomes = analyze(&method, &cache, &suite, MAX_PASSES).unwrap();
        assert_eq!(outcomes, HashSet::from([Outcome::Star]));
    }

    #[test]
    fn array_out_of_bounds_is_incomplete() {
        let (suite, method) = array_oob();
        let cache = BytecodeCache::new(suite.clone());
        let outcomes = analyze(&method, &cache, &suite, MAX_PASSES).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn recursive_fib_converges_to_ok() {
        let (suite, method) = recursive_fib();
        let cache = BytecodeCache::new(suite.clone());
        let outcomes = analyze(&method, &cache, &suite, MAX_PASSES).unwrap();
        assert!(outcomes.contains(&Outcome::Ok));
    }

    #[test]
    fn loop_with_back_edge_still_reaches_ok() {
        let (suite, method) = loop_with_back_edge();
        let cache = BytecodeCache::new(suite.clone());
        let outcomes = analyze(&method, &cache, &suite, MAX_PASSES).unwrap();
        assert!(outcomes.contains(&Outcome::Ok));
    }
}
