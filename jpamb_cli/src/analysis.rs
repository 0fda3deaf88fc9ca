//! The generic method-analysis pipeline the `target` argument drives once a
//! real loader is wired in.
//!
//! Generic over the loader traits rather than tied to any one
//! implementation: the bytecode loader and the syntactic constants
//! extractor are external collaborators out of scope for this repository
//! (§1), so this module never names a concrete source. It is exercised by
//! this crate's integration tests against the in-memory fixtures shared
//! across the workspace.
use crate::error::Result;
use jpamb_analyzer::{analyze, run_concrete, wager, AnalyzerConfiguration, Input, Wager};
use jpamb_concrete::CancellationFlag;
use jpamb_loader::{BytecodeCache, ConstantsQuery, OpcodeSource};
use jpamb_opcode::MethodId;
use std::collections::HashSet;

/// Analyzes `method`, witnesses it once with `inputs`, and returns a
/// confidence-tagged report combining both (§4.5, §4.6, §10.5).
///
/// # Errors
/// Propagates a fatal [`jpamb_analyzer::Error`].
pub fn report<S, C>(
    method: &MethodId,
    cache: &BytecodeCache<S>,
    constants: &C,
    inputs: &[Input],
    config: &AnalyzerConfiguration,
) -> Result<Vec<Wager>>
where
    S: OpcodeSource,
    C: ConstantsQuery,
{
    let analysis = analyze(method, cache, constants, config)?;
    let cancel = CancellationFlag::new();
    let witnessed = run_concrete(method, inputs, cache, &cancel, config.step_cap())?;
    let witnessed = HashSet::from([witnessed]);
    Ok(wager(&witnessed, &analysis.outcomes, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_test_util::{array_oob, div_by_param, infinite_loop};

    #[test]
    fn div_by_param_reports_a_fully_confident_outcome_for_a_nonzero_argument() {
        let (suite, method) = div_by_param();
        let cache = BytecodeCache::new(suite.clone());
        let config = AnalyzerConfiguration::default();

        let wagers = report(&method, &cache, &suite, &[Input::Int(5)], &config).unwrap();
        assert_eq!(wagers.len(), 1);
        assert_eq!(wagers[0].outcome, jpamb_concrete::Outcome::Ok);
        assert!((wagers[0].confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn infinite_loop_reports_star_at_full_confidence() {
        let (suite, method) = infinite_loop();
        let cache = BytecodeCache::new(suite.clone());
        let config = AnalyzerConfiguration::default();

        let wagers = report(&method, &cache, &suite, &[], &config).unwrap();
        assert_eq!(wagers.len(), 1);
        assert_eq!(wagers[0].outcome, jpamb_concrete::Outcome::Star);
    }

    #[test]
    fn array_out_of_bounds_is_witnessed_even_though_analysis_alone_is_incomplete() {
        let (suite, method) = array_oob();
        let cache = BytecodeCache::new(suite.clone());
        let config = AnalyzerConfiguration::default();

        let wagers = report(&method, &cache, &suite, &[], &config).unwrap();
        assert_eq!(wagers.len(), 1);
        assert_eq!(wagers[0].outcome, jpamb_concrete::Outcome::OutOfBounds);
    }
}
