use crate::{AnalyzerConfiguration, Result};
use jpamb_abstract::AbstractValue;
use jpamb_concrete::Outcome;
use jpamb_loader::{BytecodeCache, ConstantsQuery, OpcodeSource};
use jpamb_opcode::MethodId;
use std::collections::HashSet;

/// The result of [`analyze`]: the set of terminal outcomes reachable from
/// the method's entry, and the initial interval assigned to each parameter
/// (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub outcomes: HashSet<Outcome>,
    pub input_intervals: Vec<AbstractValue>,
}

/// Loads `method`'s opcodes and constants, runs the abstract interpreter's
/// worklist to fixed point (or `config`'s pass cap), and returns the
/// predicted outcome set alongside the input intervals the analysis started
/// from (§4.5: "the driver is pure over these inputs").
///
/// # Errors
/// Propagates a fatal [`jpamb_abstract::Error`] or a loader failure.
pub fn analyze<S, C>(
    method: &MethodId,
    cache: &BytecodeCache<S>,
    constants: &C,
    config: &AnalyzerConfiguration,
) -> Result<Analysis>
where
    S: OpcodeSource,
    C: ConstantsQuery,
{
    let (k, params) = constants.constants(method)?;
    let k = std::sync::Arc::new(k);
    let input_intervals = params
        .iter()
        .map(|param| AbstractValue::initial_param(&param.abstract_type(), &k))
        .collect();

    let outcomes = jpamb_abstract::analyze(method, cache, constants, config.max_passes())?;
    Ok(Analysis { outcomes, input_intervals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_test_util::{array_oob, div_by_param, infinite_loop};

    #[test]
    fn known_nonzero_divisor_proves_a_single_ok_outcome() {
        let (suite, method) = div_by_param();
        let cache = BytecodeCache::new(suite.clone());
        let config = AnalyzerConfiguration::default();
        let analysis = analyze(&method, &cache, &suite, &config).unwrap();
        assert_eq!(analysis.outcomes, HashSet::from([Outcome::Ok]));
        assert_eq!(analysis.input_intervals.len(), 1);
    }

    #[test]
    fn infinite_loop_reports_only_star() {
        let (suite, method) = infinite_loop();
        let cache = BytecodeCache::new(suite.clone());
        let config = AnalyzerConfiguration::default();
        let analysis = analyze(&method, &cache, &suite, &config).unwrap();
        assert_eq!(analysis.outcomes, HashSet::from([Outcome::Star]));
    }

    #[test]
    fn unmodeled_array_access_is_incomplete() {
        let (suite, method) = array_oob();
        let cache = BytecodeCache::new(suite.clone());
        let config = AnalyzerConfiguration::default();
        let analysis = analyze(&method, &cache, &suite, &config).unwrap();
        assert!(analysis.outcomes.is_empty());
    }
}
