//! Exercises the six scenarios named in §8 through the full analyzer driver:
//! `analyze` for the prediction, `run_concrete` for a witness, `wager` for
//! the combined confidence-tagged report.

use jpamb_analyzer::{analyze, run_concrete, wager, AnalyzerConfiguration, AnalyzerConfigurationBuilder, Input};
use jpamb_concrete::{CancellationFlag, Outcome};
use jpamb_loader::BytecodeCache;
use jpamb_test_util::{array_oob, div_by_param, infinite_loop, loop_with_back_edge, recursive_fib};

#[test]
fn div_by_param_witnesses_both_outcomes_across_two_concrete_inputs() {
    let (suite, method) = div_by_param();
    let cache = BytecodeCache::new(suite.clone());
    let config = AnalyzerConfiguration::default();
    let cancel = CancellationFlag::new();

    let analysis = analyze(&method, &cache, &suite, &config).unwrap();

    let zero = run_concrete(&method, &[Input::Int(0)], &cache, &cancel, config.step_cap()).unwrap();
    let five = run_concrete(&method, &[Input::Int(5)], &cache, &cancel, config.step_cap()).unwrap();
    assert_eq!(zero, Outcome::DivideByZero);
    assert_eq!(five, Outcome::Ok);

    let witnessed = std::collections::HashSet::from([zero, five]);
    let report = wager(&witnessed, &analysis.outcomes, &config);
    assert_eq!(report.len(), 2);
    assert!(report.iter().all(|w| (w.confidence - 1.0).abs() < f64::EPSILON));
}

#[test]
fn infinite_loop_is_predicted_and_witnessed_as_star() {
    let (suite, method) = infinite_loop();
    let cache = BytecodeCache::new(suite.clone());
    let config = AnalyzerConfigurationBuilder::new().step_cap(500).build();
    let cancel = CancellationFlag::new();

    let analysis = analyze(&method, &cache, &suite, &config).unwrap();
    assert_eq!(analysis.outcomes, std::collections::HashSet::from([Outcome::Star]));

    let witnessed = run_concrete(&method, &[], &cache, &cancel, config.step_cap()).unwrap();
    assert_eq!(witnessed, Outcome::Star);
}

#[test]
fn array_out_of_bounds_is_incomplete_in_analysis_but_witnessed_concretely() {
    let (suite, method) = array_oob();
    let cache = BytecodeCache::new(suite.clone());
    let config = AnalyzerConfiguration::default();
    let cancel = CancellationFlag::new();

    let analysis = analyze(&method, &cache, &suite, &config).unwrap();
    assert!(analysis.outcomes.is_empty());

    let witnessed = run_concrete(&method, &[], &cache, &cancel, config.step_cap()).unwrap();
    assert_eq!(witnessed, Outcome::OutOfBounds);

    let predicted = std::collections::HashSet::new();
    let witnessed_set = std::collections::HashSet::from([witnessed]);
    let report = wager(&witnessed_set, &predicted, &config);
    assert_eq!(report.len(), 1);
}

#[test]
fn recursive_fib_converges_and_a_concrete_run_agrees() {
    let (suite, method) = recursive_fib();
    let cache = BytecodeCache::new(suite.clone());
    let config = AnalyzerConfiguration::default();
    let cancel = CancellationFlag::new();

    let analysis = analyze(&method, &cache, &suite, &config).unwrap();
    assert!(analysis.outcomes.contains(&Outcome::Ok));

    let witnessed = run_concrete(&method, &[Input::Int(5)], &cache, &cancel, config.step_cap()).unwrap();
    assert_eq!(witnessed, Outcome::Ok);
}

#[test]
fn loop_with_back_edge_converges_and_a_concrete_run_agrees() {
    let (suite, method) = loop_with_back_edge();
    let cache = BytecodeCache::new(suite.clone());
    let config = AnalyzerConfiguration::default();
    let cancel = CancellationFlag::new();

    let analysis = analyze(&method, &cache, &suite, &config).unwrap();
    assert!(analysis.outcomes.contains(&Outcome::Ok));

    let witnessed = run_concrete(&method, &[Input::Int(4)], &cache, &cancel, config.step_cap()).unwrap();
    assert_eq!(witnessed, Outcome::Ok);
}
