use crate::AnalyzerConfiguration;
use jpamb_concrete::Outcome;
use std::collections::HashSet;

/// One outcome paired with the confidence it was observed at (§10.5), ready
/// to print as `label;NN%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wager {
    pub outcome: Outcome,
    pub confidence: f64,
}

impl std::fmt::Display for Wager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let percent = (self.confidence * 100.0).round();
        write!(f, "{};{percent:.0}%", self.outcome)
    }
}

/// Builds one [`Wager`] per outcome witnessed by either interpreter:
/// outcomes the concrete run actually produced get `config`'s concrete
/// confidence, outcomes only predicted by abstract interpretation get its
/// abstract confidence (§7 "User-visible behavior", §10.5).
///
/// `Outcome::NotDone` is never printed (§7): callers that pass it in
/// `witnessed` or `predicted` have it silently dropped here.
#[must_use]
pub fn wager(witnessed: &HashSet<Outcome>, predicted: &HashSet<Outcome>, config: &AnalyzerConfiguration) -> Vec<Wager> {
    let mut wagers: Vec<Wager> = witnessed
        .iter()
        .filter(|outcome| **outcome != Outcome::NotDone)
        .map(|outcome| Wager {
            outcome: *outcome,
            confidence: config.concrete_confidence(),
        })
        .collect();

    for outcome in predicted {
        if *outcome == Outcome::NotDone || witnessed.contains(outcome) {
            continue;
        }
        wagers.push(Wager {
            outcome: *outcome,
            confidence: config.abstract_confidence(),
        });
    }

    wagers
}
