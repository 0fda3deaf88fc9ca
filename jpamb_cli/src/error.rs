//! Error handling for the CLI boundary: every failure mode below is an
//! external or fatal error in the §7 taxonomy, never a terminal outcome.

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidMethodId(#[from] jpamb_opcode::Error),
    #[error(transparent)]
    Analyzer(#[from] jpamb_analyzer::Error),
    /// No real `OpcodeSource`/`ConstantsQuery` implementation is wired into
    /// this binary: the bytecode loader and constants extractor are
    /// external collaborators, out of scope for this repository (§1).
    #[error("no bytecode loader is configured; analyzing {0} requires wiring a real OpcodeSource/ConstantsQuery implementation into this binary")]
    NoLoaderConfigured(String),
}
