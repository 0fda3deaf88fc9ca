//! Error handling for the loader boundary.

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by the loader boundary.
///
/// These are *external errors* in the §7 taxonomy: a failure to resolve a
/// method or to parse its source propagates unchanged to the caller, it is
/// never converted into a terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The external bytecode loader could not resolve the requested method.
    #[error("method not found: {0}")]
    MethodNotFound(String),
    /// The external syntactic extractor failed to parse the method's source.
    #[error("failed to extract constants for {0}: {1}")]
    ConstantExtractionFailed(String, String),
}
