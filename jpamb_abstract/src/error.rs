use jpamb_opcode::{MethodId, Opcode};

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Fatal, implementation-level errors the abstract stepper can raise (§7
/// "Implementation bugs"), mirroring the concrete stepper's error boundary.
///
/// Unlike the concrete interpreter, a missing local or an empty operand
/// stack is *not* fatal here: a state reached mid-fixed-point may not yet
/// carry every local a later pass will establish, so those cases simply
/// produce no successor for this pass instead of propagating an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("opcode {0:?} is outside the supported subset")]
    UnsupportedOpcode(Opcode),
    #[error("invokespecial on {0} is not a supported constructor")]
    UnsupportedInvokeSpecial(MethodId),
    #[error(transparent)]
    Loader(#[from] jpamb_loader::Error),
    #[error(transparent)]
    Interval(#[from] jpamb_interval::Error),
}
