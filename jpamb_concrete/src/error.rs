use jpamb_opcode::Opcode;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Fatal, implementation-level errors the stepper can raise (§7
/// "Implementation bugs"). These propagate and abort the current run; they
/// are never converted into a terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("local variable {0} is undefined")]
    UndefinedLocal(usize),
    #[error("heap reference {0} is undefined")]
    UndefinedHeapEntry(usize),
    #[error("value of type {actual} does not match expected type {expected}")]
    TypeMismatch { expected: String, actual: String },
    #[error("opcode {0:?} is outside the supported subset")]
    UnsupportedOpcode(Opcode),
    #[error("program counter {0} has no opcode in its method")]
    ProgramCounterOutOfRange(usize),
    #[error("step called on a state with no frames")]
    NoActiveFrame,
    #[error(transparent)]
    Loader(#[from] jpamb_loader::Error),
}
