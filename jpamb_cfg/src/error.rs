/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Loader(#[from] jpamb_loader::Error),
    #[error("backward jump to offset {0} does not land inside any built block")]
    UnresolvedBackEdge(usize),
    #[error("opcode {0:?} is outside the subset the CFG builder understands")]
    UnsupportedOpcode(jpamb_opcode::Opcode),
    #[error("invoke-special to {0} is not a recognized AssertionError constructor")]
    UnsupportedInvokeSpecial(String),
}
