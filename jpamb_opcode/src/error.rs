//! Error handling for the opcode and method-identifier model.

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors produced while parsing the textual surface this crate exposes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A method identifier did not match the
    /// `package/path/Class.method:(param-types)return-type` grammar.
    #[error("invalid method identifier: {0}")]
    InvalidMethodId(String),
    /// A descriptor character was not a recognized field type.
    #[error("invalid type descriptor: {0}")]
    InvalidTypeDescriptor(String),
}
