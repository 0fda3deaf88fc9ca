//! Loader interfaces and the process-wide bytecode cache.
//!
//! The actual bytecode loader (which maps a method identifier to opcodes by
//! reading a compiled class) and the Java source tree-sitter parser (which
//! extracts K and parameter descriptors) are out of scope for this crate
//! (§1 Out of scope); this crate only owns the trait boundary the core
//! consumes them through, plus the memoizing cache described in §3
//! (Bytecode cache).

mod cache;
mod error;
mod source;

pub use cache::BytecodeCache;
pub use error::{Error, Result};
pub use source::{ConstantsQuery, OpcodeSource};
