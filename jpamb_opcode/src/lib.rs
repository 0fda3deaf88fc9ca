//! Opcode, type, and program-counter model shared by every other crate in the
//! analyzer.
//!
//! This crate owns the closed vocabulary of instruction shapes the analyzer
//! understands, the reduced JVM type system the core reasons about, method
//! identifiers in their textual form, and the program-counter pair used to
//! address a single instruction inside a method.

mod error;
mod method_id;
mod opcode;
mod pc;
mod ty;

pub use error::{Error, Result};
pub use method_id::{MethodId, ParamDescriptor};
pub use opcode::{BinaryOp, Condition, Literal, Opcode};
pub use pc::ProgramCounter;
pub use ty::Type;
