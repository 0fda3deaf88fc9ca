//! A stack-machine interpreter over concrete values, stepping one opcode at
//! a time and reporting the terminal outcome of a run (§4.1, §4.6).

mod driver;
mod error;
mod frame;
mod heap;
mod outcome;
mod state;
mod step;
mod value;

pub use driver::{CancellationFlag, DEFAULT_STEP_CAP, run};
pub use error::{Error, Result};
pub use frame::Frame;
pub use heap::{Heap, HeapObject};
pub use outcome::{Outcome, StepResult};
pub use state::State;
pub use step::step;
pub use value::{Payload, Value};
