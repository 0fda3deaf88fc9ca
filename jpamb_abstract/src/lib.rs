//! An interval-lattice abstract interpreter driven by a worklist fixed
//! point, reporting the set of terminal outcomes a method can reach without
//! running it (§4.2, §4.4).

mod astep;
mod driver;
mod error;
mod frame;
mod state;
mod value;

pub use astep::{astep, Step};
pub use driver::{analyze, MAX_PASSES};
pub use error::{Error, Result};
pub use frame::AbstractFrame;
pub use state::AbstractState;
pub use value::AbstractValue;
