//! A bounded-integer interval lattice with explicit ±∞ and K-widening
//! (§3 Value (abstract), §4.4 Interval lattice).

mod bound;
mod error;
mod interval;

pub use bound::Bound;
pub use error::{Error, Result};
pub use interval::Interval;
