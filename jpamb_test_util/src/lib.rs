//! In-memory [`jpamb_loader::OpcodeSource`]/[`jpamb_loader::ConstantsQuery`]
//! fixtures shared by every other crate's test suite.

mod scenarios;
mod suite;

pub use scenarios::{array_oob, assert_positive, div_by_param, infinite_loop, loop_with_back_edge, recursive_fib};
pub use suite::FixtureSuite;
