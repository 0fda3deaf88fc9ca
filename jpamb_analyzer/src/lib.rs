//! Glues the abstract and concrete interpreters into the analyzer's two
//! operations, `analyze` and `run-concrete` (§4.5, §4.6, §6 Outcome surface).

mod analyze;
mod concrete_run;
mod config;
mod confidence;
mod error;

pub use analyze::{analyze, Analysis};
pub use concrete_run::{run as run_concrete, Input};
pub use config::{AnalyzerConfiguration, AnalyzerConfigurationBuilder};
pub use confidence::{wager, Wager};
pub use error::{Error, Result};
