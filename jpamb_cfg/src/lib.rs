mod block;
mod builder;
mod cfg;
mod error;

pub use block::{Block, BlockId, Edge, EdgeId, NodeRef};
pub use builder::CfgBuilder;
pub use cfg::Cfg;
pub use error::{Error, Result};
