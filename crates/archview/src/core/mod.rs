//! Core building blocks for view composition
//!
//! The architecture graph, the shared value types, order-label sequencing,
//! configuration, errors and logging. Views live in [`crate::views`].

mod config;
mod error;
pub mod logging;
mod model;
mod sequence;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use model::*;
pub use sequence::*;
pub use types::*;
