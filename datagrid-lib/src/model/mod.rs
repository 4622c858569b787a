//! Typed models

mod column;
mod header;
mod record;

pub use column::*;
pub use header::*;
pub use record::*;
