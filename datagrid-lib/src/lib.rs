//! Data grid core library
//!
//! Column headers for nested record paths, column visibility, and
//! scroll-driven pagination against a filterable, sortable REST endpoint.
//! Rendering is left to the caller through [`grid::GridRenderer`].

pub mod api;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod header;
pub mod model;
pub mod scroll;
pub mod source;
pub mod visibility;

mod client;

pub use client::*;
pub use config::GridConfig;
pub use error::Error;
pub use grid::Grid;
pub use grid::GridRenderer;
