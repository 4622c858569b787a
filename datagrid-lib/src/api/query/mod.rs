//! Query types for the paginated backend.
//!
//! # Types
//!
//! - [`Filter`] - A `<field>__<operator>` filter condition
//! - [`Sort`] - The active sort, with its normalized backend key
//! - [`QueryState`] - Fields, filters, sort and pagination cursor
//! - [`QueryUpdate`] - Changes merged into the query on reset
//! - [`PageRequest`] - A snapshot of one page fetch, encodable as query parameters
//! - [`Page`] - A page of rows with the reported total

mod filter;
mod order;
mod page;
mod request;
mod state;

pub use filter::Filter;
pub use filter::FilterOp;
pub use order::Direction;
pub use order::Sort;
pub use page::Page;
pub use page::TotalCount;
pub use request::PageRequest;
pub use state::QueryState;
pub use state::QueryUpdate;
