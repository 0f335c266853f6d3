//! Tabview Core - shared model and engine contract
//!
//! This crate defines the types every other tabview crate depends on:
//!
//! - `QueryDescriptor` - Immutable snapshot of filters, sorts, search and paging
//! - `FilterClause` / `SortClause` - The descriptor's building blocks
//! - `QueryResult` - One page of rows as reported by the remote engine
//! - `QueryEngine` - Trait for the remote query/update/delete/export service
//!
//! Nothing here executes queries. The engine that does lives on the server.

mod engine;
mod error;
mod filter;
mod record;
mod schema;
mod sort;
mod types;

pub use engine::*;
pub use error::*;
pub use filter::*;
pub use record::*;
pub use schema::*;
pub use sort::*;
pub use types::*;
